pub mod audio;
pub mod engines;
pub mod error;
pub mod model;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod validate;

use std::path::Path;

pub use error::TranscribeError;
pub use model::{ModelError, ModelSource};
pub use normalize::{NormalizedAudio, Normalizer};
pub use output::{SegmentOutput, TranscriptOutput};
pub use pipeline::Transcriber;
pub use validate::{validate_audio_file, AudioFile};

/// Native result of a transcription engine, before output shaping.
#[derive(Debug, Clone, Default)]
pub struct TranscriptionResult {
    pub language: Option<String>,
    pub text: String,
    pub segments: Vec<TranscriptionSegment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionSegment {
    pub start: f32,
    pub end: f32,
    pub text: String,
}

pub trait TranscriptionEngine {
    type Params;

    fn load_model(&mut self, model_path: &Path) -> Result<(), Box<dyn std::error::Error>>;
    fn unload_model(&mut self);
    fn is_loaded(&self) -> bool;
    fn transcribe_samples(
        &mut self,
        samples: Vec<f32>,
        params: Option<Self::Params>,
    ) -> Result<TranscriptionResult, Box<dyn std::error::Error>>;

    fn transcribe_file(
        &mut self,
        wav_path: &Path,
        params: Option<Self::Params>,
    ) -> Result<TranscriptionResult, Box<dyn std::error::Error>> {
        let samples = audio::read_wav_samples(wav_path)?;
        self.transcribe_samples(samples, params)
    }
}
