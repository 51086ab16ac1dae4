//! Validate → normalize → transcribe → format, in one pass.

use std::path::Path;

use log::info;

use crate::{
    audio, validate_audio_file, ModelSource, Normalizer, TranscribeError, TranscriptOutput,
    TranscriptionEngine, TranscriptionResult,
};

/// Drives a [`TranscriptionEngine`] over a single input file.
///
/// The model is resolved and loaded lazily, after the input has passed
/// validation, and stays loaded for later calls.
pub struct Transcriber<E: TranscriptionEngine> {
    engine: E,
    model: ModelSource,
    normalizer: Normalizer,
    params: Option<E::Params>,
}

impl<E> Transcriber<E>
where
    E: TranscriptionEngine,
    E::Params: Clone,
{
    pub fn new(engine: E, model: ModelSource, normalizer: Normalizer) -> Self {
        Self {
            engine,
            model,
            normalizer,
            params: None,
        }
    }

    pub fn with_params(mut self, params: E::Params) -> Self {
        self.params = Some(params);
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn transcribe(&mut self, path: &Path) -> Result<TranscriptOutput, TranscribeError> {
        let file = validate_audio_file(path)?;

        if !self.engine.is_loaded() {
            let model_path = self.model.resolve()?;
            info!("loading model {}", model_path.display());
            self.engine
                .load_model(&model_path)
                .map_err(|e| TranscribeError::Inference(format!("failed to load model: {e}")))?;
        }

        let normalized = self.normalizer.normalize(file.path())?;
        let samples = audio::read_wav_samples(normalized.path())?;
        if samples.is_empty() {
            info!("normalized audio has no samples; nothing to transcribe");
            return Ok(TranscriptOutput::from(TranscriptionResult::default()));
        }
        let duration = samples.len() as f64 / audio::TARGET_SAMPLE_RATE as f64;
        info!("transcribing {duration:.2}s of audio");

        let result = self
            .engine
            .transcribe_samples(samples, self.params.clone())
            .map_err(|e| TranscribeError::Inference(e.to_string()))?;

        info!(
            "transcription complete: {} segments, language {:?}",
            result.segments.len(),
            result.language
        );
        Ok(TranscriptOutput::from(result))
    }
}
