use crate::{TranscriptionEngine, TranscriptionResult, TranscriptionSegment};
use log::debug;
use std::path::Path;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

#[derive(Debug, Clone)]
pub struct WhisperParams {
    /// Forced language code; `None` lets the model detect it.
    pub language: Option<String>,
    pub beam_size: i32,
    pub print_special: bool,
    pub print_progress: bool,
    pub print_realtime: bool,
    pub print_timestamps: bool,
    pub suppress_blank: bool,
    pub suppress_non_speech_tokens: bool,
    pub no_speech_thold: f32,
}

impl Default for WhisperParams {
    fn default() -> Self {
        Self {
            language: None,
            beam_size: 5,
            print_special: false,
            print_progress: false,
            print_realtime: false,
            print_timestamps: false,
            suppress_blank: true,
            suppress_non_speech_tokens: true,
            no_speech_thold: 0.6,
        }
    }
}

pub struct WhisperEngine {
    state: Option<whisper_rs::WhisperState>,
    context: Option<whisper_rs::WhisperContext>,
}

impl Default for WhisperEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl WhisperEngine {
    pub fn new() -> Self {
        Self {
            state: None,
            context: None,
        }
    }
}

impl TranscriptionEngine for WhisperEngine {
    type Params = WhisperParams;

    fn load_model(&mut self, model_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let path_str = model_path
            .to_str()
            .ok_or_else(|| format!("model path is not valid UTF-8: {}", model_path.display()))?;
        let context =
            WhisperContext::new_with_params(path_str, WhisperContextParameters::default())?;

        let state = context.create_state()?;

        self.context = Some(context);
        self.state = Some(state);
        Ok(())
    }

    fn unload_model(&mut self) {
        self.state = None;
        self.context = None;
    }

    fn is_loaded(&self) -> bool {
        self.state.is_some()
    }

    fn transcribe_samples(
        &mut self,
        samples: Vec<f32>,
        params: Option<Self::Params>,
    ) -> Result<TranscriptionResult, Box<dyn std::error::Error>> {
        let state = self
            .state
            .as_mut()
            .ok_or("Model not loaded. Call load_model() first.")?;

        if samples.is_empty() {
            return Ok(TranscriptionResult::default());
        }

        let whisper_params = params.unwrap_or_default();

        let mut full_params = FullParams::new(SamplingStrategy::BeamSearch {
            beam_size: whisper_params.beam_size,
            patience: -1.0,
        });
        full_params.set_language(whisper_params.language.as_deref());
        full_params.set_print_special(whisper_params.print_special);
        full_params.set_print_progress(whisper_params.print_progress);
        full_params.set_print_realtime(whisper_params.print_realtime);
        full_params.set_print_timestamps(whisper_params.print_timestamps);
        full_params.set_suppress_blank(whisper_params.suppress_blank);
        full_params.set_suppress_nst(whisper_params.suppress_non_speech_tokens);
        full_params.set_no_speech_thold(whisper_params.no_speech_thold);

        state.full(full_params, &samples)?;

        let lang_id = state.full_lang_id_from_state();
        let language = whisper_rs::get_lang_str(lang_id).map(str::to_string);
        debug!("detected language id {lang_id} ({language:?})");

        let mut segments = Vec::new();
        let mut full_text = String::new();

        // whisper timestamps are in centiseconds
        for segment in state.as_iter() {
            let text = segment.to_str_lossy()?.into_owned();
            let start = segment.start_timestamp() as f32 / 100.0;
            let end = segment.end_timestamp() as f32 / 100.0;

            full_text.push_str(&text);
            segments.push(TranscriptionSegment { start, end, text });
        }

        Ok(TranscriptionResult {
            language,
            text: full_text,
            segments,
        })
    }
}
