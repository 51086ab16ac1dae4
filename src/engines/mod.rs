//! Speech recognition engines for transcription.
//!
//! ## Whisper Engine
//!
//! OpenAI's Whisper model run through whisper.cpp:
//! - **Model Format**: Single GGML format file (`.bin`)
//! - **Models**: tiny, base, small, medium, large variants
//! - **Features**: Multi-language support with language detection
//!
//! ```rust,no_run
//! use std::path::Path;
//! use transcribe_stamps::{TranscriptionEngine, engines::whisper::WhisperEngine};
//!
//! let mut whisper = WhisperEngine::new();
//! whisper.load_model(Path::new("models/ggml-base.bin"))?;
//! let result = whisper.transcribe_file(Path::new("normalized.wav"), None)?;
//! println!("{:?}: {}", result.language, result.text);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod whisper;
