use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::model::ModelError;

#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("audio file does not exist: {}", .0.display())]
    FileNotFound(PathBuf),
    #[error("could not read metadata for {}: {source}", .path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unsupported format {extension:?}; allowed: wav, mp3, m4a")]
    UnsupportedFormat { extension: String },
    #[error("file too large ({size} bytes); max allowed size is {} MB", .limit / (1024 * 1024))]
    FileTooLarge { size: u64, limit: u64 },
    #[error("failed to create temporary file: {0}")]
    TempFile(#[source] io::Error),
    #[error("transcoder `{program}` could not be started: {source}")]
    TranscoderUnavailable {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("transcoder `{program}` failed ({status}): {stderr}")]
    TranscoderFailed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("invalid normalized audio: {0}")]
    Audio(#[from] hound::Error),
    #[error("unexpected normalized audio format: {0}")]
    UnexpectedAudioFormat(String),
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error("model inference failed: {0}")]
    Inference(String),
    #[error("failed to write output: {0}")]
    Output(#[from] serde_json::Error),
}
