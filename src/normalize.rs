//! Audio normalization through an external transcoder.
//!
//! Input audio is downmixed to mono and resampled to 16 kHz 16-bit PCM by
//! running `ffmpeg`. Each call writes to its own temporary file, so
//! concurrent runs never share an output path.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::{debug, info};
use tempfile::TempPath;

use crate::audio::{TARGET_CHANNELS, TARGET_SAMPLE_RATE};
use crate::TranscribeError;

const STDERR_TAIL_BYTES: usize = 2048;

/// Runs the external transcoder with fixed output settings.
#[derive(Debug, Clone)]
pub struct Normalizer {
    program: OsString,
    temp_dir: Option<PathBuf>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

/// A normalized WAV file that is deleted when dropped.
#[derive(Debug)]
pub struct NormalizedAudio {
    path: TempPath,
}

impl NormalizedAudio {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Normalizer {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            temp_dir: None,
        }
    }

    /// Place temporary files in `dir` instead of the system temp directory.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Transcode `source` into a fresh mono 16 kHz WAV file.
    pub fn normalize(&self, source: &Path) -> Result<NormalizedAudio, TranscribeError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("normalized_audio-").suffix(".wav");
        let file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(TranscribeError::TempFile)?;
        let dest = file.into_temp_path();

        let program = self.program.to_string_lossy().into_owned();
        info!("normalizing {} with {}", source.display(), program);

        let output = Command::new(&self.program)
            .arg("-y")
            .arg("-i")
            .arg(source)
            .arg("-ac")
            .arg(TARGET_CHANNELS.to_string())
            .arg("-ar")
            .arg(TARGET_SAMPLE_RATE.to_string())
            .args(["-c:a", "pcm_s16le"])
            .arg(&*dest)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| TranscribeError::TranscoderUnavailable {
                program: program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(TranscribeError::TranscoderFailed {
                program,
                status: output.status,
                stderr: stderr_tail(&output.stderr),
            });
        }

        debug!("normalized audio written to {}", dest.display());
        Ok(NormalizedAudio { path: dest })
    }
}

fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let text = text.trim();
    if text.len() <= STDERR_TAIL_BYTES {
        return text.to_string();
    }
    let mut start = text.len() - STDERR_TAIL_BYTES;
    while !text.is_char_boundary(start) {
        start += 1;
    }
    format!("...{}", &text[start..])
}
