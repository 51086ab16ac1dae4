//! Pre-flight checks on the input audio file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;

use crate::TranscribeError;

/// Extensions accepted by the validator, compared case-insensitively.
pub const ALLOWED_EXTENSIONS: [&str; 3] = ["wav", "mp3", "m4a"];

/// Inputs strictly larger than this are rejected (100 MiB).
pub const MAX_FILE_SIZE_BYTES: u64 = 100 * 1024 * 1024;

/// A validated input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioFile {
    path: PathBuf,
    extension: String,
    size: u64,
}

impl AudioFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Lowercased extension without the leading dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn size(&self) -> u64 {
        self.size
    }
}

/// Checks that `path` names an existing file with a supported extension
/// and a size within [`MAX_FILE_SIZE_BYTES`].
///
/// Checks run in that order, so a missing `notes.txt` is reported as not
/// found rather than as an unsupported format.
pub fn validate_audio_file(path: &Path) -> Result<AudioFile, TranscribeError> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        Ok(_) => return Err(TranscribeError::FileNotFound(path.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(TranscribeError::FileNotFound(path.to_path_buf()))
        }
        Err(source) => {
            return Err(TranscribeError::Metadata {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(TranscribeError::UnsupportedFormat { extension });
    }

    let size = metadata.len();
    if size > MAX_FILE_SIZE_BYTES {
        return Err(TranscribeError::FileTooLarge {
            size,
            limit: MAX_FILE_SIZE_BYTES,
        });
    }

    debug!("validated {} ({} bytes)", path.display(), size);

    Ok(AudioFile {
        path: path.to_path_buf(),
        extension,
        size,
    })
}
