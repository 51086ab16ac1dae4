//! Locating Whisper GGML model files.
//!
//! Models are named the way whisper.cpp publishes them (`base`,
//! `small.en`, ...) and stored as `ggml-<name>.bin`. Resolution order:
//!
//! 1. An explicit models directory, if given
//! 2. The user cache directory (`<cache>/transcribe-stamps/models/`)
//! 3. Download from the whisper.cpp repository into the cache

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

/// Model loaded when none is requested.
pub const DEFAULT_MODEL: &str = "base";

/// Model names published by whisper.cpp.
pub const KNOWN_MODELS: [&str; 12] = [
    "tiny",
    "tiny.en",
    "base",
    "base.en",
    "small",
    "small.en",
    "medium",
    "medium.en",
    "large-v1",
    "large-v2",
    "large-v3",
    "large-v3-turbo",
];

const MODEL_BASE_URL: &str = "https://huggingface.co/ggerganov/whisper.cpp/resolve/main";

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("unknown model {0:?}")]
    UnknownModel(String),
    #[error("model file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("model {name:?} is not cached and downloading is disabled")]
    DownloadDisabled { name: String },
    #[error("could not determine cache directory")]
    NoCacheDir,
    #[error("failed to create cache directory: {0}")]
    CacheDir(#[source] std::io::Error),
    #[cfg(feature = "download")]
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Where the model comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    /// A GGML file on disk.
    Path(PathBuf),
    /// A published model looked up by name.
    Named {
        name: String,
        dir: Option<PathBuf>,
        download: bool,
    },
}

impl Default for ModelSource {
    fn default() -> Self {
        ModelSource::Named {
            name: DEFAULT_MODEL.to_string(),
            dir: None,
            download: true,
        }
    }
}

impl ModelSource {
    pub fn resolve(&self) -> Result<PathBuf, ModelError> {
        match self {
            ModelSource::Path(path) => {
                if path.is_file() {
                    Ok(path.clone())
                } else {
                    Err(ModelError::NotFound(path.clone()))
                }
            }
            ModelSource::Named {
                name,
                dir,
                download,
            } => resolve_named(name, dir.as_deref(), *download),
        }
    }
}

/// File name whisper.cpp uses for the model `name`.
pub fn model_file_name(name: &str) -> Result<String, ModelError> {
    if KNOWN_MODELS.contains(&name) {
        Ok(format!("ggml-{name}.bin"))
    } else {
        Err(ModelError::UnknownModel(name.to_string()))
    }
}

/// Platform cache directory for downloaded models.
pub fn model_cache_dir() -> Result<PathBuf, ModelError> {
    dirs::cache_dir()
        .map(|d| d.join("transcribe-stamps").join("models"))
        .ok_or(ModelError::NoCacheDir)
}

fn resolve_named(name: &str, dir: Option<&Path>, download: bool) -> Result<PathBuf, ModelError> {
    let file_name = model_file_name(name)?;

    if let Some(dir) = dir {
        let candidate = dir.join(&file_name);
        if candidate.is_file() {
            return Ok(candidate);
        }
    }

    let cache_dir = model_cache_dir()?;
    let cached_path = cache_dir.join(&file_name);
    if cached_path.is_file() {
        return Ok(cached_path);
    }

    if !download {
        return Err(ModelError::DownloadDisabled {
            name: name.to_string(),
        });
    }

    fs::create_dir_all(&cache_dir).map_err(ModelError::CacheDir)?;
    let url = format!("{MODEL_BASE_URL}/{file_name}");
    info!("downloading model {name} from {url}");
    download_to(&url, &cached_path)?;
    Ok(cached_path)
}

#[cfg(feature = "download")]
fn download_to(url: &str, dest: &Path) -> Result<(), ModelError> {
    let mut response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|source| ModelError::Download {
            url: url.to_string(),
            source,
        })?;

    let bytes = save_stream(&mut response, dest)?;
    info!("saved {} ({} bytes)", dest.display(), bytes);
    Ok(())
}

/// Copy `reader` into `dest` through a uniquely named sibling file, so
/// concurrent downloads never share a partial file and `dest` only ever
/// appears complete. The partial file is removed on failure.
#[cfg(feature = "download")]
fn save_stream<R: std::io::Read>(reader: &mut R, dest: &Path) -> Result<u64, ModelError> {
    use std::io::Write;

    let write_err = |source| ModelError::Write {
        path: dest.to_path_buf(),
        source,
    };

    let dir = dest.parent().unwrap_or_else(|| Path::new("."));
    let mut file = tempfile::Builder::new()
        .prefix(".download-")
        .suffix(".part")
        .tempfile_in(dir)
        .map_err(write_err)?;
    let bytes = std::io::copy(reader, &mut file).map_err(write_err)?;
    file.flush().map_err(write_err)?;
    file.persist(dest).map_err(|e| write_err(e.error))?;
    Ok(bytes)
}

#[cfg(not(feature = "download"))]
fn download_to(url: &str, dest: &Path) -> Result<(), ModelError> {
    log::warn!("built without download support; cannot fetch {url}");
    Err(ModelError::NotFound(dest.to_path_buf()))
}
