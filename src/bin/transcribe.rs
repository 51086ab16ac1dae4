use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use transcribe_stamps::{
    engines::whisper::{WhisperEngine, WhisperParams},
    model::DEFAULT_MODEL,
    ModelSource, Normalizer, Transcriber,
};

/// Transcribe an audio file into JSON with per-segment timestamps.
#[derive(Parser, Debug)]
#[command(name = "transcribe", version)]
struct Cli {
    /// Input audio file (.wav, .mp3 or .m4a, up to 100 MB)
    audio: PathBuf,

    /// Whisper model name (tiny, base, small, medium, large-v3, ...)
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Path to a GGML model file; overrides --model
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Directory searched for ggml-<model>.bin before the cache
    #[arg(long)]
    models_dir: Option<PathBuf>,

    /// Never download a missing model
    #[arg(long)]
    no_download: bool,

    /// Force a language code (e.g. "en") instead of detecting it
    #[arg(long)]
    language: Option<String>,

    /// Transcoder executable used for normalization
    #[arg(long, default_value = "ffmpeg")]
    ffmpeg: PathBuf,
}

impl Cli {
    fn model_source(&self) -> ModelSource {
        match &self.model_path {
            Some(path) => ModelSource::Path(path.clone()),
            None => ModelSource::Named {
                name: self.model.clone(),
                dir: self.models_dir.clone(),
                download: !self.no_download,
            },
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let params = WhisperParams {
        language: cli.language.clone(),
        ..Default::default()
    };
    let mut transcriber = Transcriber::new(
        WhisperEngine::new(),
        cli.model_source(),
        Normalizer::new(&cli.ffmpeg),
    )
    .with_params(params);

    let output = transcriber.transcribe(&cli.audio)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    output.write_pretty(&mut handle)?;
    handle.write_all(b"\n")?;
    handle.flush()?;
    Ok(())
}
