//! Reading normalized audio for the transcription engines.
//!
//! The normalizer always produces 16 kHz mono 16-bit PCM; this module
//! loads such a file and refuses anything else.

use std::path::Path;

use crate::TranscribeError;

/// Sample rate expected by Whisper models.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Channel count produced by normalization.
pub const TARGET_CHANNELS: u16 = 1;

/// Read WAV file samples and scale them to `[-1.0, 1.0]`.
///
/// # Errors
///
/// Fails if the file cannot be read, or if it is not 16 kHz, 16-bit
/// integer, mono PCM.
///
/// # Examples
///
/// ```rust,no_run
/// use transcribe_stamps::audio::read_wav_samples;
/// use std::path::Path;
///
/// let samples = read_wav_samples(Path::new("audio.wav"))?;
/// println!("Loaded {} samples", samples.len());
/// # Ok::<(), transcribe_stamps::TranscribeError>(())
/// ```
pub fn read_wav_samples(wav_path: &Path) -> Result<Vec<f32>, TranscribeError> {
    let mut reader = hound::WavReader::open(wav_path)?;
    check_spec(reader.spec())?;

    let samples = reader
        .samples::<i16>()
        .map(|sample| sample.map(|s| (s as f32 / i16::MAX as f32).max(-1.0)))
        .collect::<Result<Vec<f32>, _>>()?;

    Ok(samples)
}

fn check_spec(spec: hound::WavSpec) -> Result<(), TranscribeError> {
    if spec.channels != TARGET_CHANNELS {
        return Err(TranscribeError::UnexpectedAudioFormat(format!(
            "expected {} channel, found {}",
            TARGET_CHANNELS, spec.channels
        )));
    }

    if spec.sample_rate != TARGET_SAMPLE_RATE {
        return Err(TranscribeError::UnexpectedAudioFormat(format!(
            "expected {} Hz sample rate, found {} Hz",
            TARGET_SAMPLE_RATE, spec.sample_rate
        )));
    }

    if spec.bits_per_sample != 16 || spec.sample_format != hound::SampleFormat::Int {
        return Err(TranscribeError::UnexpectedAudioFormat(format!(
            "expected 16-bit integer samples, found {}-bit {:?}",
            spec.bits_per_sample, spec.sample_format
        )));
    }

    Ok(())
}
