//! The JSON shape printed for a finished transcription.

use std::io::Write;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::{TranscribeError, TranscriptionResult, TranscriptionSegment};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentOutput {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Transcript with trimmed text and timestamps rounded to centiseconds.
///
/// Serializes to exactly `language`, `full_text` and `segments`; an
/// undetected language is written as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptOutput {
    pub language: Option<String>,
    pub full_text: String,
    pub segments: Vec<SegmentOutput>,
}

impl From<&TranscriptionSegment> for SegmentOutput {
    fn from(segment: &TranscriptionSegment) -> Self {
        let start = round_centis(segment.start as f64);
        let end = round_centis(segment.end as f64).max(start);
        Self {
            start,
            end,
            text: segment.text.trim().to_string(),
        }
    }
}

impl From<TranscriptionResult> for TranscriptOutput {
    fn from(result: TranscriptionResult) -> Self {
        Self {
            language: result.language,
            full_text: result.text.trim().to_string(),
            segments: result.segments.iter().map(SegmentOutput::from).collect(),
        }
    }
}

impl TranscriptOutput {
    /// Write the transcript as JSON indented by four spaces.
    pub fn write_pretty<W: Write>(&self, writer: W) -> Result<(), TranscribeError> {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(writer, formatter);
        self.serialize(&mut ser)?;
        Ok(())
    }

    pub fn to_pretty_string(&self) -> Result<String, TranscribeError> {
        let mut buf = Vec::new();
        self.write_pretty(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn round_centis(seconds: f64) -> f64 {
    (seconds * 100.0).round() / 100.0
}
