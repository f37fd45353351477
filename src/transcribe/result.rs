//! Wire format of the external transcription engine's result payload.
//!
//! Times arrive as string-encoded seconds; everything is optional because the
//! payload is external input and must not panic the parser.

use serde::{Deserialize, Serialize};

/// Top-level raw result fetched from the transcription engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTranscriptionResult {
    #[serde(default)]
    pub results: RawResults,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawResults {
    /// Speaker diarization output; absent for short recordings
    #[serde(default)]
    pub speaker_labels: Option<SpeakerLabels>,

    /// Flat, time-ordered list of recognized items
    #[serde(default)]
    pub items: Vec<RecognizedItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeakerLabels {
    #[serde(default)]
    pub segments: Vec<DiarizationSegment>,
}

/// A time-bounded span attributed to one speaker, referencing a subset of
/// recognized items by their start times.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiarizationSegment {
    #[serde(default)]
    pub speaker_label: Option<String>,

    #[serde(default)]
    pub start_time: Option<String>,

    #[serde(default)]
    pub end_time: Option<String>,

    #[serde(default)]
    pub items: Vec<ItemRef>,
}

/// Item reference inside a diarization segment; its start time anchors the
/// lookup into the flat item list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemRef {
    #[serde(default)]
    pub start_time: Option<String>,

    #[serde(default)]
    pub end_time: Option<String>,

    #[serde(default)]
    pub speaker_label: Option<String>,
}

/// A single recognizer output unit: a spoken token with timing, or a
/// punctuation token without independent timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizedItem {
    #[serde(rename = "type")]
    pub kind: ItemKind,

    #[serde(default)]
    pub start_time: Option<String>,

    #[serde(default)]
    pub end_time: Option<String>,

    #[serde(default)]
    pub alternatives: Vec<Alternative>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Pronunciation,
    Punctuation,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Alternative {
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub confidence: Option<String>,
}

impl RecognizedItem {
    /// Text of the best alternative, or empty if the engine sent none.
    pub fn content(&self) -> &str {
        self.alternatives.first().map(|a| a.content.as_str()).unwrap_or("")
    }

    /// Parsed start time in seconds; 0.0 when absent or unparsable.
    pub fn start_seconds(&self) -> f64 {
        parse_time(&self.start_time)
    }

    /// Parsed end time in seconds; 0.0 when absent or unparsable.
    pub fn end_seconds(&self) -> f64 {
        parse_time(&self.end_time)
    }
}

impl DiarizationSegment {
    pub fn speaker(&self) -> &str {
        self.speaker_label.as_deref().unwrap_or("spk_0")
    }

    pub fn start_seconds(&self) -> f64 {
        parse_time(&self.start_time)
    }

    pub fn end_seconds(&self) -> f64 {
        parse_time(&self.end_time)
    }
}

impl ItemRef {
    pub fn start_seconds(&self) -> f64 {
        parse_time(&self.start_time)
    }
}

/// Parse a string-encoded time field, defaulting to 0.0.
pub(crate) fn parse_time(value: &Option<String>) -> f64 {
    value
        .as_deref()
        .and_then(|v| v.parse::<f64>().ok())
        .unwrap_or(0.0)
}
