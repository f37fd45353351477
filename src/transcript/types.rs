use serde::{Deserialize, Serialize};

/// One speaker-attributed span of the call.
///
/// The speaker label is a diarization token (`spk_0`, `spk_1`, ...), not a
/// verified identity. Segments are value objects: built once by the aligner
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Diarization speaker label
    pub speaker: String,

    /// Reconstructed text for this span
    pub text: String,

    /// Start of the span in seconds from the beginning of the recording
    pub start_time: f64,

    /// End of the span in seconds (`end_time >= start_time`)
    pub end_time: f64,
}

/// Full reconstructed transcript with derived metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Job this transcript belongs to
    pub job_id: String,

    /// Segments ordered by non-decreasing start time (input order on ties)
    pub segments: Vec<TranscriptSegment>,

    /// End time of the last segment, or 0.0 if empty
    pub duration: f64,

    /// Whitespace-delimited token count across all segment text
    pub word_count: usize,
}

impl Transcript {
    /// Build a transcript from ordered segments, deriving duration and word count.
    pub fn from_segments(job_id: impl Into<String>, segments: Vec<TranscriptSegment>) -> Self {
        let duration = segments.last().map(|s| s.end_time).unwrap_or(0.0);
        let word_count = segments
            .iter()
            .map(|s| s.text.split_whitespace().count())
            .sum();

        Self {
            job_id: job_id.into(),
            segments,
            duration,
            word_count,
        }
    }

    /// Render the transcript as `speaker: text` lines for analysis prompts.
    pub fn as_prompt_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| format!("{}: {}", s.speaker, s.text))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
