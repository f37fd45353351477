//! Transcript reconstruction from raw recognizer output.
//!
//! Merges two timing-indexed streams: speaker-diarization segments and the
//! flat list of recognized items. Spoken tokens are matched to a segment's
//! item references by start time; punctuation has no independent timing and is
//! attached to the spoken token it follows in the flat list.

use tracing::warn;

use super::types::{Transcript, TranscriptSegment};
use crate::transcribe::result::{DiarizationSegment, ItemKind, RawTranscriptionResult, RecognizedItem};

/// Two timestamps are considered the same anchor if they differ by less than this.
const MATCH_TOLERANCE_SECS: f64 = 0.01;

/// Speaker label used when diarization is unavailable.
const DEFAULT_SPEAKER: &str = "spk_0";

/// Reconstruct an ordered, speaker-attributed transcript from a raw result.
///
/// Pure and deterministic. When the result carries diarization segments, one
/// `TranscriptSegment` is produced per diarization segment, in input order,
/// keeping the diarization segment's own speaker and time bounds. Without
/// diarization (short recordings) every item collapses into a single segment
/// for [`DEFAULT_SPEAKER`].
pub fn align_transcript(job_id: &str, raw: &RawTranscriptionResult) -> Transcript {
    let items = &raw.results.items;
    let diarization: &[DiarizationSegment] = raw
        .results
        .speaker_labels
        .as_ref()
        .map(|labels| labels.segments.as_slice())
        .unwrap_or(&[]);

    let segments = if diarization.is_empty() {
        warn!("No speaker labels in transcription result, using single-speaker fallback");
        vec![fallback_segment(items)]
    } else {
        diarization
            .iter()
            .map(|segment| attribute_segment(segment, items))
            .collect()
    };

    Transcript::from_segments(job_id, segments)
}

/// Build one transcript segment from a diarization segment.
///
/// Each item reference anchors a linear scan over the flat item list, so this
/// is O(anchors x items) per segment. Fine for call-length recordings; would
/// need a start-time index if inputs ever grow beyond that.
fn attribute_segment(segment: &DiarizationSegment, items: &[RecognizedItem]) -> TranscriptSegment {
    let mut parts: Vec<&str> = Vec::new();

    for item_ref in &segment.items {
        let anchor = item_ref.start_seconds();

        let matched = items.iter().position(|item| {
            item.kind == ItemKind::Pronunciation
                && (item.start_seconds() - anchor).abs() < MATCH_TOLERANCE_SECS
        });

        if let Some(idx) = matched {
            parts.push(items[idx].content());

            // Punctuation carries no timing; it belongs to the word it follows.
            for trailing in &items[idx + 1..] {
                if trailing.kind != ItemKind::Punctuation {
                    break;
                }
                parts.push(trailing.content());
            }
        }
    }

    TranscriptSegment {
        speaker: segment.speaker().to_string(),
        text: normalize_punctuation(&parts.join(" ")),
        start_time: segment.start_seconds(),
        end_time: segment.end_seconds(),
    }
}

/// Single-segment fallback when the engine produced no diarization.
fn fallback_segment(items: &[RecognizedItem]) -> TranscriptSegment {
    let mut parts: Vec<&str> = Vec::new();
    let mut end_time: f64 = 0.0;

    for item in items {
        match item.kind {
            ItemKind::Pronunciation => {
                parts.push(item.content());
                end_time = end_time.max(item.end_seconds());
            }
            ItemKind::Punctuation => parts.push(item.content()),
            ItemKind::Other => {}
        }
    }

    TranscriptSegment {
        speaker: DEFAULT_SPEAKER.to_string(),
        text: normalize_punctuation(&parts.join(" ")),
        start_time: 0.0,
        end_time,
    }
}

/// Remove the space that single-space joining inserts before punctuation.
/// Idempotent: normalized text passes through unchanged.
pub fn normalize_punctuation(text: &str) -> String {
    text.replace(" ,", ",").replace(" .", ".")
}
