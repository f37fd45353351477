// Tests for transcript reconstruction from raw recognizer output.
//
// Covers the diarization path, the single-speaker fallback, punctuation
// normalization, and the derived transcript metadata.

use call_coach::transcribe::result::{
    Alternative, DiarizationSegment, ItemKind, ItemRef, RawResults, RawTranscriptionResult,
    RecognizedItem, SpeakerLabels,
};
use call_coach::transcript::align::normalize_punctuation;
use call_coach::transcript::align_transcript;

fn pron(content: &str, start: f64, end: f64) -> RecognizedItem {
    RecognizedItem {
        kind: ItemKind::Pronunciation,
        start_time: Some(start.to_string()),
        end_time: Some(end.to_string()),
        alternatives: vec![Alternative {
            content: content.to_string(),
            confidence: Some("0.99".to_string()),
        }],
    }
}

fn punct(content: &str) -> RecognizedItem {
    RecognizedItem {
        kind: ItemKind::Punctuation,
        start_time: None,
        end_time: None,
        alternatives: vec![Alternative {
            content: content.to_string(),
            confidence: None,
        }],
    }
}

fn item_ref(start: f64) -> ItemRef {
    ItemRef {
        start_time: Some(start.to_string()),
        end_time: None,
        speaker_label: None,
    }
}

fn diarized(speaker: &str, start: f64, end: f64, refs: Vec<ItemRef>) -> DiarizationSegment {
    DiarizationSegment {
        speaker_label: Some(speaker.to_string()),
        start_time: Some(start.to_string()),
        end_time: Some(end.to_string()),
        items: refs,
    }
}

fn raw(segments: Vec<DiarizationSegment>, items: Vec<RecognizedItem>) -> RawTranscriptionResult {
    let speaker_labels = if segments.is_empty() {
        None
    } else {
        Some(SpeakerLabels { segments })
    };

    RawTranscriptionResult {
        results: RawResults {
            speaker_labels,
            items,
        },
    }
}

#[test]
fn two_speaker_diarization_scenario() {
    let input = raw(
        vec![
            diarized("spk_0", 0.0, 2.0, vec![item_ref(0.0), item_ref(1.0)]),
            diarized("spk_1", 2.0, 4.0, vec![item_ref(2.0)]),
        ],
        vec![
            pron("Hello", 0.0, 0.5),
            punct(","),
            pron("there", 1.0, 1.8),
            pron("Hi", 2.0, 2.5),
            punct("."),
        ],
    );

    let transcript = align_transcript("job-1", &input);

    assert_eq!(transcript.segments.len(), 2);

    assert_eq!(transcript.segments[0].speaker, "spk_0");
    assert_eq!(transcript.segments[0].text, "Hello, there");
    assert_eq!(transcript.segments[0].start_time, 0.0);
    assert_eq!(transcript.segments[0].end_time, 2.0);

    assert_eq!(transcript.segments[1].speaker, "spk_1");
    assert_eq!(transcript.segments[1].text, "Hi.");
    assert_eq!(transcript.segments[1].start_time, 2.0);
    assert_eq!(transcript.segments[1].end_time, 4.0);

    assert_eq!(transcript.duration, 4.0);
    // Punctuation does not count as a word
    assert_eq!(transcript.word_count, 3);
}

#[test]
fn one_segment_per_diarization_segment_in_order() {
    let input = raw(
        vec![
            diarized("spk_0", 0.0, 1.0, vec![item_ref(0.0)]),
            diarized("spk_1", 1.0, 2.0, vec![item_ref(1.0)]),
            diarized("spk_0", 2.0, 3.5, vec![item_ref(2.0)]),
        ],
        vec![
            pron("one", 0.0, 0.5),
            pron("two", 1.0, 1.5),
            pron("three", 2.0, 2.5),
        ],
    );

    let transcript = align_transcript("job-2", &input);

    assert_eq!(transcript.segments.len(), 3);
    let speakers: Vec<&str> = transcript.segments.iter().map(|s| s.speaker.as_str()).collect();
    assert_eq!(speakers, vec!["spk_0", "spk_1", "spk_0"]);

    for segment in &transcript.segments {
        assert!(segment.start_time <= segment.end_time);
    }

    for pair in transcript.segments.windows(2) {
        assert!(pair[0].start_time <= pair[1].start_time);
    }
}

#[test]
fn timestamp_match_respects_tolerance() {
    // 0.005 off is within tolerance, 0.02 off is not
    let input = raw(
        vec![diarized("spk_0", 0.0, 3.0, vec![item_ref(1.0), item_ref(2.0)])],
        vec![pron("close", 1.005, 1.5), pron("far", 2.02, 2.5)],
    );

    let transcript = align_transcript("job-3", &input);

    assert_eq!(transcript.segments[0].text, "close");
}

#[test]
fn fallback_contains_every_spoken_token_in_order() {
    let input = raw(
        vec![],
        vec![
            pron("Thanks", 0.0, 0.4),
            pron("for", 0.5, 0.7),
            pron("calling", 0.8, 1.4),
            punct("."),
        ],
    );

    let transcript = align_transcript("job-4", &input);

    assert_eq!(transcript.segments.len(), 1);
    assert_eq!(transcript.segments[0].speaker, "spk_0");
    assert_eq!(transcript.segments[0].text, "Thanks for calling.");
    assert_eq!(transcript.segments[0].start_time, 0.0);
    assert_eq!(transcript.segments[0].end_time, 1.4);
    assert_eq!(transcript.word_count, 3);
}

#[test]
fn empty_items_without_diarization_yields_one_empty_segment() {
    let input = raw(vec![], vec![]);

    let transcript = align_transcript("job-5", &input);

    assert_eq!(transcript.segments.len(), 1);
    assert_eq!(transcript.segments[0].text, "");
    assert_eq!(transcript.segments[0].start_time, 0.0);
    assert_eq!(transcript.segments[0].end_time, 0.0);
    assert_eq!(transcript.duration, 0.0);
    assert_eq!(transcript.word_count, 0);
}

#[test]
fn word_count_matches_whitespace_tokens() {
    let input = raw(
        vec![
            diarized("spk_0", 0.0, 2.0, vec![item_ref(0.0), item_ref(0.6)]),
            diarized("spk_1", 2.0, 3.0, vec![item_ref(2.0)]),
        ],
        vec![
            pron("Good", 0.0, 0.5),
            pron("morning", 0.6, 1.2),
            punct(","),
            pron("everyone", 2.0, 2.8),
            punct("."),
        ],
    );

    let transcript = align_transcript("job-6", &input);

    let joined: String = transcript
        .segments
        .iter()
        .map(|s| s.text.clone())
        .collect::<Vec<_>>()
        .join(" ");

    assert_eq!(transcript.word_count, joined.split_whitespace().count());
}

#[test]
fn normalization_is_idempotent() {
    let once = normalize_punctuation("Hello , there . Bye .");
    let twice = normalize_punctuation(&once);

    assert_eq!(once, "Hello, there. Bye.");
    assert_eq!(once, twice);
}

#[test]
fn parses_wire_format_with_string_times() {
    let payload = serde_json::json!({
        "results": {
            "speaker_labels": {
                "segments": [
                    {
                        "speaker_label": "spk_0",
                        "start_time": "0.0",
                        "end_time": "1.5",
                        "items": [{"start_time": "0.0", "end_time": "0.5", "speaker_label": "spk_0"}]
                    }
                ]
            },
            "items": [
                {
                    "type": "pronunciation",
                    "start_time": "0.0",
                    "end_time": "0.5",
                    "alternatives": [{"content": "Welcome", "confidence": "0.98"}]
                },
                {
                    "type": "punctuation",
                    "alternatives": [{"content": "."}]
                }
            ]
        }
    });

    let raw: RawTranscriptionResult = serde_json::from_value(payload).unwrap();
    let transcript = align_transcript("job-7", &raw);

    assert_eq!(transcript.segments.len(), 1);
    assert_eq!(transcript.segments[0].text, "Welcome.");
    assert_eq!(transcript.segments[0].end_time, 1.5);
}
