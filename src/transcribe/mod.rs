pub mod client;
pub mod result;

pub use client::{HttpTranscriber, MediaFormat, RemoteJobState, TranscribeError, Transcriber};
pub use result::{
    Alternative, DiarizationSegment, ItemKind, ItemRef, RawResults, RawTranscriptionResult,
    RecognizedItem, SpeakerLabels,
};
