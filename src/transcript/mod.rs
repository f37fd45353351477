pub mod align;
pub mod types;

pub use align::align_transcript;
pub use types::{Transcript, TranscriptSegment};
