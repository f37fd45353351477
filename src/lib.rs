pub mod analysis;
pub mod config;
pub mod error;
pub mod http;
pub mod job;
pub mod knowledge;
pub mod llm;
pub mod pipeline;
pub mod storage;
pub mod transcribe;
pub mod transcript;

pub use analysis::{
    AgentName, AnalysisAgent, AnalysisCoordinator, AnalysisResult, Report, SynthesisPass,
};
pub use config::Config;
pub use error::PipelineError;
pub use http::{create_router, AppState};
pub use job::{ClaimError, InMemoryJobStore, JobRecord, JobStatus, JobStore};
pub use knowledge::KnowledgeBase;
pub use llm::{ChatCompletionsClient, LanguageModel, LlmError};
pub use pipeline::{Pipeline, PipelineConfig};
pub use storage::{BlobStore, FsBlobStore, StorageError, UploadSlots};
pub use transcribe::{
    HttpTranscriber, MediaFormat, RawTranscriptionResult, RemoteJobState, TranscribeError,
    Transcriber,
};
pub use transcript::{align_transcript, Transcript, TranscriptSegment};
