// End-to-end pipeline tests with fake collaborators: a scripted transcriber,
// an in-memory blob store, and a canned language model.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use call_coach::analysis::AnalysisCoordinator;
use call_coach::job::{InMemoryJobStore, JobRecord, JobStatus, JobStore};
use call_coach::knowledge::KnowledgeBase;
use call_coach::llm::{LanguageModel, LlmError};
use call_coach::pipeline::{Pipeline, PipelineConfig};
use call_coach::storage::{BlobStore, StorageError};
use call_coach::transcribe::{MediaFormat, RemoteJobState, TranscribeError, Transcriber};
use tokio::sync::RwLock;

// ============================================================================
// Fakes
// ============================================================================

struct FakeTranscriber {
    /// Poll states consumed front to back; `fallback` once exhausted
    states: Mutex<VecDeque<RemoteJobState>>,
    fallback: RemoteJobState,
    result: Vec<u8>,
    fail_submit: bool,
}

impl FakeTranscriber {
    fn completing(result: Vec<u8>) -> Self {
        Self {
            states: Mutex::new(VecDeque::from(vec![
                RemoteJobState::Queued,
                RemoteJobState::InProgress,
            ])),
            fallback: RemoteJobState::Completed,
            result,
            fail_submit: false,
        }
    }

    fn failing(reason: &str) -> Self {
        Self {
            states: Mutex::new(VecDeque::new()),
            fallback: RemoteJobState::Failed {
                reason: reason.to_string(),
            },
            result: Vec::new(),
            fail_submit: false,
        }
    }

    fn stuck() -> Self {
        Self {
            states: Mutex::new(VecDeque::new()),
            fallback: RemoteJobState::InProgress,
            result: Vec::new(),
            fail_submit: false,
        }
    }

    fn rejecting() -> Self {
        Self {
            states: Mutex::new(VecDeque::new()),
            fallback: RemoteJobState::Completed,
            result: Vec::new(),
            fail_submit: true,
        }
    }
}

#[async_trait::async_trait]
impl Transcriber for FakeTranscriber {
    async fn submit(
        &self,
        job_name: &str,
        _media_key: &str,
        _format: MediaFormat,
    ) -> Result<(), TranscribeError> {
        if self.fail_submit {
            return Err(TranscribeError::Unexpected {
                job_name: job_name.to_string(),
                status: 503,
            });
        }
        Ok(())
    }

    async fn poll(&self, _job_name: &str) -> Result<RemoteJobState, TranscribeError> {
        let mut states = self.states.lock().unwrap();
        Ok(states.pop_front().unwrap_or_else(|| self.fallback.clone()))
    }

    async fn fetch_result(&self, _job_name: &str) -> Result<Vec<u8>, TranscribeError> {
        Ok(self.result.clone())
    }
}

#[derive(Default)]
struct MemoryBlobStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

#[async_trait::async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.blobs
            .write()
            .await
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        self.blobs
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound {
                key: key.to_string(),
            })
    }
}

struct CannedLlm {
    structured: bool,
}

#[async_trait::async_trait]
impl LanguageModel for CannedLlm {
    async fn complete(&self, system: &str, _user: &str) -> Result<String, LlmError> {
        if !self.structured {
            return Ok("not json at all".to_string());
        }

        if system.contains("sales director") {
            return Ok(r#"{
                "executive_summary": "Short call, handled politely.",
                "overall_score": 6.5,
                "top_strengths": ["polite"],
                "top_weaknesses": ["no discovery"],
                "missed_opportunities": ["no follow-up"],
                "recommended_actions": ["schedule demo"]
            }"#
            .to_string());
        }

        Ok(r#"{"summary": "brief", "overall_score": 6.0}"#.to_string())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn raw_result_payload() -> Vec<u8> {
    serde_json::to_vec(&serde_json::json!({
        "results": {
            "speaker_labels": {
                "segments": [{
                    "speaker_label": "spk_0",
                    "start_time": "0.0",
                    "end_time": "2.0",
                    "items": [{"start_time": "0.0"}]
                }]
            },
            "items": [{
                "type": "pronunciation",
                "start_time": "0.0",
                "end_time": "1.2",
                "alternatives": [{"content": "Hello"}]
            }]
        }
    }))
    .unwrap()
}

struct Harness {
    store: Arc<InMemoryJobStore>,
    blobs: Arc<MemoryBlobStore>,
    pipeline: Pipeline,
}

fn harness(transcriber: FakeTranscriber, structured_llm: bool) -> Harness {
    let store = Arc::new(InMemoryJobStore::new());
    let blobs = Arc::new(MemoryBlobStore::default());

    let coordinator = AnalysisCoordinator::new(
        Arc::new(CannedLlm {
            structured: structured_llm,
        }),
        Arc::new(KnowledgeBase::empty()),
        3,
    );

    let pipeline = Pipeline::new(
        Arc::clone(&store) as Arc<dyn JobStore>,
        Arc::clone(&blobs) as Arc<dyn BlobStore>,
        Arc::new(transcriber),
        coordinator,
        PipelineConfig {
            poll_interval: Duration::from_millis(5),
            poll_timeout: Duration::from_millis(200),
            ..PipelineConfig::default()
        },
    );

    Harness {
        store,
        blobs,
        pipeline,
    }
}

async fn claimed_job(store: &InMemoryJobStore, job_id: &str) {
    store.insert(JobRecord::pending(job_id, "mp3")).await;
    store.try_claim(job_id).await.unwrap();
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn completed_job_has_report_and_full_progress() {
    let h = harness(FakeTranscriber::completing(raw_result_payload()), true);
    claimed_job(&h.store, "job-1").await;

    h.pipeline.run("job-1", "mp3").await;

    let record = h.store.get("job-1").await.unwrap();
    assert_eq!(record.status, JobStatus::Completed);
    assert_eq!(record.progress_percentage, 100);
    assert_eq!(record.current_step, "Analysis complete");
    assert!(record.error_message.is_none());

    let transcript = record.transcript.unwrap();
    assert_eq!(transcript.segments[0].text, "Hello");

    let report = record.report.unwrap();
    assert_eq!(report.call_summary, "Short call, handled politely.");
    assert_eq!(report.overall_score, 6.5);
}

#[tokio::test]
async fn raw_result_is_persisted_before_parsing() {
    let h = harness(FakeTranscriber::completing(raw_result_payload()), true);
    claimed_job(&h.store, "job-1").await;

    h.pipeline.run("job-1", "mp3").await;

    let audit = h.blobs.get("transcripts/job-1.json").await.unwrap();
    assert_eq!(audit, raw_result_payload());
}

#[tokio::test]
async fn remote_failure_marks_job_failed_with_message() {
    let h = harness(
        FakeTranscriber::failing("Audio format not supported"),
        true,
    );
    claimed_job(&h.store, "job-1").await;

    h.pipeline.run("job-1", "mp3").await;

    let record = h.store.get("job-1").await.unwrap();
    assert_eq!(record.status, JobStatus::Failed);
    assert_eq!(record.progress_percentage, 0);

    let message = record.error_message.unwrap();
    assert!(message.contains("Audio format not supported"));
    assert!(record.report.is_none());
}

#[tokio::test]
async fn submit_failure_marks_job_failed() {
    let h = harness(FakeTranscriber::rejecting(), true);
    claimed_job(&h.store, "job-1").await;

    h.pipeline.run("job-1", "mp3").await;

    let record = h.store.get("job-1").await.unwrap();
    assert_eq!(record.status, JobStatus::Failed);
    assert!(!record.error_message.unwrap().is_empty());
}

#[tokio::test]
async fn stuck_transcription_times_out() {
    let h = harness(FakeTranscriber::stuck(), true);
    claimed_job(&h.store, "job-1").await;

    h.pipeline.run("job-1", "mp3").await;

    let record = h.store.get("job-1").await.unwrap();
    assert_eq!(record.status, JobStatus::Failed);
    assert!(record.error_message.unwrap().contains("timed out"));
}

#[tokio::test]
async fn unparsable_model_output_still_completes_the_job() {
    let h = harness(FakeTranscriber::completing(raw_result_payload()), false);
    claimed_job(&h.store, "job-1").await;

    h.pipeline.run("job-1", "mp3").await;

    let record = h.store.get("job-1").await.unwrap();
    assert_eq!(record.status, JobStatus::Completed);
    assert_eq!(record.progress_percentage, 100);

    // Degraded but present report
    let report = record.report.unwrap();
    assert!(report.call_summary.contains("not json"));
}

#[tokio::test]
async fn invalid_result_payload_fails_the_job() {
    let h = harness(FakeTranscriber::completing(b"not json".to_vec()), true);
    claimed_job(&h.store, "job-1").await;

    h.pipeline.run("job-1", "mp3").await;

    let record = h.store.get("job-1").await.unwrap();
    assert_eq!(record.status, JobStatus::Failed);
    assert!(record
        .error_message
        .unwrap()
        .contains("not valid JSON"));

    // The audit copy is written even though parsing failed
    assert!(h.blobs.get("transcripts/job-1.json").await.is_ok());
}

#[test]
fn media_format_derives_from_extension() {
    assert_eq!(MediaFormat::from_extension("wav"), MediaFormat::Wav);
    assert_eq!(MediaFormat::from_extension("M4A"), MediaFormat::M4a);
    assert_eq!(MediaFormat::from_extension(".ogg"), MediaFormat::Ogg);
    assert_eq!(MediaFormat::from_extension("webm"), MediaFormat::Webm);
    // Unrecognized extensions fall back to mp3
    assert_eq!(MediaFormat::from_extension("flac"), MediaFormat::Mp3);
    assert_eq!(MediaFormat::from_extension(""), MediaFormat::Mp3);
}
