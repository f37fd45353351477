use super::state::AppState;
use crate::job::{ClaimError, JobRecord, JobStatus};
use crate::storage::UploadSlotError;
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    /// Extension of the file the caller is about to upload (default: mp3)
    pub file_extension: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AudioUploadResponse {
    pub job_id: String,
    pub upload_url: String,
    pub status: JobStatus,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct StartResponse {
    pub job_id: String,
    pub status: String,
}

/// Caller-facing view of a job record.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: JobStatus,
    pub progress_percentage: u8,
    pub current_step: String,
    pub transcript: Option<crate::transcript::Transcript>,
    pub report: Option<crate::analysis::Report>,
    pub error_message: Option<String>,
}

impl From<JobRecord> for JobStatusResponse {
    fn from(record: JobRecord) -> Self {
        Self {
            job_id: record.job_id,
            status: record.status,
            progress_percentage: record.progress_percentage,
            current_step: record.current_step,
            transcript: record.transcript,
            report: record.report,
            error_message: record.error_message,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/upload
/// Create a pending job and mint a time-limited upload URL for it
pub async fn upload_audio(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
) -> impl IntoResponse {
    let file_extension = query.file_extension.unwrap_or_else(|| "mp3".to_string());
    let job_id = uuid::Uuid::new_v4().to_string();

    info!("Creating job {} for .{} upload", job_id, file_extension);

    state
        .store
        .insert(JobRecord::pending(&job_id, &file_extension))
        .await;

    let key = state.pipeline.audio_key(&job_id, &file_extension);
    let token = state.uploads.mint(&job_id, &key).await;
    let upload_url = format!("{}/uploads/{}", state.public_base_url, token);

    (
        StatusCode::OK,
        Json(AudioUploadResponse {
            job_id,
            upload_url,
            status: JobStatus::Pending,
            message: "Upload URL generated.".to_string(),
        }),
    )
        .into_response()
}

/// PUT /uploads/:token
/// Write audio bytes through a previously minted upload slot
pub async fn put_upload(
    State(state): State<AppState>,
    Path(token): Path<String>,
    body: Bytes,
) -> impl IntoResponse {
    let slot = match state.uploads.redeem(&token).await {
        Ok(slot) => slot,
        Err(UploadSlotError::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Upload slot not found".to_string(),
                }),
            )
                .into_response();
        }
        Err(UploadSlotError::Expired) => {
            return (
                StatusCode::GONE,
                Json(ErrorResponse {
                    error: "Upload slot expired".to_string(),
                }),
            )
                .into_response();
        }
    };

    if let Err(e) = state.blobs.put(&slot.key, &body).await {
        error!("Failed to store upload for job {}: {}", slot.job_id, e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: format!("Failed to store upload: {}", e),
            }),
        )
            .into_response();
    }

    info!("Stored upload for job {} ({} bytes)", slot.job_id, body.len());
    StatusCode::OK.into_response()
}

/// POST /api/v1/start/:job_id
/// Claim a pending job and run the pipeline for it
pub async fn start_pipeline(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    let record = match state.store.try_claim(&job_id).await {
        Ok(record) => record,
        Err(ClaimError::NotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: format!("Job {} not found", job_id),
                }),
            )
                .into_response();
        }
        Err(ClaimError::NotPending { status }) => {
            return (
                StatusCode::CONFLICT,
                Json(ErrorResponse {
                    error: format!("Job {} already started (status: {})", job_id, status),
                }),
            )
                .into_response();
        }
    };

    info!("Starting pipeline for job {}", job_id);

    let pipeline = Arc::clone(&state.pipeline);
    tokio::spawn(async move {
        pipeline.run(&record.job_id, &record.file_extension).await;
    });

    (
        StatusCode::OK,
        Json(StartResponse {
            job_id,
            status: "started".to_string(),
        }),
    )
        .into_response()
}

/// GET /api/v1/status/:job_id
/// Poll status, progress, and (once available) transcript and report
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    match state.store.get(&job_id).await {
        Some(record) => (StatusCode::OK, Json(JobStatusResponse::from(record))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Job {} not found", job_id),
            }),
        )
            .into_response(),
    }
}

/// GET /health
/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "service": state.service_name,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}
