use std::sync::Arc;

use crate::job::JobStore;
use crate::pipeline::Pipeline;
use crate::storage::{BlobStore, UploadSlots};

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Job state store polled by callers
    pub store: Arc<dyn JobStore>,

    /// Blob storage the upload endpoint writes into
    pub blobs: Arc<dyn BlobStore>,

    /// Pipeline spawned per started job
    pub pipeline: Arc<Pipeline>,

    /// Time-limited upload slots backing the upload URLs
    pub uploads: Arc<UploadSlots>,

    /// Service name reported by the health check
    pub service_name: String,

    /// Base URL upload URLs are minted under
    pub public_base_url: String,
}
