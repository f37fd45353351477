use std::collections::HashMap;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadSlotError {
    #[error("upload slot not found")]
    NotFound,

    #[error("upload slot expired")]
    Expired,
}

/// A minted upload slot: which job it belongs to and where the bytes go.
#[derive(Debug, Clone)]
pub struct UploadSlot {
    pub job_id: String,
    pub key: String,
    expires_at: Instant,
}

/// Time-limited write slots backing the upload URLs handed to callers.
///
/// A slot stays valid until its TTL elapses; redeeming it does not consume it,
/// so a client may retry the PUT within the window.
pub struct UploadSlots {
    slots: RwLock<HashMap<String, UploadSlot>>,
    ttl: Duration,
}

impl UploadSlots {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Mint a slot for a job's audio key and return its opaque token.
    pub async fn mint(&self, job_id: &str, key: &str) -> String {
        let token = uuid::Uuid::new_v4().to_string();

        let slot = UploadSlot {
            job_id: job_id.to_string(),
            key: key.to_string(),
            expires_at: Instant::now() + self.ttl,
        };

        let mut slots = self.slots.write().await;
        slots.insert(token.clone(), slot);

        info!("Minted upload slot for job {}", job_id);
        token
    }

    /// Look up a slot by token, removing it if it has expired.
    pub async fn redeem(&self, token: &str) -> Result<UploadSlot, UploadSlotError> {
        let mut slots = self.slots.write().await;

        let slot = slots.get(token).ok_or(UploadSlotError::NotFound)?;

        if slot.expires_at <= Instant::now() {
            slots.remove(token);
            return Err(UploadSlotError::Expired);
        }

        Ok(slot.clone())
    }
}
