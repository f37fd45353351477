pub mod store;
pub mod types;

pub use store::{ClaimError, InMemoryJobStore, JobStore};
pub use types::{JobRecord, JobStatus};
