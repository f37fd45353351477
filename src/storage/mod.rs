pub mod blob;
pub mod uploads;

pub use blob::{BlobStore, FsBlobStore, StorageError};
pub use uploads::{UploadSlot, UploadSlotError, UploadSlots};
