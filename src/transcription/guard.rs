use crate::error::AppResult;
use crate::storage::StorageGateway;

/// An existing output key proves the job already ran; callers skip on `true`.
pub struct IdempotencyGuard<'a> {
    storage: &'a dyn StorageGateway,
}

impl<'a> IdempotencyGuard<'a> {
    pub fn new(storage: &'a dyn StorageGateway) -> Self {
        Self { storage }
    }

    pub fn already_transcribed(&self, output_key: &str) -> AppResult<bool> {
        self.storage.exists(output_key)
    }
}
