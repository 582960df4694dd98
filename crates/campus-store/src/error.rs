//! Store-specific error types and conversions.

use campus_core::error::CampusError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed flag file: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<StoreError> for CampusError {
    fn from(err: StoreError) -> Self {
        CampusError::Persistence(err.to_string())
    }
}
