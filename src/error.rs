use thiserror::Error;

/// Failures coming out of a show store or booking ledger backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store error: {0}")]
    Internal(String),
}

/// Domain-level outcome of the booking operations.
///
/// The `Display` strings are the exact user-facing messages of the reservation
/// API; controllers put them straight into the response envelope.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("ShowId and selected seats are required")]
    InvalidInput,

    #[error("Show not found")]
    ShowNotFound,

    #[error("Selected seats are not available")]
    SeatsUnavailable,

    #[error("{0}")]
    Storage(#[from] StoreError),
}

impl BookingError {
    /// Domain-level negatives are expected outcomes, not system faults.
    pub fn is_storage(&self) -> bool {
        matches!(self, BookingError::Storage(_))
    }
}
