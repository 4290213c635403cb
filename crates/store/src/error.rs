use thiserror::Error;

/// Store-level failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Unique-email constraint on user accounts.
    #[error("email already registered")]
    DuplicateEmail,

    /// Unique-name constraint on venues.
    #[error("a venue with this name already exists")]
    DuplicateVenueName,

    /// A lock was poisoned; the store cannot serve the operation.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub(crate) fn poisoned() -> Self {
        Self::Unavailable("lock poisoned".to_string())
    }
}
