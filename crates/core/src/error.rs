use crate::store::{AttachmentStoreError, RelationStoreError};

/// Failures surfaced by the core components.
///
/// Every variant maps to exactly one HTTP status class in the API crate:
/// `InvalidInput` and `InvalidLocator` are client errors, `NotFound` is a
/// 404, `Conflict` a 409, and the store failures are server errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid attachment locator: {0}")]
    InvalidLocator(String),

    #[error("Entity not found: {entity} {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Attachment write failed: {0}")]
    AttachmentWriteFailed(String),

    #[error("Attachment delete failed: {0}")]
    AttachmentDeleteFailed(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        Self::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Map an attachment store failure raised while writing.
    ///
    /// An unreachable store stays `StoreUnavailable`.
    pub fn attachment_write(err: AttachmentStoreError) -> Self {
        match err {
            AttachmentStoreError::Unavailable(_) => Self::StoreUnavailable(err.to_string()),
            AttachmentStoreError::Rejected(_) => Self::AttachmentWriteFailed(err.to_string()),
        }
    }

    /// Map an attachment store failure raised while removing.
    pub fn attachment_delete(err: AttachmentStoreError) -> Self {
        match err {
            AttachmentStoreError::Unavailable(_) => Self::StoreUnavailable(err.to_string()),
            AttachmentStoreError::Rejected(_) => Self::AttachmentDeleteFailed(err.to_string()),
        }
    }
}

impl From<RelationStoreError> for CoreError {
    fn from(err: RelationStoreError) -> Self {
        match err {
            RelationStoreError::MissingReference { entity, key } => Self::NotFound { entity, key },
            RelationStoreError::Unavailable(msg) => Self::StoreUnavailable(msg),
        }
    }
}
