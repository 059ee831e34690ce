//! Collaborator contracts consumed by the core components.
//!
//! Implementations live outside this crate (`club-db`, `club-storage`),
//! except for the in-memory ones in [`crate::memory`]. Each method is a
//! single atomic operation from the caller's point of view.

use async_trait::async_trait;

use crate::types::{MemberId, MembershipPair, OwnerRef, QuestionId, ResourceRef};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure reported by an [`AttachmentStore`].
#[derive(Debug, thiserror::Error)]
pub enum AttachmentStoreError {
    /// The store could not be reached (transport, credentials, timeout).
    #[error("attachment store unavailable: {0}")]
    Unavailable(String),

    /// The store was reached but refused the operation.
    #[error("attachment store rejected the request: {0}")]
    Rejected(String),
}

/// Failure reported by a [`RelationStore`].
#[derive(Debug, thiserror::Error)]
pub enum RelationStoreError {
    /// A row referenced by the operation does not exist (foreign key).
    #[error("missing referenced {entity} {key}")]
    MissingReference { entity: &'static str, key: String },

    /// Transport, pool, or any other datastore failure.
    #[error("relation store unavailable: {0}")]
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// Attachment store
// ---------------------------------------------------------------------------

/// Object store holding attachment payloads.
///
/// Paths are store-relative (`folder/filename`). Writing to an existing
/// path overwrites it.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Short tag identifying the backend in logs.
    fn backend_tag(&self) -> &'static str;

    /// Write `bytes` at `path` with the given content type.
    async fn write(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), AttachmentStoreError>;

    /// Remove the object at `path`.
    async fn remove(&self, path: &str) -> Result<(), AttachmentStoreError>;

    /// Public locator for the object at `path`.
    fn public_url(&self, path: &str) -> String;
}

// ---------------------------------------------------------------------------
// Relation store
// ---------------------------------------------------------------------------

/// Result of the atomic completion toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// No record existed; one was created.
    Created,
    /// A record existed; it was removed.
    Removed,
    /// The create lost a uniqueness race against a concurrent toggle.
    /// Nothing changed; the caller should re-issue the toggle.
    Contended,
}

/// Result of looking up an owning record's attachment binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnerLookup {
    /// The owning record does not exist.
    Missing,
    /// The owning record exists and holds this attachment ref (if any).
    Found { attachment_ref: Option<String> },
}

/// Result of a compare-and-set on an owner's attachment ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapOutcome {
    Swapped,
    /// The stored ref no longer matched the expected value.
    Stale,
    OwnerMissing,
}

/// Relational datastore backing memberships, progress, and owner bindings.
#[async_trait]
pub trait RelationStore: Send + Sync {
    /// Insert membership pairs, skipping any that already exist.
    ///
    /// Returns the number of pairs newly created.
    async fn insert_memberships(&self, pairs: &[MembershipPair]) -> Result<u64, RelationStoreError>;

    /// Delete one membership pair. Returns `false` if it did not exist.
    async fn delete_membership(&self, pair: &MembershipPair) -> Result<bool, RelationStoreError>;

    /// Member ids currently associated with `resource`.
    async fn list_members(&self, resource: ResourceRef) -> Result<Vec<MemberId>, RelationStoreError>;

    /// Atomically flip the presence of the `(member, question)` record.
    ///
    /// Must be a single conditional operation keyed by the unique pair,
    /// never a read followed by a write.
    async fn toggle_completion(
        &self,
        member_id: &MemberId,
        question_id: QuestionId,
    ) -> Result<ToggleOutcome, RelationStoreError>;

    /// Question ids the member has completed, ascending.
    async fn list_completed(&self, member_id: &MemberId) -> Result<Vec<QuestionId>, RelationStoreError>;

    /// Read the attachment ref bound to `owner`.
    async fn find_attachment_ref(&self, owner: &OwnerRef) -> Result<OwnerLookup, RelationStoreError>;

    /// Set the owner's attachment ref to `new` only if it currently equals
    /// `expected`.
    async fn swap_attachment_ref(
        &self,
        owner: &OwnerRef,
        expected: Option<&str>,
        new: Option<&str>,
    ) -> Result<SwapOutcome, RelationStoreError>;

    /// Delete a resource together with its whole membership set.
    ///
    /// Returns `false` if the resource did not exist.
    async fn delete_resource(&self, resource: ResourceRef) -> Result<bool, RelationStoreError>;
}
