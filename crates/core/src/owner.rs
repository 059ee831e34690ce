//! Owning-record flows built on top of [`MediaLifecycle`].
//!
//! [`OwnerAttachments`] is the single point of mutation for an owner's
//! attachment ref. It persists the new ref with a compare-and-set against
//! the ref it read, so concurrent replaces on one owner cannot both win,
//! and it only discards the old object once the owner points at the new
//! one. [`ResourceLifecycle`] tears a resource down: attachment first, then
//! the row and its membership set in one store transaction.

use std::sync::Arc;

use serde::Serialize;

use crate::error::CoreError;
use crate::media::{MediaLifecycle, MediaWarning};
use crate::store::{OwnerLookup, RelationStore, SwapOutcome};
use crate::types::{OwnerRef, ResourceRef};

/// Result of replacing an owner's attachment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaceOutcome {
    /// The ref now bound to the owner.
    pub attachment_ref: String,
    /// The ref that was bound before, if any.
    pub previous_ref: Option<String>,
    pub warnings: Vec<MediaWarning>,
}

/// Coordinates attachment changes with the owner's stored ref.
#[derive(Clone)]
pub struct OwnerAttachments {
    media: MediaLifecycle,
    relations: Arc<dyn RelationStore>,
}

impl OwnerAttachments {
    pub fn new(media: MediaLifecycle, relations: Arc<dyn RelationStore>) -> Self {
        Self { media, relations }
    }

    /// Current attachment ref of `owner`.
    pub async fn current(&self, owner: &OwnerRef) -> Result<Option<String>, CoreError> {
        match self.relations.find_attachment_ref(owner).await? {
            OwnerLookup::Found { attachment_ref } => Ok(attachment_ref),
            OwnerLookup::Missing => Err(CoreError::not_found(owner.label(), owner.key())),
        }
    }

    /// Upload `payload` as the owner's attachment, replacing any previous one.
    pub async fn replace(
        &self,
        owner: &OwnerRef,
        payload: Vec<u8>,
        mime_type: &str,
    ) -> Result<ReplaceOutcome, CoreError> {
        let previous = self.current(owner).await?;

        let (locator, _path) = self
            .media
            .write_new(owner, payload, mime_type, owner.folder())
            .await?;

        let swap = self
            .relations
            .swap_attachment_ref(owner, previous.as_deref(), Some(&locator))
            .await;

        let failure = match swap {
            Ok(SwapOutcome::Swapped) => None,
            Ok(SwapOutcome::Stale) => Some(CoreError::Conflict(format!(
                "attachment of {owner} changed concurrently; retry the upload"
            ))),
            Ok(SwapOutcome::OwnerMissing) => Some(CoreError::not_found(owner.label(), owner.key())),
            Err(err) => Some(err.into()),
        };

        if let Some(err) = failure {
            // The new object is not referenced by anything; drop it.
            if let Some(warning) = self.media.discard_previous(owner, &locator).await {
                tracing::warn!(%owner, ?warning, "Unreferenced upload left in store");
            }
            return Err(err);
        }

        let mut warnings = Vec::new();
        if let Some(old) = previous.as_deref() {
            warnings.extend(self.media.discard_previous(owner, old).await);
        }

        tracing::info!(%owner, attachment_ref = %locator, replaced = previous.is_some(), "Owner attachment replaced");

        Ok(ReplaceOutcome {
            attachment_ref: locator,
            previous_ref: previous,
            warnings,
        })
    }

    /// Delete the owner's attachment and clear its ref.
    ///
    /// The object is deleted first; if that fails the ref is left in place
    /// so the caller can retry.
    pub async fn clear(&self, owner: &OwnerRef) -> Result<String, CoreError> {
        let current = self
            .current(owner)
            .await?
            .ok_or_else(|| CoreError::not_found("Attachment", owner))?;

        self.media.delete(&current).await?;

        match self
            .relations
            .swap_attachment_ref(owner, Some(&current), None)
            .await?
        {
            SwapOutcome::Swapped => {
                tracing::info!(%owner, attachment_ref = %current, "Owner attachment cleared");
                Ok(current)
            }
            SwapOutcome::Stale => Err(CoreError::Conflict(format!(
                "attachment of {owner} changed concurrently"
            ))),
            SwapOutcome::OwnerMissing => Err(CoreError::not_found(owner.label(), owner.key())),
        }
    }
}

/// Deletes resources together with everything bound to them.
#[derive(Clone)]
pub struct ResourceLifecycle {
    media: MediaLifecycle,
    relations: Arc<dyn RelationStore>,
}

impl ResourceLifecycle {
    pub fn new(media: MediaLifecycle, relations: Arc<dyn RelationStore>) -> Self {
        Self { media, relations }
    }

    /// Destroy `resource`, its attachment, and its membership set.
    ///
    /// If the attachment cannot be deleted the resource is left intact and
    /// the error is returned, so destruction is never reported complete
    /// while the object still exists.
    pub async fn destroy(&self, resource: ResourceRef) -> Result<(), CoreError> {
        let resource = resource.validate()?;
        let owner = OwnerRef::from(resource);

        let attachment_ref = match self.relations.find_attachment_ref(&owner).await? {
            OwnerLookup::Found { attachment_ref } => attachment_ref,
            OwnerLookup::Missing => {
                return Err(CoreError::not_found(resource.kind.label(), resource.id))
            }
        };

        if let Some(locator) = attachment_ref.as_deref() {
            self.media.delete(locator).await?;
        }

        if !self.relations.delete_resource(resource).await? {
            return Err(CoreError::not_found(resource.kind.label(), resource.id));
        }

        tracing::info!(%resource, had_attachment = attachment_ref.is_some(), "Resource destroyed");
        Ok(())
    }
}
