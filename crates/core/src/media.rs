//! Upload / replace / delete protocol for a single attachment per owner.
//!
//! The new object is always written first. The previous object is only
//! removed after that write succeeded, and a failure to remove it is
//! downgraded to a [`MediaWarning`]: leaking an old object is preferable to
//! losing the new upload.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::error::CoreError;
use crate::locator::{validate_folder, LocatorFormat};
use crate::store::AttachmentStore;
use crate::types::OwnerRef;

/// Allowed image MIME types and the file extension each one implies.
pub const ALLOWED_IMAGE_TYPES: &[(&str, &str)] = &[
    ("image/jpeg", "jpeg"),
    ("image/png", "png"),
    ("image/gif", "gif"),
    ("image/webp", "webp"),
];

/// File extension for an allowed MIME type.
pub fn extension_for(mime_type: &str) -> Result<&'static str, CoreError> {
    let mime = mime_type.trim();
    if mime.is_empty() {
        return Err(CoreError::InvalidInput("file type is missing".into()));
    }
    ALLOWED_IMAGE_TYPES
        .iter()
        .find(|(allowed, _)| allowed.eq_ignore_ascii_case(mime))
        .map(|(_, ext)| *ext)
        .ok_or_else(|| {
            CoreError::InvalidInput(format!(
                "invalid file type '{mime}'. Only JPEG, PNG, GIF, and WebP images are allowed"
            ))
        })
}

/// A new attachment payload bound for one owner.
#[derive(Debug)]
pub struct AttachmentUpload<'a> {
    /// Owner the attachment is for. Used for log context only.
    pub owner: &'a OwnerRef,
    pub payload: Vec<u8>,
    pub mime_type: &'a str,
    pub folder: &'a str,
    /// Attachment currently bound to the owner, to be removed after the
    /// new write succeeds.
    pub previous: Option<&'a str>,
}

/// Non-fatal problem that accompanied a successful operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MediaWarning {
    /// The previous attachment could not be removed and may be orphaned.
    PreviousNotRemoved { locator: String, reason: String },
}

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    /// Locator to persist as the owner's attachment ref.
    pub locator: String,
    /// Store-relative path of the new object.
    pub path: String,
    pub warnings: Vec<MediaWarning>,
}

/// Owns the attachment lifecycle against one [`AttachmentStore`].
#[derive(Clone)]
pub struct MediaLifecycle {
    store: Arc<dyn AttachmentStore>,
    locators: LocatorFormat,
}

impl MediaLifecycle {
    pub fn new(store: Arc<dyn AttachmentStore>, locators: LocatorFormat) -> Self {
        Self { store, locators }
    }

    pub fn locators(&self) -> &LocatorFormat {
        &self.locators
    }

    pub fn backend_tag(&self) -> &'static str {
        self.store.backend_tag()
    }

    /// Write a new attachment, then best-effort remove `upload.previous`.
    ///
    /// On `AttachmentWriteFailed` nothing was written and the previous
    /// object was not touched.
    pub async fn upload(&self, upload: AttachmentUpload<'_>) -> Result<UploadOutcome, CoreError> {
        let AttachmentUpload {
            owner,
            payload,
            mime_type,
            folder,
            previous,
        } = upload;

        let (locator, path) = self.write_new(owner, payload, mime_type, folder).await?;

        let mut warnings = Vec::new();
        if let Some(previous) = previous {
            if let Some(warning) = self.discard_previous(owner, previous).await {
                warnings.push(warning);
            }
        }

        Ok(UploadOutcome {
            locator,
            path,
            warnings,
        })
    }

    /// Remove the object referenced by `locator`.
    pub async fn delete(&self, locator: &str) -> Result<(), CoreError> {
        let path = self.locators.parse(locator)?;
        self.store
            .remove(&path)
            .await
            .map_err(CoreError::attachment_delete)?;
        tracing::info!(backend = self.store.backend_tag(), %path, "Attachment deleted");
        Ok(())
    }

    /// Validate the payload and write it under a fresh unique name.
    ///
    /// Returns `(locator, path)` of the new object.
    pub(crate) async fn write_new(
        &self,
        owner: &OwnerRef,
        payload: Vec<u8>,
        mime_type: &str,
        folder: &str,
    ) -> Result<(String, String), CoreError> {
        let ext = extension_for(mime_type)?;
        validate_folder(folder)?;
        if payload.is_empty() {
            return Err(CoreError::InvalidInput("file payload is empty".into()));
        }

        let path = format!("{folder}/{}.{ext}", Uuid::new_v4());
        let size = payload.len();
        self.store
            .write(&path, payload, mime_type)
            .await
            .map_err(|err| {
                tracing::error!(%owner, %path, error = %err, "Attachment write failed");
                CoreError::attachment_write(err)
            })?;

        tracing::info!(
            %owner,
            backend = self.store.backend_tag(),
            %path,
            size,
            "Attachment written",
        );

        Ok((self.store.public_url(&path), path))
    }

    /// Best-effort removal of a superseded attachment.
    ///
    /// Returns a warning instead of an error when the removal fails.
    pub(crate) async fn discard_previous(
        &self,
        owner: &OwnerRef,
        previous: &str,
    ) -> Option<MediaWarning> {
        match self.delete(previous).await {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(
                    %owner,
                    locator = %previous,
                    error = %err,
                    "Previous attachment not removed; object may be orphaned",
                );
                Some(MediaWarning::PreviousNotRemoved {
                    locator: previous.to_string(),
                    reason: err.to_string(),
                })
            }
        }
    }
}
