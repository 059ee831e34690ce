//! Filesystem attachment store.
//!
//! Objects live at `{root}/{bucket}/{path}`. Writes go to a temp file in the
//! target directory and are renamed into place, so readers never observe a
//! partially written object.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use club_core::locator::LocatorFormat;
use club_core::store::{AttachmentStore, AttachmentStoreError};
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub struct LocalAttachmentStore {
    bucket_root: PathBuf,
    locators: LocatorFormat,
}

impl LocalAttachmentStore {
    pub fn new(root: impl Into<PathBuf>, locators: LocatorFormat) -> Self {
        let bucket_root = root.into().join(locators.bucket());
        Self {
            bucket_root,
            locators,
        }
    }

    pub fn bucket_root(&self) -> &Path {
        &self.bucket_root
    }

    /// Resolve a store-relative path, refusing anything that could escape
    /// the bucket directory.
    fn full_path(&self, path: &str) -> Result<PathBuf, AttachmentStoreError> {
        let relative = Path::new(path);
        let escapes = path.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(AttachmentStoreError::Rejected(format!(
                "path '{path}' is not a plain relative path"
            )));
        }
        Ok(self.bucket_root.join(relative))
    }

    /// Write, read back, and delete a probe file under the bucket root.
    ///
    /// Run at startup so permission problems surface before the first upload.
    pub async fn validate(&self) -> Result<(), AttachmentStoreError> {
        let probe_dir = self.bucket_root.join(".health-check");
        let probe = probe_dir.join("probe.bin");
        let data = b"attachment-store-health-check";

        fs::create_dir_all(&probe_dir).await.map_err(io_error)?;
        fs::write(&probe, data).await.map_err(io_error)?;
        let read_back = fs::read(&probe).await.map_err(io_error)?;
        if read_back != data {
            return Err(AttachmentStoreError::Unavailable("read-back mismatch".into()));
        }
        fs::remove_file(&probe).await.map_err(io_error)?;
        let _ = fs::remove_dir(&probe_dir).await;
        Ok(())
    }
}

/// Local I/O failures are refusals unless they are transient.
fn io_error(err: std::io::Error) -> AttachmentStoreError {
    use std::io::ErrorKind;
    match err.kind() {
        ErrorKind::TimedOut | ErrorKind::Interrupted | ErrorKind::WouldBlock => {
            AttachmentStoreError::Unavailable(err.to_string())
        }
        _ => AttachmentStoreError::Rejected(err.to_string()),
    }
}

/// Create `path`, write `bytes`, and flush them to disk.
async fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await
}

#[async_trait]
impl AttachmentStore for LocalAttachmentStore {
    fn backend_tag(&self) -> &'static str {
        "local"
    }

    async fn write(
        &self,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), AttachmentStoreError> {
        let full_path = self.full_path(path)?;
        tracing::debug!(%path, full_path = %full_path.display(), size = bytes.len(), "Local attachment write");

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                tracing::warn!(parent = %parent.display(), error = %e, "create_dir_all failed");
                io_error(e)
            })?;
        }

        let temp_path = full_path.with_extension("tmp");
        let result = match write_synced(&temp_path, &bytes).await {
            Ok(()) => fs::rename(&temp_path, &full_path).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path).await;
            tracing::warn!(
                temp = %temp_path.display(),
                to = %full_path.display(),
                error = %e,
                "Attachment write failed, temp file discarded",
            );
            return Err(io_error(e));
        }
        Ok(())
    }

    async fn remove(&self, path: &str) -> Result<(), AttachmentStoreError> {
        let full_path = self.full_path(path)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => Ok(()),
            // Removing an absent object is not an error, matching object stores.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(e)),
        }
    }

    fn public_url(&self, path: &str) -> String {
        self.locators.render(path)
    }
}
