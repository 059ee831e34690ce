use std::path::PathBuf;
use std::sync::Arc;

use club_core::association::AssociationManager;
use club_core::locator::LocatorFormat;
use club_core::media::MediaLifecycle;
use club_core::owner::{OwnerAttachments, ResourceLifecycle};
use club_core::progress::ProgressToggle;
use club_core::store::{AttachmentStore, RelationStore};
use club_db::PgRelationStore;
use club_storage::{LocalAttachmentStore, S3AttachmentStore};

use crate::config::{ServerConfig, StorageBackend};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: club_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Raw attachment upload and delete.
    pub media: MediaLifecycle,
    pub associations: AssociationManager,
    pub progress: ProgressToggle,
    /// Owner-bound attachment replace and clear.
    pub owners: OwnerAttachments,
    pub resources: ResourceLifecycle,
}

impl AppState {
    /// Wire the core components over the given pool and attachment store.
    pub fn new(
        pool: club_db::DbPool,
        config: ServerConfig,
        attachments: Arc<dyn AttachmentStore>,
        locators: LocatorFormat,
    ) -> Self {
        let relations: Arc<dyn RelationStore> = Arc::new(PgRelationStore::new(pool.clone()));
        let media = MediaLifecycle::new(attachments, locators);

        Self {
            pool,
            config: Arc::new(config),
            associations: AssociationManager::new(Arc::clone(&relations)),
            progress: ProgressToggle::new(Arc::clone(&relations)),
            owners: OwnerAttachments::new(media.clone(), Arc::clone(&relations)),
            resources: ResourceLifecycle::new(media.clone(), relations),
            media,
        }
    }
}

/// The attachment store selected by configuration.
pub enum ConfiguredStore {
    /// Local backend; the directory must be served at the locator prefix.
    Local(Arc<LocalAttachmentStore>),
    S3(Arc<S3AttachmentStore>),
}

impl ConfiguredStore {
    /// Build the configured backend. The local backend is probed with a
    /// write/read/delete round trip before it is returned.
    pub async fn connect(
        config: &ServerConfig,
        locators: &LocatorFormat,
    ) -> Result<Self, club_core::store::AttachmentStoreError> {
        match config.storage.backend {
            StorageBackend::Local => {
                let store =
                    LocalAttachmentStore::new(PathBuf::from(&config.storage.local_root), locators.clone());
                store.validate().await?;
                Ok(Self::Local(Arc::new(store)))
            }
            StorageBackend::S3 => {
                let store = S3AttachmentStore::connect(&config.storage.s3, locators.clone()).await;
                Ok(Self::S3(Arc::new(store)))
            }
        }
    }

    pub fn as_store(&self) -> Arc<dyn AttachmentStore> {
        match self {
            Self::Local(store) => Arc::clone(store) as Arc<dyn AttachmentStore>,
            Self::S3(store) => Arc::clone(store) as Arc<dyn AttachmentStore>,
        }
    }
}
