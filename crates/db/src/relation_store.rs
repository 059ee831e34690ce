//! PostgreSQL implementation of [`RelationStore`].

use std::collections::BTreeMap;

use async_trait::async_trait;
use club_core::store::{OwnerLookup, RelationStore, RelationStoreError, SwapOutcome, ToggleOutcome};
use club_core::types::{MemberId, MembershipPair, OwnerRef, QuestionId, ResourceKind, ResourceRef};
use sqlx::postgres::PgDatabaseError;
use sqlx::PgPool;

use crate::repositories::{
    AchievementRepo, AttachmentRefRepo, MembershipRepo, ProgressRepo, ProjectRepo,
};

/// PostgreSQL foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Referencing column of each foreign key, and the entity it points at.
const REFERENCED_ENTITIES: &[(&str, &str)] = &[
    ("member_id", "Member"),
    ("question_id", "Question"),
    ("project_id", "Project"),
    ("achievement_id", "Achievement"),
];

/// Entity label for a `<table>_<column>_fkey` constraint name.
fn referenced_entity(constraint: &str) -> &'static str {
    let column_part = constraint.strip_suffix("_fkey").unwrap_or(constraint);
    REFERENCED_ENTITIES
        .iter()
        .find(|(column, _)| column_part.ends_with(column))
        .map(|(_, entity)| *entity)
        .unwrap_or("Referenced record")
}

/// The missing value from a `Key (column)=(value) is not present ...` detail.
fn referenced_key(detail: &str) -> Option<&str> {
    let (_, rest) = detail.split_once(")=(")?;
    rest.split_once(") ").map(|(key, _)| key)
}

/// Map a sqlx error onto the store error taxonomy.
fn store_error(err: sqlx::Error) -> RelationStoreError {
    if let sqlx::Error::Database(ref db_err) = err {
        if db_err.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            let entity = db_err.constraint().map_or("Referenced record", referenced_entity);
            let key = db_err
                .try_downcast_ref::<PgDatabaseError>()
                .and_then(PgDatabaseError::detail)
                .and_then(referenced_key)
                .unwrap_or("(unknown)")
                .to_string();
            return RelationStoreError::MissingReference { entity, key };
        }
    }
    RelationStoreError::Unavailable(err.to_string())
}

fn member_ids(raw: Vec<String>) -> Result<Vec<MemberId>, RelationStoreError> {
    raw.iter()
        .map(|id| MemberId::parse(id))
        .collect::<Result<_, _>>()
        .map_err(|e| RelationStoreError::Unavailable(format!("corrupt member id row: {e}")))
}

/// [`RelationStore`] over a PostgreSQL pool.
#[derive(Clone)]
pub struct PgRelationStore {
    pool: PgPool,
}

impl PgRelationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RelationStore for PgRelationStore {
    async fn insert_memberships(&self, pairs: &[MembershipPair]) -> Result<u64, RelationStoreError> {
        let mut grouped: BTreeMap<ResourceRef, Vec<String>> = BTreeMap::new();
        for pair in pairs {
            grouped
                .entry(pair.resource)
                .or_default()
                .push(pair.member_id.as_str().to_string());
        }

        let mut tx = self.pool.begin().await.map_err(store_error)?;
        let mut added = 0;
        for (resource, ids) in &grouped {
            added += MembershipRepo::insert_many_inner(&mut tx, resource.kind, resource.id, ids)
                .await
                .map_err(store_error)?;
        }
        tx.commit().await.map_err(store_error)?;
        Ok(added)
    }

    async fn delete_membership(&self, pair: &MembershipPair) -> Result<bool, RelationStoreError> {
        MembershipRepo::delete(
            &self.pool,
            pair.resource.kind,
            pair.resource.id,
            pair.member_id.as_str(),
        )
        .await
        .map_err(store_error)
    }

    async fn list_members(&self, resource: ResourceRef) -> Result<Vec<MemberId>, RelationStoreError> {
        let raw = MembershipRepo::list_member_ids(&self.pool, resource.kind, resource.id)
            .await
            .map_err(store_error)?;
        member_ids(raw)
    }

    async fn toggle_completion(
        &self,
        member_id: &MemberId,
        question_id: QuestionId,
    ) -> Result<ToggleOutcome, RelationStoreError> {
        let counts = ProgressRepo::toggle(&self.pool, member_id.as_str(), question_id.get())
            .await
            .map_err(store_error)?;
        Ok(counts.outcome())
    }

    async fn list_completed(&self, member_id: &MemberId) -> Result<Vec<QuestionId>, RelationStoreError> {
        ProgressRepo::list_completed(&self.pool, member_id.as_str())
            .await
            .map_err(store_error)?
            .into_iter()
            .map(|id| {
                QuestionId::new(id)
                    .map_err(|e| RelationStoreError::Unavailable(format!("corrupt question id row: {e}")))
            })
            .collect()
    }

    async fn find_attachment_ref(&self, owner: &OwnerRef) -> Result<OwnerLookup, RelationStoreError> {
        let found = AttachmentRefRepo::find(&self.pool, owner)
            .await
            .map_err(store_error)?;
        Ok(match found {
            Some(attachment_ref) => OwnerLookup::Found { attachment_ref },
            None => OwnerLookup::Missing,
        })
    }

    async fn swap_attachment_ref(
        &self,
        owner: &OwnerRef,
        expected: Option<&str>,
        new: Option<&str>,
    ) -> Result<SwapOutcome, RelationStoreError> {
        if AttachmentRefRepo::swap(&self.pool, owner, expected, new)
            .await
            .map_err(store_error)?
        {
            return Ok(SwapOutcome::Swapped);
        }

        // Zero rows: either the owner is gone or its ref moved on.
        let exists = AttachmentRefRepo::find(&self.pool, owner)
            .await
            .map_err(store_error)?
            .is_some();
        Ok(if exists {
            SwapOutcome::Stale
        } else {
            SwapOutcome::OwnerMissing
        })
    }

    async fn delete_resource(&self, resource: ResourceRef) -> Result<bool, RelationStoreError> {
        match resource.kind {
            ResourceKind::Project => ProjectRepo::delete_with_members(&self.pool, resource.id).await,
            ResourceKind::Achievement => {
                AchievementRepo::delete_with_members(&self.pool, resource.id).await
            }
        }
        .map_err(store_error)
    }
}
