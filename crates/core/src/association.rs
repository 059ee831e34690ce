//! Membership sets between resources (projects, achievements) and members.
//!
//! Adding is idempotent per pair: re-adding an existing member is a common
//! client retry and is silently skipped. Removing is strict: removing a
//! pair that does not exist means the client is out of sync, so it fails
//! with `NotFound`.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::CoreError;
use crate::store::RelationStore;
use crate::types::{MemberId, MembershipPair, ResourceRef};

/// Maintains membership-set integrity for resources.
#[derive(Clone)]
pub struct AssociationManager {
    store: Arc<dyn RelationStore>,
}

impl AssociationManager {
    pub fn new(store: Arc<dyn RelationStore>) -> Self {
        Self { store }
    }

    /// Associate every member in `member_ids` with `resource`.
    ///
    /// Returns how many pairs were newly created; pairs that already
    /// existed (or repeat within the input) are not counted.
    pub async fn add_many<I>(&self, resource: ResourceRef, member_ids: I) -> Result<u64, CoreError>
    where
        I: IntoIterator<Item = MemberId>,
    {
        let resource = resource.validate()?;
        let unique: BTreeSet<MemberId> = member_ids.into_iter().collect();
        if unique.is_empty() {
            return Err(CoreError::InvalidInput("member_ids must not be empty".into()));
        }

        let pairs: Vec<MembershipPair> = unique
            .into_iter()
            .map(|member_id| MembershipPair {
                resource,
                member_id,
            })
            .collect();

        let added = self.store.insert_memberships(&pairs).await?;

        tracing::info!(
            %resource,
            requested = pairs.len(),
            added,
            "Members added to resource",
        );
        Ok(added)
    }

    /// Remove exactly one membership pair.
    pub async fn remove(
        &self,
        resource: ResourceRef,
        member_id: MemberId,
    ) -> Result<MembershipPair, CoreError> {
        let pair = MembershipPair {
            resource: resource.validate()?,
            member_id,
        };

        if !self.store.delete_membership(&pair).await? {
            return Err(CoreError::not_found(
                "Membership",
                format!("{} / Member:{}", pair.resource, pair.member_id),
            ));
        }

        tracing::info!(resource = %pair.resource, member_id = %pair.member_id, "Member removed from resource");
        Ok(pair)
    }

    /// Members currently associated with `resource`.
    pub async fn list(&self, resource: ResourceRef) -> Result<Vec<MemberId>, CoreError> {
        let resource = resource.validate()?;
        Ok(self.store.list_members(resource).await?)
    }
}
