//! Membership endpoints shared by projects and achievements.
//!
//! Both resource kinds expose the same shapes; the per-kind handler
//! modules bind a [`ResourceKind`] and delegate here.

use club_core::types::{DbId, MemberId, ResourceKind, ResourceRef};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::state::AppState;

/// Request body for adding members to a resource.
#[derive(Debug, Deserialize)]
pub struct AddMembers {
    pub member_ids: Vec<MemberId>,
}

/// Response body after adding members.
#[derive(Debug, Serialize)]
pub struct AddMembersResult {
    /// Pairs newly created by this call.
    pub added: u64,
    /// The full membership set afterwards.
    pub member_ids: Vec<MemberId>,
}

pub(crate) async fn list(state: &AppState, kind: ResourceKind, id: DbId) -> AppResult<Vec<MemberId>> {
    Ok(state.associations.list(ResourceRef { kind, id }).await?)
}

pub(crate) async fn add(
    state: &AppState,
    kind: ResourceKind,
    id: DbId,
    input: AddMembers,
) -> AppResult<AddMembersResult> {
    let resource = ResourceRef { kind, id };
    let added = state.associations.add_many(resource, input.member_ids).await?;
    let member_ids = state.associations.list(resource).await?;
    Ok(AddMembersResult { added, member_ids })
}

pub(crate) async fn remove(
    state: &AppState,
    kind: ResourceKind,
    id: DbId,
    member_id: &str,
) -> AppResult<()> {
    let member_id = MemberId::parse(member_id)?;
    state
        .associations
        .remove(ResourceRef { kind, id }, member_id)
        .await?;
    Ok(())
}

/// Attach the initial members of a freshly created resource.
///
/// If that fails the resource is destroyed again, so a create either
/// lands with all of its members or not at all.
pub(crate) async fn attach_initial(
    state: &AppState,
    resource: ResourceRef,
    member_ids: &[String],
) -> AppResult<()> {
    if member_ids.is_empty() {
        return Ok(());
    }

    let parsed = member_ids
        .iter()
        .map(|id| MemberId::parse(id))
        .collect::<Result<Vec<_>, _>>();

    let attached = match parsed {
        Ok(ids) => state.associations.add_many(resource, ids).await.map(|_| ()),
        Err(err) => Err(err),
    };

    if let Err(err) = attached {
        tracing::warn!(%resource, error = %err, "Initial members rejected, rolling back create");
        if let Err(cleanup) = state.resources.destroy(resource).await {
            tracing::error!(%resource, error = %cleanup, "Rollback of created resource failed");
        }
        return Err(err.into());
    }
    Ok(())
}
