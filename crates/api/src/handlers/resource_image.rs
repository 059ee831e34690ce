//! Image endpoints shared by projects and achievements.

use axum::extract::Multipart;
use club_core::owner::ReplaceOutcome;
use club_core::types::{DbId, OwnerRef, ResourceKind, ResourceRef};

use crate::error::AppResult;
use crate::handlers::upload::read_form;
use crate::state::AppState;

/// Replace the resource's image with the `file` part of `multipart`.
pub(crate) async fn replace(
    state: &AppState,
    kind: ResourceKind,
    id: DbId,
    multipart: Multipart,
) -> AppResult<ReplaceOutcome> {
    let resource = ResourceRef { kind, id }.validate()?;
    let file = read_form(multipart, state.config.max_upload_bytes)
        .await?
        .require_file()?;
    Ok(state
        .owners
        .replace(&OwnerRef::from(resource), file.bytes, &file.content_type)
        .await?)
}

pub(crate) async fn clear(state: &AppState, kind: ResourceKind, id: DbId) -> AppResult<()> {
    let resource = ResourceRef { kind, id }.validate()?;
    state.owners.clear(&OwnerRef::from(resource)).await?;
    Ok(())
}
