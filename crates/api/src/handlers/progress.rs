//! Handlers for per-member question progress.

use axum::extract::{Path, State};
use axum::Json;
use club_core::types::{CompletionState, DbId, QuestionId};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of a completion toggle.
#[derive(Debug, Serialize)]
pub struct ToggleResult {
    pub question_id: DbId,
    pub state: CompletionState,
    pub completed: bool,
}

/// GET /api/v1/progress/{member_id}
///
/// Ids of the questions the member has completed.
pub async fn list_completed(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
) -> AppResult<Json<DataResponse<Vec<QuestionId>>>> {
    let completed = state.progress.list_completed(&member_id).await?;
    Ok(Json(DataResponse { data: completed }))
}

/// POST /api/v1/progress/{member_id}/questions/{question_id}/toggle
pub async fn toggle(
    State(state): State<AppState>,
    Path((member_id, question_id)): Path<(String, DbId)>,
) -> AppResult<Json<DataResponse<ToggleResult>>> {
    let completion = state.progress.toggle(question_id, &member_id).await?;
    Ok(Json(DataResponse {
        data: ToggleResult {
            question_id,
            state: completion,
            completed: completion.is_completed(),
        },
    }))
}
