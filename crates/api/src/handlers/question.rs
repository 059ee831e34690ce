//! Handlers for the `/questions` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use club_db::models::question::{CreateQuestion, Question};
use club_db::repositories::QuestionRepo;
use validator::Validate;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/questions
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<CreateQuestion>,
) -> AppResult<(StatusCode, Json<DataResponse<Question>>)> {
    input.validate()?;
    let question = QuestionRepo::create(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: question })))
}

/// GET /api/v1/questions
pub async fn list(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Question>>>> {
    let questions = QuestionRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: questions }))
}
