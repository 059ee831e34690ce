//! Question bank entries (targets of progress tracking).

use club_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: DbId,
    pub question_name: String,
    pub link: Option<String>,
    pub difficulty: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a question.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestion {
    #[validate(length(min = 1, max = 300))]
    pub question_name: String,
    #[validate(url)]
    pub link: Option<String>,
    /// One of `easy`, `medium`, `hard`. Defaults to `easy`.
    pub difficulty: Option<String>,
}
