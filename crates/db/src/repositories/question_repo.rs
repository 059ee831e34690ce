//! Repository for the `questions` table.

use club_core::types::DbId;
use sqlx::PgPool;

use crate::models::question::{CreateQuestion, Question};

const COLUMNS: &str = "id, question_name, link, difficulty, created_at, updated_at";

/// Provides CRUD operations for questions.
pub struct QuestionRepo;

impl QuestionRepo {
    /// Insert a new question. Difficulty defaults to `easy`.
    pub async fn create(pool: &PgPool, input: &CreateQuestion) -> Result<Question, sqlx::Error> {
        let query = format!(
            "INSERT INTO questions (question_name, link, difficulty) \
             VALUES ($1, $2, COALESCE($3, 'easy')) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(&input.question_name)
            .bind(&input.link)
            .bind(&input.difficulty)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Question>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM questions WHERE id = $1");
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all questions in creation order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Question>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM questions ORDER BY id");
        sqlx::query_as::<_, Question>(&query).fetch_all(pool).await
    }
}
