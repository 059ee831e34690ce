//! Repository for the `completed_questions` table.

use club_core::types::DbId;
use sqlx::PgPool;

use crate::models::progress::ToggleCounts;

/// Delete the pair if present, otherwise insert it, in one statement.
///
/// The insert only runs when the delete removed nothing. If a concurrent
/// toggle committed the same pair first, `ON CONFLICT DO NOTHING` leaves
/// both counts at zero.
const TOGGLE_SQL: &str = "\
    WITH removed AS ( \
        DELETE FROM completed_questions \
        WHERE member_id = $1 AND question_id = $2 \
        RETURNING member_id \
    ), created AS ( \
        INSERT INTO completed_questions (member_id, question_id) \
        SELECT $1, $2 WHERE NOT EXISTS (SELECT 1 FROM removed) \
        ON CONFLICT (member_id, question_id) DO NOTHING \
        RETURNING member_id \
    ) \
    SELECT (SELECT COUNT(*) FROM removed) AS removed, \
           (SELECT COUNT(*) FROM created) AS created";

/// Provides the completion toggle and progress listing.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Flip the completion record for `(member_id, question_id)`.
    pub async fn toggle(
        pool: &PgPool,
        member_id: &str,
        question_id: DbId,
    ) -> Result<ToggleCounts, sqlx::Error> {
        sqlx::query_as::<_, ToggleCounts>(TOGGLE_SQL)
            .bind(member_id)
            .bind(question_id)
            .fetch_one(pool)
            .await
    }

    /// Question ids the member has completed, ascending.
    pub async fn list_completed(pool: &PgPool, member_id: &str) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT question_id FROM completed_questions \
             WHERE member_id = $1 ORDER BY question_id",
        )
        .bind(member_id)
        .fetch_all(pool)
        .await
    }
}
