//! Repository for the `achievements` table.

use club_core::types::DbId;
use sqlx::PgPool;

use crate::models::achievement::{Achievement, CreateAchievement, UpdateAchievement};
use crate::models::member::MemberSummary;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "id, title, description, achieved_at, image_url, created_at, updated_at";

/// Provides CRUD operations for achievements.
pub struct AchievementRepo;

impl AchievementRepo {
    /// Insert a new achievement, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAchievement,
    ) -> Result<Achievement, sqlx::Error> {
        let query = format!(
            "INSERT INTO achievements (title, description, achieved_at) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Achievement>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.achieved_at)
            .fetch_one(pool)
            .await
    }

    /// Find an achievement by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Achievement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM achievements WHERE id = $1");
        sqlx::query_as::<_, Achievement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all achievements, most recent first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Achievement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM achievements ORDER BY achieved_at DESC, id DESC");
        sqlx::query_as::<_, Achievement>(&query).fetch_all(pool).await
    }

    /// Update an achievement. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAchievement,
    ) -> Result<Option<Achievement>, sqlx::Error> {
        let query = format!(
            "UPDATE achievements SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                achieved_at = COALESCE($4, achieved_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Achievement>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.achieved_at)
            .fetch_optional(pool)
            .await
    }

    /// Members credited with an achievement.
    pub async fn list_members(
        pool: &PgPool,
        achievement_id: DbId,
    ) -> Result<Vec<MemberSummary>, sqlx::Error> {
        sqlx::query_as::<_, MemberSummary>(
            "SELECT m.id, m.name, m.email, m.profile_photo \
             FROM members m \
             JOIN achievement_members am ON am.member_id = m.id \
             WHERE am.achievement_id = $1 \
             ORDER BY m.name",
        )
        .bind(achievement_id)
        .fetch_all(pool)
        .await
    }

    /// Delete an achievement and its membership set in one transaction.
    ///
    /// Returns `true` if the achievement existed.
    pub async fn delete_with_members(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM achievement_members WHERE achievement_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM achievements WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
