//! Repository for the `members` table.

use sqlx::PgPool;

use crate::models::achievement::Achievement;
use crate::models::member::{CreateMember, Member, UpdateMember};
use crate::models::project::Project;
use crate::repositories::achievement_repo::COLUMNS as ACHIEVEMENT_COLUMNS;
use crate::repositories::project_repo::COLUMNS as PROJECT_COLUMNS;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, name, bio, profile_photo, passout_year, \
    is_approved, is_manager, created_at, updated_at";

/// Provides CRUD operations for members.
pub struct MemberRepo;

impl MemberRepo {
    /// Insert a new member, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateMember) -> Result<Member, sqlx::Error> {
        let query = format!(
            "INSERT INTO members (email, name, bio, passout_year) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.bio)
            .bind(input.passout_year)
            .fetch_one(pool)
            .await
    }

    /// Find a member by id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE id = $1");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List approved members by name.
    pub async fn list_approved(pool: &PgPool) -> Result<Vec<Member>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM members WHERE is_approved = true ORDER BY name");
        sqlx::query_as::<_, Member>(&query).fetch_all(pool).await
    }

    /// List members still waiting for approval, oldest sign-up first.
    pub async fn list_unapproved(pool: &PgPool) -> Result<Vec<Member>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM members WHERE is_approved = false ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Member>(&query).fetch_all(pool).await
    }

    /// Update a member's profile. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: &str,
        input: &UpdateMember,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!(
            "UPDATE members SET
                name = COALESCE($2, name),
                bio = COALESCE($3, bio),
                passout_year = COALESCE($4, passout_year)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.bio)
            .bind(input.passout_year)
            .fetch_optional(pool)
            .await
    }

    /// Set the approval flag. Returns `None` if the member does not exist.
    pub async fn set_approved(
        pool: &PgPool,
        id: &str,
        is_approved: bool,
    ) -> Result<Option<Member>, sqlx::Error> {
        let query = format!("UPDATE members SET is_approved = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Member>(&query)
            .bind(id)
            .bind(is_approved)
            .fetch_optional(pool)
            .await
    }

    /// Projects the member belongs to.
    pub async fn list_projects(pool: &PgPool, member_id: &str) -> Result<Vec<Project>, sqlx::Error> {
        let columns = qualify(PROJECT_COLUMNS, "p");
        let query = format!(
            "SELECT {columns} FROM projects p \
             JOIN project_members pm ON pm.project_id = p.id \
             WHERE pm.member_id = $1 \
             ORDER BY p.created_at DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(member_id)
            .fetch_all(pool)
            .await
    }

    /// Achievements the member is credited with.
    pub async fn list_achievements(
        pool: &PgPool,
        member_id: &str,
    ) -> Result<Vec<Achievement>, sqlx::Error> {
        let columns = qualify(ACHIEVEMENT_COLUMNS, "a");
        let query = format!(
            "SELECT {columns} FROM achievements a \
             JOIN achievement_members am ON am.achievement_id = a.id \
             WHERE am.member_id = $1 \
             ORDER BY a.achieved_at DESC"
        );
        sqlx::query_as::<_, Achievement>(&query)
            .bind(member_id)
            .fetch_all(pool)
            .await
    }
}

/// Prefix every column in a comma-separated list with `alias.`.
fn qualify(columns: &str, alias: &str) -> String {
    columns
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
