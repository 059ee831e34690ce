//! Repository for the `projects` table.

use club_core::types::DbId;
use sqlx::PgPool;

use crate::models::member::MemberSummary;
use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "id, name, image_url, github_url, deploy_url, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    ///
    /// Memberships in `input.member_ids` are not inserted here; they go
    /// through the association layer.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (name, github_url, deploy_url) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .bind(&input.github_url)
            .bind(&input.deploy_url)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                github_url = COALESCE($3, github_url),
                deploy_url = COALESCE($4, deploy_url)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.github_url)
            .bind(&input.deploy_url)
            .fetch_optional(pool)
            .await
    }

    /// Members of a project with their public profile columns.
    pub async fn list_members(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<MemberSummary>, sqlx::Error> {
        sqlx::query_as::<_, MemberSummary>(
            "SELECT m.id, m.name, m.email, m.profile_photo \
             FROM members m \
             JOIN project_members pm ON pm.member_id = m.id \
             WHERE pm.project_id = $1 \
             ORDER BY m.name",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Delete a project and its membership set in one transaction.
    ///
    /// Returns `true` if the project existed.
    pub async fn delete_with_members(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM project_members WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
