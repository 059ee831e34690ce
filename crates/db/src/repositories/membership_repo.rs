//! Repository for the `project_members` and `achievement_members` join tables.

use club_core::types::{DbId, ResourceKind};
use sqlx::PgPool;

/// Join table and resource-key column for a resource kind.
fn join_table(kind: ResourceKind) -> (&'static str, &'static str) {
    match kind {
        ResourceKind::Project => ("project_members", "project_id"),
        ResourceKind::Achievement => ("achievement_members", "achievement_id"),
    }
}

/// Provides membership-pair operations for both resource kinds.
pub struct MembershipRepo;

impl MembershipRepo {
    /// Insert `(resource_id, member_id)` pairs, skipping existing ones.
    ///
    /// Returns the number of rows actually inserted.
    pub async fn insert_many(
        pool: &PgPool,
        kind: ResourceKind,
        resource_id: DbId,
        member_ids: &[String],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let added = Self::insert_many_inner(&mut tx, kind, resource_id, member_ids).await?;
        tx.commit().await?;
        Ok(added)
    }

    /// Transaction-scoped variant of [`Self::insert_many`].
    pub async fn insert_many_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        kind: ResourceKind,
        resource_id: DbId,
        member_ids: &[String],
    ) -> Result<u64, sqlx::Error> {
        if member_ids.is_empty() {
            return Ok(0);
        }
        let (table, key) = join_table(kind);
        let query = format!(
            "INSERT INTO {table} ({key}, member_id) \
             SELECT $1, m FROM UNNEST($2::text[]) AS m \
             ON CONFLICT DO NOTHING"
        );
        let result = sqlx::query(&query)
            .bind(resource_id)
            .bind(member_ids)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete a single pair. Returns `true` if it existed.
    pub async fn delete(
        pool: &PgPool,
        kind: ResourceKind,
        resource_id: DbId,
        member_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let (table, key) = join_table(kind);
        let query = format!("DELETE FROM {table} WHERE {key} = $1 AND member_id = $2");
        let result = sqlx::query(&query)
            .bind(resource_id)
            .bind(member_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Member ids associated with a resource, ascending.
    pub async fn list_member_ids(
        pool: &PgPool,
        kind: ResourceKind,
        resource_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        let (table, key) = join_table(kind);
        let query = format!("SELECT member_id FROM {table} WHERE {key} = $1 ORDER BY member_id");
        sqlx::query_scalar::<_, String>(&query)
            .bind(resource_id)
            .fetch_all(pool)
            .await
    }
}
