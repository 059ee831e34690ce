//! Attachment ref columns on `members`, `projects`, and `achievements`.

use club_core::types::OwnerRef;
use sqlx::PgPool;

/// Table and column holding the attachment ref for an owner kind.
fn binding(owner: &OwnerRef) -> (&'static str, &'static str) {
    match owner {
        OwnerRef::Member(_) => ("members", "profile_photo"),
        OwnerRef::Project(_) => ("projects", "image_url"),
        OwnerRef::Achievement(_) => ("achievements", "image_url"),
    }
}

/// Bind the owner's primary key as the first parameter.
fn bind_owner<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    owner: &'q OwnerRef,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    match owner {
        OwnerRef::Member(id) => query.bind(id.as_str()),
        OwnerRef::Project(id) | OwnerRef::Achievement(id) => query.bind(*id),
    }
}

/// Reads and compare-and-sets owner attachment refs.
pub struct AttachmentRefRepo;

impl AttachmentRefRepo {
    /// Returns `None` when the owner row does not exist, otherwise the
    /// stored ref (which may itself be `NULL`).
    pub async fn find(
        pool: &PgPool,
        owner: &OwnerRef,
    ) -> Result<Option<Option<String>>, sqlx::Error> {
        let (table, column) = binding(owner);
        let query = format!("SELECT {column} FROM {table} WHERE id = $1");
        let row: Option<(Option<String>,)> = match owner {
            OwnerRef::Member(id) => {
                sqlx::query_as(&query)
                    .bind(id.as_str())
                    .fetch_optional(pool)
                    .await?
            }
            OwnerRef::Project(id) | OwnerRef::Achievement(id) => {
                sqlx::query_as(&query).bind(*id).fetch_optional(pool).await?
            }
        };
        Ok(row.map(|(value,)| value))
    }

    /// Set the ref to `new` only if it is currently `expected`.
    ///
    /// Returns `true` if the row was updated.
    pub async fn swap(
        pool: &PgPool,
        owner: &OwnerRef,
        expected: Option<&str>,
        new: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let (table, column) = binding(owner);
        let query = format!(
            "UPDATE {table} SET {column} = $3 \
             WHERE id = $1 AND {column} IS NOT DISTINCT FROM $2"
        );
        let result = bind_owner(sqlx::query(&query), owner)
            .bind(expected)
            .bind(new)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
