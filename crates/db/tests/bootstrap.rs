use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    club_db::health_check(&pool).await.unwrap();

    let tables = [
        "members",
        "projects",
        "project_members",
        "achievements",
        "achievement_members",
        "questions",
        "completed_questions",
    ];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Duplicate emails surface as a `uq_` constraint violation.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_member_email_is_unique(pool: PgPool) {
    let insert = "INSERT INTO members (email, name) VALUES ('a@club.dev', 'A')";
    sqlx::query(insert).execute(&pool).await.unwrap();

    let err = sqlx::query(insert).execute(&pool).await.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_members_email"));
}
