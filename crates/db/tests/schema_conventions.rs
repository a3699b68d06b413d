use sqlx::PgPool;

/// All `id` columns must be UUID.
#[sqlx::test(migrations = "./migrations")]
async fn test_all_pks_are_uuid(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, data_type
         FROM information_schema.columns
         WHERE column_name = 'id'
           AND table_schema = 'public'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty(), "expected at least one entity table");
    for (table, data_type) in &rows {
        assert_eq!(
            data_type, "uuid",
            "Table {table}.id should be uuid, got {data_type}"
        );
    }
}

/// Every timestamp-ish column must be timestamptz, never naive timestamp.
#[sqlx::test(migrations = "./migrations")]
async fn test_all_timestamps_are_timestamptz(pool: PgPool) {
    let rows: Vec<(String, String, String)> = sqlx::query_as(
        "SELECT table_name, column_name, data_type
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND table_name != '_sqlx_migrations'
           AND column_name IN
               ('created_at', 'updated_at', 'deleted_at', 'performed_at', 'published_at')
         ORDER BY table_name, column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table, column, data_type) in &rows {
        assert_eq!(
            data_type, "timestamp with time zone",
            "{table}.{column} should be timestamptz, got {data_type}"
        );
    }
}

/// No character varying columns should exist -- TEXT is preferred.
#[sqlx::test(migrations = "./migrations")]
async fn test_no_varchar_columns(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT table_name, column_name
         FROM information_schema.columns
         WHERE table_schema = 'public'
           AND data_type = 'character varying'
           AND table_name != '_sqlx_migrations'
         ORDER BY table_name, column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(
        rows.is_empty(),
        "Found VARCHAR columns (should use TEXT): {:?}",
        rows
    );
}

/// Every soft-deletable table must carry a nullable deleted_at column;
/// the append-only audit table must not.
#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_columns(pool: PgPool) {
    for table in ["users", "about_me", "blog_posts", "contact_me_messages"] {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT is_nullable FROM information_schema.columns
             WHERE table_schema = 'public'
               AND table_name = $1
               AND column_name = 'deleted_at'",
        )
        .bind(table)
        .fetch_optional(&pool)
        .await
        .unwrap();

        let (is_nullable,) = row.unwrap_or_else(|| panic!("{table} is missing deleted_at"));
        assert_eq!(is_nullable, "YES", "{table}.deleted_at must be nullable");
    }

    let audit_deleted_at: Option<(String,)> = sqlx::query_as(
        "SELECT column_name FROM information_schema.columns
         WHERE table_schema = 'public'
           AND table_name = 'user_audit'
           AND column_name = 'deleted_at'",
    )
    .fetch_optional(&pool)
    .await
    .unwrap();
    assert!(
        audit_deleted_at.is_none(),
        "user_audit is append-only and should have no deleted_at"
    );
}

/// Every foreign key constraint must have an explicit ON DELETE rule.
///
/// This prevents accidental `NO ACTION` defaults that would silently block
/// parent row deletions instead of cascading or nullifying intentionally.
#[sqlx::test(migrations = "./migrations")]
async fn test_all_fks_have_explicit_delete_rules(pool: PgPool) {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT rc.constraint_name, rc.delete_rule
         FROM information_schema.referential_constraints rc
         WHERE rc.constraint_schema = 'public'
         ORDER BY rc.constraint_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    assert!(!rows.is_empty(), "expected at least one foreign key");
    for (constraint, delete_rule) in &rows {
        assert_ne!(
            delete_rule, "NO ACTION",
            "FK {constraint} should declare an explicit ON DELETE rule"
        );
    }
}

/// Every foreign key column must have a corresponding index.
#[sqlx::test(migrations = "./migrations")]
async fn test_all_fks_have_indexes(pool: PgPool) {
    let fk_columns: Vec<(String, String)> = sqlx::query_as(
        "SELECT DISTINCT
             tc.table_name,
             kcu.column_name
         FROM information_schema.table_constraints tc
         JOIN information_schema.key_column_usage kcu
             ON tc.constraint_name = kcu.constraint_name
             AND tc.table_schema = kcu.table_schema
         WHERE tc.constraint_type = 'FOREIGN KEY'
           AND tc.table_schema = 'public'
         ORDER BY tc.table_name, kcu.column_name",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for (table, column) in &fk_columns {
        let has_index: (bool,) = sqlx::query_as(&format!(
            "SELECT EXISTS (
                SELECT 1
                FROM pg_indexes
                WHERE schemaname = 'public'
                  AND tablename = '{table}'
                  AND indexdef LIKE '%({column})%'
            )"
        ))
        .fetch_one(&pool)
        .await
        .unwrap();

        assert!(has_index.0, "FK column {table}.{column} has no index");
    }
}
