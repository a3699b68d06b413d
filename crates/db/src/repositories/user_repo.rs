//! Repository for the `users` table.

use sqlx::PgPool;

use folio_core::types::{DbId, USER_PURGE_RETENTION_DAYS};

use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, username, password_hash, is_admin, is_verified, \
    created_at, updated_at, deleted_at, deleted_by";

/// Provides CRUD, soft-delete, and purge operations for users.
pub struct UserRepo;

impl UserRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert a new user, returning the created row.
    ///
    /// Fails with a unique violation if another *active* user already claims
    /// the email, case-insensitively; a soft-deleted holder does not block.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (email, username, password_hash, is_admin, is_verified)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.username)
            .bind(&input.password_hash)
            .bind(input.is_admin)
            .bind(input.is_verified)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by internal ID, including soft-deleted rows.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active user by email, case-insensitively.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE LOWER(email) = LOWER($1) AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Whether an active user with this ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// Count active users.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// List active users, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE deleted_at IS NULL ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, User>(&query).fetch_all(pool).await
    }

    /// Update a user. Only non-`None` fields in `input` are applied;
    /// `updated_at` is refreshed by the database trigger.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                username = COALESCE($3, username),
                is_admin = COALESCE($4, is_admin),
                is_verified = COALESCE($5, is_verified)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.username)
            .bind(input.is_admin)
            .bind(input.is_verified)
            .fetch_optional(pool)
            .await
    }

    // ── Soft delete / restore ────────────────────────────────────────

    /// Soft-delete a user, recording who did it. Returns `true` if the row
    /// was marked deleted; `false` if missing or already deleted (callers
    /// wanting strict semantics treat `false` as a conflict).
    pub async fn soft_delete(
        pool: &PgPool,
        id: DbId,
        deleted_by: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NOW(), deleted_by = $2 \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(deleted_by)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted user. Returns `true` if a row was restored.
    ///
    /// Fails with a unique violation if the email has since been claimed by
    /// a newer active account.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET deleted_at = NULL, deleted_by = NULL \
             WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a user by ID, regardless of soft-delete state.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // ── Purge (retention) ────────────────────────────────────────────

    /// Users whose soft-deletion is older than the retention window and may
    /// be hard-purged. The partial index on `deleted_at` keeps this a scan of
    /// deleted rows only.
    pub async fn purge_eligible(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users \
             WHERE deleted_at < NOW() - make_interval(days => $1) \
             ORDER BY deleted_at"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(USER_PURGE_RETENTION_DAYS)
            .fetch_all(pool)
            .await
    }

    /// Hard-delete every purge-eligible user, returning how many rows were
    /// removed. Invoked by the external reaper job on its own schedule.
    pub async fn purge_soft_deleted(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM users WHERE deleted_at < NOW() - make_interval(days => $1)",
        )
        .bind(USER_PURGE_RETENTION_DAYS)
        .execute(pool)
        .await?;
        let purged = result.rows_affected();
        if purged > 0 {
            tracing::info!(purged, "purged soft-deleted users past retention");
        }
        Ok(purged)
    }
}
