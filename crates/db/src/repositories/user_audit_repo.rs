//! Repository for the `user_audit` table.
//!
//! The audit trail is append-only: this repository deliberately exposes no
//! update or delete methods.

use sqlx::PgPool;

use folio_core::types::DbId;

use crate::models::user_audit::{CreateUserAudit, UserAuditEntry};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, action, performed_by, performed_at";

/// Provides insert and query operations for the user audit trail.
pub struct UserAuditRepo;

impl UserAuditRepo {
    /// Append a new audit entry.
    ///
    /// Fails with a foreign key violation if `user_id` (or a non-null
    /// `performed_by`) does not reference an existing user.
    pub async fn create(
        pool: &PgPool,
        input: &CreateUserAudit,
    ) -> Result<UserAuditEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_audit (user_id, action, performed_by)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserAuditEntry>(&query)
            .bind(input.user_id)
            .bind(&input.action)
            .bind(input.performed_by)
            .fetch_one(pool)
            .await
    }

    /// List a user's audit entries, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<UserAuditEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_audit
             WHERE user_id = $1
             ORDER BY performed_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, UserAuditEntry>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Count a user's audit entries.
    pub async fn count_for_user(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        let row: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM user_audit WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }
}
