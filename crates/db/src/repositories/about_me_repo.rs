//! Repository for the `about_me` table.
//!
//! Revision assignment is the one operation here with a real concurrency
//! contract: two writers inserting for the same effective date must never
//! compute the same next revision. A plain `SELECT MAX + 1` is read-then-write
//! and races, so [`AboutMeRepo::create`] serializes same-date writers through
//! a transaction-scoped advisory lock keyed by the date. Writers for different
//! dates never contend.

use chrono::{Datelike, NaiveDate};
use sqlx::PgPool;

use folio_core::types::DbId;

use crate::models::about_me::{AboutMe, CreateAboutMe};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, revision, content_markdown, effective_date, created_at, updated_at, deleted_at";

/// Advisory-lock namespace reserved for about_me revision assignment. The
/// second lock key is the day-number encoding of the effective date, so all
/// writers for one date contend on one key.
const REVISION_LOCK_SPACE: i32 = 0x4AB0;

/// Provides CRUD and revision-management operations for versioned content.
pub struct AboutMeRepo;

impl AboutMeRepo {
    // ── Revision assignment ──────────────────────────────────────────

    /// Insert a new content version, assigning the next revision number for
    /// its effective date.
    ///
    /// Runs in a transaction that first takes `pg_advisory_xact_lock` on a
    /// key derived from the date, then computes `MAX(revision) + 1` over
    /// active rows (first revision is 1), then inserts. The lock is released
    /// by commit or rollback, never explicitly. Soft-deleted rows are
    /// excluded from the MAX, so a deleted revision number is reused -- that
    /// is intended, not a bug.
    ///
    /// A deadlock or lock timeout surfaces as a retryable error
    /// ([`crate::error::is_retryable`]); a unique violation on the active
    /// `(effective_date, revision)` index means this path was bypassed.
    pub async fn create(pool: &PgPool, input: &CreateAboutMe) -> Result<AboutMe, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
            .bind(REVISION_LOCK_SPACE)
            .bind(input.effective_date.num_days_from_ce())
            .execute(&mut *tx)
            .await?;

        let next: (i32,) = sqlx::query_as(
            "SELECT COALESCE(MAX(revision), 0) + 1 FROM about_me \
             WHERE effective_date = $1 AND deleted_at IS NULL",
        )
        .bind(input.effective_date)
        .fetch_one(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO about_me (revision, content_markdown, effective_date)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, AboutMe>(&query)
            .bind(next.0)
            .bind(&input.content_markdown)
            .bind(input.effective_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            effective_date = %row.effective_date,
            revision = row.revision,
            "assigned about_me revision"
        );
        Ok(row)
    }

    /// Latest active revision number for a date, if any revisions exist.
    pub async fn latest_revision(
        pool: &PgPool,
        effective_date: NaiveDate,
    ) -> Result<Option<i32>, sqlx::Error> {
        let row: (Option<i32>,) = sqlx::query_as(
            "SELECT MAX(revision) FROM about_me \
             WHERE effective_date = $1 AND deleted_at IS NULL",
        )
        .bind(effective_date)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Find a content version by ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AboutMe>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM about_me WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, AboutMe>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a content version by ID, including soft-deleted rows. Deleted
    /// history stays reachable here for auditing.
    pub async fn find_by_id_include_deleted(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AboutMe>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM about_me WHERE id = $1");
        sqlx::query_as::<_, AboutMe>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The content currently in effect: highest revision of the nearest
    /// effective date at or before today, among active rows.
    pub async fn current(pool: &PgPool) -> Result<Option<AboutMe>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM about_me
             WHERE effective_date <= CURRENT_DATE AND deleted_at IS NULL
             ORDER BY effective_date DESC, revision DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, AboutMe>(&query).fetch_optional(pool).await
    }

    /// All active revisions for a date, newest revision first.
    pub async fn list_for_date(
        pool: &PgPool,
        effective_date: NaiveDate,
    ) -> Result<Vec<AboutMe>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM about_me
             WHERE effective_date = $1 AND deleted_at IS NULL
             ORDER BY revision DESC"
        );
        sqlx::query_as::<_, AboutMe>(&query)
            .bind(effective_date)
            .fetch_all(pool)
            .await
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Fix the markdown of an existing version in place. Versioning is by new
    /// rows; this exists for typo-level corrections only and leaves the
    /// revision number untouched.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update_content(
        pool: &PgPool,
        id: DbId,
        content_markdown: &str,
    ) -> Result<Option<AboutMe>, sqlx::Error> {
        let query = format!(
            "UPDATE about_me SET content_markdown = $2
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AboutMe>(&query)
            .bind(id)
            .bind(content_markdown)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a content version. Returns `true` if a row was marked
    /// deleted; `false` if it was missing or already deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE about_me SET deleted_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted version. Returns `true` if a row was restored.
    ///
    /// Fails with a unique violation if the row's revision number was reused
    /// by a newer active row for the same date.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE about_me SET deleted_at = NULL \
             WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a content version (compliance/admin path).
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM about_me WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
