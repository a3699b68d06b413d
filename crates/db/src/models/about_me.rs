//! Versioned "about me" content model and DTOs.

use chrono::NaiveDate;
use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A row from the `about_me` table.
///
/// Content is versioned by rows: each insert for an effective date gets the
/// next revision number for that date. Existing rows are never edited except
/// for typo-level content fixes and soft-deletion.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AboutMe {
    pub id: DbId,
    /// Per-effective-date sequence number, assigned by the store at insert
    /// time. 1-based; never supplied by the caller, never mutated.
    pub revision: i32,
    pub content_markdown: String,
    pub effective_date: NaiveDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// DTO for creating a new content version.
///
/// Deliberately has no `revision` field: the repository computes it inside a
/// date-scoped critical section.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAboutMe {
    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content_markdown: String,
    #[validate(custom(function = "validate_effective_date"))]
    pub effective_date: NaiveDate,
}

fn validate_effective_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date < NaiveDate::from_ymd_opt(1900, 1, 1).unwrap() {
        let mut err = ValidationError::new("invalid_effective_date");
        err.message = Some("Date must be on or after January 1, 1900".into());
        return Err(err);
    }
    Ok(())
}
