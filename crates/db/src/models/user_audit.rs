//! User audit trail entity model and DTO.
//!
//! Entries are append-only: there is no update DTO and no delete surface.

use folio_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `user_audit` table. Immutable once created.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserAuditEntry {
    pub id: DbId,
    /// The user the action concerns.
    pub user_id: DbId,
    pub action: String,
    /// The (possibly different) user who performed the action. Nullified if
    /// that user is hard-purged.
    pub performed_by: Option<DbId>,
    pub performed_at: Timestamp,
}

/// DTO for appending a new audit entry.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserAudit {
    pub user_id: DbId,
    #[validate(length(min = 1, message = "Action cannot be empty"))]
    pub action: String,
    pub performed_by: Option<DbId>,
}
