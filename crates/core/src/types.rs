/// All database primary keys are UUIDs, generated server-side by
/// `gen_random_uuid()`.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// How long a soft-deleted user is retained before becoming purge-eligible.
///
/// The reaper job hard-deletes rows whose `deleted_at` is older than this.
pub const USER_PURGE_RETENTION_DAYS: i32 = 7;
