//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument and return `sqlx::Error`
//! unclassified; see [`crate::error`] for turning those into domain errors.

pub mod about_me_repo;
pub mod blog_post_repo;
pub mod contact_message_repo;
pub mod user_audit_repo;
pub mod user_repo;

pub use about_me_repo::AboutMeRepo;
pub use blog_post_repo::BlogPostRepo;
pub use contact_message_repo::ContactMessageRepo;
pub use user_audit_repo::UserAuditRepo;
pub use user_repo::UserRepo;
