//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A `Deserialize` + `Validate` create DTO for inserts
//! - Where the entity is patchable, an update DTO (all `Option` fields)

pub mod about_me;
pub mod blog_post;
pub mod contact_message;
pub mod user;
pub mod user_audit;
