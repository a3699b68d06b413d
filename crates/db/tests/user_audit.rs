//! Integration tests for the append-only user audit trail.

use sqlx::PgPool;
use uuid::Uuid;

use folio_db::error::is_foreign_key_violation;
use folio_db::models::user::CreateUser;
use folio_db::models::user_audit::CreateUserAudit;
use folio_db::repositories::{UserAuditRepo, UserRepo};

fn new_user(email: &str) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        username: None,
        password_hash: "$argon2id$stub".to_string(),
        is_admin: false,
        is_verified: false,
    }
}

fn new_entry(user_id: Uuid, action: &str, performed_by: Option<Uuid>) -> CreateUserAudit {
    CreateUserAudit {
        user_id,
        action: action.to_string(),
        performed_by,
    }
}

// ---------------------------------------------------------------------------
// Test: entries append and list newest-first
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_append_and_list(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("audited@example.com"))
        .await
        .unwrap();

    for action in ["registered", "verified", "password_changed"] {
        UserAuditRepo::create(&pool, &new_entry(user.id, action, Some(user.id)))
            .await
            .unwrap();
    }

    assert_eq!(UserAuditRepo::count_for_user(&pool, user.id).await.unwrap(), 3);

    let entries = UserAuditRepo::list_for_user(&pool, user.id, 10, 0)
        .await
        .unwrap();
    assert_eq!(entries.len(), 3);
    for pair in entries.windows(2) {
        assert!(
            pair[0].performed_at >= pair[1].performed_at,
            "entries should list newest first"
        );
    }

    let page = UserAuditRepo::list_for_user(&pool, user.id, 2, 2).await.unwrap();
    assert_eq!(page.len(), 1, "offset pagination should clip the tail");
}

// ---------------------------------------------------------------------------
// Test: entries for nonexistent users are rejected at write time
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_rejects_unknown_user(pool: PgPool) {
    let err = UserAuditRepo::create(&pool, &new_entry(Uuid::new_v4(), "ghost", None))
        .await
        .unwrap_err();
    assert!(
        is_foreign_key_violation(&err),
        "audit entry for a missing user must be an FK violation, got {err}"
    );
}

// ---------------------------------------------------------------------------
// Test: the acting user is nullified on purge; the subject's trail follows
// the subject
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_fk_rules_on_hard_delete(pool: PgPool) {
    let subject = UserRepo::create(&pool, &new_user("subject@example.com"))
        .await
        .unwrap();
    let actor = UserRepo::create(&pool, &new_user("actor@example.com"))
        .await
        .unwrap();

    let entry = UserAuditRepo::create(&pool, &new_entry(subject.id, "deleted", Some(actor.id)))
        .await
        .unwrap();
    assert_eq!(entry.performed_by, Some(actor.id));

    // Purging the actor clears the back-reference but keeps the entry.
    UserRepo::hard_delete(&pool, actor.id).await.unwrap();
    let entries = UserAuditRepo::list_for_user(&pool, subject.id, 10, 0)
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].performed_by, None);

    // Purging the subject removes the trail with the row.
    UserRepo::hard_delete(&pool, subject.id).await.unwrap();
    assert_eq!(
        UserAuditRepo::count_for_user(&pool, subject.id).await.unwrap(),
        0
    );
}

// ---------------------------------------------------------------------------
// Test: soft-deleting a user leaves the trail untouched
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_keeps_trail(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("trail@example.com"))
        .await
        .unwrap();
    UserAuditRepo::create(&pool, &new_entry(user.id, "registered", None))
        .await
        .unwrap();

    UserRepo::soft_delete(&pool, user.id, None).await.unwrap();

    assert_eq!(
        UserAuditRepo::count_for_user(&pool, user.id).await.unwrap(),
        1,
        "soft delete must not touch the audit trail"
    );
}
