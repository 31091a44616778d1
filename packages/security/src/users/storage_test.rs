// ABOUTME: Tests for user storage layer
// ABOUTME: Registration, case-insensitive email lookup, authentication and admin bootstrap

use super::storage::UserStorage;
use super::types::{NewUser, UserError};
use crate::roles::Role;

async fn setup() -> UserStorage {
    let pool = pcbuilder_storage::connect_in_memory().await.unwrap();
    UserStorage::new(pool)
}

fn new_user(email: &str, password: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password: password.to_string(),
        role: Role::User,
    }
}

#[tokio::test]
async fn test_create_and_get_user() {
    let storage = setup().await;

    let user = storage
        .create_user(new_user("jane@example.com", "secret123"))
        .await
        .unwrap();

    assert_eq!(user.email, "jane@example.com");
    assert_eq!(user.role, Role::User);
    assert!(user.password_hash.starts_with("$argon2"));
    assert_ne!(user.password_hash, "secret123");

    let fetched = storage.get_user(&user.id).await.unwrap();
    assert_eq!(fetched.id, user.id);
}

#[tokio::test]
async fn test_duplicate_email_is_case_insensitive() {
    let storage = setup().await;
    storage
        .create_user(new_user("jane@example.com", "secret123"))
        .await
        .unwrap();

    let err = storage
        .create_user(new_user("JANE@Example.com", "another123"))
        .await
        .unwrap_err();
    assert!(matches!(err, UserError::DuplicateEmail));
}

#[tokio::test]
async fn test_invalid_registration() {
    let storage = setup().await;

    let err = storage.create_user(new_user("not-an-email", "secret123")).await.unwrap_err();
    assert!(matches!(err, UserError::Validation(_)));

    let err = storage.create_user(new_user("jane@example.com", "123")).await.unwrap_err();
    assert!(matches!(err, UserError::Validation(_)));

    assert!(storage.list_users().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_authenticate() {
    let storage = setup().await;
    let user = storage
        .create_user(new_user("jane@example.com", "secret123"))
        .await
        .unwrap();

    let authed = storage.authenticate("Jane@Example.com", "secret123").await.unwrap();
    assert_eq!(authed.id, user.id);

    assert!(matches!(
        storage.authenticate("jane@example.com", "wrong-pass").await,
        Err(UserError::InvalidCredentials)
    ));
    assert!(matches!(
        storage.authenticate("nobody@example.com", "secret123").await,
        Err(UserError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn test_set_role_and_missing_user() {
    let storage = setup().await;
    let user = storage
        .create_user(new_user("vendor@example.com", "secret123"))
        .await
        .unwrap();

    let updated = storage.set_role(&user.id, Role::Vendor).await.unwrap();
    assert_eq!(updated.role, Role::Vendor);

    assert!(matches!(
        storage.set_role("missing", Role::Admin).await,
        Err(UserError::NotFound)
    ));
    assert!(matches!(storage.get_user("missing").await, Err(UserError::NotFound)));
}

#[tokio::test]
async fn test_ensure_admin_creates_then_promotes() {
    let storage = setup().await;

    let admin = storage.ensure_admin("admin@example.com", "adminpass").await.unwrap();
    assert_eq!(admin.role, Role::Admin);

    // Idempotent
    let again = storage.ensure_admin("admin@example.com", "adminpass").await.unwrap();
    assert_eq!(again.id, admin.id);
    assert_eq!(storage.list_users().await.unwrap().len(), 1);

    let user = storage
        .create_user(new_user("promote@example.com", "secret123"))
        .await
        .unwrap();
    let promoted = storage.ensure_admin("promote@example.com", "ignored").await.unwrap();
    assert_eq!(promoted.id, user.id);
    assert_eq!(promoted.role, Role::Admin);

    // Existing password survives promotion
    assert!(storage.authenticate("promote@example.com", "secret123").await.is_ok());
}
