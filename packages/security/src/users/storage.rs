// ABOUTME: User storage layer using SQLite
// ABOUTME: Registration, credential checks, role changes and administrator bootstrap

use chrono::Utc;
use pcbuilder_storage::is_unique_violation;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use super::types::{NewUser, User, UserError};
use crate::password::{hash_password, verify_password};
use crate::roles::Role;

#[derive(Clone)]
pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, input: NewUser) -> Result<User, UserError> {
        input.validate()?;
        let id = Uuid::new_v4().to_string();
        let email = input.email.trim().to_string();
        let password_hash = hash_password(&input.password)?;
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&email)
        .bind(&password_hash)
        .bind(input.role.as_str())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                UserError::DuplicateEmail
            } else {
                UserError::from(e)
            }
        })?;

        info!(user_id = %id, role = %input.role, "User registered");
        self.get_user(&id).await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, UserError> {
        debug!("Fetching user: {}", user_id);

        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()?.ok_or(UserError::NotFound)
    }

    /// Emails compare case-insensitively (column collation)
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        let row = sqlx::query("SELECT * FROM users WHERE email = ?")
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Unknown email and wrong password fail the same way
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, UserError> {
        let Some(user) = self.find_by_email(email).await? else {
            return Err(UserError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash)? {
            return Err(UserError::InvalidCredentials);
        }

        debug!(user_id = %user.id, "User authenticated");
        Ok(user)
    }

    pub async fn list_users(&self) -> Result<Vec<User>, UserError> {
        let rows = sqlx::query("SELECT * FROM users ORDER BY created_at DESC, email")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_user).collect()
    }

    pub async fn set_role(&self, user_id: &str, role: Role) -> Result<User, UserError> {
        let result = sqlx::query("UPDATE users SET role = ?, updated_at = ? WHERE id = ?")
            .bind(role.as_str())
            .bind(Utc::now())
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound);
        }

        info!(user_id = %user_id, role = %role, "User role changed");
        self.get_user(user_id).await
    }

    /// Create the administrator account, or promote an existing account with that email.
    /// An existing account keeps its password.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<User, UserError> {
        match self.find_by_email(email).await? {
            Some(user) if user.role == Role::Admin => Ok(user),
            Some(user) => self.set_role(&user.id, Role::Admin).await,
            None => {
                self.create_user(NewUser {
                    email: email.to_string(),
                    password: password.to_string(),
                    role: Role::Admin,
                })
                .await
            }
        }
    }
}

fn row_to_user(row: &SqliteRow) -> Result<User, UserError> {
    let role: String = row.try_get("role")?;
    let role = role
        .parse::<Role>()
        .map_err(|e| UserError::Storage(pcbuilder_storage::StorageError::Database(e)))?;

    Ok(User {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
        role,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}
