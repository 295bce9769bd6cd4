//! Account store

use sqlx::SqlitePool;
use tracing::{error, info};
use uuid::Uuid;

use super::models::{User, UserRow};
use crate::{auth, time, Error, Result};

/// Register a new account
///
/// Fails with `Conflict` when the username or email is already taken.
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User> {
    let existing: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ? OR email = ?")
            .bind(username)
            .bind(email)
            .fetch_one(pool)
            .await?;

    if existing > 0 {
        return Err(Error::Conflict("Username or email already exists".to_string()));
    }

    let user = User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        email: email.to_string(),
        password_hash: auth::hash_password(password)?,
        created_at: time::now(),
    };

    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(user.id.to_string())
    .bind(&user.username)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(time::to_db_text(user.created_at))
    .execute(pool)
    .await
    .map_err(|e| {
        // Lost a race with a concurrent registration
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return Error::Conflict("Username or email already exists".to_string());
            }
        }
        error!("Failed to create user '{}': {}", username, e);
        Error::Database(e)
    })?;

    info!(user_id = %user.id, "Registered user '{}'", user.username);
    Ok(user)
}

/// Look up an account by username
pub async fn find_user_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, username, email, password_hash, created_at
         FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    row.map(User::from_row).transpose()
}

/// Fetch an account by id
pub async fn get_user(pool: &SqlitePool, id: Uuid) -> Result<User> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, username, email, password_hash, created_at
         FROM users WHERE id = ?",
    )
    .bind(id.to_string())
    .fetch_optional(pool)
    .await?;

    match row {
        Some(row) => User::from_row(row),
        None => Err(Error::NotFound(format!("User {}", id))),
    }
}

/// Check a username/password pair; `None` when either is wrong
pub async fn verify_credentials(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<Option<User>> {
    Ok(find_user_by_username(pool, username)
        .await?
        .filter(|user| auth::verify_password(password, &user.password_hash)))
}

/// Delete an account; its test results go with it (ON DELETE CASCADE)
pub async fn delete_user(pool: &SqlitePool, id: Uuid) -> Result<()> {
    let deleted = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id.to_string())
        .execute(pool)
        .await?
        .rows_affected();

    if deleted == 0 {
        return Err(Error::NotFound(format!("User {}", id)));
    }

    info!(user_id = %id, "Deleted user and their test results");
    Ok(())
}
