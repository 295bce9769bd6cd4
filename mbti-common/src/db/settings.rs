//! Settings table accessors (key/value)

use sqlx::SqlitePool;
use tracing::info;

use crate::{auth, Error, Result};

/// Settings key of the bearer token signing secret
pub const TOKEN_SECRET_KEY: &str = "token_secret";

/// Read a setting, parsing it into `T`
pub async fn get_setting<T>(pool: &SqlitePool, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let row: Option<(String,)> = sqlx::query_as("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match row {
        Some((value,)) => {
            let parsed = value
                .parse::<T>()
                .map_err(|e| Error::Config(format!("Parse setting '{}' failed: {}", key, e)))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// Write a setting, replacing any previous value
pub async fn set_setting<T: ToString>(pool: &SqlitePool, key: &str, value: T) -> Result<()> {
    sqlx::query(
        "INSERT OR REPLACE INTO settings (key, value, updated_at) VALUES (?, ?, CURRENT_TIMESTAMP)",
    )
    .bind(key)
    .bind(value.to_string())
    .execute(pool)
    .await?;

    Ok(())
}

/// Load the token signing secret, generating and storing one on first use
pub async fn load_or_init_token_secret(pool: &SqlitePool) -> Result<String> {
    match get_setting::<String>(pool, TOKEN_SECRET_KEY).await? {
        Some(secret) if !secret.is_empty() => return Ok(secret),
        Some(_) => set_setting(pool, TOKEN_SECRET_KEY, auth::generate_secret()).await?,
        None => {
            // INSERT OR IGNORE + re-read: two processes starting together agree on one secret
            sqlx::query("INSERT OR IGNORE INTO settings (key, value) VALUES (?, ?)")
                .bind(TOKEN_SECRET_KEY)
                .bind(auth::generate_secret())
                .execute(pool)
                .await?;
        }
    }

    let secret = get_setting::<String>(pool, TOKEN_SECRET_KEY)
        .await?
        .ok_or_else(|| Error::Internal("Token secret missing after initialization".to_string()))?;

    info!("Generated new token signing secret");
    Ok(secret)
}
