//! Database models

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::quiz::{DimensionTally, PersonalityType};
use crate::{time, DecodeError};

/// Registered account
///
/// The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A scored quiz submission, owned by exactly one user.
///
/// Created once and never updated; a retake creates a new record.
/// Serialized field names match the JSON the web client reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestResult {
    pub id: Uuid,
    #[serde(rename = "user_id")]
    pub owner: Uuid,
    #[serde(rename = "result_type")]
    pub personality_type: PersonalityType,
    #[serde(rename = "score")]
    pub tallies: DimensionTally,
    pub created_at: DateTime<Utc>,
}

/// One entry of a result listing: decoded, or flagged with its raw columns
pub type ResultEntry = std::result::Result<TestResult, DecodeError>;

/// Raw `test_results` columns: id, user_id, result_type, tallies, created_at
pub(crate) type ResultRow = (String, String, String, String, String);

/// Raw `users` columns: id, username, email, password_hash, created_at
pub(crate) type UserRow = (String, String, String, String, String);

impl TestResult {
    pub(crate) fn from_row(row: ResultRow) -> ResultEntry {
        let (id, user_id, result_type, tallies, created_at) = row;

        let decoded = (|| -> std::result::Result<TestResult, String> {
            Ok(TestResult {
                id: Uuid::parse_str(&id).map_err(|e| format!("invalid id: {}", e))?,
                owner: Uuid::parse_str(&user_id).map_err(|e| format!("invalid owner: {}", e))?,
                personality_type: result_type
                    .parse()
                    .map_err(|e| format!("invalid result type: {}", e))?,
                tallies: DimensionTally::from_json(&tallies)
                    .map_err(|e| format!("invalid tallies: {}", e))?,
                created_at: time::from_db_text(&created_at)
                    .map_err(|e| format!("invalid created_at: {}", e))?,
            })
        })();

        decoded.map_err(|reason| DecodeError {
            id,
            raw_type: result_type,
            raw_tallies: tallies,
            created_at,
            reason,
        })
    }
}

impl User {
    pub(crate) fn from_row(row: UserRow) -> crate::Result<User> {
        let (id, username, email, password_hash, created_at) = row;
        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|e| crate::Error::Internal(format!("Invalid user id '{}': {}", id, e)))?,
            username,
            email,
            password_hash,
            created_at: time::from_db_text(&created_at).map_err(|e| {
                crate::Error::Internal(format!("Invalid created_at for user {}: {}", id, e))
            })?,
        })
    }
}
