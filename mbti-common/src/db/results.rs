//! Test result store
//!
//! Every query takes the owner's user id as a required argument. Callers get
//! that id from a verified token, never from the stored record.

use sqlx::SqlitePool;
use tracing::{debug, error, warn};
use uuid::Uuid;

use super::models::{ResultEntry, ResultRow, TestResult};
use crate::quiz::{DimensionTally, PersonalityType};
use crate::{time, Error, Result};

/// Persist a new immutable result for `owner`
///
/// One row, one INSERT: the record is either fully written or not at all.
/// Storage failures are logged and returned; they are never retried since a
/// resubmission would create a duplicate.
pub async fn save_result(
    pool: &SqlitePool,
    owner: Uuid,
    personality_type: &PersonalityType,
    tallies: &DimensionTally,
) -> Result<TestResult> {
    let result = TestResult {
        id: Uuid::new_v4(),
        owner,
        personality_type: *personality_type,
        tallies: *tallies,
        created_at: time::now(),
    };

    sqlx::query(
        "INSERT INTO test_results (id, user_id, result_type, tallies, created_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(result.id.to_string())
    .bind(owner.to_string())
    .bind(result.personality_type.to_string())
    .bind(result.tallies.to_json()?)
    .bind(time::to_db_text(result.created_at))
    .execute(pool)
    .await
    .map_err(|e| {
        error!(owner = %owner, "Failed to save test result: {}", e);
        Error::Database(e)
    })?;

    debug!(id = %result.id, owner = %owner, result_type = %result.personality_type, "Saved test result");
    Ok(result)
}

/// All results of `owner`, newest first
///
/// Rows that fail to decode come back as `Err(DecodeError)` entries in
/// place; they do not abort the listing.
pub async fn list_results_by_owner(pool: &SqlitePool, owner: Uuid) -> Result<Vec<ResultEntry>> {
    let rows: Vec<ResultRow> = sqlx::query_as(
        "SELECT id, user_id, result_type, tallies, created_at
         FROM test_results
         WHERE user_id = ?
         ORDER BY created_at DESC, rowid DESC",
    )
    .bind(owner.to_string())
    .fetch_all(pool)
    .await
    .map_err(|e| {
        error!(owner = %owner, "Failed to list test results: {}", e);
        Error::Database(e)
    })?;

    Ok(rows
        .into_iter()
        .map(|row| {
            TestResult::from_row(row).inspect_err(|e| {
                warn!(owner = %owner, "Stored test result could not be decoded: {}", e);
            })
        })
        .collect())
}

/// One result by id, visible only to its owner
///
/// A missing id and an id owned by someone else both yield `NotFound`.
pub async fn get_result_by_id(pool: &SqlitePool, id: Uuid, owner: Uuid) -> Result<TestResult> {
    let row: Option<ResultRow> = sqlx::query_as(
        "SELECT id, user_id, result_type, tallies, created_at
         FROM test_results
         WHERE id = ? AND user_id = ?",
    )
    .bind(id.to_string())
    .bind(owner.to_string())
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        error!(id = %id, owner = %owner, "Failed to fetch test result: {}", e);
        Error::Database(e)
    })?;

    let row = row.ok_or_else(|| Error::NotFound(format!("Test result {}", id)))?;
    TestResult::from_row(row).map_err(|e| {
        warn!(owner = %owner, "Stored test result could not be decoded: {}", e);
        Error::Decode(e)
    })
}
