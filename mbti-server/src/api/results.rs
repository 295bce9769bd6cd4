//! Result history endpoints
//!
//! Every query is scoped to the authenticated caller. A result that exists
//! but belongs to someone else is reported exactly like one that does not
//! exist.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use mbti_common::db::{self, ResultEntry, TestResult};
use mbti_common::presentation::ResultView;
use mbti_common::time::Timestamp;
use mbti_common::{DecodeError, DimensionTally, PersonalityType};

use super::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// One listed result; undecodable rows carry their raw columns and a
/// `decode_error` field
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ResultListing {
    Decoded(TestResult),
    Undecodable(DecodeError),
}

impl From<ResultEntry> for ResultListing {
    fn from(entry: ResultEntry) -> Self {
        match entry {
            Ok(result) => ResultListing::Decoded(result),
            Err(raw) => ResultListing::Undecodable(raw),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResultsResponse {
    pub results: Vec<ResultListing>,
}

/// GET /api/personality/results
///
/// Newest first.
pub async fn list_results(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<Json<ResultsResponse>> {
    let entries = db::list_results_by_owner(&state.db, caller.id).await?;

    Ok(Json(ResultsResponse {
        results: entries.into_iter().map(ResultListing::from).collect(),
    }))
}

/// POST /api/personality/results body
///
/// `score` is accepted either as a JSON object or as a string holding one.
#[derive(Debug, Deserialize)]
pub struct CreateResultRequest {
    pub result_type: Option<String>,
    pub score: Option<Value>,
}

/// Saved result with the fields inline; `score` keeps its dimension order
#[derive(Debug, Serialize)]
pub struct CreateResultResponse {
    pub message: &'static str,
    pub id: Uuid,
    pub user_id: Uuid,
    pub result_type: PersonalityType,
    pub score: DimensionTally,
    pub created_at: Timestamp,
}

impl From<TestResult> for CreateResultResponse {
    fn from(result: TestResult) -> Self {
        Self {
            message: "Test result saved successfully",
            id: result.id,
            user_id: result.owner,
            result_type: result.personality_type,
            score: result.tallies,
            created_at: result.created_at,
        }
    }
}

fn parse_tallies(score: Value) -> Result<DimensionTally, ApiError> {
    let parsed = match score {
        Value::String(text) => DimensionTally::from_json(&text),
        other => serde_json::from_value(other),
    };
    parsed.map_err(|e| ApiError::BadRequest(format!("Invalid score: {}", e)))
}

/// POST /api/personality/results
pub async fn create_result(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    payload: Result<Json<CreateResultRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CreateResultResponse>)> {
    let Json(req) = payload?;

    let (Some(result_type), Some(score)) = (req.result_type, req.score) else {
        return Err(ApiError::BadRequest(
            "Please provide result_type and score".to_string(),
        ));
    };

    let personality_type: PersonalityType = result_type.trim().parse()?;
    let tallies = parse_tallies(score)?;

    let result = db::save_result(&state.db, caller.id, &personality_type, &tallies).await?;

    Ok((StatusCode::CREATED, Json(CreateResultResponse::from(result))))
}

#[derive(Debug, Serialize)]
pub struct ResultDetailResponse {
    pub result: TestResult,
    pub view: ResultView,
}

/// GET /api/personality/results/:id
pub async fn get_result(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Json<ResultDetailResponse>> {
    let not_found = || ApiError::NotFound("Result not found".to_string());

    let id = Uuid::parse_str(&id).map_err(|_| not_found())?;
    let result = db::get_result_by_id(&state.db, id, caller.id)
        .await
        .map_err(|e| match e {
            mbti_common::Error::NotFound(_) => not_found(),
            other => other.into(),
        })?;

    let view = ResultView::new(
        &result.personality_type.to_string(),
        &result.tallies,
        result.created_at,
    );

    Ok(Json(ResultDetailResponse { result, view }))
}
