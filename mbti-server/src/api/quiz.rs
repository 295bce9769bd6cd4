//! Quiz endpoints: question bank and server-side scoring

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use mbti_common::db::{self, TestResult};
use mbti_common::presentation::ResultView;
use mbti_common::quiz::{self, Question};
use mbti_common::{AnswerSet, DimensionTally, Letter, PersonalityType, ScoredQuiz};

use super::auth::AuthUser;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: &'static [Question],
    pub count: usize,
}

/// GET /api/personality/questions
pub async fn list_questions() -> Json<QuestionsResponse> {
    Json(QuestionsResponse {
        questions: quiz::questions(),
        count: quiz::question_count(),
    })
}

/// POST /api/personality/score body: question index → chosen letter
#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub answers: BTreeMap<usize, Letter>,
}

/// Scoring outcome; `result` and `view` are present once the set was saved
#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub result_type: PersonalityType,
    pub score: DimensionTally,
    pub answered: usize,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<TestResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ResultView>,
}

impl ScoreResponse {
    fn new(scored: ScoredQuiz, result: Option<TestResult>, view: Option<ResultView>) -> Self {
        Self {
            result_type: scored.personality_type,
            score: scored.tallies,
            answered: scored.answered,
            complete: scored.complete,
            result,
            view,
        }
    }
}

/// POST /api/personality/score
///
/// A complete answer set is saved for the caller (201). A partial one is
/// scored and returned without saving (200).
pub async fn score_answers(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<ScoreResponse>)> {
    let Json(req) = payload?;

    let answers = AnswerSet::from_answers(req.answers)?;
    let scored = quiz::score(&answers);
    debug!(
        user_id = %caller.id,
        "Scored {} of {} answers as {}",
        scored.answered,
        quiz::question_count(),
        scored.personality_type
    );

    if !scored.complete {
        return Ok((StatusCode::OK, Json(ScoreResponse::new(scored, None, None))));
    }

    let saved = db::save_result(
        &state.db,
        caller.id,
        &scored.personality_type,
        &scored.tallies,
    )
    .await?;
    let view = ResultView::new(
        &saved.personality_type.to_string(),
        &saved.tallies,
        saved.created_at,
    );

    Ok((
        StatusCode::CREATED,
        Json(ScoreResponse::new(scored, Some(saved), Some(view))),
    ))
}
