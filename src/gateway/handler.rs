use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::embedding::Embedder;
use crate::gateway::error::GatewayError;
use crate::gateway::payload::{
    CheckQuestionRequest, CheckQuestionResponse, GroupQuestionsRequest, GroupQuestionsResponse,
};
use crate::gateway::state::HandlerState;
use crate::gateway::status::{
    REQUEST_ID_HEADER, SEMDEDUP_STATUS_HEADER, STATUS_GROUPED, STATUS_MATCH, STATUS_NO_GROUPS,
    STATUS_NO_MATCH,
};
use crate::oracle::Oracle;
use crate::pool::PoolSource;

const MISSING_CHECK_FIELDS: &str = "Request body must contain 'questions_url' and 'question'";
const MISSING_QUESTIONS_URL: &str = "Missing 'questions_url' in request";

/// Returns the trimmed value if present and non-blank.
fn required(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Unwraps the JSON extractor. Rejections become `message` so callers always get the error shape.
fn json_body(
    body: Result<Json<serde_json::Value>, JsonRejection>,
    message: &str,
) -> Result<serde_json::Value, GatewayError> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(rejection) => {
            warn!(reason = %rejection.body_text(), "Rejected request body");
            Err(GatewayError::InvalidRequest(message.to_string()))
        }
    }
}

fn start_request() -> Uuid {
    let request_id = Uuid::new_v4();
    tracing::Span::current().record("request_id", tracing::field::display(&request_id));
    request_id
}

#[instrument(skip(state, body), fields(request_id = tracing::field::Empty))]
pub async fn check_question_handler<E, O, S>(
    State(state): State<HandlerState<E, O, S>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    O: Oracle + 'static,
    S: PoolSource + 'static,
{
    let request_id = start_request();

    let body = json_body(body, MISSING_CHECK_FIELDS)?;
    let request: CheckQuestionRequest = serde_json::from_value(body)
        .map_err(|_| GatewayError::InvalidRequest(MISSING_CHECK_FIELDS.to_string()))?;
    let (Some(questions_url), Some(question)) =
        (required(request.questions_url), required(request.question))
    else {
        warn!("Missing required parameters");
        return Err(GatewayError::InvalidRequest(
            MISSING_CHECK_FIELDS.to_string(),
        ));
    };

    let pool = state
        .engine
        .fetch_pool(state.pool_source.as_ref(), &questions_url)
        .await?;

    info!(pool_size = pool.len(), "Checking question against pool");
    let result = state.engine.match_question(&pool, &question).await?;

    let outcome = if result.is_match() {
        STATUS_MATCH
    } else {
        STATUS_NO_MATCH
    };

    Ok(make_response(
        CheckQuestionResponse::from_matches(result.questions()),
        outcome,
        request_id,
    ))
}

#[instrument(skip(state, body), fields(request_id = tracing::field::Empty))]
pub async fn group_questions_handler<E, O, S>(
    State(state): State<HandlerState<E, O, S>>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, GatewayError>
where
    E: Embedder + 'static,
    O: Oracle + 'static,
    S: PoolSource + 'static,
{
    let request_id = start_request();

    let body = json_body(body, MISSING_QUESTIONS_URL)?;
    let request: GroupQuestionsRequest = serde_json::from_value(body)
        .map_err(|_| GatewayError::InvalidRequest(MISSING_QUESTIONS_URL.to_string()))?;
    let Some(questions_url) = required(request.questions_url) else {
        warn!("Missing questions_url parameter");
        return Err(GatewayError::InvalidRequest(
            MISSING_QUESTIONS_URL.to_string(),
        ));
    };

    let pool = state
        .engine
        .fetch_pool(state.pool_source.as_ref(), &questions_url)
        .await?;

    info!(pool_size = pool.len(), "Grouping question pool");
    let result = state.engine.group_questions(&pool).await?;

    let outcome = if result.is_empty() {
        STATUS_NO_GROUPS
    } else {
        STATUS_GROUPED
    };

    Ok(make_response(
        GroupQuestionsResponse::from_groups(result.question_groups().to_vec()),
        outcome,
        request_id,
    ))
}

fn make_response<T: Serialize>(body: T, outcome: &'static str, request_id: Uuid) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(SEMDEDUP_STATUS_HEADER, HeaderValue::from_static(outcome));
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        headers.insert(REQUEST_ID_HEADER, value);
    }

    (StatusCode::OK, headers, Json(body)).into_response()
}
