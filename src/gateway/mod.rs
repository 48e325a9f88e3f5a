//! HTTP gateway (Axum) for question matching and grouping.

pub mod error;
pub mod handler;
pub mod payload;
pub mod state;
pub mod status;


use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::HeaderValue},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use handler::{check_question_handler, group_questions_handler};
pub use state::HandlerState;

use crate::embedding::Embedder;
use crate::oracle::Oracle;
use crate::pool::PoolSource;
use status::{SEMDEDUP_STATUS_HEADER, STATUS_HEALTHY, STATUS_READY};

pub fn create_router_with_state<E, O, S>(state: HandlerState<E, O, S>) -> Router
where
    E: Embedder + 'static,
    O: Oracle + 'static,
    S: PoolSource + 'static,
{
    Router::new()
        .route("/healthz", get(health_handler))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler::<E, O, S>))
        .route("/check-question", post(check_question_handler::<E, O, S>))
        .route(
            "/group_similar_questions",
            post(group_questions_handler::<E, O, S>),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct ReadyResponse {
    pub status: &'static str,
    pub components: ComponentStatus,
}

#[derive(serde::Serialize)]
pub struct ComponentStatus {
    pub http: &'static str,
    pub embedder_mode: &'static str,
    pub oracle_model: String,
}

#[tracing::instrument]
pub async fn health_handler() -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        SEMDEDUP_STATUS_HEADER,
        HeaderValue::from_static(STATUS_HEALTHY),
    );

    (
        StatusCode::OK,
        headers,
        Json(HealthResponse { status: "ok" }),
    )
        .into_response()
}

#[tracing::instrument(skip(state))]
pub async fn ready_handler<E, O, S>(State(state): State<HandlerState<E, O, S>>) -> Response
where
    E: Embedder + 'static,
    O: Oracle + 'static,
    S: PoolSource + 'static,
{
    let components = ComponentStatus {
        http: STATUS_READY,
        embedder_mode: state.embedder_mode,
        oracle_model: state.engine.oracle().model().to_string(),
    };

    let mut headers = HeaderMap::new();
    headers.insert(SEMDEDUP_STATUS_HEADER, HeaderValue::from_static(STATUS_READY));

    (
        StatusCode::OK,
        headers,
        Json(ReadyResponse {
            status: "ok",
            components,
        }),
    )
        .into_response()
}
