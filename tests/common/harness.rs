//! Test server harness: an upstream question host plus a semdedup server.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use semdedup::embedding::MockEmbedder;
use semdedup::engine::{MatchEngine, MatchSettings};
use semdedup::gateway::{HandlerState, create_router_with_state};
use semdedup::oracle::MockOracle;
use semdedup::pool::{DomainPolicy, HttpPoolSource};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

const FETCH_TIMEOUT: Duration = Duration::from_secs(2);

/// A background axum server that stops when dropped.
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

async fn serve(app: Router) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .expect("Test server failed");
    });

    TestServer {
        addr,
        shutdown_tx: Some(shutdown_tx),
    }
}

type Pools = Arc<HashMap<String, serde_json::Value>>;

async fn pool_handler(State(pools): State<Pools>, Path(name): Path<String>) -> Response {
    match pools.get(&name) {
        Some(body) => Json(body.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serves each `(name, body)` pair at `/pools/{name}`.
pub async fn spawn_upstream(pools: Vec<(&str, serde_json::Value)>) -> TestServer {
    let pools: Pools = Arc::new(
        pools
            .into_iter()
            .map(|(name, body)| (name.to_string(), body))
            .collect(),
    );

    let app = Router::new()
        .route("/pools/{name}", get(pool_handler))
        .with_state(pools);

    serve(app).await
}

/// Spawns semdedup with the given doubles and a real HTTP pool source.
pub async fn spawn_semdedup(
    embedder: MockEmbedder,
    oracle: MockOracle,
    allowed_domains: Vec<String>,
) -> TestServer {
    let engine = MatchEngine::new(
        Arc::new(embedder),
        Arc::new(oracle),
        MatchSettings::default(),
    );
    let pool_source = HttpPoolSource::new(DomainPolicy::new(allowed_domains), FETCH_TIMEOUT)
        .expect("Failed to build pool source");

    let state = HandlerState::new(engine, pool_source).with_stub_embedder(true);
    serve(create_router_with_state(state)).await
}

/// Builds `{"id": i, "Question": text}` records.
pub fn question_records(texts: &[&str]) -> serde_json::Value {
    serde_json::Value::Array(
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| serde_json::json!({"id": i, "Question": t}))
            .collect(),
    )
}
