//! Semdedup HTTP server entrypoint.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tokio::signal;

use semdedup::config::Config;
use semdedup::embedding::{SentenceConfig, SentenceEmbedder};
use semdedup::engine::MatchEngine;
use semdedup::gateway::{HandlerState, create_router_with_state};
use semdedup::oracle::GenaiOracle;
use semdedup::pool::{DomainPolicy, HttpPoolSource};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check());
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let addr: SocketAddr = config.socket_addr().parse()?;

    tracing::info!(
        bind_addr = %config.bind_addr,
        port = config.port,
        oracle_model = %config.oracle_model,
        shortlist_k = config.shortlist_k,
        "Semdedup starting"
    );

    let sentence_config = if let Some(path) = &config.model_path {
        SentenceConfig::new(path.clone())
    } else {
        tracing::warn!("No SEMDEDUP_MODEL_PATH configured, running embedder in stub mode");
        SentenceConfig::stub()
    };
    let embedder = SentenceEmbedder::load(sentence_config)?;
    let is_stub = embedder.is_stub();

    let oracle = GenaiOracle::new(config.oracle_model.clone());

    let pool_source = HttpPoolSource::new(
        DomainPolicy::new(config.allowed_domains.clone()),
        config.fetch_timeout,
    )?;
    if pool_source.policy().is_unrestricted() {
        tracing::warn!("SEMDEDUP_ALLOWED_DOMAINS is empty, accepting questions_url on any host");
    } else {
        tracing::info!(
            allowed_domains = ?pool_source.policy().allowed(),
            "Restricting questions_url hosts"
        );
    }

    let engine = MatchEngine::new(Arc::new(embedder), Arc::new(oracle), config.match_settings());
    let state = HandlerState::new(engine, pool_source).with_stub_embedder(is_stub);

    let app = create_router_with_state(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Semdedup shutdown complete");
    Ok(())
}

fn run_health_check() -> i32 {
    let port = std::env::var("SEMDEDUP_PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let url = format!("http://127.0.0.1:{}/healthz", port);

    let Ok(rt) = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    else {
        return 1;
    };

    rt.block_on(async {
        let Ok(client) = reqwest::Client::builder()
            .timeout(Duration::from_secs(1))
            .build()
        else {
            return 1;
        };

        match client.get(&url).send().await {
            Ok(res) if res.status().is_success() => 0,
            _ => 1,
        }
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
