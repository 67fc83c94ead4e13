use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use http::StatusCode;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use crate::agent::AgentFetcher;
use crate::config::settings::SettingsConfig;
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::search::fetcher::SearchQuery;
use crate::utils::constants::RESTAURANTS_PATH;

#[derive(Clone)]
pub struct AppState {
    pub metrics_state: MetricsState,
    pub fetcher: Arc<AgentFetcher>,
}

impl AppState {
    pub fn new(metrics: &Metrics, fetcher: Arc<AgentFetcher>) -> Self {
        Self {
            metrics_state: MetricsState::new(metrics.registry.clone()),
            fetcher,
        }
    }
}

pub fn router(settings_config: &SettingsConfig, state: AppState) -> Router {
    Router::new()
        .route(RESTAURANTS_PATH, get(list_restaurants))
        .merge(state.metrics_state.router(&settings_config.metrics))
        .with_state(state)
}

/// Serve the search and metrics routes on `settings.server`.
pub async fn start(settings_config: &SettingsConfig, fetcher: Arc<AgentFetcher>) -> Result<()> {
    let server = settings_config
        .server
        .as_ref()
        .context("settings.server is required to serve")?;
    let metrics = get_metrics().await;
    let app = router(settings_config, AppState::new(metrics, fetcher));

    let bind_addr = format!("{}:{}", server.host, server.port);
    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("cannot bind '{}'", bind_addr))?;
    info!("serving on {}", bind_addr);
    metrics.up.set(1);
    serve_until(listener, app, shutdown_signal()).await?;
    metrics.up.set(0);
    Ok(())
}

/// Serve `app` until `shutdown` resolves, then drain in-flight requests.
pub async fn serve_until<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("server failed")?;
    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!("cannot listen for SIGINT: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                error!("cannot listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT (Ctrl+C). Initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM. Initiating graceful shutdown..."),
    }
}

async fn list_restaurants(State(state): State<AppState>, Query(query): Query<SearchQuery>) -> Response {
    match state.fetcher.fetch(&query).await {
        Ok(restaurants) => Json(restaurants).into_response(),
        Err(err) => {
            warn!("search request failed: {}", err);
            (StatusCode::BAD_GATEWAY, err.to_string()).into_response()
        }
    }
}
