//! HTTP REST API for Quero FIAGROs.
//!
//! Every data endpoint is a thin wrapper around one `fiagro_core` operation.
//! Core errors map onto status codes through [`ApiError`].

use crate::config::ServerConfig;
use crate::openapi;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use fiagro_core::fetcher::{parse_site_url, LIST_TIMEOUT};
use fiagro_core::{
    build_catalogue, parse_ticker_list, DetailFetcher, FiagroError, FundRecord, HttpClient,
    ListCache, ListFetcher, RegistryClient,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
pub struct AppState {
    pub lists: ListFetcher,
    pub details: DetailFetcher,
    pub registry: RegistryClient,
    started_at: Instant,
}

impl AppState {
    pub fn new(lists: ListFetcher, details: DetailFetcher, registry: RegistryClient) -> Self {
        Self {
            lists,
            details,
            registry,
            started_at: Instant::now(),
        }
    }

    /// Wire the fetchers against the configured upstreams. All three share
    /// one connection pool.
    pub fn from_config(config: &ServerConfig) -> fiagro_core::Result<Self> {
        let http = HttpClient::new(LIST_TIMEOUT)?;
        let site_url = parse_site_url(&config.site_url)?;
        let cache = Arc::new(ListCache::new(config.cache_ttl));

        Ok(Self::new(
            ListFetcher::new(http.clone(), site_url.clone(), cache),
            DetailFetcher::new(http.clone(), site_url),
            RegistryClient::new(http, config.registry_url.clone()),
        ))
    }

    pub fn uptime_seconds(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}

// ── Errors ──────────────────────────────────────────────────

/// A core error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub FiagroError);

impl From<FiagroError> for ApiError {
    fn from(err: FiagroError) -> Self {
        ApiError(err)
    }
}

/// HTTP status for a core error.
pub fn status_for(err: &FiagroError) -> StatusCode {
    match err {
        FiagroError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        FiagroError::FundNotFound(_) => StatusCode::NOT_FOUND,
        FiagroError::UpstreamMalformed(_) => StatusCode::BAD_GATEWAY,
        FiagroError::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if self.0.is_client_error() {
            tracing::debug!("{status}: {}", self.0);
        } else {
            tracing::warn!("{status}: {}", self.0);
        }

        let body = json!({
            "error": {
                "code": self.0.code(),
                "message": self.0.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}

// ── Router ──────────────────────────────────────────────────

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/ping", get(handle_ping))
        .route("/api/openapi", get(handle_openapi))
        .route("/api/registry", get(handle_registry))
        .route("/api/funds", get(handle_funds))
        .route("/api/fund", get(handle_fund))
        .route("/api/catalogue", get(handle_catalogue))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the REST API on `addr` until the process is stopped.
pub async fn start(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("REST API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
struct FundsQuery {
    tickers: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FundQuery {
    ticker: Option<String>,
}

async fn handle_ping(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "pong": {
            "status": "ok",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "uptimeSeconds": state.uptime_seconds(),
        }
    }))
}

async fn handle_openapi() -> Json<Value> {
    Json(openapi::document())
}

async fn handle_registry(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    let listing = state.registry.fetch().await?;
    Ok(Json(listing.raw))
}

async fn handle_funds(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FundsQuery>,
) -> Result<Json<Vec<FundRecord>>, ApiError> {
    let tickers = parse_ticker_list(query.tickers.as_deref().unwrap_or_default());
    if tickers.is_empty() {
        return Err(FiagroError::InvalidInput("tickers parameter required".to_string()).into());
    }

    let records = state.lists.fetch_by_tickers(&tickers).await?;
    Ok(Json(records))
}

async fn handle_fund(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FundQuery>,
) -> Result<Json<FundRecord>, ApiError> {
    let ticker = query.ticker.as_deref().map(str::trim).unwrap_or_default();
    if ticker.is_empty() {
        return Err(FiagroError::InvalidInput("ticker parameter required".to_string()).into());
    }

    let record = state.details.fetch(ticker).await?;
    Ok(Json(record))
}

async fn handle_catalogue(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FundRecord>>, ApiError> {
    let records = build_catalogue(&state.registry, &state.lists).await?;
    Ok(Json(records))
}
