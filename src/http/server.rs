//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all six routes
//! - Wire the admission gate in front of every handler
//! - Wire cross-cutting middleware (timeout, tracing)
//! - Serve with graceful shutdown
//! - Serialize query results as JSON arrays

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::analytics::{
    DailyEventsRow, DailyStatsRow, HourlyEventsRow, HourlyStatsRow, PoiRow, QueryService,
};
use crate::config::GatewayConfig;
use crate::error::Result;
use crate::observability::metrics;
use crate::security::clock::Clock;
use crate::security::rate_limit::{rate_limit_middleware, RateLimiter};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub queries: Arc<dyn QueryService>,
    pub limiter: Arc<RateLimiter>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// The clock is injected so tests can drive window rollover without
    /// waiting wall-clock time.
    pub fn new(
        config: &GatewayConfig,
        queries: Arc<dyn QueryService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit, clock));

        let state = AppState {
            queries,
            limiter: limiter.clone(),
        };

        let router = Self::build_router(config, state, limiter);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// The gate is the innermost layer, so it runs after tracing and
    /// timeout but before any handler, on every route.
    fn build_router(config: &GatewayConfig, state: AppState, limiter: Arc<RateLimiter>) -> Router {
        Router::new()
            .route("/", get(index))
            .route("/events/hourly", get(events_hourly))
            .route("/events/daily", get(events_daily))
            .route("/stats/hourly", get(stats_hourly))
            .route("/stats/daily", get(stats_daily))
            .route("/poi", get(poi))
            .with_state(state)
            .layer(middleware::from_fn_with_state(limiter, rate_limit_middleware))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> std::io::Result<()> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Diagnostic index: exposes the live window state of the limiter.
///
/// Gated like every other route, so the count it reports includes the
/// request that fetched it.
async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();
    let snapshot = state.limiter.snapshot();

    metrics::record_request("/", StatusCode::OK.as_u16(), start);

    format!(
        "analytics gateway up - {} request(s) this window, {:.1?} since window start",
        snapshot.count, snapshot.elapsed
    )
}

async fn events_hourly(State(state): State<AppState>) -> Result<Json<Vec<HourlyEventsRow>>> {
    run_query("/events/hourly", state.queries.events_hourly()).await
}

async fn events_daily(State(state): State<AppState>) -> Result<Json<Vec<DailyEventsRow>>> {
    run_query("/events/daily", state.queries.events_daily()).await
}

async fn stats_hourly(State(state): State<AppState>) -> Result<Json<Vec<HourlyStatsRow>>> {
    run_query("/stats/hourly", state.queries.stats_hourly()).await
}

async fn stats_daily(State(state): State<AppState>) -> Result<Json<Vec<DailyStatsRow>>> {
    run_query("/stats/daily", state.queries.stats_daily()).await
}

async fn poi(State(state): State<AppState>) -> Result<Json<Vec<PoiRow>>> {
    run_query("/poi", state.queries.poi()).await
}

/// Run one fixed query and serialize its rows, recording the outcome.
async fn run_query<T, F>(route: &'static str, query: F) -> Result<Json<Vec<T>>>
where
    T: Serialize,
    F: Future<Output = Result<Vec<T>>>,
{
    let start = Instant::now();

    match query.await {
        Ok(rows) => {
            metrics::record_request(route, StatusCode::OK.as_u16(), start);
            Ok(Json(rows))
        }
        Err(err) => {
            metrics::record_request(route, err.status().as_u16(), start);
            Err(err)
        }
    }
}
