use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::{debug, warn};

use crate::cache::BatchCache;
use crate::config::{EngineConfig, HotReloadConfig};
use crate::error::InvalidSourceDataError;
use crate::source::{EnhancedSource, SourceData};
use crate::summary::{rank_by_value, QuadrantSummary};

#[derive(Clone)]
pub struct AppState {
    config: Arc<HotReloadConfig>,
    cache: Arc<BatchCache>,
    prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(config: HotReloadConfig, cache: BatchCache) -> Self {
        Self {
            config: Arc::new(config),
            cache: Arc::new(cache),
            prometheus: None,
        }
    }

    /// Built-in engine config, default-sized cache, no metrics.
    pub fn with_defaults() -> Self {
        Self::new(HotReloadConfig::new(None), BatchCache::default())
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/config", get(current_config))
        .route("/sources/enhance", post(enhance))
        .route("/sources/summary", post(summary))
        .route("/metrics", get(render_metrics))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// 422 body for a rejected batch.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    index: usize,
    name: String,
    field: &'static str,
}

pub struct ApiError(InvalidSourceDataError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let e = self.0;
        let body = ErrorBody {
            error: e.to_string(),
            index: e.index,
            name: e.name,
            field: e.field,
        };
        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}

fn score_batch(state: &AppState, items: &[SourceData]) -> Result<Vec<EnhancedSource>, ApiError> {
    let cfg = state.config.current();
    let started = Instant::now();
    match state.cache.get_or_compute(items, &cfg) {
        Ok(cached) => {
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            crate::metrics::record_batch(&cached.sources, elapsed_ms, cached.hit);
            debug!(target: "api", n = items.len(), hit = cached.hit, elapsed_ms, "batch scored");
            Ok(cached.sources.as_ref().clone())
        }
        Err(e) => {
            crate::metrics::record_rejected();
            warn!(target: "api", index = e.index, field = e.field, "batch rejected");
            Err(ApiError(e))
        }
    }
}

async fn enhance(
    State(state): State<AppState>,
    Json(items): Json<Vec<SourceData>>,
) -> Result<Json<Vec<EnhancedSource>>, ApiError> {
    score_batch(&state, &items).map(Json)
}

#[derive(Serialize)]
struct SummaryResp {
    sources: Vec<EnhancedSource>,
    summary: QuadrantSummary,
}

async fn summary(
    State(state): State<AppState>,
    Json(items): Json<Vec<SourceData>>,
) -> Result<Json<SummaryResp>, ApiError> {
    let scored = score_batch(&state, &items)?;
    let summary = QuadrantSummary::from_sources(&scored);
    let sources = rank_by_value(&scored).into_iter().cloned().collect();
    Ok(Json(SummaryResp { sources, summary }))
}

async fn current_config(State(state): State<AppState>) -> Json<EngineConfig> {
    Json(state.config.current())
}

async fn render_metrics(State(state): State<AppState>) -> Response {
    match state.prometheus.as_ref() {
        Some(h) => h.render().into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}
