//! Source Valuation Service: binary entrypoint.
//! Boots the Axum HTTP server around the valuation engine.

use shuttle_axum::ShuttleAxum;
use tracing::warn;

use source_valuation::api::{create_router, AppState};
use source_valuation::cache::BatchCache;
use source_valuation::config::HotReloadConfig;
use source_valuation::metrics::Metrics;

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    // No-op unless VALUATION_DEV_LOG=1 in a dev environment.
    source_valuation::telemetry::init_dev_tracing();

    let config = HotReloadConfig::from_env().map_err(shuttle_runtime::Error::Custom)?;
    let mut state = AppState::new(config, BatchCache::default());

    match Metrics::init() {
        Ok(m) => state = state.with_prometheus(m.handle),
        Err(e) => warn!(error = %e, "prometheus recorder not installed"),
    }

    Ok(create_router(state).into())
}
