// src/lib.rs
// Public library surface for integration tests and the service binary.

pub mod error;
pub mod source;
pub mod stats;
pub mod normalize;
pub mod weights;
pub mod valuation;
pub mod quadrant;
pub mod config;
pub mod engine;

// Outer surface: dashboard aggregates, memoization, HTTP
pub mod summary;
pub mod cache;
pub mod api;
pub mod metrics;
pub mod telemetry;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::config::EngineConfig;
pub use crate::engine::{compute_enhanced_sources, compute_enhanced_sources_with, DatasetProfile};
pub use crate::error::{ConfigError, InvalidSourceDataError};
pub use crate::normalize::normalize_domain;
pub use crate::quadrant::{classify_quadrant, Quadrant, Thresholds};
pub use crate::source::{EnhancedSource, SourceData};
pub use crate::stats::{median, percentile};
pub use crate::valuation::value_score_for_source;
