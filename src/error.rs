//! Error types for the valuation engine and its configuration layer.

use thiserror::Error;

/// A record in the input batch that the engine refuses to score.
///
/// Carries the offending record's position and name so the caller can point
/// at the exact row of the upstream payload.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid source data at index {index} ({name}): {field} = {value} ({reason})")]
pub struct InvalidSourceDataError {
    pub index: usize,
    pub name: String,
    pub field: &'static str,
    pub value: f64,
    pub reason: &'static str,
}

/// Problems with a loaded `EngineConfig`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("weight `{name}` must be finite and non-negative, got {value}")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("{set} weights must sum to 1.0, got {sum}")]
    WeightSum { set: &'static str, sum: f64 },

    #[error("top quartile percentile must be within [0, 100], got {0}")]
    Percentile(f64),
}
