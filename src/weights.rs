//! Weight sets for the two composite scores.
//!
//! The value score (ranking) and the classifier composite (bucketing) use
//! separate weightings. They are kept as distinct types so neither can be
//! tuned by accident through the other.
//!
//! JSON/TOML shape (all keys optional, missing keys take the defaults):
//! ```text
//! [value_weights]
//! mention = 0.30
//! soa = 0.30
//! sentiment = 0.20
//! citations = 0.10
//! topics = 0.10
//!
//! [composite_weights]
//! mention = 0.35
//! soa = 0.35
//! sentiment = 0.20
//! citations = 0.10
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const SUM_TOLERANCE: f64 = 1e-6;

/// Weights of the 0–100 value score.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueWeights {
    pub mention: f64,
    pub soa: f64,
    pub sentiment: f64,
    pub citations: f64,
    pub topics: f64,
}

impl Default for ValueWeights {
    fn default() -> Self {
        Self {
            mention: 0.30,
            soa: 0.30,
            sentiment: 0.20,
            citations: 0.10,
            topics: 0.10,
        }
    }
}

impl ValueWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_set(
            "value",
            &[
                ("value.mention", self.mention),
                ("value.soa", self.soa),
                ("value.sentiment", self.sentiment),
                ("value.citations", self.citations),
                ("value.topics", self.topics),
            ],
        )
    }
}

/// Weights of the 0–1 classifier composite. Topics are not part of it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeWeights {
    pub mention: f64,
    pub soa: f64,
    pub sentiment: f64,
    pub citations: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            mention: 0.35,
            soa: 0.35,
            sentiment: 0.20,
            citations: 0.10,
        }
    }
}

impl CompositeWeights {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_set(
            "composite",
            &[
                ("composite.mention", self.mention),
                ("composite.soa", self.soa),
                ("composite.sentiment", self.sentiment),
                ("composite.citations", self.citations),
            ],
        )
    }
}

fn check_set(set: &'static str, weights: &[(&'static str, f64)]) -> Result<(), ConfigError> {
    for &(name, value) in weights {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::InvalidWeight { name, value });
        }
    }
    let sum: f64 = weights.iter().map(|(_, w)| w).sum();
    if (sum - 1.0).abs() > SUM_TOLERANCE {
        return Err(ConfigError::WeightSum { set, sum });
    }
    Ok(())
}
