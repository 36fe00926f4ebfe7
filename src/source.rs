//! # Source records
//! Input and output shapes of the valuation engine.
//!
//! Field names on the wire are camelCase (`mentionRate`, `topPages`,
//! `valueScore`) to match the analytics API payloads the dashboard receives.

use serde::{Deserialize, Serialize};

use crate::error::InvalidSourceDataError;
use crate::quadrant::Quadrant;

/// One content/citation source as delivered by the analytics API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceData {
    /// Domain label or other identifier (e.g. "reddit.com").
    pub name: String,
    /// Free-form category; never interpreted by the engine.
    #[serde(rename = "type")]
    pub source_type: String,
    /// Percentage in [0, 100].
    pub mention_rate: f64,
    /// Share of answers, percentage in [0, 100].
    pub soa: f64,
    /// Non-negative, dataset-relative magnitude.
    pub sentiment: f64,
    pub citations: u64,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub top_pages: Vec<String>,
}

impl SourceData {
    /// Check field ranges. `index` is the record's position in its batch and
    /// is only used for error reporting.
    pub fn validate(&self, index: usize) -> Result<(), InvalidSourceDataError> {
        let reject = |field: &'static str, value: f64, reason: &'static str| {
            Err(InvalidSourceDataError {
                index,
                name: self.name.clone(),
                field,
                value,
                reason,
            })
        };

        for (field, value) in [
            ("mentionRate", self.mention_rate),
            ("soa", self.soa),
            ("sentiment", self.sentiment),
        ] {
            if !value.is_finite() {
                return reject(field, value, "must be a finite number");
            }
        }
        if !(0.0..=100.0).contains(&self.mention_rate) {
            return reject("mentionRate", self.mention_rate, "must be within [0, 100]");
        }
        if !(0.0..=100.0).contains(&self.soa) {
            return reject("soa", self.soa, "must be within [0, 100]");
        }
        if self.sentiment < 0.0 {
            return reject("sentiment", self.sentiment, "must be non-negative");
        }
        Ok(())
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

/// A source after valuation: the input fields (minus `topics`) plus the
/// composite value score and its quadrant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedSource {
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub mention_rate: f64,
    pub soa: f64,
    pub sentiment: f64,
    pub citations: u64,
    pub top_pages: Vec<String>,
    pub value_score: f64,
    pub quadrant: Quadrant,
}

impl EnhancedSource {
    pub fn from_source(src: &SourceData, value_score: f64, quadrant: Quadrant) -> Self {
        Self {
            name: src.name.clone(),
            source_type: src.source_type.clone(),
            mention_rate: src.mention_rate,
            soa: src.soa,
            sentiment: src.sentiment,
            citations: src.citations,
            top_pages: src.top_pages.clone(),
            value_score,
            quadrant,
        }
    }
}
