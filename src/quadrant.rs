//! # Quadrant classification
//! Buckets a source into one of four strategic quadrants by comparing its
//! metrics against batch-level medians and the composite top quartile.
//!
//! Policy (first match wins):
//! 1. `priority`   visible, strong share of answers, composite in top quartile
//! 2. `reputation` visible, but weak sentiment or weak citations
//! 3. `growth`     not visible, positive sentiment or strong citations, healthy composite
//! 4. `monitor`    everything else

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::normalize::{citations_fraction, sentiment_fraction};
use crate::weights::CompositeWeights;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quadrant {
    Priority,
    Reputation,
    Growth,
    Monitor,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::Priority,
        Quadrant::Reputation,
        Quadrant::Growth,
        Quadrant::Monitor,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Quadrant::Priority => "priority",
            Quadrant::Reputation => "reputation",
            Quadrant::Growth => "growth",
            Quadrant::Monitor => "monitor",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quadrant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Quadrant::ALL
            .into_iter()
            .find(|q| q.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown quadrant: {s}"))
    }
}

/// Batch statistics the classifier compares against.
///
/// `mention_median` and `soa_median` are on the raw 0–100 scale; the other
/// four are on the fractional 0–1 scale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Thresholds {
    pub mention_median: f64,
    pub soa_median: f64,
    pub sentiment_median: f64,
    pub citations_median: f64,
    pub composite_median: f64,
    pub composite_top_quartile: f64,
}

/// Classifier composite with the default weights (0.35/0.35/0.20/0.10).
pub fn composite_score(
    mention: f64,
    soa: f64,
    sentiment: f64,
    citations: f64,
    max_citations: f64,
    max_sentiment: f64,
) -> f64 {
    composite_score_with_weights(
        mention,
        soa,
        sentiment,
        citations,
        max_citations,
        max_sentiment,
        &CompositeWeights::default(),
    )
}

pub fn composite_score_with_weights(
    mention: f64,
    soa: f64,
    sentiment: f64,
    citations: f64,
    max_citations: f64,
    max_sentiment: f64,
    w: &CompositeWeights,
) -> f64 {
    let mention_norm = mention / 100.0;
    let soa_norm = soa / 100.0;
    let sentiment_norm = sentiment_fraction(sentiment, max_sentiment);
    let citations_norm = citations_fraction(citations, max_citations);

    mention_norm * w.mention
        + soa_norm * w.soa
        + sentiment_norm * w.sentiment
        + citations_norm * w.citations
}

/// Classify with the default composite weights.
pub fn classify_quadrant(
    mention: f64,
    soa: f64,
    sentiment: f64,
    citations: f64,
    thresholds: &Thresholds,
    max_citations: f64,
    max_sentiment: f64,
) -> Quadrant {
    classify_quadrant_with_weights(
        mention,
        soa,
        sentiment,
        citations,
        thresholds,
        max_citations,
        max_sentiment,
        &CompositeWeights::default(),
    )
}

#[allow(clippy::too_many_arguments)]
pub fn classify_quadrant_with_weights(
    mention: f64,
    soa: f64,
    sentiment: f64,
    citations: f64,
    thresholds: &Thresholds,
    max_citations: f64,
    max_sentiment: f64,
    w: &CompositeWeights,
) -> Quadrant {
    let sentiment_norm = sentiment_fraction(sentiment, max_sentiment);
    let citations_norm = citations_fraction(citations, max_citations);
    let composite =
        composite_score_with_weights(mention, soa, sentiment, citations, max_citations, max_sentiment, w);

    let visibility_strong = mention >= thresholds.mention_median;
    let soa_strong = soa >= thresholds.soa_median;
    let sentiment_positive = sentiment_norm >= thresholds.sentiment_median;
    let citations_strong = citations_norm >= thresholds.citations_median;
    let composite_healthy = composite >= thresholds.composite_median;
    let composite_strong = composite >= thresholds.composite_top_quartile;

    if visibility_strong && soa_strong && composite_strong {
        Quadrant::Priority
    } else if visibility_strong && (!sentiment_positive || !citations_strong) {
        Quadrant::Reputation
    } else if !visibility_strong && (sentiment_positive || citations_strong) && composite_healthy {
        Quadrant::Growth
    } else {
        Quadrant::Monitor
    }
}
