//! # Valuation Engine
//! Pure, testable pipeline that maps a batch of `SourceData` → `EnhancedSource`.
//! No I/O and no state across calls: same batch in, bit-identical batch out.
//!
//! Batch statistics (maxima, medians, composite quartile) are hoisted into one
//! pass before any source is scored, so the per-source step never sorts.

use tracing::debug;

use crate::config::EngineConfig;
use crate::error::InvalidSourceDataError;
use crate::normalize::{citations_fraction, sentiment_fraction, DatasetMaxima};
use crate::quadrant::{classify_quadrant_with_weights, composite_score_with_weights, Thresholds};
use crate::source::{EnhancedSource, SourceData};
use crate::stats::{median, percentile};
use crate::valuation::value_score_with_weights;

/// Everything the per-source step needs to know about its batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetProfile {
    pub maxima: DatasetMaxima,
    pub thresholds: Thresholds,
}

impl DatasetProfile {
    pub fn from_sources(sources: &[SourceData], cfg: &EngineConfig) -> Self {
        let maxima = DatasetMaxima::from_sources(sources);

        let mentions: Vec<f64> = sources.iter().map(|s| s.mention_rate).collect();
        let soas: Vec<f64> = sources.iter().map(|s| s.soa).collect();
        let sentiments: Vec<f64> = sources
            .iter()
            .map(|s| sentiment_fraction(s.sentiment, maxima.sentiment))
            .collect();
        let citations: Vec<f64> = sources
            .iter()
            .map(|s| citations_fraction(s.citations as f64, maxima.citations))
            .collect();
        let composites: Vec<f64> = sources
            .iter()
            .map(|s| {
                composite_score_with_weights(
                    s.mention_rate,
                    s.soa,
                    s.sentiment,
                    s.citations as f64,
                    maxima.citations,
                    maxima.sentiment,
                    &cfg.composite_weights,
                )
            })
            .collect();

        let thresholds = Thresholds {
            mention_median: median(&mentions),
            soa_median: median(&soas),
            sentiment_median: median(&sentiments),
            citations_median: median(&citations),
            composite_median: median(&composites),
            composite_top_quartile: percentile(&composites, cfg.top_quartile_percentile),
        };

        Self { maxima, thresholds }
    }
}

/// Score and classify a batch with the default weights.
pub fn compute_enhanced_sources(
    sources: &[SourceData],
) -> Result<Vec<EnhancedSource>, InvalidSourceDataError> {
    compute_enhanced_sources_with(sources, &EngineConfig::default())
}

/// Score and classify a batch with explicit configuration.
///
/// Every record is validated before any statistics are computed; the first
/// offending record aborts the batch. Empty input yields an empty output.
pub fn compute_enhanced_sources_with(
    sources: &[SourceData],
    cfg: &EngineConfig,
) -> Result<Vec<EnhancedSource>, InvalidSourceDataError> {
    for (i, s) in sources.iter().enumerate() {
        s.validate(i)?;
    }
    if sources.is_empty() {
        return Ok(Vec::new());
    }

    let profile = DatasetProfile::from_sources(sources, cfg);
    debug!(
        target: "engine",
        n = sources.len(),
        max_citations = profile.maxima.citations,
        max_topics = profile.maxima.topics,
        max_sentiment = profile.maxima.sentiment,
        composite_median = profile.thresholds.composite_median,
        composite_top_quartile = profile.thresholds.composite_top_quartile,
        "batch profile"
    );

    Ok(sources
        .iter()
        .map(|s| enhance_one(s, &profile, cfg))
        .collect())
}

fn enhance_one(s: &SourceData, profile: &DatasetProfile, cfg: &EngineConfig) -> EnhancedSource {
    let value_score = value_score_with_weights(s, &profile.maxima, &cfg.value_weights);
    let quadrant = classify_quadrant_with_weights(
        s.mention_rate,
        s.soa,
        s.sentiment,
        s.citations as f64,
        &profile.thresholds,
        profile.maxima.citations,
        profile.maxima.sentiment,
        &cfg.composite_weights,
    );
    EnhancedSource::from_source(s, value_score, quadrant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quadrant::Quadrant;

    fn mk(name: &str, mention: f64, soa: f64, sentiment: f64, citations: u64, topics: &[&str]) -> SourceData {
        SourceData {
            name: name.to_string(),
            source_type: "Web".to_string(),
            mention_rate: mention,
            soa,
            sentiment,
            citations,
            topics: topics.iter().map(|t| t.to_string()).collect(),
            top_pages: vec![format!("https://{name}/")],
        }
    }

    #[test]
    fn empty_batch_is_empty() {
        assert!(compute_enhanced_sources(&[]).unwrap().is_empty());
    }

    #[test]
    fn two_source_batch_splits_priority_and_monitor() {
        let batch = vec![
            mk("a.com", 80.0, 70.0, 50.0, 40, &["t1", "t2"]),
            mk("b.com", 20.0, 15.0, 10.0, 5, &["t1"]),
        ];
        let out = compute_enhanced_sources(&batch).unwrap();

        assert_eq!(out.len(), 2);
        assert_eq!(out[0].name, "a.com");
        assert_eq!(out[1].name, "b.com");
        assert!((out[0].value_score - 85.0).abs() < 1e-9, "a: {}", out[0].value_score);
        assert!((out[1].value_score - 20.75).abs() < 1e-9, "b: {}", out[1].value_score);
        assert!(out[0].value_score > out[1].value_score);
        assert_eq!(out[0].quadrant, Quadrant::Priority);
        assert_eq!(out[1].quadrant, Quadrant::Monitor);
    }

    #[test]
    fn profile_holds_batch_statistics() {
        let batch = vec![
            mk("a.com", 80.0, 70.0, 50.0, 40, &["t1", "t2"]),
            mk("b.com", 20.0, 15.0, 10.0, 5, &["t1"]),
        ];
        let p = DatasetProfile::from_sources(&batch, &EngineConfig::default());
        assert_eq!(p.maxima.citations, 40.0);
        assert_eq!(p.maxima.topics, 2.0);
        assert_eq!(p.maxima.sentiment, 50.0);
        assert_eq!(p.thresholds.mention_median, 50.0);
        assert_eq!(p.thresholds.soa_median, 42.5);
        assert!((p.thresholds.sentiment_median - 0.6).abs() < 1e-12);
        assert!((p.thresholds.citations_median - 0.5625).abs() < 1e-12);
        assert!((p.thresholds.composite_median - 0.5).abs() < 1e-9);
        assert!((p.thresholds.composite_top_quartile - 0.825).abs() < 1e-9);
    }

    #[test]
    fn single_source_is_priority() {
        let out = compute_enhanced_sources(&[mk("solo.io", 12.0, 3.0, 0.4, 2, &[])]).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].quadrant, Quadrant::Priority);
    }

    #[test]
    fn all_zero_batch_does_not_divide_by_zero() {
        let batch = vec![mk("z1", 0.0, 0.0, 0.0, 0, &[]), mk("z2", 0.0, 0.0, 0.0, 0, &[])];
        let out = compute_enhanced_sources(&batch).unwrap();
        for e in &out {
            assert_eq!(e.value_score, 0.0);
            assert!(e.value_score.is_finite());
        }
    }

    #[test]
    fn invalid_record_aborts_batch() {
        let batch = vec![
            mk("ok.com", 10.0, 10.0, 1.0, 1, &[]),
            mk("bad.com", 140.0, 10.0, 1.0, 1, &[]),
        ];
        let err = compute_enhanced_sources(&batch).unwrap_err();
        assert_eq!(err.index, 1);
        assert_eq!(err.name, "bad.com");
        assert_eq!(err.field, "mentionRate");
    }

    #[test]
    fn passthrough_fields_survive() {
        let batch = vec![mk("keep.me", 10.0, 20.0, 3.0, 4, &["x"])];
        let out = compute_enhanced_sources(&batch).unwrap();
        assert_eq!(out[0].source_type, "Web");
        assert_eq!(out[0].top_pages, vec!["https://keep.me/".to_string()]);
        assert_eq!(out[0].citations, 4);
        assert_eq!(out[0].sentiment, 3.0);
    }
}
