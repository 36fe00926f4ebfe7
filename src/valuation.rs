//! Value score: the single ranking number shown next to each source.
//!
//! ```text
//! value = mention*w_mention + soa*w_soa
//!       + sentimentPct*w_sentiment + citationsPct*w_citations + topicsPct*w_topics
//! ```
//! `mention` and `soa` are already percentages; the other three are scaled to
//! 0–100 against the batch maxima. The sum is not clamped.

use crate::normalize::DatasetMaxima;
use crate::source::SourceData;
use crate::weights::ValueWeights;

/// Value score with the default weights (0.30/0.30/0.20/0.10/0.10).
pub fn value_score_for_source(
    source: &SourceData,
    max_citations: f64,
    max_topics: f64,
    max_sentiment: f64,
) -> f64 {
    value_score_with_weights(
        source,
        &DatasetMaxima {
            citations: max_citations,
            topics: max_topics,
            sentiment: max_sentiment,
        },
        &ValueWeights::default(),
    )
}

/// Value score against explicit batch maxima and weights.
pub fn value_score_with_weights(source: &SourceData, max: &DatasetMaxima, w: &ValueWeights) -> f64 {
    let sentiment_pct = if max.sentiment > 0.0 {
        (source.sentiment / max.sentiment * 100.0).min(100.0)
    } else {
        0.0
    };
    let citations_pct = if max.citations > 0.0 {
        source.citations as f64 / max.citations * 100.0
    } else {
        0.0
    };
    let topics_pct = if max.topics > 0.0 {
        source.topic_count() as f64 / max.topics * 100.0
    } else {
        0.0
    };

    source.mention_rate * w.mention
        + source.soa * w.soa
        + sentiment_pct * w.sentiment
        + citations_pct * w.citations
        + topics_pct * w.topics
}
