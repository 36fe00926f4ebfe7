//! Dashboard aggregates over an already-classified batch: ranking for the
//! sources table and per-quadrant totals for the scatter-plot legend.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::quadrant::Quadrant;
use crate::source::EnhancedSource;

/// Sources ordered by value score, highest first. Ties keep input order.
pub fn rank_by_value(sources: &[EnhancedSource]) -> Vec<&EnhancedSource> {
    let mut ranked: Vec<&EnhancedSource> = sources.iter().collect();
    ranked.sort_by(|a, b| b.value_score.total_cmp(&a.value_score));
    ranked
}

/// The `n` highest-value sources of one quadrant.
pub fn top_in_quadrant(sources: &[EnhancedSource], quadrant: Quadrant, n: usize) -> Vec<&EnhancedSource> {
    rank_by_value(sources)
        .into_iter()
        .filter(|s| s.quadrant == quadrant)
        .take(n)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct QuadrantStats {
    pub count: usize,
    /// Mean value score of the quadrant's members; 0 when empty.
    pub avg_value_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuadrantSummary {
    pub total: usize,
    pub quadrants: BTreeMap<Quadrant, QuadrantStats>,
}

impl QuadrantSummary {
    /// Every quadrant is present in the result, even with zero members.
    pub fn from_sources(sources: &[EnhancedSource]) -> Self {
        let mut sums: BTreeMap<Quadrant, (usize, f64)> =
            Quadrant::ALL.into_iter().map(|q| (q, (0, 0.0))).collect();
        for s in sources {
            let e = sums.entry(s.quadrant).or_insert((0, 0.0));
            e.0 += 1;
            e.1 += s.value_score;
        }

        let quadrants = sums
            .into_iter()
            .map(|(q, (count, sum))| {
                let avg = if count > 0 { sum / count as f64 } else { 0.0 };
                (
                    q,
                    QuadrantStats {
                        count,
                        avg_value_score: avg,
                    },
                )
            })
            .collect();

        Self {
            total: sources.len(),
            quadrants,
        }
    }

    pub fn count(&self, q: Quadrant) -> usize {
        self.quadrants.get(&q).map(|s| s.count).unwrap_or(0)
    }
}
