//! Prometheus counters for scored batches. Recording is a no-op until
//! `Metrics::init` installs the global recorder.

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

use crate::quadrant::Quadrant;
use crate::source::EnhancedSource;

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the global Prometheus recorder. Fails if a recorder is already installed.
    pub fn init() -> anyhow::Result<Self> {
        let handle = PrometheusBuilder::new().install_recorder()?;
        ensure_described();
        Ok(Self { handle })
    }
}

/// One-time metrics registration (so series show up on /metrics).
fn ensure_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("valuation_batches_total", "Batches scored by the engine.");
        describe_counter!("valuation_sources_total", "Sources scored across all batches.");
        describe_counter!("valuation_rejected_total", "Batches rejected by input validation.");
        describe_counter!("valuation_quadrant_total", "Sources classified per quadrant.");
        describe_counter!("valuation_cache_hits_total", "Batches served from the memo cache.");
        describe_histogram!("valuation_batch_ms", "Time to score one batch in milliseconds.");
    });
}

pub fn record_batch(sources: &[EnhancedSource], elapsed_ms: f64, cache_hit: bool) {
    counter!("valuation_batches_total").increment(1);
    counter!("valuation_sources_total").increment(sources.len() as u64);
    if cache_hit {
        counter!("valuation_cache_hits_total").increment(1);
    }
    for q in Quadrant::ALL {
        let n = sources.iter().filter(|s| s.quadrant == q).count() as u64;
        if n > 0 {
            counter!("valuation_quadrant_total", "quadrant" => q.as_str()).increment(n);
        }
    }
    histogram!("valuation_batch_ms").record(elapsed_ms);
}

pub fn record_rejected() {
    counter!("valuation_rejected_total").increment(1);
}
