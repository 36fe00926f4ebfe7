//! Caller-side memoization of the valuation engine.
//!
//! The engine is referentially transparent, so a batch can be keyed by the
//! SHA-256 of its canonical JSON (together with the config it was scored
//! under). Bounded FIFO; rejected batches are never stored.
//!
//! Memory is bounded by `capacity * max_entry_sources` records: batches
//! longer than `max_entry_sources` are scored but not stored.

use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use crate::config::EngineConfig;
use crate::engine::compute_enhanced_sources_with;
use crate::error::InvalidSourceDataError;
use crate::source::{EnhancedSource, SourceData};

pub const DEFAULT_CACHE_CAPACITY: usize = 256;
pub const DEFAULT_MAX_ENTRY_SOURCES: usize = 2_000;

#[derive(Debug, Clone)]
pub struct Cached {
    pub sources: Arc<Vec<EnhancedSource>>,
    pub hit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug)]
pub struct BatchCache {
    cap: usize,
    max_entry_sources: usize,
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    map: HashMap<String, Arc<Vec<EnhancedSource>>>,
    order: VecDeque<String>,
    hits: u64,
    misses: u64,
}

impl BatchCache {
    pub fn with_capacity(cap: usize) -> Self {
        Self::with_limits(cap, DEFAULT_MAX_ENTRY_SOURCES)
    }

    pub fn with_limits(cap: usize, max_entry_sources: usize) -> Self {
        Self {
            cap: cap.max(1),
            max_entry_sources,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Return the cached result for this batch, computing it on a miss.
    pub fn get_or_compute(
        &self,
        sources: &[SourceData],
        cfg: &EngineConfig,
    ) -> Result<Cached, InvalidSourceDataError> {
        let key = if sources.len() <= self.max_entry_sources {
            batch_key(sources, cfg)
        } else {
            None
        };
        let Some(key) = key else {
            // Oversized or unkeyable batch: score it without touching the cache.
            return Ok(Cached {
                sources: Arc::new(compute_enhanced_sources_with(sources, cfg)?),
                hit: false,
            });
        };

        {
            let mut g = self.lock();
            if let Some(found) = g.map.get(&key).cloned() {
                g.hits += 1;
                return Ok(Cached {
                    sources: found,
                    hit: true,
                });
            }
            g.misses += 1;
        }

        // Compute outside the lock; a concurrent miss on the same key just
        // stores an identical value.
        let fresh = Arc::new(compute_enhanced_sources_with(sources, cfg)?);

        let mut g = self.lock();
        if !g.map.contains_key(&key) {
            g.order.push_back(key.clone());
            g.map.insert(key, Arc::clone(&fresh));
            while g.order.len() > self.cap {
                if let Some(old) = g.order.pop_front() {
                    g.map.remove(&old);
                }
            }
        }
        Ok(Cached {
            sources: fresh,
            hit: false,
        })
    }

    pub fn stats(&self) -> CacheStats {
        let g = self.lock();
        CacheStats {
            hits: g.hits,
            misses: g.misses,
            entries: g.map.len(),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for BatchCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

/// Hex SHA-256 of the batch and config as JSON.
pub fn batch_key(sources: &[SourceData], cfg: &EngineConfig) -> Option<String> {
    let bytes = serde_json::to_vec(&(sources, cfg)).ok()?;
    let digest = Sha256::digest(&bytes);
    let mut out = String::with_capacity(64);
    for b in digest.iter() {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk(name: &str, mention: f64) -> SourceData {
        SourceData {
            name: name.into(),
            source_type: "Web".into(),
            mention_rate: mention,
            soa: 10.0,
            sentiment: 1.0,
            citations: 3,
            topics: vec!["t".into()],
            top_pages: Vec::new(),
        }
    }

    #[test]
    fn key_depends_on_batch_and_config() {
        let cfg = EngineConfig::default();
        let a = batch_key(&[mk("a", 1.0)], &cfg).unwrap();
        let a2 = batch_key(&[mk("a", 1.0)], &cfg).unwrap();
        let b = batch_key(&[mk("a", 2.0)], &cfg).unwrap();
        let other_cfg = EngineConfig {
            top_quartile_percentile: 90.0,
            ..cfg
        };
        let c = batch_key(&[mk("a", 1.0)], &other_cfg).unwrap();
        assert_eq!(a, a2);
        assert_eq!(a.len(), 64);
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn second_lookup_hits() {
        let cache = BatchCache::with_capacity(4);
        let cfg = EngineConfig::default();
        let batch = vec![mk("a", 10.0), mk("b", 20.0)];

        let first = cache.get_or_compute(&batch, &cfg).unwrap();
        let second = cache.get_or_compute(&batch, &cfg).unwrap();
        assert!(!first.hit);
        assert!(second.hit);
        assert_eq!(first.sources, second.sources);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
    }

    #[test]
    fn evicts_oldest_beyond_capacity() {
        let cache = BatchCache::with_capacity(2);
        let cfg = EngineConfig::default();
        for m in [1.0, 2.0, 3.0] {
            cache.get_or_compute(&[mk("a", m)], &cfg).unwrap();
        }
        assert_eq!(cache.stats().entries, 2);
        // the first batch was evicted
        assert!(!cache.get_or_compute(&[mk("a", 1.0)], &cfg).unwrap().hit);
        assert!(cache.get_or_compute(&[mk("a", 3.0)], &cfg).unwrap().hit);
    }

    #[test]
    fn oversized_batches_bypass_the_cache() {
        let cache = BatchCache::with_limits(4, 2);
        let cfg = EngineConfig::default();
        let big = vec![mk("a", 1.0), mk("b", 2.0), mk("c", 3.0)];

        assert!(!cache.get_or_compute(&big, &cfg).unwrap().hit);
        let again = cache.get_or_compute(&big, &cfg).unwrap();
        assert!(!again.hit);
        assert_eq!(again.sources.len(), 3);
        assert_eq!(cache.stats().entries, 0);

        let small = vec![mk("a", 1.0), mk("b", 2.0)];
        cache.get_or_compute(&small, &cfg).unwrap();
        assert!(cache.get_or_compute(&small, &cfg).unwrap().hit);
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = BatchCache::default();
        let cfg = EngineConfig::default();
        assert!(cache.get_or_compute(&[mk("bad", 101.0)], &cfg).is_err());
        assert_eq!(cache.stats().entries, 0);
    }
}
