//! # Normalization
//! Batch-relative scaling of raw source metrics, plus the domain-label
//! cleanup used when sources are displayed.
//!
//! Maxima are floored at 1 so a field that is zero across the whole batch
//! never becomes a zero denominator. They are computed once per batch.

use url::Url;

use crate::source::SourceData;
use crate::stats::max_or_floor;

/// Floor applied to every batch maximum.
pub const MAX_FLOOR: f64 = 1.0;

/// Clean a domain label for display.
///
/// - `None` or blank input → empty string.
/// - `http://` / `https://` URLs that parse → the host as the URL parser
///   serializes it (lower-cased, IDNA/punycode, IPv4 canonicalized).
/// - anything else, including unparseable URLs → lower-cased, leading `www.`
///   removed, path/query dropped.
pub fn normalize_domain(value: Option<&str>) -> String {
    let raw = match value.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return String::new(),
    };

    if let Some(host) = http_host(raw) {
        return host;
    }

    let lower = raw.to_lowercase();
    let bare = lower.strip_prefix("www.").unwrap_or(&lower);
    bare.split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .to_string()
}

fn http_host(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.host_str().map(str::to_lowercase)
}

/// Per-batch denominators for the relative metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetMaxima {
    pub citations: f64,
    pub topics: f64,
    pub sentiment: f64,
}

impl DatasetMaxima {
    pub fn from_sources(sources: &[SourceData]) -> Self {
        Self {
            citations: max_or_floor(sources.iter().map(|s| s.citations as f64), MAX_FLOOR),
            topics: max_or_floor(sources.iter().map(|s| s.topic_count() as f64), MAX_FLOOR),
            sentiment: max_or_floor(sources.iter().map(|s| s.sentiment), MAX_FLOOR),
        }
    }
}

/// Sentiment on the 0–1 scale, capped at 1.
pub fn sentiment_fraction(sentiment: f64, max_sentiment: f64) -> f64 {
    if max_sentiment > 0.0 {
        (sentiment / max_sentiment).min(1.0)
    } else {
        0.0
    }
}

/// Citations on the 0–1 scale (uncapped; the batch maximum maps to 1).
pub fn citations_fraction(citations: f64, max_citations: f64) -> f64 {
    if max_citations > 0.0 {
        citations / max_citations
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn src(citations: u64, topics: usize, sentiment: f64) -> SourceData {
        SourceData {
            name: "s".into(),
            source_type: "t".into(),
            mention_rate: 0.0,
            soa: 0.0,
            sentiment,
            citations,
            topics: (0..topics).map(|i| format!("t{i}")).collect(),
            top_pages: Vec::new(),
        }
    }

    #[test]
    fn blank_domain_is_empty() {
        assert_eq!(normalize_domain(None), "");
        assert_eq!(normalize_domain(Some("")), "");
        assert_eq!(normalize_domain(Some("   ")), "");
    }

    #[test]
    fn url_reduces_to_host() {
        assert_eq!(normalize_domain(Some("https://Docs.RS/std/vec")), "docs.rs");
        assert_eq!(normalize_domain(Some("http://user@example.com:8080/x?q=1")), "example.com");
        assert_eq!(normalize_domain(Some("HTTPS://News.Example.org#top")), "news.example.org");
    }

    #[test]
    fn url_host_goes_through_idna_and_ipv4_parsing() {
        assert_eq!(normalize_domain(Some("https://Bücher.de/x")), "xn--bcher-kva.de");
        assert_eq!(normalize_domain(Some("http://0x7f.1/")), "127.0.0.1");
        assert_eq!(normalize_domain(Some("https://example.com%2e/")), "example.com.");
    }

    #[test]
    fn unparseable_url_falls_back_to_label_cleanup() {
        // space in the host: not a URL, so only the first path segment survives
        assert_eq!(normalize_domain(Some("https://exa mple.com/")), "https:");
        // non-http schemes are labels, not URLs
        assert_eq!(normalize_domain(Some("localhost:8080/admin")), "localhost:8080");
    }

    #[test]
    fn bare_domain_strips_www_and_path() {
        assert_eq!(normalize_domain(Some("www.Reddit.com/r/rust")), "reddit.com");
        assert_eq!(normalize_domain(Some("Medium.com")), "medium.com");
        assert_eq!(normalize_domain(Some("example.org?ref=x")), "example.org");
    }

    #[test]
    fn maxima_floor_at_one() {
        let m = DatasetMaxima::from_sources(&[src(0, 0, 0.0), src(0, 0, 0.4)]);
        assert_eq!(m.citations, 1.0);
        assert_eq!(m.topics, 1.0);
        assert_eq!(m.sentiment, 1.0);

        let m = DatasetMaxima::from_sources(&[src(12, 3, 7.5), src(40, 1, 2.0)]);
        assert_eq!(m.citations, 40.0);
        assert_eq!(m.topics, 3.0);
        assert_eq!(m.sentiment, 7.5);
    }

    #[test]
    fn fractions_guard_zero_denominators() {
        assert_eq!(sentiment_fraction(5.0, 0.0), 0.0);
        assert_eq!(citations_fraction(5.0, 0.0), 0.0);
        assert_eq!(sentiment_fraction(9.0, 3.0), 1.0);
        assert_eq!(citations_fraction(10.0, 40.0), 0.25);
    }
}
