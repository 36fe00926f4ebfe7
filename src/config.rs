// src/config.rs
//! Engine configuration: weight sets and the top-quartile percentile.
//!
//! Lookup order for `load_default()`:
//! 1) $VALUATION_CONFIG_PATH (must exist)
//! 2) config/valuation.toml
//! 3) config/valuation.json
//! 4) built-in defaults
//!
//! `HotReloadConfig` re-reads the file when its mtime changes. A file that
//! fails to parse or validate keeps the previously loaded config; only the
//! first load (`HotReloadConfig::load` / `from_env`) is fatal.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    sync::RwLock,
    time::SystemTime,
};
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::weights::{CompositeWeights, ValueWeights};

pub const ENV_CONFIG_PATH: &str = "VALUATION_CONFIG_PATH";
pub const DEFAULT_TOML_PATH: &str = "config/valuation.toml";
pub const DEFAULT_JSON_PATH: &str = "config/valuation.json";
pub const DEFAULT_TOP_QUARTILE_PERCENTILE: f64 = 75.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub value_weights: ValueWeights,
    pub composite_weights: CompositeWeights,
    /// Percentile of the composite scores that marks "top quartile".
    pub top_quartile_percentile: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            value_weights: ValueWeights::default(),
            composite_weights: CompositeWeights::default(),
            top_quartile_percentile: DEFAULT_TOP_QUARTILE_PERCENTILE,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.value_weights.validate()?;
        self.composite_weights.validate()?;
        let p = self.top_quartile_percentile;
        if !p.is_finite() || !(0.0..=100.0).contains(&p) {
            return Err(ConfigError::Percentile(p));
        }
        Ok(())
    }

    /// Load from an explicit path. Supports TOML or JSON.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading valuation config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing valuation config {}", path.display()))?;
        cfg.validate()
            .with_context(|| format!("validating valuation config {}", path.display()))?;
        Ok(cfg)
    }

    /// Load using the env var + fallbacks described in the module docs.
    pub fn load_default() -> Result<Self> {
        match resolve_path()? {
            Some(p) => Self::load_from(&p),
            None => Ok(Self::default()),
        }
    }
}

/// Config file location per the lookup order, or `None` for built-in defaults.
pub fn resolve_path() -> Result<Option<PathBuf>> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return Ok(Some(pb));
        }
        return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
    }
    for candidate in [DEFAULT_TOML_PATH, DEFAULT_JSON_PATH] {
        let pb = PathBuf::from(candidate);
        if pb.exists() {
            return Ok(Some(pb));
        }
    }
    Ok(None)
}

fn parse_config(s: &str, hint_ext: &str) -> Result<EngineConfig> {
    match hint_ext {
        "toml" => Ok(toml::from_str(s)?),
        "json" => Ok(serde_json::from_str(s)?),
        _ => serde_json::from_str::<EngineConfig>(s)
            .map_err(anyhow::Error::from)
            .or_else(|_| toml::from_str::<EngineConfig>(s).map_err(anyhow::Error::from))
            .map_err(|_| anyhow!("unsupported valuation config format")),
    }
}

/// Hot-reload wrapper: reloads when the config file mtime changes.
#[derive(Debug)]
pub struct HotReloadConfig {
    path: Option<PathBuf>,
    inner: RwLock<State>,
}

#[derive(Debug)]
struct State {
    config: EngineConfig,
    last_modified: Option<SystemTime>,
}

impl HotReloadConfig {
    /// Watch `path`; `None` serves the built-in defaults forever.
    pub fn new(path: Option<PathBuf>) -> Self {
        let hot = Self {
            path,
            inner: RwLock::new(State {
                config: EngineConfig::default(),
                last_modified: None,
            }),
        };
        hot.current();
        hot
    }

    /// Watch `path`, failing if its first load does not parse or validate.
    /// Later bad edits keep the last good config instead.
    pub fn load(path: PathBuf) -> Result<Self> {
        EngineConfig::load_from(&path)?;
        Ok(Self::new(Some(path)))
    }

    /// Resolve the path the same way `EngineConfig::load_default` does.
    pub fn from_env() -> Result<Self> {
        match resolve_path()? {
            Some(p) => Self::load(p),
            None => Ok(Self::new(None)),
        }
    }

    /// Latest valid config, reloading if the file changed.
    pub fn current(&self) -> EngineConfig {
        let Some(path) = self.path.as_deref() else {
            return self.read_state().config;
        };

        let mtime = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(t) => t,
            // Missing file: keep whatever was loaded last.
            Err(_) => return self.read_state().config,
        };
        if self.read_state().last_modified == Some(mtime) {
            return self.read_state().config;
        }

        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        // Double-check in case another caller reloaded first.
        if guard.last_modified != Some(mtime) {
            match EngineConfig::load_from(path) {
                Ok(cfg) => {
                    info!(target: "config", path = %path.display(), "valuation config loaded");
                    guard.config = cfg;
                }
                Err(e) => {
                    warn!(target: "config", path = %path.display(), error = %format!("{e:#}"), "keeping previous valuation config");
                }
            }
            guard.last_modified = Some(mtime);
        }
        guard.config
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, State> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }
}
