use crate::alerts::Severity;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub health: HealthRules,
}

/// How drive status deviations map onto plugin severities.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthRules {
    /// Severity for any non-OK drive that is not part of an array.
    pub unassigned: Severity,
    /// Statuses on assigned drives that only warrant a warning.
    pub warning_statuses: Vec<String>,
}

impl Default for HealthRules {
    fn default() -> Self {
        Self {
            unassigned:       Severity::Warning,
            warning_statuses: vec!["Predictive Failure".into()],
        }
    }
}

// ── Load ──────────────────────────────────────────────────────────────

impl Config {
    /// Load `path` if given, otherwise the per-user config file.
    /// A missing default file yields the defaults; an explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(p) = path {
            return read(p);
        }
        match Self::config_path() {
            Some(p) if p.exists() => read(&p),
            _ => {
                debug!("no config file, using defaults");
                Ok(Config::default())
            }
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("hpraidmon").join("hpraidmon.toml"))
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

fn read(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let cfg = Config::from_toml(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}
