//! Simulation configuration, read from JSON.

use std::{fs, path::Path, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, RuleSet};

/// Tick interval used when none is given.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(25);

fn default_rows() -> usize {
    40
}

fn default_cols() -> usize {
    80
}

fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL.as_millis() as u64
}

fn default_rule() -> String {
    "B3/S23".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Board height in cells.
    #[serde(default = "default_rows")]
    pub rows: usize,
    /// Board width in cells.
    #[serde(default = "default_cols")]
    pub cols: usize,
    /// Milliseconds between generations while running.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Rule name (`standard`, `highlife`, ...) or B/S notation.
    #[serde(default = "default_rule")]
    pub rule: String,
    /// Preset to load on startup; a random population is used otherwise.
    #[serde(default)]
    pub preset: Option<String>,
    /// Seed for the random population, for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            interval_ms: default_interval_ms(),
            rule: default_rule(),
            preset: None,
            seed: None,
        }
    }
}

impl SimConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 || self.cols == 0 {
            return Err(Error::InvalidDimension {
                rows: self.rows,
                cols: self.cols,
            });
        }
        self.rule_set().map(|_| ())
    }

    pub fn rule_set(&self) -> Result<RuleSet> {
        self.rule.parse()
    }

    /// A zero interval falls back to the default.
    pub fn interval(&self) -> Duration {
        match self.interval_ms {
            0 => DEFAULT_INTERVAL,
            ms => Duration::from_millis(ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config: SimConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SimConfig::default());
        assert_eq!(config.interval(), Duration::from_millis(25));
        assert!(matches!(config.rule_set(), Ok(RuleSet::Standard)));
    }

    #[test]
    fn test_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("life.json");
        fs::write(
            &path,
            r#"{ "rows": 10, "cols": 12, "interval_ms": 100, "rule": "highlife", "preset": "Glider" }"#,
        )
        .unwrap();

        let config = SimConfig::load(&path).unwrap();
        assert_eq!(config.rows, 10);
        assert_eq!(config.cols, 12);
        assert_eq!(config.interval(), Duration::from_millis(100));
        assert_eq!(config.preset.as_deref(), Some("Glider"));
        assert!(matches!(config.rule_set(), Ok(RuleSet::LifeLike(_))));
    }

    #[test]
    fn test_load_rejects_bad_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");

        fs::write(&path, r#"{ "rows": 0 }"#).unwrap();
        assert!(matches!(
            SimConfig::load(&path),
            Err(Error::InvalidDimension { rows: 0, .. })
        ));

        fs::write(&path, r#"{ "rule": "B3/S2x" }"#).unwrap();
        assert!(matches!(SimConfig::load(&path), Err(Error::InvalidRule(_))));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(SimConfig::load(&path), Err(Error::Config(_))));

        assert!(matches!(
            SimConfig::load(dir.path().join("missing.json")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_zero_interval_uses_default() {
        let config = SimConfig {
            interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.interval(), DEFAULT_INTERVAL);
    }
}
