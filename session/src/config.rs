//! Session configuration with TOML file support.

use std::path::PathBuf;

use rlp_cap_table::{CapTable, StakeholderEntry, DEFAULT_ALLOCATION_TOLERANCE};
use rlp_utils::LogFormat;
use serde::{Deserialize, Serialize};

use crate::SessionError;

/// Configuration for a simulator session.
///
/// Can be loaded from a TOML file via [`SessionConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Absolute tolerance on `|total_active_share - 1.0|`. `0.0` requires
    /// exact equality.
    #[serde(default = "default_tolerance")]
    pub allocation_tolerance: f64,

    /// Cosmetic pause before a distribution completes, in milliseconds.
    #[serde(default)]
    pub processing_delay_ms: u64,

    /// Display unit for amounts.
    #[serde(default = "default_unit")]
    pub unit: String,

    /// Where `export` writes the CSV report when no path is given.
    #[serde(default = "default_export_path")]
    pub export_path: PathBuf,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Initial cap table, in payout order.
    #[serde(default = "default_stakeholders")]
    pub stakeholders: Vec<StakeholderEntry>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_tolerance() -> f64 {
    DEFAULT_ALLOCATION_TOLERANCE
}

fn default_unit() -> String {
    "BTC".to_string()
}

fn default_export_path() -> PathBuf {
    PathBuf::from("rlp_compliance_export.csv")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_stakeholders() -> Vec<StakeholderEntry> {
    CapTable::default_roster().entries().to_vec()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl SessionConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| SessionError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, SessionError> {
        let config: Self = toml::from_str(s).map_err(|e| SessionError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings under which no distribution could ever run.
    ///
    /// A NaN or negative tolerance fails every allocation check.
    pub fn validate(&self) -> Result<(), SessionError> {
        let tolerance = self.allocation_tolerance;
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(SessionError::Config(format!(
                "allocation_tolerance must be a finite, non-negative number, got {tolerance}"
            )));
        }
        Ok(())
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, SessionError> {
        toml::to_string_pretty(self).map_err(|e| SessionError::Config(e.to_string()))
    }

    /// The cap table a session built from this config starts with.
    pub fn cap_table(&self) -> CapTable {
        CapTable::from_entries(self.stakeholders.clone())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            allocation_tolerance: default_tolerance(),
            processing_delay_ms: 0,
            unit: default_unit(),
            export_path: default_export_path(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            stakeholders: default_stakeholders(),
        }
    }
}
