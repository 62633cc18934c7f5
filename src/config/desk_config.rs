use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, Level};

use crate::services::error_handling::DeskError;
use crate::view::SortDirection;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DeskConfig {
    /// Max level for the fmt subscriber: trace, debug, info, warn or error
    pub log_level: String,

    pub delays: Delays,

    pub mock: MockConfig,

    pub ledger: LedgerConfig,
}

/// Simulated latencies, in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Delays {
    pub report_ms: u64,
    pub ledger_update_ms: u64,
    pub notification_sync_ms: u64,
    pub churn_refresh_ms: u64,
    pub churn_export_ms: u64,
    pub integration_sync_ms: u64,
    pub equipment_refresh_ms: u64,
    pub export_ms: u64,
    pub backup_ms: u64,
    pub clean_cache_ms: u64,
    pub audit_ms: u64,
    pub autosave_ms: u64,
    /// Interval of the dashboard's live chart refresh.
    pub dashboard_refresh_ms: u64,
    pub payment_snapshot_ms: u64,
    /// Interval between draws that may pull a new ledger transaction.
    pub ledger_live_ms: u64,
    pub equipment_drift_ms: u64,
    pub activity_stats_ms: u64,
    pub profile_stats_ms: u64,
    pub profile_status_ms: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MockConfig {
    /// Fixed RNG seed; `None` draws from entropy.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerConfig {
    pub sort_column: String,
    pub sort_direction: SortDirection,
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            delays: Delays::default(),
            mock: MockConfig::default(),
            ledger: LedgerConfig::default(),
        }
    }
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            report_ms: 1500,
            ledger_update_ms: 1000,
            notification_sync_ms: 2000,
            churn_refresh_ms: 1500,
            churn_export_ms: 2000,
            integration_sync_ms: 2000,
            equipment_refresh_ms: 1000,
            export_ms: 2000,
            backup_ms: 3000,
            clean_cache_ms: 2000,
            audit_ms: 4000,
            autosave_ms: 800,
            dashboard_refresh_ms: 5000,
            payment_snapshot_ms: 15000,
            ledger_live_ms: 5000,
            equipment_drift_ms: 3000,
            activity_stats_ms: 15000,
            profile_stats_ms: 15000,
            profile_status_ms: 30000,
        }
    }
}

impl Delays {
    /// Every delay set to zero, for callers that want immediate completion.
    pub fn immediate() -> Self {
        Self {
            report_ms: 0,
            ledger_update_ms: 0,
            notification_sync_ms: 0,
            churn_refresh_ms: 0,
            churn_export_ms: 0,
            integration_sync_ms: 0,
            equipment_refresh_ms: 0,
            export_ms: 0,
            backup_ms: 0,
            clean_cache_ms: 0,
            audit_ms: 0,
            autosave_ms: 0,
            dashboard_refresh_ms: 0,
            payment_snapshot_ms: 0,
            ledger_live_ms: 0,
            equipment_drift_ms: 0,
            activity_stats_ms: 0,
            profile_stats_ms: 0,
            profile_status_ms: 0,
        }
    }
}

pub(crate) fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            sort_column: "data".to_string(),
            sort_direction: SortDirection::Desc,
        }
    }
}

impl DeskConfig {
    /// Load configuration from the default location, creating it when missing
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            let config: Self = toml::from_str(&content)
                .with_context(|| format!("Invalid config at {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            let default_config = Self::default();
            default_config.save_to(path)?;
            Ok(default_config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("fitdesk").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), DeskError> {
        self.max_level()?;
        if self.ledger.sort_column.trim().is_empty() {
            return Err(DeskError::Configuration {
                message: "ledger.sort_column must not be empty".to_string(),
            });
        }
        Ok(())
    }

    pub fn max_level(&self) -> Result<Level, DeskError> {
        self.log_level
            .parse::<Level>()
            .map_err(|_| DeskError::Configuration {
                message: format!("unknown log level '{}'", self.log_level),
            })
    }
}
