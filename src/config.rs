use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use crate::models::{ConnectionInfo, PortId, ServerVersion};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub engine: EngineConfig,
    #[serde(default)]
    pub stats: StatsConfig,
    pub publishing: PublishingConfig,
    pub monitoring: MonitoringConfig,
    #[serde(default)]
    pub ports: Vec<PortConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

/// The traffic engine whose counters are being reported.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub server: String,
    pub sync_port: u16,
    #[serde(default)]
    pub version: Option<String>,
    /// Newline-delimited JSON snapshot source; stdin when unset.
    #[serde(default)]
    pub snapshot_source: Option<String>,
}

impl EngineConfig {
    pub fn connection_info(&self) -> ConnectionInfo {
        ConnectionInfo {
            server: self.server.clone(),
            sync_port: self.sync_port,
        }
    }

    pub fn server_version(&self) -> ServerVersion {
        ServerVersion {
            version: self.version.clone(),
            uuid: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    /// Relative counters re-baseline when updates are further apart than this.
    #[serde(default = "default_reference_window_ms")]
    pub reference_window_ms: u64,
    #[serde(default = "default_max_display_ports")]
    pub max_display_ports: usize,
    /// Entities with no update for this long are invalidated.
    #[serde(default = "default_stale_after_secs")]
    pub stale_after_secs: u64,
}

fn default_reference_window_ms() -> u64 {
    3000
}

fn default_max_display_ports() -> usize {
    4
}

fn default_stale_after_secs() -> u64 {
    10
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            reference_window_ms: default_reference_window_ms(),
            max_display_ports: default_max_display_ports(),
            stale_after_secs: default_stale_after_secs(),
        }
    }
}

impl StatsConfig {
    pub fn reference_window(&self) -> Duration {
        Duration::from_millis(self.reference_window_ms)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishingConfig {
    /// How often /ws/global pushes a fresh global report.
    pub report_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    /// How often to check for stale entities.
    pub stale_check_interval_ms: u64,
    /// How often to log app stats (snapshots applied, rejected, invalidations) at INFO level.
    pub stats_log_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PortConfig {
    pub id: PortId,
    #[serde(default = "default_driver")]
    pub driver: String,
    #[serde(default = "default_speed_gbps")]
    pub speed_gbps: u32,
    #[serde(default)]
    pub owner: String,
}

fn default_driver() -> String {
    "unknown".into()
}

fn default_speed_gbps() -> u32 {
    10
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.engine.server.is_empty(),
            "engine.server must be non-empty"
        );
        anyhow::ensure!(
            self.engine.sync_port > 0,
            "engine.sync_port must be between 1 and 65535, got {}",
            self.engine.sync_port
        );
        anyhow::ensure!(
            self.stats.reference_window_ms > 0,
            "stats.reference_window_ms must be > 0, got {}",
            self.stats.reference_window_ms
        );
        anyhow::ensure!(
            self.stats.max_display_ports > 0,
            "stats.max_display_ports must be > 0, got {}",
            self.stats.max_display_ports
        );
        anyhow::ensure!(
            self.stats.stale_after_secs > 0,
            "stats.stale_after_secs must be > 0, got {}",
            self.stats.stale_after_secs
        );
        anyhow::ensure!(
            self.publishing.report_interval_ms > 0,
            "publishing.report_interval_ms must be > 0, got {}",
            self.publishing.report_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stale_check_interval_ms > 0,
            "monitoring.stale_check_interval_ms must be > 0, got {}",
            self.monitoring.stale_check_interval_ms
        );
        anyhow::ensure!(
            self.monitoring.stats_log_interval_secs > 0,
            "monitoring.stats_log_interval_secs must be > 0, got {}",
            self.monitoring.stats_log_interval_secs
        );
        let mut seen = HashSet::new();
        for port in &self.ports {
            anyhow::ensure!(seen.insert(port.id), "ports: duplicate port id {}", port.id);
        }
        Ok(())
    }
}
