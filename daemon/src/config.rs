//! Mirror configuration with TOML file support.

use sable_chain::{ChainConfig, ContractsConfig};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Full daemon configuration.
///
/// The `[chain]` and `[contracts]` sections are mandatory — the mirror is
/// useless without a node URL and the deployed addresses — everything else
/// has working defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MirrorConfig {
    pub chain: ChainConfig,
    pub contracts: ContractsConfig,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// `[store]` section.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in megabytes. Must cover the full expected ledger.
    #[serde(default = "default_map_size_mb")]
    pub map_size_mb: usize,
}

/// `[sync]` section.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_shutdown_grace_secs")]
    pub shutdown_grace_secs: u64,

    /// Run the state reconciler after backfill.
    #[serde(default = "default_true")]
    pub reconcile: bool,
}

impl MirrorConfig {
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("read config {}: {e}", path.display()))?;
        toml::from_str(&contents)
            .map_err(|e| anyhow::anyhow!("parse config {}: {e}", path.display()))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            map_size_mb: default_map_size_mb(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_poll_interval_secs(),
            shutdown_grace_secs: default_shutdown_grace_secs(),
            reconcile: true,
        }
    }
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./sable_data")
}

fn default_map_size_mb() -> usize {
    1024
}

fn default_poll_interval_secs() -> u64 {
    12
}

fn default_shutdown_grace_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
