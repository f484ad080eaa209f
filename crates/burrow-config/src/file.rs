use std::path::Path;

use burrow_model::Severity;
use serde::Deserialize;

/// The on-disk TOML shape (`spec.md` §6's configuration options, generalized to a settings file
/// per `SPEC_FULL.md` §6). Every field is optional so a minimal file only needs `clusters`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub workers: Option<usize>,
    pub expire_group: Option<u64>,
    pub min_distance: Option<u64>,
    pub window: Option<usize>,
    pub queue_depth: Option<usize>,
    pub http_addr: Option<String>,
    pub shutdown_timeout: Option<u64>,
    #[serde(default)]
    pub clusters: Vec<String>,
    #[serde(default)]
    pub notifiers: Vec<FileNotifier>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileNotifier {
    pub name: String,
    #[serde(default)]
    pub interval_secs: Option<u64>,
    #[serde(default)]
    pub send_interval_secs: Option<u64>,
    #[serde(default)]
    pub severity_threshold: Option<Severity>,
    #[serde(default)]
    pub group_allowlist: Vec<String>,
    #[serde(default)]
    pub group_blocklist: Vec<String>,
    #[serde(default)]
    pub sinks: Vec<FileSink>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum FileSink {
    Http { url: String },
    Email { endpoint: String, recipients: Vec<String> },
}

impl FileConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading config file {}: {e}", path.display()))?;
        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing config file {}: {e}", path.display()))
    }
}
