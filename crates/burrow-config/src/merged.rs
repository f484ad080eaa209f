use std::net::SocketAddr;
use std::time::Duration;

use burrow_model::{ClusterId, Severity};
use burrow_notifier::{EmailSink, HttpEmailTransport, HttpSink, NotifierConfig, Sink};
use burrow_store::StoreConfig;

use crate::cli::Cli;
use crate::file::{FileConfig, FileNotifier, FileSink};

/// One configured notifier: its policy settings plus the concrete sinks it dispatches to.
pub struct NotifierSetup {
    pub config: NotifierConfig,
    pub sinks: Vec<Box<dyn Sink>>,
}

/// The fully merged, ready-to-run configuration: CLI flags override file values, file values
/// override built-in defaults (`spec.md` §6, `SPEC_FULL.md` §6).
pub struct BurrowConfig {
    pub store: StoreConfig,
    pub notifiers: Vec<NotifierSetup>,
    pub http_addr: SocketAddr,
    pub shutdown_timeout: Duration,
}

const DEFAULT_HTTP_ADDR: &str = "0.0.0.0:8000";

impl BurrowConfig {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    fn merge(cli: &Cli, file: FileConfig) -> anyhow::Result<Self> {
        let defaults = StoreConfig::default();
        let clusters: Vec<ClusterId> = file.clusters.iter().map(|c| ClusterId::from(c.as_str())).collect();
        anyhow::ensure!(!clusters.is_empty(), "configuration must list at least one cluster");

        let store = StoreConfig {
            shard_count: cli.workers.or(file.workers).unwrap_or(defaults.shard_count),
            queue_depth: file.queue_depth.unwrap_or(defaults.queue_depth),
            expire_group_secs: cli.expire_group.or(file.expire_group).map(|s| s as i64).unwrap_or(defaults.expire_group_secs),
            min_distance_secs: cli.min_distance.or(file.min_distance).map(|s| s as i64).unwrap_or(defaults.min_distance_secs),
            window: cli.window.or(file.window).unwrap_or(defaults.window),
            clusters: clusters.clone(),
            ..defaults
        };

        let http_addr_str = cli.http_addr.clone().or(file.http_addr.clone()).unwrap_or_else(|| DEFAULT_HTTP_ADDR.to_string());
        let http_addr: SocketAddr = http_addr_str.parse().map_err(|e| anyhow::anyhow!("invalid http_addr '{http_addr_str}': {e}"))?;

        let shutdown_timeout =
            Duration::from_secs(cli.shutdown_timeout.or(file.shutdown_timeout).unwrap_or(10));

        let notifiers = file.notifiers.into_iter().map(build_notifier).collect::<anyhow::Result<Vec<_>>>()?;

        Ok(BurrowConfig { store, notifiers, http_addr, shutdown_timeout })
    }
}

fn build_notifier(file: FileNotifier) -> anyhow::Result<NotifierSetup> {
    let config = NotifierConfig {
        name: file.name.clone(),
        interval: Duration::from_secs(file.interval_secs.unwrap_or(60)),
        send_interval: Duration::from_secs(file.send_interval_secs.unwrap_or(3600)),
        group_allowlist: file.group_allowlist,
        group_blocklist: file.group_blocklist,
        severity_threshold: file.severity_threshold.unwrap_or(Severity::Warn),
    };

    let sinks = file
        .sinks
        .into_iter()
        .map(|sink| build_sink(&file.name, sink))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(NotifierSetup { config, sinks })
}

fn build_sink(notifier_name: &str, sink: FileSink) -> anyhow::Result<Box<dyn Sink>> {
    match sink {
        FileSink::Http { url } => {
            let sink = HttpSink::new(format!("{notifier_name}-http"), url, Duration::from_secs(5), 3)?;
            Ok(Box::new(sink))
        }
        FileSink::Email { endpoint, recipients } => {
            let transport = HttpEmailTransport::new(endpoint, Duration::from_secs(5))?;
            let sink = EmailSink::new(format!("{notifier_name}-email"), Box::new(transport), recipients)?;
            Ok(Box::new(sink))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli_with_config(path: &std::path::Path) -> Cli {
        Cli::parse_from(["burrow", "--config", path.to_str().unwrap()])
    }

    #[test]
    fn cli_flag_overrides_file_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("burrow.toml");
        std::fs::write(&path, "clusters = [\"prod\"]\nworkers = 5\n").unwrap();
        let mut cli = cli_with_config(&path);
        cli.workers = Some(99);
        let config = BurrowConfig::load(&cli).unwrap();
        assert_eq!(config.store.shard_count, 99);
    }

    #[test]
    fn file_value_used_when_no_cli_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("burrow.toml");
        std::fs::write(&path, "clusters = [\"prod\"]\nworkers = 7\n").unwrap();
        let cli = cli_with_config(&path);
        let config = BurrowConfig::load(&cli).unwrap();
        assert_eq!(config.store.shard_count, 7);
    }

    #[test]
    fn missing_clusters_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("burrow.toml");
        std::fs::write(&path, "workers = 1\n").unwrap();
        let cli = cli_with_config(&path);
        assert!(BurrowConfig::load(&cli).is_err());
    }

    #[test]
    fn notifier_sinks_are_constructed_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("burrow.toml");
        std::fs::write(
            &path,
            r#"
clusters = ["prod"]

[[notifiers]]
name = "oncall"
severity_threshold = "ERR"

[[notifiers.sinks]]
type = "http"
url = "https://example.com/hook"
"#,
        )
        .unwrap();
        let cli = cli_with_config(&path);
        let config = BurrowConfig::load(&cli).unwrap();
        assert_eq!(config.notifiers.len(), 1);
        assert_eq!(config.notifiers[0].sinks.len(), 1);
        assert_eq!(config.notifiers[0].config.severity_threshold, Severity::Err);
    }
}
