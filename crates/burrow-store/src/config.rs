use std::time::Duration;

use burrow_model::ClusterId;

/// Store-wide configuration, drawn from `spec.md` §6's recognized configuration options.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// `workers`, default 20.
    pub shard_count: usize,
    /// Bound on each shard's inbound channel (`queue-depth`, default 1).
    pub queue_depth: usize,
    /// How long a producer waits for a full shard queue before dropping (default 1s).
    pub queue_send_timeout: Duration,
    /// How long a fetch caller waits for a reply before giving up.
    pub fetch_timeout: Duration,
    /// `W`, the ring window size, default 15.
    pub window: usize,
    /// `min-distance`, seconds, default 1.
    pub min_distance_secs: i64,
    /// `expire-group`, seconds, default 604800 (7 days).
    pub expire_group_secs: i64,
    /// Every statically configured cluster (`spec.md` §3: "configured at startup; not
    /// dynamically added").
    pub clusters: Vec<ClusterId>,
}

impl StoreConfig {
    /// The sweeper's scan interval: `expire-group / 10`, floored at 60s (`SPEC_FULL.md` §5).
    pub fn sweep_interval(&self) -> Duration {
        let secs = (self.expire_group_secs / 10).max(60);
        Duration::from_secs(secs as u64)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            shard_count: 20,
            queue_depth: 1,
            queue_send_timeout: Duration::from_secs(1),
            fetch_timeout: Duration::from_secs(5),
            window: burrow_model::DEFAULT_WINDOW,
            min_distance_secs: 1,
            expire_group_secs: 604_800,
            clusters: Vec::new(),
        }
    }
}
