use std::time::Duration;

use burrow_model::Severity;

/// Per-notifier configuration, drawn from `spec.md` §6's recognized configuration options plus
/// the sink/transport options `SPEC_FULL.md` §4.4 supplements.
#[derive(Clone, Debug)]
pub struct NotifierConfig {
    pub name: String,
    /// Tick cadence, default 60s (`spec.md` §4.4).
    pub interval: Duration,
    /// Minimum gap between REMINDER dispatches for the same open incident.
    pub send_interval: Duration,
    /// `group-allowlist`.
    pub group_allowlist: Vec<String>,
    /// `group-blocklist`.
    pub group_blocklist: Vec<String>,
    pub severity_threshold: Severity,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        NotifierConfig {
            name: "default".to_string(),
            interval: Duration::from_secs(60),
            send_interval: Duration::from_secs(3600),
            group_allowlist: Vec::new(),
            group_blocklist: Vec::new(),
            severity_threshold: Severity::Warn,
        }
    }
}
