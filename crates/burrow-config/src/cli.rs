use std::path::PathBuf;

/// Command-line flags, layered over a TOML config file (`SPEC_FULL.md` §6: "CLI flags override
/// file values, file values override built-in defaults"), in the teacher's `clap::Parser` style
/// (`agent`'s `Args`, `flowctl`'s `Cli`).
#[derive(clap::Parser, Debug)]
#[command(author, version, about = "Kafka consumer-lag monitoring service", long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, env = "BURROW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Shard count ("workers", default 20).
    #[arg(long, env = "BURROW_WORKERS")]
    pub workers: Option<usize>,

    /// Evaluator sampling cadence, seconds ("intervals", default 10). Reserved for a future
    /// poll-based evaluator frontend; the Notifier's own tick interval is configured per-notifier
    /// in the TOML file.
    #[arg(long, env = "BURROW_INTERVALS")]
    pub intervals: Option<u64>,

    /// Seconds after which inactive groups are swept (default 604800).
    #[arg(long, env = "BURROW_EXPIRE_GROUP")]
    pub expire_group: Option<u64>,

    /// Seconds between commits required to accept a sample (default 1).
    #[arg(long, env = "BURROW_MIN_DISTANCE")]
    pub min_distance: Option<u64>,

    /// Ring window size (default 15).
    #[arg(long, env = "BURROW_WINDOW")]
    pub window: Option<usize>,

    /// Address the HTTP query frontend binds to.
    #[arg(long, env = "BURROW_HTTP_ADDR")]
    pub http_addr: Option<String>,

    /// Bound on subsystem shutdown, seconds (default 10).
    #[arg(long, env = "BURROW_SHUTDOWN_TIMEOUT")]
    pub shutdown_timeout: Option<u64>,
}
