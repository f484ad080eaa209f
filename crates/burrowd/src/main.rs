use burrow_config::{BurrowConfig, Cli};
use burrow_coordinator::Coordinator;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting tracing default failed");

    let cli = Cli::parse();
    let config = BurrowConfig::load(&cli)?;

    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    let result = runtime.block_on(Coordinator::new(config).run());
    runtime.shutdown_timeout(std::time::Duration::from_secs(5));
    result
}
