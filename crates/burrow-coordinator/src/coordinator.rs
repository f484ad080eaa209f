use std::sync::Arc;
use std::time::Duration;

use burrow_config::BurrowConfig;
use burrow_eval::EvalConfig;
use burrow_http::AppState;
use burrow_notifier::{Notifier, NotifierFilter};
use burrow_store::Store;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::module::ModuleRegistry;

/// Lifecycle owner for the whole process (`spec.md` §4.5): configures, starts, and stops every
/// subsystem in dependency order, and owns the single shutdown broadcast distributed to all of
/// them (`SPEC_FULL.md` §4.5).
///
/// Start order: store → modules (cluster/consumer collaborators) → notifiers → HTTP. Stop order
/// is the exact reverse, each step bounded by `config.shutdown_timeout` so shutdown never hangs
/// indefinitely.
pub struct Coordinator {
    config: BurrowConfig,
    modules: ModuleRegistry,
}

impl Coordinator {
    pub fn new(config: BurrowConfig) -> Self {
        Coordinator { config, modules: ModuleRegistry::new() }
    }

    pub fn with_modules(config: BurrowConfig, modules: ModuleRegistry) -> Self {
        Coordinator { config, modules }
    }

    /// Runs until a shutdown signal is observed, then drains every subsystem. Used directly by
    /// `main`; [`Coordinator::run_until`] is the testable variant that takes an arbitrary
    /// shutdown future instead of waiting on process signals.
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_until(wait_for_shutdown_signal()).await
    }

    pub async fn run_until(self, shutdown_signal: impl std::future::Future<Output = ()>) -> anyhow::Result<()> {
        let Coordinator { config, modules } = self;
        let (shutdown_tx, _) = broadcast::channel(1);

        tracing::info!(shards = config.store.shard_count, clusters = config.store.clusters.len(), "starting store");
        let store = Store::start(config.store.clone());
        let bus = store.bus();

        let module_handles = modules.start_all(&bus, &shutdown_tx).await?;

        let eval_cfg = EvalConfig {
            min_distance_secs: config.store.min_distance_secs,
            expire_group_secs: config.store.expire_group_secs,
            window: config.store.window,
        };

        let mut notifier_handles = Vec::with_capacity(config.notifiers.len());
        for setup in config.notifiers {
            tracing::info!(notifier = setup.config.name, "starting notifier");
            let filter = NotifierFilter::new(
                &setup.config.group_allowlist,
                &setup.config.group_blocklist,
                setup.config.severity_threshold,
            )?;
            let notifier = Notifier::new(setup.config, config.store.clusters.clone(), bus.clone(), eval_cfg, filter, setup.sinks);
            notifier_handles.push(tokio::spawn(notifier.run(shutdown_tx.subscribe())));
        }

        let state = Arc::new(AppState {
            bus: bus.clone(),
            clusters: config.store.clusters.clone(),
            eval_cfg,
            host: config.http_addr.to_string(),
        });
        let app = burrow_http::router(state).merge(burrow_http::metrics::router());
        let listener = tokio::net::TcpListener::bind(config.http_addr).await?;
        tracing::info!(addr = %config.http_addr, "starting http frontend");
        let mut http_shutdown = shutdown_tx.subscribe();
        let http_handle: JoinHandle<()> = tokio::spawn(async move {
            let server = axum::serve(listener, app).with_graceful_shutdown(async move {
                let _ = http_shutdown.recv().await;
            });
            if let Err(err) = server.await {
                tracing::error!(error = %err, "http server exited with error");
            }
        });

        shutdown_signal.await;
        tracing::info!("shutdown requested, draining subsystems");
        let _ = shutdown_tx.send(());

        let budget = config.shutdown_timeout;
        join_bounded("http", budget, http_handle).await;
        for handle in notifier_handles {
            join_bounded("notifier", budget, handle).await;
        }
        for handle in module_handles {
            join_bounded("module", budget, handle).await;
        }
        if tokio::time::timeout(budget, store.shutdown()).await.is_err() {
            tracing::warn!("store did not shut down within the shutdown budget");
        }

        Ok(())
    }
}

async fn join_bounded(what: &str, budget: Duration, handle: JoinHandle<()>) {
    match tokio::time::timeout(budget, handle).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => tracing::warn!(%what, error = %err, "subsystem task panicked during shutdown"),
        Err(_) => tracing::warn!(%what, "subsystem did not stop within the shutdown budget, leaking it"),
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
        let mut sigint = signal(SignalKind::interrupt()).expect("failed to register SIGINT handler");
        tokio::select! {
            _ = sigterm.recv() => tracing::info!("received SIGTERM"),
            _ = sigint.recv() => tracing::info!("received SIGINT"),
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
        tracing::info!("received ctrl-c");
    }
}
