use burrow_bus::BusHandle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// A pluggable producer/consumer collaborator, per `spec.md` §1 ("Cluster modules ... Consumer
/// modules ... are out of scope") and the DESIGN NOTES in `SPEC_FULL.md` ("Dynamic dispatch over
/// 'modules': express as a small interface ... plus producer/consumer role types, and a registry
/// constructed at startup"). The core ships only this interface and [`ModuleRegistry`]; concrete
/// Kafka broker / Zookeeper / consumer-offsets-topic implementations live outside the core and
/// are registered by whatever assembles a full deployment.
#[async_trait::async_trait]
pub trait Module: Send + Sync {
    /// Used in logs and in the module's join-handle name for shutdown diagnostics.
    fn name(&self) -> &str;

    /// Spawns the module's worker task(s) against `bus` and returns immediately
    /// (`spec.md` §4.5: "Each subsystem's Start must be non-blocking"). The module must stop its
    /// work once `shutdown` fires.
    async fn start(
        &self,
        bus: BusHandle,
        shutdown: broadcast::Receiver<()>,
    ) -> anyhow::Result<JoinHandle<()>>;
}

/// The set of modules a deployment has configured, started together by the [`crate::Coordinator`]
/// right after the store (`spec.md` §4.5: "store → clusters → consumers → ...").
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<Box<dyn Module>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        ModuleRegistry::default()
    }

    pub fn register(&mut self, module: Box<dyn Module>) -> &mut Self {
        self.modules.push(module);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub async fn start_all(
        &self,
        bus: &BusHandle,
        shutdown: &broadcast::Sender<()>,
    ) -> anyhow::Result<Vec<JoinHandle<()>>> {
        let mut handles = Vec::with_capacity(self.modules.len());
        for module in &self.modules {
            tracing::info!(module = module.name(), "starting module");
            handles.push(module.start(bus.clone(), shutdown.subscribe()).await?);
        }
        Ok(handles)
    }
}
