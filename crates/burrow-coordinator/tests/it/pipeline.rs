use std::sync::{Arc, Mutex};
use std::time::Duration;

use burrow_config::{BurrowConfig, NotifierSetup};
use burrow_coordinator::{Coordinator, Module, ModuleRegistry};
use burrow_model::{ClusterId, GroupId, PartitionId, Severity, TopicName};
use burrow_notifier::{NotifierConfig, NotifierEvent, Sink};
use burrow_store::StoreConfig;

use crate::support::{ClusterStub, ConsumerStub};

#[derive(Default)]
struct RecordingSink {
    events: Arc<Mutex<Vec<NotifierEvent>>>,
}

#[async_trait::async_trait]
impl Sink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn dispatch(&self, event: &NotifierEvent) -> anyhow::Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// End-to-end: a stub cluster module reports a constant LEO, a stub consumer module commits the
/// same offset repeatedly, and the full commit → evaluate → notify pipeline (driven through a
/// real [`Coordinator`], a real sharded [`burrow_store::Store`], and a real [`burrow_bus::BusHandle`])
/// dispatches a STALL incident to the notifier's sink. Mirrors `SPEC_FULL.md` §9's integration
/// test and the "Stall" concrete scenario in `spec.md` §8.
#[tokio::test(flavor = "multi_thread")]
async fn stalled_group_reaches_the_notifier_sink() {
    let cluster = ClusterId::from("prod");
    let topic = TopicName::from("orders");
    let group = GroupId::from("billing-consumer");
    let partition: PartitionId = 0;

    let store = StoreConfig {
        shard_count: 4,
        clusters: vec![cluster.clone()],
        window: 15,
        min_distance_secs: 1,
        expire_group_secs: 20,
        ..StoreConfig::default()
    };

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = RecordingSink { events: events.clone() };
    let notifier = NotifierSetup {
        config: NotifierConfig {
            name: "test".to_string(),
            interval: Duration::from_millis(200),
            send_interval: Duration::from_secs(3600),
            group_allowlist: Vec::new(),
            group_blocklist: Vec::new(),
            severity_threshold: Severity::Warn,
        },
        sinks: vec![Box::new(sink)],
    };

    let config = BurrowConfig {
        store,
        notifiers: vec![notifier],
        http_addr: "127.0.0.1:0".parse().unwrap(),
        shutdown_timeout: Duration::from_secs(5),
    };

    let mut modules = ModuleRegistry::new();
    modules.register(Box::new(ClusterStub {
        cluster: cluster.clone(),
        topic: topic.clone(),
        partition,
        ticks: vec![(100, 1)],
        tick_interval: Duration::from_millis(1),
    }) as Box<dyn Module>);
    modules.register(Box::new(ConsumerStub {
        cluster: cluster.clone(),
        group: group.clone(),
        topic: topic.clone(),
        partition,
        commits: (1..=15).map(|i| (80i64, i * 1_000)).collect(),
        tick_interval: Duration::from_millis(5),
        initial_delay: Duration::from_millis(50),
    }) as Box<dyn Module>);

    let coordinator = Coordinator::with_modules(config, modules);
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel();
    let run = tokio::spawn(coordinator.run_until(async move {
        let _ = stop_rx.await;
    }));

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if !events.lock().unwrap().is_empty() {
            break;
        }
        assert!(tokio::time::Instant::now() < deadline, "notifier never dispatched an event for the stalled group");
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    let _ = stop_tx.send(());
    run.await.unwrap().unwrap();

    let recorded = events.lock().unwrap();
    let open = recorded.iter().find(|e| e.group == "billing-consumer").expect("expected an event for billing-consumer");
    assert_eq!(open.cluster, "prod");
    assert_eq!(open.status, Severity::Err);
    assert!(open.partitions.iter().any(|p| p.status == burrow_model::StatusReason::Stall));
}
