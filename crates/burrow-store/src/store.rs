use burrow_bus::BusHandle;
use burrow_model::{shard_for_cluster, ClusterId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::broker::BrokerRegistry;
use crate::config::StoreConfig;
use crate::shard::ShardWorker;

/// A running store: `shard_count` spawned [`ShardWorker`] tasks plus the shared
/// [`BrokerRegistry`] they read and write (`spec.md` §4.2, §5).
pub struct Store {
    handle: BusHandle,
    workers: Vec<JoinHandle<()>>,
}

impl Store {
    /// Spawns every shard worker and returns the running store. `config.clusters` must list every
    /// cluster the deployment will ever see broker-offset or consumer-offset traffic for
    /// (`spec.md` §3, clusters are statically configured).
    pub fn start(config: StoreConfig) -> Self {
        let broker = BrokerRegistry::new(config.clusters.clone());
        let mut senders = Vec::with_capacity(config.shard_count);
        let mut workers = Vec::with_capacity(config.shard_count);
        for id in 0..config.shard_count {
            let (tx, rx) = mpsc::channel(config.queue_depth.max(1));
            senders.push(tx);
            let worker = ShardWorker::new(id, rx, broker.clone(), config.clone());
            workers.push(tokio::spawn(worker.run()));
        }
        let handle = BusHandle::new(senders, config.queue_send_timeout, config.fetch_timeout);
        tracing::info!(shards = config.shard_count, clusters = config.clusters.len(), "store started");
        Store { handle, workers }
    }

    pub fn bus(&self) -> BusHandle {
        self.handle.clone()
    }

    /// Drops every sender, closing each shard's channel, then waits for the workers to drain and
    /// exit (`spec.md` §4.5, graceful shutdown). Consumes `self`: a stopped store cannot be
    /// restarted.
    pub async fn shutdown(self) {
        drop(self.handle);
        for worker in self.workers {
            let _ = worker.await;
        }
    }
}

/// Reference routing helper exposed for callers (e.g. the Coordinator) that need to reason about
/// shard ownership without going through a [`BusHandle`] call, such as logging which shard a
/// cluster's broker-offset table lives on.
pub fn owning_shard(cluster: &ClusterId, shard_count: usize) -> usize {
    shard_for_cluster(cluster.as_str(), shard_count)
}
