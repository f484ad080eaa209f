use std::time::Duration;

use burrow_bus::BusHandle;
use burrow_coordinator::Module;
use burrow_model::{ClusterId, GroupId, PartitionId, TopicName};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Drives a fixed sequence of broker LEO updates on an interval, playing the role a real
/// cluster module (a Kafka broker client, per `spec.md` §1) would over the producer interface.
pub struct ClusterStub {
    pub cluster: ClusterId,
    pub topic: TopicName,
    pub partition: PartitionId,
    pub ticks: Vec<(i64, i64)>,
    pub tick_interval: Duration,
}

#[async_trait::async_trait]
impl Module for ClusterStub {
    fn name(&self) -> &str {
        "cluster-stub"
    }

    async fn start(&self, bus: BusHandle, mut shutdown: broadcast::Receiver<()>) -> anyhow::Result<JoinHandle<()>> {
        let (cluster, topic, partition, ticks, interval) =
            (self.cluster.clone(), self.topic.clone(), self.partition, self.ticks.clone(), self.tick_interval);
        Ok(tokio::spawn(async move {
            for (leo, timestamp) in ticks {
                tokio::select! {
                    _ = bus.store_broker_offset(cluster.clone(), topic.clone(), partition, leo, timestamp) => {}
                    _ = shutdown.recv() => return,
                }
                tokio::time::sleep(interval).await;
            }
        }))
    }
}

/// Drives a fixed sequence of consumer commits on an interval, playing the role a real consumer
/// module (a consumer-offsets topic reader, per `spec.md` §1) would.
pub struct ConsumerStub {
    pub cluster: ClusterId,
    pub group: GroupId,
    pub topic: TopicName,
    pub partition: PartitionId,
    pub commits: Vec<(i64, i64)>,
    pub tick_interval: Duration,
    pub initial_delay: Duration,
}

#[async_trait::async_trait]
impl Module for ConsumerStub {
    fn name(&self) -> &str {
        "consumer-stub"
    }

    async fn start(&self, bus: BusHandle, mut shutdown: broadcast::Receiver<()>) -> anyhow::Result<JoinHandle<()>> {
        let (cluster, group, topic, partition, commits, interval, initial_delay) = (
            self.cluster.clone(),
            self.group.clone(),
            self.topic.clone(),
            self.partition,
            self.commits.clone(),
            self.tick_interval,
            self.initial_delay,
        );
        Ok(tokio::spawn(async move {
            tokio::time::sleep(initial_delay).await;
            for (offset, timestamp) in commits {
                tokio::select! {
                    _ = bus.store_consumer_offset(cluster.clone(), group.clone(), topic.clone(), partition, offset, timestamp) => {}
                    _ = shutdown.recv() => return,
                }
                tokio::time::sleep(interval).await;
            }
        }))
    }
}
