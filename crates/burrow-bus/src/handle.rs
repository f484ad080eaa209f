use std::time::Duration;

use burrow_model::{shard_for, shard_for_cluster, ClusterId, ClusterOffset, ConsumerSnapshot, GroupId, PartitionId, TopicName};
use tokio::sync::{mpsc, oneshot};

use crate::error::{BurrowError, Result};
use crate::request::{ClusterStatus, StoreRequest};

/// The producer-facing handle onto the message bus (`spec.md` §4.1 / §6 "Producer interface").
/// Cheap to clone; every clone shares the same per-shard channels.
///
/// Requests route one of two ways:
/// - **Single-shard**: `StoreConsumerOffset`, `DeleteGroup`, `FetchConsumer` route by
///   `shard_for(cluster, group)`; `StoreBrokerOffset`, `FetchTopicList`, `FetchTopicOffsets`,
///   `FetchClusterKnown` route by `shard_for_cluster(cluster)` (the shard owning that cluster's
///   broker-offset table).
/// - **Fan-out**: `DeleteTopic`, `FetchGroupList`, `FetchConsumersForTopic` are sent to every
///   shard because a cluster's groups are scattered across all shards by `(cluster, group)` hash;
///   the handle merges the partial replies.
#[derive(Clone)]
pub struct BusHandle {
    shards: std::sync::Arc<Vec<mpsc::Sender<StoreRequest>>>,
    queue_send_timeout: Duration,
    fetch_timeout: Duration,
}

impl BusHandle {
    pub fn new(shards: Vec<mpsc::Sender<StoreRequest>>, queue_send_timeout: Duration, fetch_timeout: Duration) -> Self {
        BusHandle { shards: std::sync::Arc::new(shards), queue_send_timeout, fetch_timeout }
    }

    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    async fn send_to(&self, shard: usize, req: StoreRequest) -> Result<()> {
        let kind = req.kind();
        let sender = &self.shards[shard];
        match tokio::time::timeout(self.queue_send_timeout, sender.send(req)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_closed)) => Err(BurrowError::ShuttingDown),
            Err(_elapsed) => {
                metrics::counter!("burrow_bus_dropped_total", "kind" => kind).increment(1);
                Err(BurrowError::Busy)
            }
        }
    }

    async fn await_reply<T>(&self, rx: oneshot::Receiver<T>) -> Result<T> {
        match tokio::time::timeout(self.fetch_timeout, rx).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(_canceled)) => Err(BurrowError::ShuttingDown),
            Err(_elapsed) => Err(BurrowError::Busy),
        }
    }

    async fn fan_out<T: Send + 'static>(
        &self,
        make: impl Fn(oneshot::Sender<T>) -> StoreRequest,
    ) -> Vec<T> {
        let mut receivers = Vec::with_capacity(self.shards.len());
        for shard in 0..self.shards.len() {
            let (tx, rx) = oneshot::channel();
            if self.send_to(shard, make(tx)).await.is_ok() {
                receivers.push(rx);
            }
        }
        let mut out = Vec::with_capacity(receivers.len());
        for rx in receivers {
            if let Ok(value) = self.await_reply(rx).await {
                out.push(value);
            }
        }
        out
    }

    pub async fn store_broker_offset(&self, cluster: ClusterId, topic: TopicName, partition: PartitionId, offset: i64, timestamp: i64) -> Result<()> {
        let shard = shard_for_cluster(cluster.as_str(), self.shard_count());
        self.send_to(shard, StoreRequest::StoreBrokerOffset { cluster, topic, partition, offset, timestamp }).await
    }

    pub async fn store_consumer_offset(
        &self,
        cluster: ClusterId,
        group: GroupId,
        topic: TopicName,
        partition: PartitionId,
        offset: i64,
        timestamp: i64,
    ) -> Result<()> {
        self.store_consumer_offset_ordered(cluster, group, topic, partition, offset, timestamp, None).await
    }

    /// As [`BusHandle::store_consumer_offset`], but carries the optional producer-supplied
    /// sequence number from `spec.md` §4.1's `order?` field.
    #[allow(clippy::too_many_arguments)]
    pub async fn store_consumer_offset_ordered(
        &self,
        cluster: ClusterId,
        group: GroupId,
        topic: TopicName,
        partition: PartitionId,
        offset: i64,
        timestamp: i64,
        order: Option<u64>,
    ) -> Result<()> {
        let shard = shard_for(cluster.as_str(), group.as_str(), self.shard_count());
        self.send_to(shard, StoreRequest::StoreConsumerOffset { cluster, group, topic, partition, offset, timestamp, order }).await
    }

    pub async fn delete_group(&self, cluster: ClusterId, group: GroupId) -> Result<bool> {
        let shard = shard_for(cluster.as_str(), group.as_str(), self.shard_count());
        let (tx, rx) = oneshot::channel();
        self.send_to(shard, StoreRequest::DeleteGroup { cluster, group, reply: tx }).await?;
        self.await_reply(rx).await
    }

    pub async fn delete_topic(&self, cluster: ClusterId, topic: TopicName) {
        for shard in 0..self.shard_count() {
            let _ = self.send_to(shard, StoreRequest::DeleteTopic { cluster: cluster.clone(), topic: topic.clone() }).await;
        }
    }

    pub async fn fetch_consumer(&self, cluster: ClusterId, group: GroupId) -> Result<Option<ConsumerSnapshot>> {
        let shard = shard_for(cluster.as_str(), group.as_str(), self.shard_count());
        let (tx, rx) = oneshot::channel();
        self.send_to(shard, StoreRequest::FetchConsumer { cluster, group, reply: tx }).await?;
        self.await_reply(rx).await
    }

    pub async fn fetch_consumers_for_topic(&self, cluster: ClusterId, topic: TopicName) -> Vec<GroupId> {
        let partials = self
            .fan_out(|reply| StoreRequest::FetchConsumersForTopic { cluster: cluster.clone(), topic: topic.clone(), reply })
            .await;
        partials.into_iter().flatten().collect()
    }

    pub async fn fetch_group_list(&self, cluster: ClusterId) -> Vec<GroupId> {
        let partials = self.fan_out(|reply| StoreRequest::FetchGroupList { cluster: cluster.clone(), reply }).await;
        partials.into_iter().flatten().collect()
    }

    pub async fn fetch_topic_list(&self, cluster: ClusterId) -> Result<Vec<TopicName>> {
        let shard = shard_for_cluster(cluster.as_str(), self.shard_count());
        let (tx, rx) = oneshot::channel();
        self.send_to(shard, StoreRequest::FetchTopicList { cluster, reply: tx }).await?;
        self.await_reply(rx).await
    }

    pub async fn fetch_topic_offsets(&self, cluster: ClusterId, topic: TopicName) -> Result<Option<Vec<(PartitionId, ClusterOffset)>>> {
        let shard = shard_for_cluster(cluster.as_str(), self.shard_count());
        let (tx, rx) = oneshot::channel();
        self.send_to(shard, StoreRequest::FetchTopicOffsets { cluster, topic, reply: tx }).await?;
        self.await_reply(rx).await
    }

    /// Combines the single-shard broker-offset ownership check with a fan-out group count, to
    /// answer `GET /v3/kafka/{cluster}` (`SPEC_FULL.md` §6).
    pub async fn fetch_cluster_status(&self, cluster: ClusterId) -> Result<ClusterStatus> {
        let shard = shard_for_cluster(cluster.as_str(), self.shard_count());
        let (tx, rx) = oneshot::channel();
        self.send_to(shard, StoreRequest::FetchClusterKnown { cluster: cluster.clone(), reply: tx }).await?;
        let (known, topic_count) = self.await_reply(rx).await?;
        let groups = self.fetch_group_list(cluster.clone()).await;
        Ok(ClusterStatus { cluster: cluster.to_string(), known, topic_count, group_count: groups.len() })
    }
}
