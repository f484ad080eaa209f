use burrow_model::{ClusterId, ClusterOffset, ConsumerSnapshot, GroupId, PartitionId, TopicName};
use tokio::sync::oneshot;

/// A summary of a cluster's broker-side state, answering `GET /v3/kafka/{cluster}` and backing
/// the "cluster module config summary" named (but not defined) by `spec.md` §6; the concrete
/// shape is fixed by `SPEC_FULL.md` §6.
#[derive(Clone, Debug, serde::Serialize)]
pub struct ClusterStatus {
    pub cluster: String,
    pub known: bool,
    pub topic_count: usize,
    pub group_count: usize,
}

/// The typed requests a store shard worker accepts, per `spec.md` §4.1. Each shard owns exactly
/// one `mpsc::Receiver<StoreRequest>`; producers never see the receiver end.
///
/// Requests are split into two routing classes, documented on [`crate::handle::BusHandle`]:
/// single-shard requests (routed by `shard_for`/`shard_for_cluster`) and fan-out requests (sent to
/// every shard, with the handle merging partial replies).
#[derive(Debug)]
pub enum StoreRequest {
    /// Routed to the shard owning `cluster`'s broker-offset table.
    StoreBrokerOffset { cluster: ClusterId, topic: TopicName, partition: PartitionId, offset: i64, timestamp: i64 },

    /// Routed to the shard owning `(cluster, group)`. `order` is the producer-supplied sequence
    /// number from `spec.md` §4.1's `StoreConsumerOffset{..., order?}`; samples are already
    /// serialized by channel-send order per shard, so it is carried on the request but not
    /// currently consulted by the ring's push rules.
    StoreConsumerOffset {
        cluster: ClusterId,
        group: GroupId,
        topic: TopicName,
        partition: PartitionId,
        offset: i64,
        timestamp: i64,
        order: Option<u64>,
    },

    /// Routed to the shard owning `(cluster, group)`. Replies `true` if a group was removed.
    DeleteGroup { cluster: ClusterId, group: GroupId, reply: oneshot::Sender<bool> },

    /// Fan-out: every shard removes `topic`'s rings from any group it owns; the shard owning
    /// `cluster`'s broker-offset table also removes the topic's `ClusterOffset` entries.
    DeleteTopic { cluster: ClusterId, topic: TopicName },

    /// Routed to the shard owning `(cluster, group)`.
    FetchConsumer { cluster: ClusterId, group: GroupId, reply: oneshot::Sender<Option<ConsumerSnapshot>> },

    /// Fan-out: each shard replies with the groups *it* owns that commit on `topic`; the handle
    /// concatenates the partial lists.
    FetchConsumersForTopic { cluster: ClusterId, topic: TopicName, reply: oneshot::Sender<Vec<GroupId>> },

    /// Fan-out: each shard replies with the groups of `cluster` that it owns.
    FetchGroupList { cluster: ClusterId, reply: oneshot::Sender<Vec<GroupId>> },

    /// Routed to the shard owning `cluster`'s broker-offset table.
    FetchTopicList { cluster: ClusterId, reply: oneshot::Sender<Vec<TopicName>> },

    /// Routed to the shard owning `cluster`'s broker-offset table. `None` per-partition offsets
    /// that have never been observed are omitted, not zero-filled.
    FetchTopicOffsets { cluster: ClusterId, topic: TopicName, reply: oneshot::Sender<Option<Vec<(PartitionId, ClusterOffset)>>> },

    /// Routed to the shard owning `cluster`'s broker-offset table.
    FetchClusterKnown { cluster: ClusterId, reply: oneshot::Sender<(bool, usize)> },
}

impl StoreRequest {
    /// Human-readable request name, used for metrics labels.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreRequest::StoreBrokerOffset { .. } => "store_broker_offset",
            StoreRequest::StoreConsumerOffset { .. } => "store_consumer_offset",
            StoreRequest::DeleteGroup { .. } => "delete_group",
            StoreRequest::DeleteTopic { .. } => "delete_topic",
            StoreRequest::FetchConsumer { .. } => "fetch_consumer",
            StoreRequest::FetchConsumersForTopic { .. } => "fetch_consumers_for_topic",
            StoreRequest::FetchGroupList { .. } => "fetch_group_list",
            StoreRequest::FetchTopicList { .. } => "fetch_topic_list",
            StoreRequest::FetchTopicOffsets { .. } => "fetch_topic_offsets",
            StoreRequest::FetchClusterKnown { .. } => "fetch_cluster_known",
        }
    }
}
