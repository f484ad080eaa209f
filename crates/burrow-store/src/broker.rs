use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use burrow_model::{ClusterId, ClusterOffset, PartitionId, TopicName};

/// A cluster's broker-side offset table: the most recent LEO for every (topic, partition) the
/// cluster module has reported, per `spec.md` §3 `ClusterOffset`.
pub type ClusterTable = HashMap<(TopicName, PartitionId), ClusterOffset>;

/// Shared, cross-shard state for broker-offset tables (`spec.md` §5, "the only cross-shard
/// shared state"). One entry per configured cluster, built once at startup since clusters are
/// statically configured (`spec.md` §3, "Cluster ... not dynamically added").
///
/// Each cluster's table has exactly one writer: the shard that owns it, selected by
/// `shard_for_cluster`. Every shard holds a clone of this registry and may freely *read* any
/// cluster's table (needed to compute lag when handling `StoreConsumerOffset` for a group that
/// doesn't happen to live on the table's owning shard) without ever taking a lock — updates
/// publish a whole new `Arc<ClusterTable>` rather than mutating in place.
#[derive(Clone)]
pub struct BrokerRegistry {
    tables: Arc<HashMap<ClusterId, ArcSwap<ClusterTable>>>,
}

impl BrokerRegistry {
    pub fn new(clusters: impl IntoIterator<Item = ClusterId>) -> Self {
        let tables = clusters
            .into_iter()
            .map(|c| (c, ArcSwap::from_pointee(ClusterTable::new())))
            .collect();
        BrokerRegistry { tables: Arc::new(tables) }
    }

    pub fn leo(&self, cluster: &ClusterId, topic: &TopicName, partition: PartitionId) -> Option<ClusterOffset> {
        self.tables.get(cluster)?.load().get(&(topic.clone(), partition)).copied()
    }

    pub fn topics(&self, cluster: &ClusterId) -> Option<Vec<TopicName>> {
        let table = self.tables.get(cluster)?.load();
        let mut topics: Vec<TopicName> = table.keys().map(|(t, _)| t.clone()).collect();
        topics.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        topics.dedup();
        Some(topics)
    }

    pub fn partition_offsets(&self, cluster: &ClusterId, topic: &TopicName) -> Option<Vec<(PartitionId, ClusterOffset)>> {
        let table = self.tables.get(cluster)?.load();
        if !table.keys().any(|(t, _)| t == topic) {
            return None;
        }
        let mut offsets: Vec<(PartitionId, ClusterOffset)> =
            table.iter().filter(|((t, _), _)| t == topic).map(|((_, p), o)| (*p, *o)).collect();
        offsets.sort_by_key(|(p, _)| *p);
        Some(offsets)
    }

    pub fn known(&self, cluster: &ClusterId) -> bool {
        self.tables.get(cluster).map(|t| !t.load().is_empty()).unwrap_or(false)
    }

    pub fn topic_count(&self, cluster: &ClusterId) -> usize {
        self.topics(cluster).map(|t| t.len()).unwrap_or(0)
    }

    /// Applies a `StoreBrokerOffset` update. Must only be called by the shard that owns
    /// `cluster` (`spec.md` §4.2: "Update `ClusterOffset[...]` iff the new timestamp is strictly
    /// greater than the stored one, OR the partition is new"). Returns `true` if the table
    /// changed.
    pub fn update(&self, cluster: &ClusterId, topic: TopicName, partition: PartitionId, leo: i64, timestamp: i64) -> bool {
        let Some(slot) = self.tables.get(cluster) else { return false };
        let current = slot.load();
        let key = (topic.clone(), partition);
        let changed = match current.get(&key) {
            Some(existing) => timestamp > existing.timestamp,
            None => true,
        };
        if !changed {
            return false;
        }
        let mut next: ClusterTable = (**current).clone();
        next.entry(key).and_modify(|o| { o.maybe_update(leo, timestamp); }).or_insert(ClusterOffset::new(leo, timestamp));
        slot.store(Arc::new(next));
        true
    }

    /// Removes a topic's entries from `cluster`'s table. Called by the owning shard only.
    pub fn remove_topic(&self, cluster: &ClusterId, topic: &TopicName) {
        let Some(slot) = self.tables.get(cluster) else { return };
        let current = slot.load();
        if !current.keys().any(|(t, _)| t == topic) {
            return;
        }
        let next: ClusterTable = current.iter().filter(|((t, _), _)| t != topic).map(|(k, v)| (k.clone(), *v)).collect();
        slot.store(Arc::new(next));
    }
}
