use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use burrow_bus::StoreRequest;
use burrow_model::{ClusterId, ConsumerOffset, ConsumerRing, ConsumerSnapshot, GroupId, GroupKey, PushOutcome, TopicPartition};
use tokio::sync::mpsc;

use crate::broker::BrokerRegistry;
use crate::config::StoreConfig;

fn now_ms() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as i64
}

type GroupRings = HashMap<TopicPartition, ConsumerRing>;

/// One store shard: owns a disjoint slice of the `(cluster, group)` keyspace (`spec.md` §4.2,
/// "Sharding"). Runs single-threaded; its `groups` map is never touched by any other task.
pub struct ShardWorker {
    id: usize,
    rx: mpsc::Receiver<StoreRequest>,
    groups: HashMap<GroupKey, GroupRings>,
    broker: BrokerRegistry,
    cfg: StoreConfig,
}

impl ShardWorker {
    pub fn new(id: usize, rx: mpsc::Receiver<StoreRequest>, broker: BrokerRegistry, cfg: StoreConfig) -> Self {
        ShardWorker { id, rx, groups: HashMap::new(), broker, cfg }
    }

    /// Drains the request channel until it is closed (graceful shutdown, `spec.md` §4.5), running
    /// the sweeper (`SPEC_FULL.md` §5) on its own interval alongside it.
    pub async fn run(mut self) {
        let mut sweep = tokio::time::interval(self.cfg.sweep_interval());
        sweep.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                maybe_req = self.rx.recv() => {
                    match maybe_req {
                        Some(req) => self.handle(req),
                        None => break,
                    }
                }
                _ = sweep.tick() => {
                    self.sweep(now_ms());
                }
            }
        }
        tracing::debug!(shard = self.id, "shard worker draining, request channel closed");
    }

    fn handle(&mut self, req: StoreRequest) {
        match req {
            StoreRequest::StoreBrokerOffset { cluster, topic, partition, offset, timestamp } => {
                self.broker.update(&cluster, topic, partition, offset, timestamp);
            }
            StoreRequest::StoreConsumerOffset { cluster, group, topic, partition, offset, timestamp, order: _ } => {
                self.store_consumer_offset(cluster, group, topic, partition, offset, timestamp);
            }
            StoreRequest::DeleteGroup { cluster, group, reply } => {
                let removed = self.groups.remove(&GroupKey { cluster, group }).is_some();
                let _ = reply.send(removed);
            }
            StoreRequest::DeleteTopic { cluster, topic } => {
                for (key, rings) in self.groups.iter_mut() {
                    if key.cluster == cluster {
                        rings.retain(|tp, _| tp.topic != topic);
                    }
                }
                self.broker.remove_topic(&cluster, &topic);
            }
            StoreRequest::FetchConsumer { cluster, group, reply } => {
                let snapshot = self.groups.get(&GroupKey { cluster, group }).map(|rings| ConsumerSnapshot {
                    rings: rings.iter().map(|(tp, ring)| (tp.clone(), ring.to_vec())).collect(),
                });
                let _ = reply.send(snapshot);
            }
            StoreRequest::FetchConsumersForTopic { cluster, topic, reply } => {
                let groups: Vec<GroupId> = self
                    .groups
                    .iter()
                    .filter(|(key, rings)| key.cluster == cluster && rings.keys().any(|tp| tp.topic == topic))
                    .map(|(key, _)| key.group.clone())
                    .collect();
                let _ = reply.send(groups);
            }
            StoreRequest::FetchGroupList { cluster, reply } => {
                let groups: Vec<GroupId> =
                    self.groups.keys().filter(|key| key.cluster == cluster).map(|key| key.group.clone()).collect();
                let _ = reply.send(groups);
            }
            StoreRequest::FetchTopicList { cluster, reply } => {
                let _ = reply.send(self.broker.topics(&cluster).unwrap_or_default());
            }
            StoreRequest::FetchTopicOffsets { cluster, topic, reply } => {
                let _ = reply.send(self.broker.partition_offsets(&cluster, &topic));
            }
            StoreRequest::FetchClusterKnown { cluster, reply } => {
                let _ = reply.send((self.broker.known(&cluster), self.broker.topic_count(&cluster)));
            }
        }
    }

    fn store_consumer_offset(&mut self, cluster: ClusterId, group: GroupId, topic: burrow_model::TopicName, partition: burrow_model::PartitionId, offset: i64, timestamp: i64) {
        let leo = self.broker.leo(&cluster, &topic, partition).map(|o| o.leo);
        let sample = ConsumerOffset::new(offset, timestamp, leo);
        let tp = TopicPartition::new(topic, partition);
        let min_distance_ms = self.cfg.min_distance_secs * 1000;
        let window = self.cfg.window;

        let rings = self.groups.entry(GroupKey { cluster: cluster.clone(), group: group.clone() }).or_default();
        let ring = rings.entry(tp.clone()).or_insert_with(|| ConsumerRing::new(window));
        match ring.push(sample, min_distance_ms) {
            PushOutcome::Accepted => {}
            PushOutcome::OutOfOrder => {
                metrics::counter!("burrow_store_samples_dropped_total", "reason" => "out_of_order").increment(1);
            }
            PushOutcome::Duplicate => {
                metrics::counter!("burrow_store_samples_dropped_total", "reason" => "duplicate").increment(1);
            }
        }
    }

    /// Evicts groups whose every ring's tail sample is older than `expire-group`
    /// (`spec.md` §5, "Bounded memory").
    fn sweep(&mut self, now: i64) {
        let expire_before = now - self.cfg.expire_group_secs * 1000;
        let before = self.groups.len();
        self.groups.retain(|_, rings| {
            rings.values().any(|ring| ring.tail().map(|t| t.timestamp >= expire_before).unwrap_or(false))
        });
        let evicted = before - self.groups.len();
        if evicted > 0 {
            metrics::counter!("burrow_store_groups_swept_total").increment(evicted as u64);
            tracing::info!(shard = self.id, evicted, "swept expired groups");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burrow_bus::BusHandle;
    use std::time::Duration;

    fn test_cfg(clusters: Vec<ClusterId>) -> StoreConfig {
        StoreConfig { shard_count: 1, window: 15, min_distance_secs: 1, expire_group_secs: 100, clusters, ..StoreConfig::default() }
    }

    async fn single_shard(cfg: StoreConfig) -> BusHandle {
        let (tx, rx) = mpsc::channel(cfg.queue_depth.max(8));
        let broker = BrokerRegistry::new(cfg.clusters.clone());
        let worker = ShardWorker::new(0, rx, broker, cfg.clone());
        tokio::spawn(worker.run());
        BusHandle::new(vec![tx], cfg.queue_send_timeout, cfg.fetch_timeout)
    }

    #[tokio::test]
    async fn delete_group_then_fetch_is_not_found() {
        let cluster = ClusterId::from("c");
        let bus = single_shard(test_cfg(vec![cluster.clone()])).await;
        bus.store_consumer_offset(cluster.clone(), GroupId::from("g"), "t".into(), 0, 10, 1_000).await.unwrap();
        assert!(bus.fetch_consumer(cluster.clone(), GroupId::from("g")).await.unwrap().is_some());
        assert!(bus.delete_group(cluster.clone(), GroupId::from("g")).await.unwrap());
        assert!(bus.fetch_consumer(cluster.clone(), GroupId::from("g")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ring_tail_tracks_last_accepted_sample() {
        let cluster = ClusterId::from("c");
        let bus = single_shard(test_cfg(vec![cluster.clone()])).await;
        for i in 0..20 {
            bus.store_consumer_offset(cluster.clone(), GroupId::from("g"), "t".into(), 0, 100 + i, 1_000 + i * 10).await.unwrap();
        }
        let snapshot = bus.fetch_consumer(cluster.clone(), GroupId::from("g")).await.unwrap().unwrap();
        let ring = snapshot.rings.get(&TopicPartition::new("t", 0)).unwrap();
        assert_eq!(ring.len(), 15);
        assert_eq!(ring.last().unwrap().offset, 119);
    }

    #[tokio::test]
    async fn ordered_store_accepts_the_sequence_number() {
        let cluster = ClusterId::from("c");
        let bus = single_shard(test_cfg(vec![cluster.clone()])).await;
        bus.store_consumer_offset_ordered(cluster.clone(), GroupId::from("g"), "t".into(), 0, 10, 1_000, Some(7)).await.unwrap();
        let snapshot = bus.fetch_consumer(cluster, GroupId::from("g")).await.unwrap().unwrap();
        assert_eq!(snapshot.rings.get(&TopicPartition::new("t", 0)).unwrap().last().unwrap().offset, 10);
    }

    #[tokio::test]
    async fn broker_offset_seen_by_later_commits_on_same_shard() {
        let cluster = ClusterId::from("c");
        let bus = single_shard(test_cfg(vec![cluster.clone()])).await;
        bus.store_broker_offset(cluster.clone(), "t".into(), 0, 500, 1).await.unwrap();
        bus.store_consumer_offset(cluster.clone(), GroupId::from("g"), "t".into(), 0, 400, 2_000).await.unwrap();
        let snapshot = bus.fetch_consumer(cluster, GroupId::from("g")).await.unwrap().unwrap();
        let ring = snapshot.rings.get(&TopicPartition::new("t", 0)).unwrap();
        assert_eq!(ring.last().unwrap().lag, 100);
    }

    #[tokio::test]
    async fn sweep_evicts_groups_older_than_expire() {
        let mut cfg = test_cfg(vec![ClusterId::from("c")]);
        cfg.expire_group_secs = 1;
        let cluster = ClusterId::from("c");

        let (tx, rx) = mpsc::channel(8);
        let broker = BrokerRegistry::new(cfg.clusters.clone());
        let mut worker = ShardWorker::new(0, rx, broker, cfg.clone());
        worker.store_consumer_offset(cluster.clone(), GroupId::from("g"), "t".into(), 0, 1, 1);
        worker.sweep(10_000);
        assert!(worker.groups.is_empty());
        drop(tx);
    }

    #[tokio::test]
    async fn unknown_group_fetch_after_no_commits_is_none() {
        let bus = single_shard(test_cfg(vec![ClusterId::from("c")])).await;
        let res = bus.fetch_consumer(ClusterId::from("c"), GroupId::from("ghost")).await.unwrap();
        assert!(res.is_none());
        let _ = Duration::from_secs(0);
    }
}
