use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use burrow_bus::BusHandle;
use burrow_eval::{evaluate_group, EvalConfig};
use burrow_model::{ClusterId, GroupKey, Severity};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::config::NotifierConfig;
use crate::event::{EventKind, NotifierEvent};
use crate::filter::NotifierFilter;
use crate::incident::{decide, Decision, IncidentState};
use crate::sink::Sink;

fn now_ms() -> i64 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as i64
}

/// One notifier worker (`spec.md` §4.4): ticks on `interval`, evaluates every group across the
/// configured clusters, applies incident policy, and dispatches to its sinks. `incidents` is
/// owned solely by this task's run loop — no locking, matching the rest of the core's
/// message-passing concurrency model.
pub struct Notifier {
    cfg: NotifierConfig,
    clusters: Vec<ClusterId>,
    bus: BusHandle,
    eval_cfg: EvalConfig,
    filter: NotifierFilter,
    sinks: Vec<Box<dyn Sink>>,
    incidents: HashMap<GroupKey, IncidentState>,
}

impl Notifier {
    pub fn new(
        cfg: NotifierConfig,
        clusters: Vec<ClusterId>,
        bus: BusHandle,
        eval_cfg: EvalConfig,
        filter: NotifierFilter,
        sinks: Vec<Box<dyn Sink>>,
    ) -> Self {
        Notifier { cfg, clusters, bus, eval_cfg, filter, sinks, incidents: HashMap::new() }
    }

    /// Runs the tick loop until `shutdown` fires (`SPEC_FULL.md` §4.5).
    pub async fn run(mut self, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.cfg.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick(now_ms()).await,
                _ = shutdown.recv() => break,
            }
        }
        tracing::debug!(notifier = %self.cfg.name, "notifier stopped");
    }

    async fn tick(&mut self, now: i64) {
        for cluster in self.clusters.clone() {
            let groups = self.bus.fetch_group_list(cluster.clone()).await;
            for group in groups {
                let Ok(Some(snapshot)) = self.bus.fetch_consumer(cluster.clone(), group.clone()).await else {
                    continue;
                };
                if snapshot.is_empty() {
                    continue;
                }
                let status = evaluate_group(cluster.as_str(), group.as_str(), &snapshot, &self.eval_cfg);
                let key = GroupKey { cluster: cluster.clone(), group: group.clone() };

                if !self.filter.group_allowed(group.as_str()) {
                    continue;
                }
                let decision = decide(self.incidents.get(&key), status.status, now, self.cfg.send_interval.as_millis() as i64);
                let Some(decision) = decision else { continue };
                if decision != Decision::Close && !self.filter.severity_allowed(status.status) {
                    continue;
                }

                let event = self.apply(&key, decision, status.status, now, status.partitions.clone());

                for sink in &self.sinks {
                    if let Err(err) = sink.dispatch(&event).await {
                        metrics::counter!("burrow_notifier_dispatch_failures_total", "sink" => sink.name().to_string()).increment(1);
                        tracing::warn!(sink = sink.name(), group = %event.group, error = %err, "notifier sink dispatch failed");
                    } else {
                        metrics::counter!("burrow_notifier_dispatched_total", "sink" => sink.name().to_string()).increment(1);
                    }
                }
            }
        }
    }

    fn apply(
        &mut self,
        key: &GroupKey,
        decision: Decision,
        severity: Severity,
        now: i64,
        partitions: Vec<burrow_model::PartitionStatus>,
    ) -> NotifierEvent {
        let (id, start, kind) = match decision {
            Decision::Open => {
                let id = Uuid::new_v4();
                self.incidents.insert(key.clone(), IncidentState { incident_id: id, last_status: severity, first_seen_ms: now, last_send_ms: now });
                (id, now, EventKind::Open)
            }
            Decision::Reminder => {
                let state = self.incidents.get_mut(key).expect("reminder implies an open incident");
                state.last_send_ms = now;
                (state.incident_id, state.first_seen_ms, EventKind::Reminder)
            }
            Decision::Change => {
                let state = self.incidents.get_mut(key).expect("change implies an open incident");
                state.last_status = severity;
                state.last_send_ms = now;
                (state.incident_id, state.first_seen_ms, EventKind::Change)
            }
            Decision::Close => {
                let state = self.incidents.remove(key).expect("close implies an open incident");
                (state.incident_id, state.first_seen_ms, EventKind::Close)
            }
        };

        NotifierEvent {
            id,
            cluster: key.cluster.to_string(),
            group: key.group.to_string(),
            start,
            last: now,
            kind,
            status: severity,
            complete: kind == EventKind::Close,
            partitions,
        }
    }
}
