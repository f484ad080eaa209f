use std::collections::BTreeMap;

use crate::ids::{GroupKey, TopicPartition};
use crate::offsets::ConsumerOffset;

/// Overall severity of a group or partition, per `spec.md` §4.3.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Ok,
    Warn,
    Err,
}

/// The sub-status a partition was classified into. `NotFound` is never surfaced as a partition
/// entry (an empty ring is omitted, per `spec.md` §4.3); it exists so evaluator-internal code can
/// name "no data yet" without an `Option<PartitionStatus>` at every call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StatusReason {
    NotFound,
    Ok,
    Warning,
    Stall,
    Stop,
    Rewind,
}

impl StatusReason {
    pub fn severity(self) -> Severity {
        match self {
            StatusReason::NotFound | StatusReason::Ok => Severity::Ok,
            StatusReason::Warning => Severity::Warn,
            StatusReason::Stall | StatusReason::Stop | StatusReason::Rewind => Severity::Err,
        }
    }
}

/// Per-partition evaluator output, per `spec.md` §4.3.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PartitionStatus {
    pub partition: crate::ids::PartitionId,
    pub status: StatusReason,
    /// The severity this partition contributes to the group's overall status. Usually
    /// `status.severity()`, except `Stall` is downgraded to `Warn` when the window held fewer
    /// than `W` samples (`spec.md` §4.3).
    pub severity: Severity,
    /// First sample in the evaluated window.
    pub start: ConsumerOffset,
    /// Last (tail) sample in the evaluated window.
    pub end: ConsumerOffset,
    pub current_lag: i64,
    pub owner: Option<String>,
}

/// Overall evaluator output for a group, per `spec.md` §4.3.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GroupStatus {
    pub cluster: String,
    pub group: String,
    pub status: Severity,
    pub partitions: Vec<PartitionStatus>,
    pub total_lag: i64,
}

/// A copied-out view of every ring owned by a group, handed from the store to the evaluator
/// (or to an HTTP handler) across the shard boundary. Never holds references into shard state
/// (`spec.md` §4.2, "Fetch*").
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct ConsumerSnapshot {
    pub rings: BTreeMap<TopicPartition, Vec<ConsumerOffset>>,
}

impl ConsumerSnapshot {
    pub fn is_empty(&self) -> bool {
        self.rings.values().all(|samples| samples.is_empty())
    }
}

/// Identifies the owner of a snapshot for reporting purposes.
#[derive(Clone, Debug)]
pub struct GroupSnapshot {
    pub key: GroupKey,
    pub snapshot: ConsumerSnapshot,
}
