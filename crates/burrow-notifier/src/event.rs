use burrow_model::{PartitionStatus, Severity};
use uuid::Uuid;

/// A dispatchable notifier event, per `spec.md` §6 "Notifier event payload":
/// `{id, group, cluster, start, last, status, complete, partitions[]}`.
#[derive(Clone, Debug, serde::Serialize)]
pub struct NotifierEvent {
    pub id: Uuid,
    pub cluster: String,
    pub group: String,
    /// First-seen timestamp of the incident, milliseconds.
    pub start: i64,
    /// This tick's timestamp, milliseconds.
    pub last: i64,
    /// What triggered this dispatch.
    pub kind: EventKind,
    pub status: Severity,
    /// `true` only for a CLOSE event.
    pub complete: bool,
    pub partitions: Vec<PartitionStatus>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventKind {
    Open,
    Reminder,
    Change,
    Close,
}
