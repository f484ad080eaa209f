//! Shared data model for Burrow: identifiers, offset samples, the consumer ring, and the
//! evaluator's status types. Kept dependency-free (besides `serde`/`uuid`) so every other crate
//! in the workspace can depend on it without pulling in tokio or axum.

pub mod hash;
pub mod ids;
pub mod offsets;
pub mod ring;
pub mod status;

pub use hash::{shard_for, shard_for_cluster, stable_hash, stable_hash_pair};
pub use ids::{ClusterId, GroupId, GroupKey, PartitionId, TopicName, TopicPartition};
pub use offsets::{ClusterOffset, ConsumerOffset};
pub use ring::{ConsumerRing, PushOutcome, DEFAULT_WINDOW};
pub use status::{ConsumerSnapshot, GroupSnapshot, GroupStatus, PartitionStatus, Severity, StatusReason};
