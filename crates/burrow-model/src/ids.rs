use std::fmt;
use std::sync::Arc;

macro_rules! interned_id {
    ($name:ident) => {
        #[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                $name(Arc::from(s))
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                $name(Arc::from(s.as_str()))
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }
    };
}

interned_id!(ClusterId);
interned_id!(GroupId);
interned_id!(TopicName);

/// The Kafka partition index within a topic. Signed to match upstream Kafka's own wire type.
pub type PartitionId = i32;

/// Owning key of a [`super::ring::ConsumerRing`] inside a store shard: the (topic, partition)
/// it tracks commits for.
///
/// Serializes as a single `"topic:partition"` string rather than a struct, so a
/// `BTreeMap<TopicPartition, _>` (as in [`crate::status::ConsumerSnapshot`]) serializes as a
/// plain JSON object instead of tripping `serde_json`'s "map keys must be strings" error.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug)]
pub struct TopicPartition {
    pub topic: TopicName,
    pub partition: PartitionId,
}

impl TopicPartition {
    pub fn new(topic: impl Into<TopicName>, partition: PartitionId) -> Self {
        TopicPartition { topic: topic.into(), partition }
    }
}

impl fmt::Display for TopicPartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.topic, self.partition)
    }
}

impl serde::Serialize for TopicPartition {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for TopicPartition {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let (topic, partition) = raw.rsplit_once(':').ok_or_else(|| {
            serde::de::Error::custom("expected \"topic:partition\"")
        })?;
        let partition = partition.parse().map_err(serde::de::Error::custom)?;
        Ok(TopicPartition { topic: TopicName::from(topic), partition })
    }
}

/// Key identifying a consumer group, unique within a shard's owned map.
#[derive(Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Debug, serde::Serialize, serde::Deserialize)]
pub struct GroupKey {
    pub cluster: ClusterId,
    pub group: GroupId,
}

impl GroupKey {
    pub fn new(cluster: impl Into<ClusterId>, group: impl Into<GroupId>) -> Self {
        GroupKey { cluster: cluster.into(), group: group.into() }
    }
}
