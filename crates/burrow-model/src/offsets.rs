/// The broker-side state of a single (cluster, topic, partition): the most recently observed
/// log end offset, and when it was observed.
///
/// Invariant: a newer sample for the same key replaces the older one (see
/// [`ClusterOffset::maybe_update`]).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClusterOffset {
    /// Log end offset: the next offset a producer will write to this partition.
    pub leo: i64,
    /// Wall-clock milliseconds at which this LEO was observed.
    pub timestamp: i64,
}

impl ClusterOffset {
    pub fn new(leo: i64, timestamp: i64) -> Self {
        ClusterOffset { leo, timestamp }
    }

    /// Applies an incoming broker-offset sample, replacing the current value only if the
    /// incoming timestamp is strictly newer. Returns `true` if the value changed.
    pub fn maybe_update(&mut self, leo: i64, timestamp: i64) -> bool {
        if timestamp > self.timestamp {
            self.leo = leo;
            self.timestamp = timestamp;
            true
        } else {
            false
        }
    }
}

/// A single consumer-committed-offset sample, as stored in a [`crate::ring::ConsumerRing`].
///
/// `lag` and `leo` are captured at commit-arrival time and are never back-filled by later
/// broker-offset updates (see `SPEC_FULL.md` §4.2, the open question in `spec.md` §9).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConsumerOffset {
    pub offset: i64,
    /// Producer-supplied commit timestamp, milliseconds.
    pub timestamp: i64,
    /// `-1` if the broker LEO was unknown when this sample was stored.
    pub lag: i64,
    /// The broker LEO visible at commit-arrival time, or `-1` if unknown.
    pub leo: i64,
    /// Set when this sample's offset was lower than the ring's previous tail offset.
    pub rewind: bool,
}

impl ConsumerOffset {
    /// Computes lag from a possibly-unknown LEO, per `spec.md` §4.2's `StoreConsumerOffset` rule:
    /// `lag = max(0, LEO - offset)`, or `-1` if the LEO itself is unknown.
    pub fn new(offset: i64, timestamp: i64, leo: Option<i64>) -> Self {
        let (leo, lag) = match leo {
            Some(leo) => (leo, (leo - offset).max(0)),
            None => (-1, -1),
        };
        ConsumerOffset { offset, timestamp, lag, leo, rewind: false }
    }
}
