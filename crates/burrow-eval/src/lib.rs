//! The sliding-window rule engine that classifies a consumer group's health without an absolute
//! lag threshold. See `spec.md` §4.3 for the rules this module implements verbatim, and
//! `SPEC_FULL.md` §4.3 for the Rust-specific framing.
//!
//! [`evaluate_partition`] is a pure function of a `&[ConsumerOffset]` slice (not of a ring or a
//! store), so it can be exercised directly by tests and by [`evaluate_group`] alike, and gives
//! the "evaluator is a pure function of its input snapshot" invariant (`spec.md` §8.4) for free.

use burrow_model::{
    ConsumerOffset, ConsumerSnapshot, GroupStatus, PartitionId, PartitionStatus, Severity,
    StatusReason,
};

/// Parameters the evaluator needs beyond the samples themselves. Derived from the process
/// configuration (`spec.md` §6) at query time.
#[derive(Clone, Copy, Debug)]
pub struct EvalConfig {
    /// `min-distance`, seconds.
    pub min_distance_secs: i64,
    /// `expire-group`, seconds.
    pub expire_group_secs: i64,
    /// `W`, the ring's configured window size.
    pub window: usize,
}

impl EvalConfig {
    fn min_distance_ms(&self) -> i64 {
        self.min_distance_secs * 1000
    }

    /// `min-window`: the shortest window duration the Stall/Warning rules will act on.
    /// `SPEC_FULL.md` §4.3 derives this as `2 * min-distance`, matching the "Minimum-samples
    /// rule" already stated in `spec.md` §4.3.
    fn min_window_ms(&self) -> i64 {
        self.min_distance_ms() * 2
    }
}

/// Classifies a single partition's window of samples (oldest first) into a [`PartitionStatus`].
/// Returns `None` if the ring is empty (`NotFound`, omitted per `spec.md` §4.3).
pub fn evaluate_partition(
    partition: PartitionId,
    owner: Option<String>,
    samples: &[ConsumerOffset],
    cfg: &EvalConfig,
) -> Option<PartitionStatus> {
    let (&head, &tail) = match (samples.first(), samples.last()) {
        (Some(h), Some(t)) => (h, t),
        _ => return None,
    };

    let finish = |status: StatusReason, severity: Severity| PartitionStatus {
        partition,
        status,
        severity,
        start: head,
        end: tail,
        current_lag: tail.lag,
        owner: owner.clone(),
    };

    // Minimum-samples rule: fewer than 2 samples, or a window too young to judge, is OK.
    let window_duration_ms = tail.timestamp - head.timestamp;
    if samples.len() < 2 || window_duration_ms < cfg.min_window_ms() {
        return Some(finish(StatusReason::Ok, Severity::Ok));
    }

    // Rewind: any sample after the head has a lower offset than its predecessor.
    if samples.windows(2).any(|w| w[1].offset < w[0].offset) {
        return Some(finish(StatusReason::Rewind, Severity::Err));
    }

    let all_same_offset = samples.iter().all(|s| s.offset == head.offset);
    if all_same_offset {
        let stop_window_ms = (cfg.expire_group_secs * 1000) / 2;
        if window_duration_ms >= stop_window_ms && head.leo < tail.leo {
            return Some(finish(StatusReason::Stop, Severity::Err));
        }
        if tail.lag > 0 && window_duration_ms >= cfg.min_window_ms() {
            // Downgrade to WARN when the window hasn't yet filled to the configured size.
            let severity =
                if samples.len() < cfg.window { Severity::Warn } else { Severity::Err };
            return Some(finish(StatusReason::Stall, severity));
        }
        return Some(finish(StatusReason::Ok, Severity::Ok));
    }

    let offsets_strictly_increasing = samples.windows(2).all(|w| w[1].offset > w[0].offset);
    let lag_non_decreasing = samples.windows(2).all(|w| w[1].lag >= w[0].lag);
    if offsets_strictly_increasing && lag_non_decreasing && tail.lag > head.lag {
        return Some(finish(StatusReason::Warning, Severity::Warn));
    }

    Some(finish(StatusReason::Ok, Severity::Ok))
}

/// Classifies an entire group from a copied-out [`ConsumerSnapshot`], per `spec.md` §4.3's
/// "overall status is the max severity across partitions".
pub fn evaluate_group(cluster: &str, group: &str, snapshot: &ConsumerSnapshot, cfg: &EvalConfig) -> GroupStatus {
    let mut partitions: Vec<PartitionStatus> = snapshot
        .rings
        .iter()
        .filter_map(|(tp, samples)| evaluate_partition(tp.partition, None, samples, cfg))
        .collect();
    partitions.sort_by_key(|p| p.partition);

    let status = partitions.iter().map(|p| p.severity).max().unwrap_or(Severity::Ok);
    let total_lag = partitions.iter().map(|p| p.current_lag.max(0)).sum();

    GroupStatus { cluster: cluster.to_string(), group: group.to_string(), status, partitions, total_lag }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CFG: EvalConfig = EvalConfig { min_distance_secs: 1, expire_group_secs: 120, window: 15 };

    fn samples_with_offsets_and_leo(
        offsets: &[i64],
        step_ms: i64,
        leo_at: impl Fn(usize) -> i64,
    ) -> Vec<ConsumerOffset> {
        offsets
            .iter()
            .enumerate()
            .map(|(i, &offset)| ConsumerOffset::new(offset, (i as i64 + 1) * step_ms, Some(leo_at(i))))
            .collect()
    }

    #[test]
    fn stop_when_offsets_never_move_and_leo_advances() {
        // broker LEO: (t=0,100) .. (t=56,200); consumer commits offset=50 x15 every 4s.
        let cfg = EvalConfig { expire_group_secs: 112, ..CFG };
        let offsets = vec![50i64; 15];
        let samples = samples_with_offsets_and_leo(&offsets, 4_000, |i| 100 + (i as i64 * 100 / 14));
        let status = evaluate_partition(0, None, &samples, &cfg).unwrap();
        assert_eq!(status.status, StatusReason::Stop);
        assert_eq!(status.severity, Severity::Err);
    }

    #[test]
    fn stall_when_offsets_never_move_but_leo_constant() {
        let offsets = vec![80i64; 15];
        let samples = samples_with_offsets_and_leo(&offsets, 4_000, |_| 100);
        let status = evaluate_partition(0, None, &samples, &CFG).unwrap();
        assert_eq!(status.status, StatusReason::Stall);
        assert_eq!(status.severity, Severity::Err);
        assert_eq!(status.current_lag, 20);
    }

    #[test]
    fn stall_downgrades_to_warn_below_window_size() {
        let cfg = EvalConfig { window: 15, ..CFG };
        let offsets = vec![80i64; 5];
        let samples = samples_with_offsets_and_leo(&offsets, 4_000, |_| 100);
        let status = evaluate_partition(0, None, &samples, &cfg).unwrap();
        assert_eq!(status.status, StatusReason::Stall);
        assert_eq!(status.severity, Severity::Warn);
    }

    #[test]
    fn rewind_detected() {
        let offsets = vec![100, 110, 120, 115, 130, 140];
        let samples = samples_with_offsets_and_leo(&offsets, 4_000, |_| 500);
        let status = evaluate_partition(0, None, &samples, &CFG).unwrap();
        assert_eq!(status.status, StatusReason::Rewind);
        assert_eq!(status.severity, Severity::Err);
    }

    #[test]
    fn warning_when_lag_grows_while_offsets_increase() {
        let offsets: Vec<i64> = (100..=170).step_by(10).collect();
        let leos: Vec<i64> = (200..=400).step_by(25).collect();
        let samples: Vec<ConsumerOffset> = offsets
            .iter()
            .zip(leos.iter())
            .enumerate()
            .map(|(i, (&offset, &leo))| ConsumerOffset::new(offset, (i as i64 + 1) * 4_000, Some(leo)))
            .collect();
        let status = evaluate_partition(0, None, &samples, &CFG).unwrap();
        assert_eq!(status.status, StatusReason::Warning);
        assert_eq!(status.severity, Severity::Warn);
    }

    #[test]
    fn plateau_then_resume_is_ok_not_warning() {
        let offsets = [100i64, 100, 110];
        let leos = [400i64, 500, 620];
        let samples: Vec<ConsumerOffset> = offsets
            .iter()
            .zip(leos.iter())
            .enumerate()
            .map(|(i, (&offset, &leo))| ConsumerOffset::new(offset, (i as i64 + 1) * 4_000, Some(leo)))
            .collect();
        let status = evaluate_partition(0, None, &samples, &CFG).unwrap();
        assert_eq!(status.status, StatusReason::Ok);
        assert_eq!(status.severity, Severity::Ok);
    }

    #[test]
    fn ok_when_lag_is_constant() {
        let offsets: Vec<i64> = (100..=240).step_by(10).collect();
        let samples: Vec<ConsumerOffset> = offsets
            .iter()
            .enumerate()
            .map(|(i, &offset)| ConsumerOffset::new(offset, (i as i64 + 1) * 4_000, Some(offset + 100)))
            .collect();
        let status = evaluate_partition(0, None, &samples, &CFG).unwrap();
        assert_eq!(status.status, StatusReason::Ok);
        assert_eq!(status.severity, Severity::Ok);
    }

    #[test]
    fn empty_ring_is_not_found() {
        assert!(evaluate_partition(0, None, &[], &CFG).is_none());
    }

    #[test]
    fn single_sample_is_ok_regardless() {
        let samples = vec![ConsumerOffset::new(50, 1_000, Some(500))];
        let status = evaluate_partition(0, None, &samples, &CFG).unwrap();
        assert_eq!(status.status, StatusReason::Ok);
    }

    #[test]
    fn young_ring_is_ok_regardless_of_shape() {
        // Two samples only 500ms apart: younger than min-distance*2 (2000ms).
        let samples = vec![
            ConsumerOffset::new(100, 1_000, Some(500)),
            ConsumerOffset::new(90, 1_500, Some(500)),
        ];
        let status = evaluate_partition(0, None, &samples, &CFG).unwrap();
        assert_eq!(status.status, StatusReason::Ok);
    }

    #[test]
    fn overall_group_status_is_max_severity_across_partitions() {
        use burrow_model::{ConsumerSnapshot, TopicPartition};

        let mut rings = std::collections::BTreeMap::new();
        rings.insert(
            TopicPartition::new("t", 0),
            samples_with_offsets_and_leo(&[80i64; 15], 4_000, |_| 100),
        );
        let offsets: Vec<i64> = (100..=240).step_by(10).collect();
        rings.insert(
            TopicPartition::new("t", 1),
            offsets
                .iter()
                .enumerate()
                .map(|(i, &offset)| ConsumerOffset::new(offset, (i as i64 + 1) * 4_000, Some(offset + 100)))
                .collect(),
        );
        let snapshot = ConsumerSnapshot { rings };
        let status = evaluate_group("c", "g", &snapshot, &CFG);
        assert_eq!(status.status, Severity::Err);
        assert_eq!(status.partitions.len(), 2);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn pure_function_of_snapshot(
            offsets in proptest::collection::vec(0i64..1000, 1..20),
            leo in 0i64..2000,
        ) {
            let samples = samples_with_offsets_and_leo(&offsets, 4_000, |_| leo);
            let a = evaluate_partition(0, None, &samples, &CFG);
            let b = evaluate_partition(0, None, &samples, &CFG);
            prop_assert_eq!(a, b);
        }
    }
}
