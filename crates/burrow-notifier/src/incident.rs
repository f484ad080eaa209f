use burrow_model::Severity;
use uuid::Uuid;

/// Per-group incident bookkeeping the Notifier holds between ticks (`spec.md` §3
/// "IncidentState"). Cleared entirely when a group returns to OK.
#[derive(Clone, Debug)]
pub struct IncidentState {
    pub incident_id: Uuid,
    pub last_status: Severity,
    pub first_seen_ms: i64,
    pub last_send_ms: i64,
}

/// What the Notifier should do about a group this tick, per `spec.md` §4.4's numbered policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Open,
    Reminder,
    Change,
    Close,
}

/// Pure policy function: given the previous incident (if any), the group's freshly evaluated
/// severity, the current time, and the configured reminder cadence, decides what (if anything)
/// to dispatch. Holds no state of its own so it is unit-testable without a running ticker
/// (`SPEC_FULL.md` §4.4).
pub fn decide(prev: Option<&IncidentState>, severity: Severity, now_ms: i64, send_interval_ms: i64) -> Option<Decision> {
    match (prev, severity) {
        (None, Severity::Ok) => None,
        (None, _) => Some(Decision::Open),
        (Some(_), Severity::Ok) => Some(Decision::Close),
        (Some(state), _) if state.last_status != severity => Some(Decision::Change),
        (Some(state), _) if state.last_send_ms + send_interval_ms <= now_ms => Some(Decision::Reminder),
        (Some(_), _) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(status: Severity, first_seen: i64, last_send: i64) -> IncidentState {
        IncidentState { incident_id: Uuid::nil(), last_status: status, first_seen_ms: first_seen, last_send_ms: last_send }
    }

    #[test]
    fn first_non_ok_observation_opens() {
        assert_eq!(decide(None, Severity::Warn, 1_000, 60_000), Some(Decision::Open));
    }

    #[test]
    fn staying_ok_with_no_prior_incident_does_nothing() {
        assert_eq!(decide(None, Severity::Ok, 1_000, 60_000), None);
    }

    #[test]
    fn continued_non_ok_before_send_interval_does_nothing() {
        let prev = state(Severity::Warn, 0, 0);
        assert_eq!(decide(Some(&prev), Severity::Warn, 30_000, 60_000), None);
    }

    #[test]
    fn continued_non_ok_after_send_interval_reminds() {
        let prev = state(Severity::Warn, 0, 0);
        assert_eq!(decide(Some(&prev), Severity::Warn, 60_000, 60_000), Some(Decision::Reminder));
    }

    #[test]
    fn severity_change_dispatches_change_even_before_send_interval() {
        let prev = state(Severity::Warn, 0, 0);
        assert_eq!(decide(Some(&prev), Severity::Err, 1_000, 60_000), Some(Decision::Change));
    }

    #[test]
    fn return_to_ok_closes() {
        let prev = state(Severity::Err, 0, 0);
        assert_eq!(decide(Some(&prev), Severity::Ok, 1_000, 60_000), Some(Decision::Close));
    }
}
