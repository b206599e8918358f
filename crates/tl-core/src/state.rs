//! Day status and running jobs, derived by replaying a day log.

use std::collections::BTreeSet;
use std::fmt;

use crate::event::{Event, EventKind};
use crate::log::DayLog;
use crate::types::JobId;

/// Where the day currently stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DayStatus {
    #[default]
    NotStarted,
    Started,
    OnPause,
    Stopped,
}

impl DayStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::Started => "started",
            Self::OnPause => "on pause",
            Self::Stopped => "stopped",
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived state of one day. Never stored; rebuilt from the log on demand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayState {
    status: DayStatus,
    jobs_in_progress: BTreeSet<JobId>,
}

impl DayState {
    /// Replays the day's events in chronological order.
    pub fn replay(log: &DayLog) -> Self {
        let mut state = Self::default();
        for event in log.chronological() {
            state.apply(event);
        }
        state
    }

    /// Applies a single event's transition.
    pub fn apply(&mut self, event: &Event) {
        match (event.kind(), event.job_id()) {
            (EventKind::DayStart | EventKind::DayBack, _) => self.status = DayStatus::Started,
            (EventKind::DayPause, _) => self.status = DayStatus::OnPause,
            (EventKind::DayStop, _) => self.status = DayStatus::Stopped,
            (EventKind::JobStart, Some(id)) => {
                self.jobs_in_progress.insert(id.clone());
            }
            (EventKind::JobStop, Some(id)) => {
                self.jobs_in_progress.remove(id);
            }
            (EventKind::JobStart | EventKind::JobStop, None) => {}
        }
    }

    pub const fn status(&self) -> DayStatus {
        self.status
    }

    /// Jobs with a start that has not been matched by a stop.
    pub const fn jobs_in_progress(&self) -> &BTreeSet<JobId> {
        &self.jobs_in_progress
    }

    pub fn is_in_progress(&self, id: &JobId) -> bool {
        self.jobs_in_progress.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(id: &str) -> JobId {
        JobId::new(id).unwrap()
    }

    #[test]
    fn empty_log_is_not_started() {
        let state = DayState::replay(&DayLog::new());
        assert_eq!(state.status(), DayStatus::NotStarted);
        assert!(state.jobs_in_progress().is_empty());
    }

    #[test]
    fn day_transitions() {
        let mut log = DayLog::new();
        let mut step = |event: Event, status: DayStatus| {
            log.append(event);
            assert_eq!(DayState::replay(&log).status(), status);
        };

        step(Event::day_start(0), DayStatus::Started);
        step(Event::day_pause(60), DayStatus::OnPause);
        step(Event::day_back(120), DayStatus::Started);
        step(Event::day_stop(180), DayStatus::Stopped);
    }

    #[test]
    fn jobs_in_progress_tracks_unmatched_starts() {
        let log: DayLog = [
            Event::day_start(0),
            Event::job_start(0, job("coding")),
            Event::job_start(60, job("review")),
            Event::job_stop(120, job("coding")),
        ]
        .into_iter()
        .collect();

        let state = DayState::replay(&log);
        assert!(state.is_in_progress(&job("review")));
        assert!(!state.is_in_progress(&job("coding")));
        assert_eq!(state.jobs_in_progress().len(), 1);
    }

    #[test]
    fn replay_is_deterministic() {
        let log: DayLog = [
            Event::day_start(0),
            Event::job_start(60, job("b")),
            Event::job_start(60, job("a")),
            Event::day_pause(120),
        ]
        .into_iter()
        .collect();

        let first = DayState::replay(&log);
        let second = DayState::replay(&log);
        assert_eq!(first, second);
        assert_eq!(first.status(), DayStatus::OnPause);
    }

    #[test]
    fn replay_follows_timestamps_not_append_order() {
        let log: DayLog = [
            Event::day_start(0),
            Event::day_back(600),
            Event::day_pause(300),
        ]
        .into_iter()
        .collect();

        assert_eq!(DayState::replay(&log).status(), DayStatus::Started);
    }
}
