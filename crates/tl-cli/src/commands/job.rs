//! `tl job start|stop <id>`.

use std::io::Write;

use anyhow::Result;
use tl_core::{JobId, Prompt, effective_timestamp};

use super::util::write_outcomes;
use crate::JobAction;
use crate::session::Session;

/// Starts or stops a job in today's log.
pub fn run<W: Write>(
    writer: &mut W,
    session: &mut Session,
    action: &JobAction,
    prompt: &mut dyn Prompt,
) -> Result<()> {
    let id = JobId::new(action.id())?;
    let at = effective_timestamp(session.clock(), action.offset())?;

    let outcomes = session.update_today(|controller| match action {
        JobAction::Start { .. } => controller.start_job(id, at, prompt),
        JobAction::Stop { .. } => controller.stop_job(id, at),
    })?;

    write_outcomes(writer, &outcomes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use tl_core::{AutoStop, DayKey, DayLog, Event, EventKind, FixedClock, LogStore};
    use tl_store::JsonStore;

    fn session_with(dir: &tempfile::TempDir, events: Vec<Event>) -> Session {
        let clock =
            FixedClock::new(Local.with_ymd_and_hms(2026, 3, 10, 11, 0, 0).single().unwrap());
        let mut log = LogStore::new();
        *log.day_mut(DayKey::new(2026, 3, 10)) = events.into_iter().collect::<DayLog>();
        Session::from_parts(JsonStore::new(dir.path().join("timedb.json")), log, &clock)
    }

    fn start(id: &str) -> JobAction {
        JobAction::Start {
            id: id.to_string(),
            offset: None,
        }
    }

    fn stop(id: &str) -> JobAction {
        JobAction::Stop {
            id: id.to_string(),
            offset: None,
        }
    }

    fn output_of(
        session: &mut Session,
        action: &JobAction,
    ) -> Result<String> {
        let mut output = Vec::new();
        run(&mut output, session, action, &mut AutoStop)?;
        Ok(String::from_utf8(output)?)
    }

    #[test]
    fn switching_jobs_stops_the_running_one() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(&dir, vec![Event::day_start(0)]);

        assert_eq!(output_of(&mut session, &start("a")).unwrap(), "Started job a\n");
        assert_eq!(
            output_of(&mut session, &start("b")).unwrap(),
            "Stopped job a\nStarted job b\n"
        );

        let kinds: Vec<_> = session
            .today()
            .unwrap()
            .events()
            .iter()
            .map(Event::kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::DayStart,
                EventKind::JobStart,
                EventKind::JobStop,
                EventKind::JobStart,
            ]
        );
    }

    #[test]
    fn stopping_unknown_job_is_reported_and_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(&dir, vec![Event::day_start(0)]);

        assert_eq!(
            output_of(&mut session, &stop("ghost")).unwrap(),
            "No such job: ghost\n"
        );
        assert!(!session.is_dirty());
    }

    #[test]
    fn job_start_before_day_start_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(&dir, Vec::new());

        let err = output_of(&mut session, &start("a")).unwrap_err();
        assert_eq!(err.to_string(), "can't start jobs if the day is not started");
        assert!(!session.is_dirty());
    }

    #[test]
    fn empty_job_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session_with(&dir, vec![Event::day_start(0)]);

        let err = output_of(&mut session, &start("")).unwrap_err();
        assert_eq!(err.to_string(), "job ID cannot be empty");
    }
}
