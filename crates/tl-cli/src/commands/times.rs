//! `tl times [prefix]`: day, pause and per-job totals for today.

use std::io::Write;

use anyhow::Result;
use tl_core::{Clock, DayLog, DaySummary, JobId, summarize};

use super::util::format_duration;
use crate::session::Session;

/// Summarizes today's log as of now.
pub fn run<W: Write>(
    writer: &mut W,
    session: &Session,
    prefix: Option<&str>,
) -> Result<()> {
    let empty = DayLog::new();
    let log = session.today().unwrap_or(&empty);
    let summary = summarize(log, session.clock().timestamp_now());
    render(writer, &summary, prefix)
}

/// Writes a summary in the human-readable report format.
pub fn render<W: Write>(writer: &mut W, summary: &DaySummary, prefix: Option<&str>) -> Result<()> {
    if !summary.started {
        writeln!(writer, "Day not started.")?;
        return Ok(());
    }

    let label = if summary.day_ended { "Day" } else { "Day so far" };
    writeln!(
        writer,
        "{label}: {}, pause: {}",
        format_duration(summary.total_day),
        format_duration(summary.total_pause)
    )?;

    for job in &summary.jobs {
        let time = format_duration(job.seconds);
        if job.in_progress {
            writeln!(
                writer,
                "Job \"{}\" still in progress, time until now: {time}",
                job.id
            )?;
        } else {
            writeln!(writer, "Job \"{}\": {time}", job.id)?;
        }
    }

    let unassigned = summary.unassigned();
    if unassigned > 0 {
        writeln!(writer, "Unassigned time: {}", format_duration(unassigned))?;
    }

    if let Some(prefix) = prefix {
        let listing: Vec<&str> = summary.jobs_with_prefix(prefix).map(JobId::as_str).collect();
        writeln!(writer, "Job listing: {}", listing.join(", "))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Local, TimeZone};
    use insta::assert_snapshot;
    use tl_core::{DayKey, Event, FixedClock, JobId, LogStore};
    use tl_store::JsonStore;

    fn job(id: &str) -> JobId {
        JobId::new(id).unwrap()
    }

    fn render_to_string(summary: &DaySummary, prefix: Option<&str>) -> String {
        let mut output = Vec::new();
        render(&mut output, summary, prefix).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn finished_day_report() {
        let log: DayLog = [
            Event::day_start(0),
            Event::job_start(0, job("coding")),
            Event::day_pause(3_600),
            Event::day_back(3_900),
            Event::job_stop(7_500, job("coding")),
            Event::day_stop(7_500),
        ]
        .into_iter()
        .collect();

        let output = render_to_string(&summarize(&log, 10_000), None);
        assert_snapshot!(output, @r#"
        Day: 2h 0min, pause: 0h 5min
        Job "coding": 2h 0min
        "#);
    }

    #[test]
    fn open_day_report_with_listing() {
        let log: DayLog = [
            Event::day_start(0),
            Event::job_start(600, job("proj-api")),
            Event::job_stop(2_400, job("proj-api")),
            Event::job_start(2_400, job("mail")),
            Event::job_stop(3_000, job("mail")),
            Event::job_start(3_000, job("proj-ui")),
        ]
        .into_iter()
        .collect();

        let output = render_to_string(&summarize(&log, 5_400), Some("proj"));
        assert_snapshot!(output, @r#"
        Day so far: 1h 30min, pause: 0h 0min
        Job "proj-api": 0h 30min
        Job "mail": 0h 10min
        Job "proj-ui" still in progress, time until now: 0h 40min
        Unassigned time: 0h 10min
        Job listing: proj-api, proj-ui
        "#);
    }

    #[test]
    fn day_not_started() {
        let output = render_to_string(&DaySummary::default(), Some("x"));
        assert_eq!(output, "Day not started.\n");
    }

    #[test]
    fn run_uses_todays_log_and_clock() {
        let mut log = LogStore::new();
        let nine = Local.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).single().unwrap();
        log.day_mut(DayKey::new(2026, 3, 10))
            .append(Event::day_start(nine.timestamp()));
        let clock = FixedClock::new(Local.with_ymd_and_hms(2026, 3, 10, 11, 15, 30).single().unwrap());
        let session = Session::from_parts(JsonStore::new("unused.json"), log, &clock);

        let mut output = Vec::new();
        run(&mut output, &session, None).unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "Day so far: 2h 15min, pause: 0h 0min\n"
        );
    }
}
