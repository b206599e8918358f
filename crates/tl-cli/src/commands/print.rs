//! `tl print`: today's events, one per line.

use std::io::Write;

use anyhow::Result;
use tl_core::DayLog;

use super::util::format_clock;
use crate::session::Session;

pub fn run<W: Write>(writer: &mut W, session: &Session) -> Result<()> {
    match session.today() {
        Some(log) if !log.is_empty() => render(writer, log),
        _ => {
            writeln!(writer, "No events recorded today.")?;
            Ok(())
        }
    }
}

fn render<W: Write>(writer: &mut W, log: &DayLog) -> Result<()> {
    for event in log.chronological() {
        let time = format_clock(event.timestamp());
        match event.job_id() {
            Some(id) => writeln!(writer, "{time} - {} {id}", event.kind())?,
            None => writeln!(writer, "{time} - {}", event.kind())?,
        }
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

    fn at(hour: u32, minute: u32) -> i64 {
        Local
            .with_ymd_and_hms(2026, 3, 10, hour, minute, 0)
            .single()
            .unwrap()
            .timestamp()
    }

    #[test]
    fn print_lists_events_with_local_times() {
        let coding = JobId::new("coding").unwrap();
        let mut log = LogStore::new();
        let day = log.day_mut(DayKey::new(2026, 3, 10));
        day.append(Event::day_start(at(8, 30)));
        day.append(Event::job_start(at(8, 30), coding.clone()));
        day.append(Event::day_pause(at(12, 0)));
        day.append(Event::day_back(at(12, 45)));
        day.append(Event::job_stop(at(17, 5), coding));
        day.append(Event::day_stop(at(17, 5)));

        let session = Session::from_parts(
            JsonStore::new("unused.json"),
            log,
            &FixedClock::new(Local.with_ymd_and_hms(2026, 3, 10, 18, 0, 0).single().unwrap()),
        );
        let mut output = Vec::new();
        run(&mut output, &session).unwrap();

        assert_snapshot!(String::from_utf8(output).unwrap(), @r"
        08:30 - Starting day
        08:30 - Starting job coding
        12:00 - Starting pause
        12:45 - Back from pause
        17:05 - Stopping job coding
        17:05 - Stopping day
        ");
    }

    #[test]
    fn print_empty_day() {
        let session = Session::from_parts(
            JsonStore::new("unused.json"),
            LogStore::new(),
            &FixedClock::new(Local.with_ymd_and_hms(2026, 3, 10, 18, 0, 0).single().unwrap()),
        );
        let mut output = Vec::new();
        run(&mut output, &session).unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "No events recorded today.\n");
    }
}
