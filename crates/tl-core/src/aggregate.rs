//! Time aggregation over a day log.
//!
//! # Algorithm Summary
//!
//! A single forward pass over the chronologically sorted events keeps the
//! start of the current working (or pause) interval, the running day and
//! pause totals, and one accumulator per job.
//!
//! 1. Intervals ending at a pause or at the end of the day add to the day
//!    total.
//! 2. Pause intervals end when the user is back and add to the pause total.
//!    The same length is subtracted from every job running across the
//!    pause.
//! 3. An open day and running jobs are closed at `now` for display. A pause
//!    that is never ended with "back" is not booked as pause.
//!
//! Every event is visited, including events after a backdated day stop.

use std::collections::HashMap;

use crate::event::{EventKind, Timestamp};
use crate::log::DayLog;
use crate::types::JobId;

/// Time attributed to one job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTime {
    pub id: JobId,
    /// Seconds spent on the job, excluding ended pauses.
    pub seconds: i64,
    /// The job has not been stopped; `seconds` counts up to `now`.
    pub in_progress: bool,
}

/// Result of summarizing a day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySummary {
    /// A day start was recorded.
    pub started: bool,
    /// A day stop was recorded; otherwise the totals run up to `now`.
    pub day_ended: bool,
    /// Seconds from day start to day end (or `now`), minus ended pauses.
    pub total_day: i64,
    /// Seconds spent on pauses that were ended with "back".
    pub total_pause: i64,
    /// Jobs in order of their first start.
    pub jobs: Vec<JobTime>,
}

impl DaySummary {
    /// Sum of all job times.
    pub fn total_jobs(&self) -> i64 {
        self.jobs.iter().map(|job| job.seconds).sum()
    }

    /// Working time not attributed to any job. May be negative.
    pub fn unassigned(&self) -> i64 {
        self.total_day - self.total_jobs()
    }

    /// Looks up a job by ID.
    pub fn job(&self, id: &str) -> Option<&JobTime> {
        self.jobs.iter().find(|job| job.id.as_str() == id)
    }

    /// IDs of jobs whose name starts with `prefix`, in first-start order.
    pub fn jobs_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a JobId> {
        self.jobs
            .iter()
            .map(|job| &job.id)
            .filter(move |id| id.as_str().starts_with(prefix))
    }
}

/// Per-job running state during the pass.
#[derive(Debug)]
struct JobAccumulator {
    id: JobId,
    total: i64,
    active: bool,
    start_time: Timestamp,
}

/// Summarizes a day log as of `now`.
pub fn summarize(log: &DayLog, now: Timestamp) -> DaySummary {
    let mut summary = DaySummary::default();
    let mut jobs: Vec<JobAccumulator> = Vec::new();
    let mut index: HashMap<JobId, usize> = HashMap::new();
    let mut current_start: Option<Timestamp> = None;

    let elapsed = |start: Option<Timestamp>, end: Timestamp| start.map_or(0, |start| end - start);

    for event in log.chronological() {
        let time = event.timestamp();

        match (event.kind(), event.job_id()) {
            (EventKind::DayStart, _) => {
                summary.started = true;
                current_start = Some(time);
            }
            (EventKind::DayPause, _) => {
                summary.total_day += elapsed(current_start, time);
                current_start = Some(time);
            }
            (EventKind::DayBack, _) => {
                let pause = elapsed(current_start, time);
                end_pause(&mut summary, &mut jobs, pause);
                current_start = Some(time);
            }
            (EventKind::DayStop, _) => {
                summary.total_day += elapsed(current_start, time);
                summary.day_ended = true;
            }
            (EventKind::JobStart, Some(id)) => {
                let slot = *index.entry(id.clone()).or_insert_with(|| {
                    jobs.push(JobAccumulator {
                        id: id.clone(),
                        total: 0,
                        active: false,
                        start_time: time,
                    });
                    jobs.len() - 1
                });
                let job = &mut jobs[slot];
                job.active = true;
                job.start_time = time;
            }
            (EventKind::JobStop, Some(id)) => {
                if let Some(job) = index.get(id).map(|&slot| &mut jobs[slot]) {
                    if job.active {
                        job.active = false;
                        job.total += time - job.start_time;
                    }
                }
            }
            (EventKind::JobStart | EventKind::JobStop, None) => {}
        }
    }

    if summary.started && !summary.day_ended {
        summary.total_day += elapsed(current_start, now);
    }

    summary.jobs = jobs
        .into_iter()
        .map(|job| {
            let seconds = if job.active {
                job.total + (now - job.start_time)
            } else {
                job.total
            };
            JobTime {
                id: job.id,
                seconds,
                in_progress: job.active,
            }
        })
        .collect();

    summary
}

/// Books a finished pause and removes it from every running job.
fn end_pause(summary: &mut DaySummary, jobs: &mut [JobAccumulator], pause: i64) {
    summary.total_pause += pause;
    for job in jobs.iter_mut().filter(|job| job.active) {
        job.total -= pause;
    }
}
