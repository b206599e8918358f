//! Validated state transitions for today's log.
//!
//! Every operation runs against a staged copy of the [`DayState`]. Events are
//! committed to the [`DayLog`] only when the whole operation succeeds, so a
//! fatal error in the middle of a cascade leaves the log untouched.

use std::fmt;

use thiserror::Error;

use crate::event::{Event, Timestamp};
use crate::log::DayLog;
use crate::state::{DayState, DayStatus};
use crate::types::JobId;

/// A requested transition that is not legal in the current state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("day already started (status: {0})")]
    DayAlreadyStarted(DayStatus),

    #[error("can't start a pause when the day is {0}")]
    CannotPause(DayStatus),

    #[error("can't end a pause when not having one (status: {0})")]
    NotOnPause(DayStatus),

    #[error("can't end a day when the day is {0}")]
    CannotEndDay(DayStatus),

    #[error("can't start jobs if the day is {0}")]
    CannotStartJob(DayStatus),

    #[error("job already started: {0}")]
    JobAlreadyStarted(JobId),

    #[error("can't stop jobs when on pause")]
    StopWhileOnPause,
}

/// One visible effect of an operation, or a soft failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    DayStarted,
    PauseStarted,
    PauseEnded,
    DayEnded,
    JobStarted(JobId),
    JobStopped(JobId),
    /// A stop was requested for a job that is not running. Nothing was recorded.
    NoSuchJob(JobId),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DayStarted => f.write_str("Started the day"),
            Self::PauseStarted => f.write_str("Started a pause"),
            Self::PauseEnded => f.write_str("Back from pause"),
            Self::DayEnded => f.write_str("Ended the day"),
            Self::JobStarted(id) => write!(f, "Started job {id}"),
            Self::JobStopped(id) => write!(f, "Stopped job {id}"),
            Self::NoSuchJob(id) => write!(f, "No such job: {id}"),
        }
    }
}

/// Decisions the controller delegates to the user.
pub trait Prompt {
    /// Asked right after the day starts. `Some` starts that job immediately.
    fn job_after_day_start(&mut self) -> Option<JobId>;

    /// Asked when a job starts while others are running. `true` stops them
    /// first; `false` runs the new job in parallel.
    fn stop_running_jobs(&mut self, running: &[JobId]) -> bool;
}

/// Non-interactive policy: never start a job after the day starts, always
/// stop running jobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoStop;

impl Prompt for AutoStop {
    fn job_after_day_start(&mut self) -> Option<JobId> {
        None
    }

    fn stop_running_jobs(&mut self, _running: &[JobId]) -> bool {
        true
    }
}

/// Events and outcomes collected by an operation before commit.
#[derive(Debug, Clone)]
struct Staged {
    state: DayState,
    events: Vec<Event>,
    outcomes: Vec<Outcome>,
}

impl Staged {
    fn new(state: &DayState) -> Self {
        Self {
            state: state.clone(),
            events: Vec::new(),
            outcomes: Vec::new(),
        }
    }

    fn record(&mut self, event: Event, outcome: Outcome) {
        self.state.apply(&event);
        self.events.push(event);
        self.outcomes.push(outcome);
    }

    fn start_job(
        &mut self,
        id: JobId,
        at: Timestamp,
        prompt: &mut dyn Prompt,
    ) -> Result<(), TransitionError> {
        let status = self.state.status();
        if status != DayStatus::Started {
            return Err(TransitionError::CannotStartJob(status));
        }
        if self.state.is_in_progress(&id) {
            return Err(TransitionError::JobAlreadyStarted(id));
        }

        let running: Vec<JobId> = self.state.jobs_in_progress().iter().cloned().collect();
        if !running.is_empty() && prompt.stop_running_jobs(&running) {
            for job in running {
                self.stop_job(job, at)?;
            }
        }

        self.record(Event::job_start(at, id.clone()), Outcome::JobStarted(id));
        Ok(())
    }

    fn stop_job(&mut self, id: JobId, at: Timestamp) -> Result<(), TransitionError> {
        if self.state.status() == DayStatus::OnPause {
            return Err(TransitionError::StopWhileOnPause);
        }
        if !self.state.is_in_progress(&id) {
            self.outcomes.push(Outcome::NoSuchJob(id));
            return Ok(());
        }

        self.record(Event::job_stop(at, id.clone()), Outcome::JobStopped(id));
        Ok(())
    }
}

/// Applies user commands to one day's log.
#[derive(Debug)]
pub struct Controller<'a> {
    log: &'a mut DayLog,
    state: DayState,
    dirty: bool,
}

impl<'a> Controller<'a> {
    /// Wraps a day log, replaying it to find the current state.
    pub fn new(log: &'a mut DayLog) -> Self {
        let state = DayState::replay(log);
        Self {
            log,
            state,
            dirty: false,
        }
    }

    pub const fn state(&self) -> &DayState {
        &self.state
    }

    /// Whether any event has been appended through this controller.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Starts the day, then offers to start a job right away.
    pub fn start_day(
        &mut self,
        at: Timestamp,
        prompt: &mut dyn Prompt,
    ) -> Result<Vec<Outcome>, TransitionError> {
        let mut staged = Staged::new(&self.state);
        let status = staged.state.status();
        if status != DayStatus::NotStarted {
            return Err(TransitionError::DayAlreadyStarted(status));
        }
        staged.record(Event::day_start(at), Outcome::DayStarted);

        if let Some(id) = prompt.job_after_day_start() {
            staged.start_job(id, at, prompt)?;
        }
        Ok(self.commit(staged))
    }

    pub fn pause_day(&mut self, at: Timestamp) -> Result<Vec<Outcome>, TransitionError> {
        let mut staged = Staged::new(&self.state);
        let status = staged.state.status();
        if status != DayStatus::Started {
            return Err(TransitionError::CannotPause(status));
        }
        staged.record(Event::day_pause(at), Outcome::PauseStarted);
        Ok(self.commit(staged))
    }

    pub fn resume_day(&mut self, at: Timestamp) -> Result<Vec<Outcome>, TransitionError> {
        let mut staged = Staged::new(&self.state);
        let status = staged.state.status();
        if status != DayStatus::OnPause {
            return Err(TransitionError::NotOnPause(status));
        }
        staged.record(Event::day_back(at), Outcome::PauseEnded);
        Ok(self.commit(staged))
    }

    /// Ends the day, stopping every running job first.
    pub fn stop_day(&mut self, at: Timestamp) -> Result<Vec<Outcome>, TransitionError> {
        let mut staged = Staged::new(&self.state);
        let status = staged.state.status();
        if !matches!(status, DayStatus::Started | DayStatus::OnPause) {
            return Err(TransitionError::CannotEndDay(status));
        }

        let running: Vec<JobId> = staged.state.jobs_in_progress().iter().cloned().collect();
        for job in running {
            staged.stop_job(job, at)?;
        }
        staged.record(Event::day_stop(at), Outcome::DayEnded);
        Ok(self.commit(staged))
    }

    /// Starts a job. Running jobs are stopped first unless `prompt` decides
    /// otherwise.
    pub fn start_job(
        &mut self,
        id: JobId,
        at: Timestamp,
        prompt: &mut dyn Prompt,
    ) -> Result<Vec<Outcome>, TransitionError> {
        let mut staged = Staged::new(&self.state);
        staged.start_job(id, at, prompt)?;
        Ok(self.commit(staged))
    }

    /// Stops a job. Stopping a job that is not running is a soft failure
    /// reported as [`Outcome::NoSuchJob`].
    pub fn stop_job(&mut self, id: JobId, at: Timestamp) -> Result<Vec<Outcome>, TransitionError> {
        let mut staged = Staged::new(&self.state);
        staged.stop_job(id, at)?;
        Ok(self.commit(staged))
    }

    fn commit(&mut self, staged: Staged) -> Vec<Outcome> {
        if !staged.events.is_empty() {
            self.dirty = true;
        }
        for event in staged.events {
            self.log.append(event);
        }
        self.state = staged.state;
        staged.outcomes
    }
}
