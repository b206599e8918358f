//! Core domain logic for the time log.
//!
//! This crate contains the fundamental types and logic for:
//! - Events: the six day/job transitions and their on-disk shape
//! - The keyed log: year → month → day → ordered events
//! - Replay: deriving the day status and running jobs from a day log
//! - Aggregation: day, pause and per-job totals
//! - The controller: legal transitions and cascade stops
//!
//! Nothing here performs I/O; persistence lives in `tl-store`.

pub mod aggregate;
pub mod clock;
pub mod controller;
pub mod event;
pub mod log;
pub mod state;
mod types;

pub use aggregate::{DaySummary, JobTime, summarize};
pub use clock::{Clock, FixedClock, OffsetError, SystemClock, effective_timestamp, resolve_offset};
pub use controller::{AutoStop, Controller, Outcome, Prompt, TransitionError};
pub use event::{Event, EventKind, Timestamp, UnknownEventKind};
pub use log::{DayKey, DayLog, LogStore};
pub use state::{DayState, DayStatus};
pub use types::{JobId, ValidationError};
