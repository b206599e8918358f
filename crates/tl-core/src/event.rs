//! Timestamped day and job events.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{JobId, ValidationError};

/// Seconds since the Unix epoch, truncated to the minute when produced by a clock.
pub type Timestamp = i64;

/// The six transitions a day log can record.
///
/// The string forms are the ones written to the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    DayStart,
    DayPause,
    DayBack,
    DayStop,
    JobStart,
    JobStop,
}

impl EventKind {
    /// String representation for the log file.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::DayStart => "Starting day",
            Self::DayPause => "Starting pause",
            Self::DayBack => "Back from pause",
            Self::DayStop => "Stopping day",
            Self::JobStart => "Starting job",
            Self::JobStop => "Stopping job",
        }
    }

    /// Whether events of this kind refer to a job.
    #[must_use]
    pub const fn is_job_event(&self) -> bool {
        matches!(self, Self::JobStart | Self::JobStop)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Starting day" => Ok(Self::DayStart),
            "Starting pause" => Ok(Self::DayPause),
            "Back from pause" => Ok(Self::DayBack),
            "Stopping day" => Ok(Self::DayStop),
            "Starting job" => Ok(Self::JobStart),
            "Stopping job" => Ok(Self::JobStop),
            _ => Err(UnknownEventKind(s.to_string())),
        }
    }
}

impl Serialize for EventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown event kind strings.
#[derive(Debug, Clone)]
pub struct UnknownEventKind(String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind: {}", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}

/// One entry of a day log.
///
/// A job ID is present exactly when the kind is a job event. This holds for
/// every constructed value and is re-checked when reading a log file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EventRecord", into = "EventRecord")]
pub struct Event {
    timestamp: Timestamp,
    kind: EventKind,
    job_id: Option<JobId>,
}

impl Event {
    /// Creates an event, checking that the job ID matches the kind.
    pub fn new(
        timestamp: Timestamp,
        kind: EventKind,
        job_id: Option<JobId>,
    ) -> Result<Self, ValidationError> {
        match (kind.is_job_event(), job_id) {
            (true, None) => Err(ValidationError::MissingJobId {
                kind: kind.to_string(),
            }),
            (false, Some(id)) => Err(ValidationError::UnexpectedJobId {
                kind: kind.to_string(),
                job_id: id.into(),
            }),
            (_, job_id) => Ok(Self {
                timestamp,
                kind,
                job_id,
            }),
        }
    }

    pub const fn day_start(timestamp: Timestamp) -> Self {
        Self::day(timestamp, EventKind::DayStart)
    }

    pub const fn day_pause(timestamp: Timestamp) -> Self {
        Self::day(timestamp, EventKind::DayPause)
    }

    pub const fn day_back(timestamp: Timestamp) -> Self {
        Self::day(timestamp, EventKind::DayBack)
    }

    pub const fn day_stop(timestamp: Timestamp) -> Self {
        Self::day(timestamp, EventKind::DayStop)
    }

    pub const fn job_start(timestamp: Timestamp, job_id: JobId) -> Self {
        Self {
            timestamp,
            kind: EventKind::JobStart,
            job_id: Some(job_id),
        }
    }

    pub const fn job_stop(timestamp: Timestamp, job_id: JobId) -> Self {
        Self {
            timestamp,
            kind: EventKind::JobStop,
            job_id: Some(job_id),
        }
    }

    const fn day(timestamp: Timestamp, kind: EventKind) -> Self {
        Self {
            timestamp,
            kind,
            job_id: None,
        }
    }

    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// The job this event refers to, for job events.
    pub const fn job_id(&self) -> Option<&JobId> {
        self.job_id.as_ref()
    }
}

/// On-disk shape of an event: `{"time": .., "event": .., "id": ..}`.
#[derive(Serialize, Deserialize)]
struct EventRecord {
    time: Timestamp,
    event: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<JobId>,
}

impl TryFrom<EventRecord> for Event {
    type Error = ValidationError;

    fn try_from(record: EventRecord) -> Result<Self, Self::Error> {
        Self::new(record.time, record.event, record.id)
    }
}

impl From<Event> for EventRecord {
    fn from(event: Event) -> Self {
        Self {
            time: event.timestamp,
            event: event.kind,
            id: event.job_id,
        }
    }
}
