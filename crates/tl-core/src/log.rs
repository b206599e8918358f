//! The keyed event log: year → month → day → events.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::event::Event;

/// Calendar date identifying one day log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl DayKey {
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month(), date.day())
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Events of a single calendar day, in the order they were appended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayLog {
    events: Vec<Event>,
}

impl DayLog {
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Adds an event at the end. Existing events are never reordered.
    pub fn append(&mut self, event: Event) {
        tracing::debug!(
            kind = %event.kind(),
            job = ?event.job_id().map(crate::JobId::as_str),
            time = event.timestamp(),
            "appending event"
        );
        self.events.push(event);
    }

    /// Events in append order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events stably sorted by timestamp.
    ///
    /// Backdated offsets can append an event earlier than ones already
    /// logged; replay always walks this order. Ties keep append order.
    pub fn chronological(&self) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.events.iter().collect();
        events.sort_by_key(|event| event.timestamp());
        events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl FromIterator<Event> for DayLog {
    fn from_iter<I: IntoIterator<Item = Event>>(iter: I) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

type Months = BTreeMap<u32, Days>;
type Days = BTreeMap<u32, DayLog>;

/// Every recorded day, keyed by year, month and day.
///
/// Serialized as nested JSON objects whose keys are the calendar numbers
/// without zero padding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogStore {
    years: BTreeMap<i32, Months>,
}

impl LogStore {
    pub const fn new() -> Self {
        Self {
            years: BTreeMap::new(),
        }
    }

    /// Returns the log for `key`, creating empty entries on the way if needed.
    pub fn day_mut(&mut self, key: DayKey) -> &mut DayLog {
        self.years
            .entry(key.year)
            .or_default()
            .entry(key.month)
            .or_default()
            .entry(key.day)
            .or_default()
    }

    /// Returns the log for `key` without creating it.
    pub fn day(&self, key: DayKey) -> Option<&DayLog> {
        self.years.get(&key.year)?.get(&key.month)?.get(&key.day)
    }

    /// All recorded days in calendar order.
    pub fn days(&self) -> impl Iterator<Item = (DayKey, &DayLog)> {
        self.years.iter().flat_map(|(&year, months)| {
            months.iter().flat_map(move |(&month, days)| {
                days.iter()
                    .map(move |(&day, log)| (DayKey::new(year, month, day), log))
            })
        })
    }
}
