//! Application state for a single invocation.

use tl_core::{Clock, Controller, DayKey, DayLog, FixedClock, LogStore};
use tl_store::{JsonStore, StoreError};

/// The loaded log plus everything a command needs to act on today.
///
/// The clock is read once when the session is built. "Today", offsets and
/// event timestamps all derive from that instant.
///
/// Commands mutate the in-memory log through [`Session::update_today`];
/// [`Session::finish`] writes it back only if something was appended.
#[derive(Debug)]
pub struct Session {
    store: JsonStore,
    log: LogStore,
    clock: FixedClock,
    today: DayKey,
    dirty: bool,
}

impl Session {
    /// Loads the log from `store`.
    pub fn open(store: JsonStore, clock: &impl Clock) -> Result<Self, StoreError> {
        let log = store.load()?;
        Ok(Self::from_parts(store, log, clock))
    }

    /// Builds a session around an already loaded log.
    pub fn from_parts(store: JsonStore, log: LogStore, clock: &impl Clock) -> Self {
        let clock = FixedClock::new(clock.now());
        Self {
            store,
            log,
            today: clock.today(),
            clock,
            dirty: false,
        }
    }

    /// The instant this invocation runs at.
    pub const fn clock(&self) -> &FixedClock {
        &self.clock
    }

    /// Today's events, if any were recorded.
    pub fn today(&self) -> Option<&DayLog> {
        self.log.day(self.today)
    }

    /// Runs `f` with a controller over today's log.
    pub fn update_today<T, E>(
        &mut self,
        f: impl FnOnce(&mut Controller<'_>) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut controller = Controller::new(self.log.day_mut(self.today));
        let result = f(&mut controller);
        tracing::debug!(day = %self.today, changed = controller.is_dirty(), "updated day");
        self.dirty |= controller.is_dirty();
        result
    }

    /// Whether the in-memory log differs from the file.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Persists the log if it changed. Returns whether a write happened.
    pub fn finish(self) -> Result<bool, StoreError> {
        if !self.dirty {
            tracing::debug!(path = %self.store.path().display(), "nothing to save");
            return Ok(false);
        }
        self.store.save(&self.log)?;
        Ok(true)
    }
}
