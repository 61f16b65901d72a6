//! Entry id generation
//!
//! Ids are derived from the wall clock in milliseconds so they sort by
//! creation time, but two ids requested within the same tick (or after the
//! clock stepped backwards) are bumped past the last issued value. The
//! generator is seeded with the highest id already on disk so a reopened
//! store never reissues one.

use chrono::Utc;

use crate::models::EntryId;

/// Monotonic, clock-derived id source
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start above every id in `existing`
    pub fn seeded<I>(existing: I) -> Self
    where
        I: IntoIterator<Item = EntryId>,
    {
        let last = existing.into_iter().map(EntryId::get).max().unwrap_or(0);
        Self { last }
    }

    /// Issue the next id using the current wall clock
    pub fn next_id(&mut self) -> EntryId {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        self.next_at(now)
    }

    /// Issue the next id for a given clock reading
    pub fn next_at(&mut self, clock_millis: u64) -> EntryId {
        let candidate = if clock_millis > self.last {
            clock_millis
        } else {
            self.last + 1
        };
        self.last = candidate;
        EntryId::new(candidate)
    }
}
