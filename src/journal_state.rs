use crate::entry_store::EntryStore;
use crate::error::ValidationError;
use crate::journal_entry::{parse_day_id, EntryDraft, JournalEntry};
use chrono::{Local, NaiveDate};
use tracing::{debug, warn};

/// Source of "today" for entries saved from a draft.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// The user's local calendar day.
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A clock pinned to one day, settable between calls.
#[cfg(test)]
pub struct FixedClock(pub std::cell::Cell<NaiveDate>);

#[cfg(test)]
impl FixedClock {
    pub fn at(day: &str) -> Self {
        FixedClock(std::cell::Cell::new(
            parse_day_id(day).expect("valid test day"),
        ))
    }

    pub fn set(&self, day: &str) {
        self.0.set(parse_day_id(day).expect("valid test day"));
    }
}

#[cfg(test)]
impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0.get()
    }
}

/// The canonical in-memory collection of entries, newest day first, with at
/// most one entry per day. Every successful mutation writes the whole
/// collection back to the store before returning.
pub struct JournalState<S, C = SystemClock> {
    entries: Vec<JournalEntry>,
    store: S,
    clock: C,
}

impl<S: EntryStore, C: Clock> JournalState<S, C> {
    /// Load the store once and build the collection from it.
    pub fn open(store: S, clock: C) -> Self {
        let loaded = store.load();
        let mut state = JournalState {
            entries: Vec::new(),
            store,
            clock,
        };
        state.initialize(loaded);
        state
    }

    /// Replace the collection with `loaded`, restoring day order. If the same
    /// day shows up more than once the later record wins.
    pub fn initialize(&mut self, mut loaded: Vec<JournalEntry>) {
        let before = loaded.len();
        // Reversed first so the stable sort leaves the later record of a day
        // in front, where dedup keeps it.
        loaded.reverse();
        sort_newest_first(&mut loaded);
        loaded.dedup_by_key(|e| e.date());
        if loaded.len() != before {
            warn!(
                dropped = before - loaded.len(),
                "Collapsed journal entries sharing a day"
            );
        }
        self.entries = loaded;
    }

    /// Store `draft` as an entry and return what was stored.
    ///
    /// With `editing` set to an existing entry's id the entry keeps its day;
    /// otherwise the draft lands on today, read from the clock right now. An
    /// entry already on that day is replaced rather than duplicated.
    pub fn upsert(
        &mut self,
        draft: EntryDraft,
        editing: Option<&str>,
    ) -> Result<JournalEntry, ValidationError> {
        let date = match editing {
            Some(id) => self
                .get(id)
                .map(JournalEntry::date)
                .or_else(|| parse_day_id(id))
                .unwrap_or_else(|| self.clock.today()),
            None => self.clock.today(),
        };

        let entry = JournalEntry::new(date, draft)?;

        match self.entries.iter_mut().find(|e| e.date() == date) {
            Some(existing) => {
                debug!(id = entry.id(), "Replacing journal entry");
                *existing = entry.clone();
            }
            None => {
                debug!(id = entry.id(), "Adding journal entry");
                self.entries.push(entry.clone());
            }
        }
        sort_newest_first(&mut self.entries);

        self.store.save(&self.entries);
        Ok(entry)
    }

    /// Remove the entry with `id`. Returns whether anything was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id() != id);
        let removed = self.entries.len() != before;
        debug!(id, removed, "Deleting journal entry");

        self.store.save(&self.entries);
        removed
    }

    pub fn list(&self) -> &[JournalEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&JournalEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Most recent day on record.
    pub fn latest(&self) -> Option<&JournalEntry> {
        self.entries.first()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn search(&self, query: &str) -> Vec<&JournalEntry> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        self.entries.iter().filter(|e| e.matches(query)).collect()
    }

    #[cfg(test)]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    pub fn clock(&self) -> &C {
        &self.clock
    }
}

fn sort_newest_first(entries: &mut [JournalEntry]) {
    entries.sort_by(|a, b| b.date().cmp(&a.date()));
}
