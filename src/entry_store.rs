use crate::error::StoreError;
use crate::journal_entry::JournalEntry;
use serde_json::Value;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Durable home of the entry collection.
///
/// Both operations are infallible from the caller's point of view: a broken
/// slot loads as empty, a failed write leaves memory as the only copy. Either
/// way the failure is reported through logging.
pub trait EntryStore {
    fn load(&self) -> Vec<JournalEntry>;
    fn save(&self, entries: &[JournalEntry]);
}

/// Keeps the whole collection as one JSON array in a single file.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Vec<JournalEntry>, StoreError> {
        let serialized = match fs::read_to_string(&self.path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No journal file yet, starting empty");
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        if serialized.trim().is_empty() {
            return Ok(Vec::new());
        }

        let document: Value =
            serde_json::from_str(&serialized).map_err(|source| StoreError::Decode {
                path: self.path.clone(),
                source,
            })?;

        let Value::Array(records) = document else {
            return Err(StoreError::NotAnArray {
                path: self.path.clone(),
            });
        };

        let mut entries = Vec::with_capacity(records.len());
        for (index, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<JournalEntry>(record) {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!(index, error = %e, "Skipping unreadable journal record"),
            }
        }
        Ok(entries)
    }

    fn write_entries(&self, entries: &[JournalEntry]) -> Result<(), StoreError> {
        let serialized = serde_json::to_string(entries)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        // Write beside the slot, flush it to disk, then swap it in.
        let staging = self.path.with_extension("json.new");
        let staged = write_synced(&staging, serialized.as_bytes())
            .and_then(|()| fs::rename(&staging, &self.path));
        if let Err(source) = staged {
            let _ = fs::remove_file(&staging);
            return Err(StoreError::Write {
                path: self.path.clone(),
                source,
            });
        }
        Ok(())
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

impl EntryStore for JsonFileStore {
    fn load(&self) -> Vec<JournalEntry> {
        match self.read_entries() {
            Ok(entries) => {
                info!(count = entries.len(), "Loaded journal entries");
                entries
            }
            Err(e) => {
                warn!(error = %e, "Could not load journal, starting empty");
                Vec::new()
            }
        }
    }

    fn save(&self, entries: &[JournalEntry]) {
        match self.write_entries(entries) {
            Ok(()) => debug!(count = entries.len(), "Saved journal entries"),
            Err(e) => warn!(error = %e, "Could not save journal, changes kept in memory only"),
        }
    }
}

/// In-memory store that records every save, for exercising the layers above.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStore {
    pub entries: std::cell::RefCell<Vec<JournalEntry>>,
    pub saves: std::cell::Cell<usize>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn with_entries(entries: Vec<JournalEntry>) -> Self {
        MemoryStore {
            entries: std::cell::RefCell::new(entries),
            saves: std::cell::Cell::new(0),
        }
    }
}

#[cfg(test)]
impl EntryStore for MemoryStore {
    fn load(&self) -> Vec<JournalEntry> {
        self.entries.borrow().clone()
    }

    fn save(&self, entries: &[JournalEntry]) {
        *self.entries.borrow_mut() = entries.to_vec();
        self.saves.set(self.saves.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal_entry::{parse_day_id, EntryDraft, Emotion, Song};
    use tempfile::TempDir;

    fn entry(date: &str, keyword: &str) -> JournalEntry {
        JournalEntry::new(
            parse_day_id(date).unwrap(),
            EntryDraft::new(Emotion::Happy, keyword, ""),
        )
        .unwrap()
    }

    fn store_with(dir: &TempDir, contents: &str) -> JsonFileStore {
        let path = dir.path().join("journal_entries.json");
        fs::write(&path, contents).unwrap();
        JsonFileStore::new(path)
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("absent.json"));
        assert!(store.load().is_empty());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store_with(&dir, "{not json").load().is_empty());
    }

    #[test]
    fn non_array_document_loads_empty() {
        let dir = TempDir::new().unwrap();
        assert!(store_with(&dir, r#"{"entries": []}"#).load().is_empty());
    }

    #[test]
    fn bad_records_are_skipped() {
        let dir = TempDir::new().unwrap();
        let store = store_with(
            &dir,
            r#"[
                {"id":"2024-05-01","date":"2024-05-01","emotion":"😄","keyword":"Good","notes":"","song":null},
                {"id":"x","date":"not-a-day","emotion":"😄","keyword":"Bad"},
                {"date":"2024-05-02","emotion":"😢","keyword":"   "},
                {"date":"2024-05-03","emotion":"🤔","keyword":"Think","extra":true}
            ]"#,
        );

        let loaded = store.load();
        let ids: Vec<&str> = loaded.iter().map(|e| e.id()).collect();
        assert_eq!(ids, vec!["2024-05-01", "2024-05-03"]);
        assert_eq!(loaded[1].song(), None);
    }

    #[test]
    fn save_then_load_keeps_entries() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested").join("journal.json"));
        let with_song = JournalEntry::new(
            parse_day_id("2024-06-01").unwrap(),
            EntryDraft::new(Emotion::Happy, "Run", "").with_song(Some(Song {
                video_id: "dQw4w9WgXcQ".into(),
                title: "Track".into(),
            })),
        )
        .unwrap();

        store.save(&[with_song.clone(), entry("2024-05-30", "Rest")]);

        let loaded = store.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0], with_song);
        assert!(!store.path().with_extension("json.new").exists());
    }

    #[test]
    fn failed_write_does_not_panic() {
        let dir = TempDir::new().unwrap();
        // The slot path is an existing directory, so the rename cannot succeed.
        let slot = dir.path().join("slot.json");
        fs::create_dir(&slot).unwrap();
        fs::write(slot.join("keep"), "x").unwrap();

        let store = JsonFileStore::new(&slot);
        store.save(&[entry("2024-06-01", "Run")]);
        assert!(store.load().is_empty());
        assert!(!slot.with_extension("json.new").exists());
    }
}
