use crate::entry_store::EntryStore;
use crate::error::ValidationError;
use crate::journal_entry::{EntryDraft, JournalEntry};
use crate::journal_state::{Clock, JournalState, SystemClock};
use crate::stats::EmotionStats;
use tracing::debug;

/// Top-level view of the main panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Welcome,
    Editor,
}

/// Which entry the editor shows and what the main panel displays. All
/// journal mutations requested by the UI go through here.
pub struct Session<S, C = SystemClock> {
    journal: JournalState<S, C>,
    view: View,
    /// `None` while drafting a new entry (or on the welcome view).
    active: Option<String>,
}

impl<S: EntryStore, C: Clock> Session<S, C> {
    pub fn new(journal: JournalState<S, C>) -> Self {
        let mut session = Session {
            journal,
            view: View::Welcome,
            active: None,
        };
        session.show_latest();
        session
    }

    pub fn entries(&self) -> &[JournalEntry] {
        self.journal.list()
    }

    pub fn current_view(&self) -> View {
        self.view
    }

    /// The entry in the editor, `None` when drafting or on the welcome view.
    pub fn active_entry(&self) -> Option<&JournalEntry> {
        self.active.as_deref().and_then(|id| self.journal.get(id))
    }

    pub fn is_drafting(&self) -> bool {
        self.view == View::Editor && self.active.is_none()
    }

    /// Open an existing entry. Unknown ids leave the session as it was.
    pub fn select_entry(&mut self, id: &str) -> bool {
        if self.journal.get(id).is_none() {
            return false;
        }
        self.active = Some(id.to_string());
        self.view = View::Editor;
        true
    }

    pub fn start_new_entry(&mut self) {
        self.active = None;
        self.view = View::Editor;
    }

    /// Leave the editor without saving. Abandoning a draft falls back to the
    /// most recent saved entry; with nothing saved it returns to the welcome
    /// view.
    pub fn cancel_edit(&mut self) {
        if self.journal.is_empty() {
            self.active = None;
            self.view = View::Welcome;
            return;
        }
        if self.active.is_none() {
            self.active = self.journal.latest().map(|e| e.id().to_string());
        }
        self.view = View::Editor;
    }

    /// Store the editor's fields. The active entry keeps its day; a draft is
    /// stored under today's date.
    pub fn save_entry(&mut self, draft: EntryDraft) -> Result<JournalEntry, ValidationError> {
        let saved = self.journal.upsert(draft, self.active.as_deref())?;
        debug!(id = saved.id(), "Entry saved");

        self.active = Some(saved.id().to_string());
        self.view = View::Editor;
        Ok(saved)
    }

    pub fn delete_entry(&mut self, id: &str) -> bool {
        let removed = self.journal.delete(id);
        self.show_latest();
        removed
    }

    pub fn stats(&self) -> EmotionStats {
        EmotionStats::from_entries(self.journal.list())
    }

    pub fn search(&self, query: &str) -> Vec<&JournalEntry> {
        self.journal.search(query)
    }

    #[cfg(test)]
    pub fn journal(&self) -> &JournalState<S, C> {
        &self.journal
    }

    fn show_latest(&mut self) {
        match self.journal.latest() {
            Some(latest) => {
                self.active = Some(latest.id().to_string());
                self.view = View::Editor;
            }
            None => {
                self.active = None;
                self.view = View::Welcome;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry_store::MemoryStore;
    use crate::journal_entry::{parse_day_id, Emotion};
    use crate::journal_state::FixedClock;

    fn entry(date: &str, keyword: &str) -> JournalEntry {
        JournalEntry::new(
            parse_day_id(date).unwrap(),
            EntryDraft::new(Emotion::Normal, keyword, ""),
        )
        .unwrap()
    }

    fn session(entries: Vec<JournalEntry>, today: &str) -> Session<MemoryStore, FixedClock> {
        Session::new(JournalState::open(
            MemoryStore::with_entries(entries),
            FixedClock::at(today),
        ))
    }

    fn active_id<S: EntryStore, C: Clock>(session: &Session<S, C>) -> Option<&str> {
        session.active_entry().map(|e| e.id())
    }

    #[test]
    fn starts_on_welcome_when_empty() {
        let s = session(vec![], "2024-06-01");
        assert_eq!(s.current_view(), View::Welcome);
        assert!(s.active_entry().is_none());
        assert!(!s.is_drafting());
    }

    #[test]
    fn starts_on_latest_entry() {
        let s = session(
            vec![entry("2024-05-01", "a"), entry("2024-05-02", "b")],
            "2024-06-01",
        );
        assert_eq!(s.current_view(), View::Editor);
        assert_eq!(active_id(&s), Some("2024-05-02"));
    }

    #[test]
    fn first_entry_scenario() {
        let mut s = session(vec![], "2024-06-01");
        assert_eq!(s.current_view(), View::Welcome);

        s.start_new_entry();
        assert!(s.is_drafting());
        let saved = s
            .save_entry(EntryDraft::new(Emotion::Happy, "Run", ""))
            .unwrap();

        assert_eq!(saved.id(), "2024-06-01");
        assert_eq!(saved.date(), parse_day_id("2024-06-01").unwrap());
        assert_eq!(saved.emotion(), Emotion::Happy);
        assert_eq!(saved.keyword(), "Run");
        assert_eq!(saved.notes(), "");
        assert_eq!(saved.song(), None);
        assert_eq!(s.entries(), &[saved.clone()]);
        assert_eq!(s.current_view(), View::Editor);
        assert_eq!(s.active_entry(), Some(&saved));

        s.start_new_entry();
        s.save_entry(EntryDraft::new(Emotion::Happy, "Run2", ""))
            .unwrap();
        assert_eq!(s.entries().len(), 1);
        assert_eq!(s.entries()[0].keyword(), "Run2");
    }

    #[test]
    fn cancelling_draft_returns_to_latest() {
        let mut s = session(vec![entry("2024-05-02", "only")], "2024-06-01");
        s.start_new_entry();
        assert!(s.active_entry().is_none());

        s.cancel_edit();
        assert_eq!(s.current_view(), View::Editor);
        assert_eq!(active_id(&s), Some("2024-05-02"));
    }

    #[test]
    fn cancelling_edit_keeps_selection() {
        let mut s = session(
            vec![entry("2024-05-01", "a"), entry("2024-05-02", "b")],
            "2024-06-01",
        );
        assert!(s.select_entry("2024-05-01"));
        s.cancel_edit();
        assert_eq!(active_id(&s), Some("2024-05-01"));
    }

    #[test]
    fn cancelling_on_empty_journal_goes_to_welcome() {
        let mut s = session(vec![], "2024-06-01");
        s.start_new_entry();
        s.cancel_edit();
        assert_eq!(s.current_view(), View::Welcome);
        assert!(s.active_entry().is_none());
    }

    #[test]
    fn deleting_only_entry_goes_to_welcome() {
        let mut s = session(vec![entry("2024-05-02", "only")], "2024-06-01");
        assert!(s.delete_entry("2024-05-02"));
        assert!(s.entries().is_empty());
        assert_eq!(s.current_view(), View::Welcome);
        assert!(s.active_entry().is_none());
    }

    #[test]
    fn deleting_selects_latest_remaining() {
        let mut s = session(
            vec![
                entry("2024-05-01", "a"),
                entry("2024-05-02", "b"),
                entry("2024-05-03", "c"),
            ],
            "2024-06-01",
        );
        s.select_entry("2024-05-01");
        s.delete_entry("2024-05-03");
        assert_eq!(s.current_view(), View::Editor);
        assert_eq!(active_id(&s), Some("2024-05-02"));
    }

    #[test]
    fn invalid_save_changes_nothing() {
        let mut s = session(vec![entry("2024-05-02", "b")], "2024-06-01");
        s.start_new_entry();
        let err = s
            .save_entry(EntryDraft::new(Emotion::Sad, "  ", "notes"))
            .unwrap_err();

        assert_eq!(err, ValidationError::EmptyKeyword);
        assert!(s.is_drafting());
        assert_eq!(s.entries().len(), 1);
        assert_eq!(s.journal().store().saves.get(), 0);
    }

    #[test]
    fn saving_selected_entry_keeps_its_day() {
        let mut s = session(
            vec![entry("2024-05-01", "a"), entry("2024-05-02", "b")],
            "2024-06-01",
        );
        s.select_entry("2024-05-01");
        let saved = s
            .save_entry(EntryDraft::new(Emotion::Worried, "edited", ""))
            .unwrap();
        assert_eq!(saved.id(), "2024-05-01");
        assert_eq!(s.entries().len(), 2);
        assert_eq!(active_id(&s), Some("2024-05-01"));
    }

    #[test]
    fn selecting_unknown_entry_is_ignored() {
        let mut s = session(vec![entry("2024-05-02", "b")], "2024-06-01");
        s.start_new_entry();
        assert!(!s.select_entry("1999-01-01"));
        assert!(s.is_drafting());
    }

    #[test]
    fn stats_follow_the_collection() {
        let mut s = session(vec![entry("2024-05-02", "b")], "2024-06-01");
        s.start_new_entry();
        s.save_entry(EntryDraft::new(Emotion::Happy, "x", ""))
            .unwrap();
        let stats = s.stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.count_of(Emotion::Happy), 1);
        assert_eq!(stats.count_of(Emotion::Normal), 1);
    }
}
