use crate::journal_entry::Song;
use crate::song_lookup::{LookupError, SongCandidate, SongLookup};
use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};

type LookupResult = Result<Vec<SongCandidate>, LookupError>;

/// State of one open song search dialog.
///
/// At most one lookup is tracked. Starting another search, or dropping the
/// dialog, drops the receiver of the previous one so a late answer has nowhere
/// to land.
#[derive(Default)]
pub struct SongSearch {
    pub query: String,
    pub selected: usize,
    results: Vec<SongCandidate>,
    error: Option<String>,
    pending: Option<oneshot::Receiver<LookupResult>>,
    searched: bool,
}

impl SongSearch {
    pub fn new() -> Self {
        SongSearch::default()
    }

    /// Start a lookup for the current query on `runtime`. Blank queries are
    /// ignored.
    pub fn submit(&mut self, runtime: &Handle, lookup: &dyn SongLookup) {
        let query = self.query.trim();
        if query.is_empty() {
            return;
        }

        self.results.clear();
        self.error = None;
        self.selected = 0;
        self.searched = true;

        let (tx, rx) = oneshot::channel();
        let search = lookup.search(query);
        runtime.spawn(async move {
            // The receiver is gone if the dialog moved on; nothing to do then.
            let _ = tx.send(search.await);
        });
        self.pending = Some(rx);
    }

    /// Pick up a finished lookup, if any. Returns true when the dialog changed.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = self.pending.as_mut() else {
            return false;
        };

        match rx.try_recv() {
            Ok(Ok(results)) => self.results = results,
            Ok(Err(e)) => self.error = Some(e.to_string()),
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => {
                self.error = Some("The song search stopped before answering.".to_string())
            }
        }
        self.pending = None;
        true
    }

    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    pub fn results(&self) -> &[SongCandidate] {
        &self.results
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// A search finished cleanly and found nothing.
    pub fn found_nothing(&self) -> bool {
        self.searched && !self.is_loading() && self.error.is_none() && self.results.is_empty()
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.results.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// The song for result `index`, as it would be stored on an entry.
    pub fn choose(&self, index: usize) -> Option<Song> {
        self.results.get(index).map(|r| Song {
            video_id: r.video_id.clone(),
            title: r.title.clone(),
        })
    }
}
