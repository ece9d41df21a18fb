use crate::error::ValidationError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of moods an entry can carry, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Emotion {
    #[serde(rename = "😄")]
    Happy,
    #[serde(rename = "😊")]
    Content,
    #[serde(rename = "🥰")]
    Loved,
    #[serde(rename = "🎉")]
    Celebrating,
    #[default]
    #[serde(rename = "🙂")]
    Normal,
    #[serde(rename = "🤔")]
    Thoughtful,
    #[serde(rename = "😐")]
    Neutral,
    #[serde(rename = "😟")]
    Worried,
    #[serde(rename = "😢")]
    Sad,
    #[serde(rename = "😠")]
    Angry,
}

impl Emotion {
    pub const ALL: [Emotion; 10] = [
        Emotion::Happy,
        Emotion::Content,
        Emotion::Loved,
        Emotion::Celebrating,
        Emotion::Normal,
        Emotion::Thoughtful,
        Emotion::Neutral,
        Emotion::Worried,
        Emotion::Sad,
        Emotion::Angry,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            Emotion::Happy => "😄",
            Emotion::Content => "😊",
            Emotion::Loved => "🥰",
            Emotion::Celebrating => "🎉",
            Emotion::Normal => "🙂",
            Emotion::Thoughtful => "🤔",
            Emotion::Neutral => "😐",
            Emotion::Worried => "😟",
            Emotion::Sad => "😢",
            Emotion::Angry => "😠",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Emotion::Happy => "Happy",
            Emotion::Content => "Content",
            Emotion::Loved => "Loved",
            Emotion::Celebrating => "Celebrating",
            Emotion::Normal => "Normal",
            Emotion::Thoughtful => "Thoughtful",
            Emotion::Neutral => "Neutral",
            Emotion::Worried => "Worried",
            Emotion::Sad => "Sad",
            Emotion::Angry => "Angry",
        }
    }

    /// Position in [`Emotion::ALL`].
    pub fn index(self) -> usize {
        Emotion::ALL
            .iter()
            .position(|e| *e == self)
            .unwrap_or_default()
    }

    /// Next emotion in display order, wrapping around.
    pub fn next(self) -> Self {
        Emotion::ALL[(self.index() + 1) % Emotion::ALL.len()]
    }

    pub fn previous(self) -> Self {
        let len = Emotion::ALL.len();
        Emotion::ALL[(self.index() + len - 1) % len]
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.symbol(), self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub video_id: String,
    pub title: String,
}

impl Song {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

/// The editable fields of an entry, as submitted on save. A draft has no day
/// until it is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryDraft {
    pub emotion: Emotion,
    pub keyword: String,
    pub notes: String,
    pub song: Option<Song>,
}

#[cfg(test)]
impl EntryDraft {
    pub fn new(emotion: Emotion, keyword: impl Into<String>, notes: impl Into<String>) -> Self {
        EntryDraft {
            emotion,
            keyword: keyword.into(),
            notes: notes.into(),
            song: None,
        }
    }

    pub fn with_song(mut self, song: Option<Song>) -> Self {
        self.song = song;
        self
    }
}

impl From<&JournalEntry> for EntryDraft {
    fn from(entry: &JournalEntry) -> Self {
        EntryDraft {
            emotion: entry.emotion,
            keyword: entry.keyword.clone(),
            notes: entry.notes.clone(),
            song: entry.song.clone(),
        }
    }
}

/// One day's journal record. The `id` is always the ISO rendering of `date`,
/// and `keyword`/`notes` are always trimmed with a non-empty keyword. The only
/// way to build or change one is [`JournalEntry::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EntryRecord", into = "EntryRecord")]
pub struct JournalEntry {
    id: String,
    date: NaiveDate,
    emotion: Emotion,
    keyword: String,
    notes: String,
    song: Option<Song>,
}

impl JournalEntry {
    pub fn new(date: NaiveDate, draft: EntryDraft) -> Result<Self, ValidationError> {
        let keyword = draft.keyword.trim();
        if keyword.is_empty() {
            return Err(ValidationError::EmptyKeyword);
        }

        Ok(JournalEntry {
            id: day_id(date),
            date,
            emotion: draft.emotion,
            keyword: keyword.to_string(),
            notes: draft.notes.trim().to_string(),
            song: draft.song,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn emotion(&self) -> Emotion {
        self.emotion
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn song(&self) -> Option<&Song> {
        self.song.as_ref()
    }

    /// Long form used as the editor heading, e.g. "Saturday, June 1, 2024".
    pub fn heading(&self) -> String {
        long_date(self.date)
    }

    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.keyword.to_lowercase().contains(&query)
            || self.notes.to_lowercase().contains(&query)
            || self
                .song
                .as_ref()
                .is_some_and(|s| s.title.to_lowercase().contains(&query))
    }
}

pub fn day_id(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_day_id(id: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(id, "%Y-%m-%d").ok()
}

pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}

/// Wire shape of a stored entry. `id` is accepted but ignored on read since it
/// is derived from `date`.
#[derive(Serialize, Deserialize)]
struct EntryRecord {
    #[serde(default)]
    id: String,
    date: NaiveDate,
    emotion: Emotion,
    keyword: String,
    #[serde(default)]
    notes: String,
    #[serde(default)]
    song: Option<Song>,
}

impl TryFrom<EntryRecord> for JournalEntry {
    type Error = ValidationError;

    fn try_from(record: EntryRecord) -> Result<Self, Self::Error> {
        let draft = EntryDraft {
            emotion: record.emotion,
            keyword: record.keyword,
            notes: record.notes,
            song: record.song,
        };
        JournalEntry::new(record.date, draft)
    }
}

impl From<JournalEntry> for EntryRecord {
    fn from(entry: JournalEntry) -> Self {
        EntryRecord {
            id: entry.id,
            date: entry.date,
            emotion: entry.emotion,
            keyword: entry.keyword,
            notes: entry.notes,
            song: entry.song,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(s: &str) -> NaiveDate {
        parse_day_id(s).unwrap()
    }

    #[test]
    fn new_entry_trims_and_derives_id() {
        let entry = JournalEntry::new(
            day("2024-05-01"),
            EntryDraft::new(Emotion::Happy, "  Happy  ", " x "),
        )
        .unwrap();

        assert_eq!(entry.id(), "2024-05-01");
        assert_eq!(entry.keyword(), "Happy");
        assert_eq!(entry.notes(), "x");
    }

    #[test]
    fn blank_keyword_is_rejected() {
        let err = JournalEntry::new(day("2024-05-01"), EntryDraft::new(Emotion::Sad, " \t ", ""))
            .unwrap_err();
        assert_eq!(err, ValidationError::EmptyKeyword);
    }

    #[test]
    fn serializes_in_storage_layout() {
        let entry = JournalEntry::new(
            day("2024-05-01"),
            EntryDraft::new(Emotion::Normal, "Calm", "").with_song(Some(Song {
                video_id: "abc123def45".into(),
                title: "Song".into(),
            })),
        )
        .unwrap();

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "2024-05-01",
                "date": "2024-05-01",
                "emotion": "🙂",
                "keyword": "Calm",
                "notes": "",
                "song": {"videoId": "abc123def45", "title": "Song"}
            })
        );
    }

    #[test]
    fn tolerant_record_parsing() {
        let entry: JournalEntry = serde_json::from_value(json!({
            "id": "garbage",
            "date": "2024-05-03",
            "emotion": "😢",
            "keyword": " Rain ",
            "mood_score": 4
        }))
        .unwrap();

        assert_eq!(entry.id(), "2024-05-03");
        assert_eq!(entry.keyword(), "Rain");
        assert_eq!(entry.notes(), "");
        assert_eq!(entry.song(), None);
    }

    #[test]
    fn unknown_emotion_fails_record() {
        let parsed = serde_json::from_value::<JournalEntry>(json!({
            "date": "2024-05-03",
            "emotion": "🦀",
            "keyword": "Rust"
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn emotion_cycle_wraps() {
        assert_eq!(Emotion::Angry.next(), Emotion::Happy);
        assert_eq!(Emotion::Happy.previous(), Emotion::Angry);
        assert_eq!(Emotion::default(), Emotion::Normal);
        assert_eq!(Emotion::ALL.len(), 10);
    }

    #[test]
    fn search_matches_keyword_notes_and_song() {
        let entry = JournalEntry::new(
            day("2024-05-01"),
            EntryDraft::new(Emotion::Happy, "Beach", "Long walk").with_song(Some(Song {
                video_id: "v".into(),
                title: "Ocean Eyes".into(),
            })),
        )
        .unwrap();

        assert!(entry.matches("beach"));
        assert!(entry.matches("WALK"));
        assert!(entry.matches("ocean"));
        assert!(!entry.matches("mountain"));
    }
}
