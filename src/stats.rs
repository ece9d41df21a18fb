use crate::journal_entry::{Emotion, JournalEntry};

#[derive(Debug, Clone, PartialEq)]
pub struct EmotionStat {
    pub emotion: Emotion,
    pub count: usize,
    /// Share of all entries, 0-100.
    pub percent_of_total: f64,
    /// Count relative to the most frequent emotion, 0-1. Used to scale bars.
    pub ratio_of_max: f64,
}

/// Per-emotion tallies over the whole journal, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionStats {
    pub total: usize,
    pub rows: Vec<EmotionStat>,
}

impl EmotionStats {
    pub fn from_entries(entries: &[JournalEntry]) -> Self {
        let mut counts = [0usize; Emotion::ALL.len()];
        for entry in entries {
            counts[entry.emotion().index()] += 1;
        }

        let total = entries.len();
        let max_count = counts.iter().copied().max().unwrap_or(0).max(1);

        let rows = Emotion::ALL
            .iter()
            .zip(counts)
            .map(|(&emotion, count)| EmotionStat {
                emotion,
                count,
                percent_of_total: if total > 0 {
                    count as f64 / total as f64 * 100.0
                } else {
                    0.0
                },
                ratio_of_max: count as f64 / max_count as f64,
            })
            .collect();

        EmotionStats { total, rows }
    }

    #[cfg(test)]
    pub fn count_of(&self, emotion: Emotion) -> usize {
        self.rows[emotion.index()].count
    }
}
