//! Turn history and round summaries
//!
//! Every resolved turn is appended here, successes and failures alike.
//! The log is additive for the whole session; restarting a game rebuilds
//! the roster but keeps the history. A summary of the totals is computed
//! lazily and cached until the next entry invalidates it.

use serde::{Deserialize, Serialize};

use crate::{TruncatedVec, constants};

/// One resolved turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Name of the player the turn belonged to
    pub name: String,
    /// The task that was presented
    pub task: String,
    /// Whether the player pulled it off
    pub success: bool,
}

/// Serialization helper for the History struct
#[derive(Deserialize)]
struct HistorySerde {
    entries: Vec<Entry>,
}

/// The append-only turn log
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(from = "HistorySerde")]
pub struct History {
    /// Resolved turns in the order they happened
    entries: Vec<Entry>,

    /// Cached totals, dropped whenever an entry is appended (not serialized)
    #[serde(skip_serializing)]
    summary: once_cell_serde::sync::OnceCell<Summary>,
}

impl From<HistorySerde> for History {
    fn from(serde: HistorySerde) -> Self {
        let HistorySerde { entries } = serde;
        Self {
            entries,
            summary: once_cell_serde::sync::OnceCell::new(),
        }
    }
}

/// Totals over the whole log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of resolved turns
    pub turns: usize,
    /// Turns that ended in success
    pub successes: usize,
    /// Turns that ended in failure
    pub failures: usize,
}

impl History {
    /// Appends a resolved turn to the log
    pub fn record(&mut self, entry: Entry) {
        self.summary.take();
        self.entries.push(entry);
    }

    /// Returns the number of resolved turns
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no turn has been resolved yet
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all entries in the order they happened
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the totals over the whole log
    ///
    /// Computed on first use after an append and cached until the next
    /// append.
    pub fn summary(&self) -> Summary {
        *self.summary.get_or_init(|| {
            let successes = self.entries.iter().filter(|entry| entry.success).count();
            Summary {
                turns: self.entries.len(),
                successes,
                failures: self.entries.len() - successes,
            }
        })
    }

    /// Returns the most recent entries, newest first
    pub fn recent(&self) -> TruncatedVec<Entry> {
        TruncatedVec::new(
            self.entries.iter().rev().cloned(),
            constants::history::VIEW_LIMIT,
            self.entries.len(),
        )
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn entry(name: &str, success: bool) -> Entry {
        Entry {
            name: name.to_string(),
            task: format!("task for {name}"),
            success,
        }
    }

    #[test]
    fn test_record_appends_in_order() {
        let mut history = History::default();
        assert!(history.is_empty());

        history.record(entry("Ana", true));
        history.record(entry("Beth", false));

        assert_eq!(history.len(), 2);
        assert_eq!(history.entries()[0].name, "Ana");
        assert_eq!(history.entries()[1].name, "Beth");
    }

    #[test]
    fn test_summary_counts_outcomes() {
        let mut history = History::default();
        history.record(entry("Ana", true));
        history.record(entry("Beth", false));
        history.record(entry("Ana", false));

        let summary = history.summary();
        assert_eq!(summary.turns, 3);
        assert_eq!(summary.successes, 1);
        assert_eq!(summary.failures, 2);
    }

    #[test]
    fn test_summary_cache_invalidated_by_append() {
        let mut history = History::default();
        history.record(entry("Ana", true));
        assert_eq!(history.summary().turns, 1);

        history.record(entry("Beth", false));
        let summary = history.summary();
        assert_eq!(summary.turns, 2);
        assert_eq!(summary.failures, 1);
    }

    #[test]
    fn test_recent_is_newest_first_and_truncated() {
        let mut history = History::default();
        for index in 0..60 {
            history.record(entry(&format!("P{index}"), index % 2 == 0));
        }

        let recent = history.recent();
        assert_eq!(recent.exact_count(), 60);
        assert_eq!(recent.items().len(), constants::history::VIEW_LIMIT);
        assert_eq!(recent.items()[0].name, "P59");
    }

    #[test]
    fn test_serialization_round_trip() {
        let mut history = History::default();
        history.record(entry("Ana", true));
        history.record(entry("Beth", false));

        let json = serde_json::to_string(&history).unwrap();
        let back: History = serde_json::from_str(&json).unwrap();

        assert_eq!(back.entries(), history.entries());
        assert_eq!(back.summary().turns, 2);
    }
}
