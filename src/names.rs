//! Name autocomplete directory
//!
//! This module holds the static name-frequency list used to autocomplete
//! the name-entry slots. Suggestions are prefix matches ranked by how
//! often a name has been used, truncated to the handful the UI shows.
//! The directory is optional: when the static data fails to load the
//! directory is simply empty and autocomplete stays silent.

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

use crate::{TruncatedVec, constants};

/// One record of the name-frequency list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRecord {
    /// The name itself
    pub name: String,
    /// How often this name has been used before
    #[serde(rename = "usageCount")]
    pub usage_count: u64,
}

/// The loaded name-frequency directory
///
/// Wraps the raw records and answers prefix queries. An empty directory
/// returns no suggestions for every query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameDirectory {
    records: Vec<NameRecord>,
}

impl NameDirectory {
    /// Creates a directory from already-parsed records
    pub fn new(records: Vec<NameRecord>) -> Self {
        Self { records }
    }

    /// Parses a directory from the raw JSON collection
    ///
    /// Any parse failure degrades to the empty directory; loading
    /// problems never surface as errors.
    pub fn from_json_slice(bytes: &[u8]) -> Self {
        serde_json::from_slice(bytes).unwrap_or_default()
    }

    /// Returns the number of records in the directory
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the directory has no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Suggests completions for a partially entered name
    ///
    /// The query is trimmed and matched case-insensitively against name
    /// prefixes. Matches are ordered by descending usage count and
    /// truncated to the suggestion limit, keeping the exact match count.
    /// A blank query yields no suggestions.
    pub fn suggest(&self, query: &str) -> TruncatedVec<String> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return TruncatedVec::default();
        }

        let matches = self
            .records
            .iter()
            .filter(|record| record.name.to_lowercase().starts_with(&query))
            .sorted_by_key(|record| Reverse(record.usage_count))
            .collect_vec();

        let exact_count = matches.len();
        TruncatedVec::new(
            matches.into_iter().map(|record| record.name.clone()),
            constants::names::SUGGESTION_LIMIT,
            exact_count,
        )
    }
}
