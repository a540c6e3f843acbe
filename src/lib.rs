//! # Flaska Game Library
//!
//! This library provides the core game logic for the Flaska party game,
//! a spin-the-bottle style elimination game. It handles screen routing,
//! player roster setup with name autocomplete, the bottle spin, the
//! lives/elimination loop, and task generation with a local fallback.
//!
//! The engine is message-driven: a frontend feeds [`game::IncomingMessage`]
//! values in and renders the resulting [`UpdateMessage`]/[`SyncMessage`]
//! stream. The crate does no rendering and no I/O of its own.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::too_many_arguments)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::ignored_unit_patterns)]
#![allow(clippy::struct_field_names)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]
use derive_where::derive_where;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

pub mod constants;

pub mod game;
pub mod history;
pub mod names;
pub mod roster;
pub mod screen;
pub mod session;
pub mod settings;
pub mod spin;
pub mod tasks;

/// Messages that synchronize a frontend with the full current game state
///
/// A sync message carries the complete view model for the active screen.
/// It is sent when a frontend attaches or reattaches, so that it can
/// rebuild its display from scratch.
#[derive(Debug, Serialize, Clone, derive_more::From)]
pub enum SyncMessage {
    /// Full view of the game state
    Game(game::SyncMessage),
}

impl SyncMessage {
    /// Converts the sync message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Messages that notify a frontend about incremental state changes
///
/// Update messages describe single changes to the view (a screen switch,
/// a new suggestion list, a spin starting) and are sent as they happen.
#[derive(Debug, Serialize, Clone, derive_more::From)]
pub enum UpdateMessage {
    /// General game update messages
    Game(game::UpdateMessage),
}

impl UpdateMessage {
    /// Converts the update message to a JSON string for transmission
    ///
    /// # Panics
    ///
    /// This method panics if serialization fails, which should never happen
    /// with the default JSON serializer for well-formed data.
    pub fn to_message(&self) -> String {
        serde_json::to_string(self).expect("default serializer cannot fail")
    }
}

/// Alarm messages for timed events
///
/// Alarms are scheduled by the engine (through the embedder's timer) and
/// fed back into [`game::Game::receive_alarm`] when they fire. The only
/// timed event in this game is the end of a bottle spin.
#[derive(Debug, Clone, derive_more::From, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// Bottle spin alarms
    Spin(spin::AlarmMessage),
}

/// A truncated vector that maintains the exact count while limiting displayed items
///
/// Used where the UI shows a bounded slice of a larger collection but
/// still needs the real total: the top autocomplete suggestions and the
/// most recent history entries.
#[derive(Debug, Clone, Serialize)]
#[derive_where(Default)]
pub struct TruncatedVec<T> {
    /// The exact total count of items
    exact_count: usize,
    /// The truncated list of items (up to the limit)
    items: Vec<T>,
}

impl<T: Clone> TruncatedVec<T> {
    /// Creates a new truncated vector from an iterator
    ///
    /// # Arguments
    ///
    /// * `list` - An iterator over items to include
    /// * `limit` - Maximum number of items to include in the truncated vector
    /// * `exact_count` - The exact total count of items (may be larger than limit)
    pub fn new<I: Iterator<Item = T>>(list: I, limit: usize, exact_count: usize) -> Self {
        let items = list.take(limit).collect_vec();
        Self { exact_count, items }
    }

    /// Maps a function over the items in the truncated vector
    pub fn map<F, U>(self, f: F) -> TruncatedVec<U>
    where
        F: Fn(T) -> U,
    {
        TruncatedVec {
            exact_count: self.exact_count,
            items: self.items.into_iter().map(f).collect_vec(),
        }
    }

    /// Returns the exact count of items
    pub fn exact_count(&self) -> usize {
        self.exact_count
    }

    /// Returns the truncated items
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Returns `true` if the full collection has no items
    pub fn is_empty(&self) -> bool {
        self.exact_count == 0
    }
}
