//! Configuration constants for the Flaska game
//!
//! This module contains all the limits, defaults and timings used
//! throughout the game so that every bound lives in one place.

/// Roster configuration constants
pub mod roster {
    /// Minimum number of players in a round
    pub const MIN_PLAYER_COUNT: usize = 2;
    /// Maximum number of players in a round
    pub const MAX_PLAYER_COUNT: usize = 12;
    /// Player count preselected on the setup screen
    pub const DEFAULT_PLAYER_COUNT: usize = 4;
    /// Maximum length of a player name in characters
    pub const MAX_NAME_LENGTH: usize = 30;
}

/// Settings bounds
pub mod settings {
    /// Minimum lives per player
    pub const MIN_LIVES: u8 = 1;
    /// Maximum lives per player
    pub const MAX_LIVES: u8 = 5;
    /// Lives preselected for a fresh session
    pub const DEFAULT_LIVES: u8 = 3;
}

/// Bottle spin timing and geometry constants
pub mod spin {
    /// Duration of the spin animation in milliseconds
    pub const SPIN_DURATION_MS: u64 = 2200;
    /// Minimum number of full turns the bottle makes
    pub const MIN_TURNS: f64 = 3.0;
    /// Upper bound (exclusive) on the number of full turns
    pub const MAX_TURNS: f64 = 5.0;
    /// Degrees in one full turn
    pub const FULL_TURN_DEGREES: f64 = 360.0;
}

/// Name autocomplete constants
pub mod names {
    /// Maximum number of suggestions shown for a name prefix
    pub const SUGGESTION_LIMIT: usize = 6;
}

/// Task provider constants
pub mod tasks {
    /// Timeout in seconds for the remote task-generation request
    pub const REQUEST_TIMEOUT_SECS: u64 = 8;
}

/// History view constants
pub mod history {
    /// Maximum number of entries shown when the history is requested
    pub const VIEW_LIMIT: usize = 50;
}

/// Avatar color derivation constants
pub mod color {
    /// Saturation percentage of every avatar color
    pub const SATURATION: u8 = 70;
    /// Lightness percentage of every avatar color
    pub const LIGHTNESS: u8 = 60;
}
