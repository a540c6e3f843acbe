//! Session settings and their bounds
//!
//! This module holds the settings the operator can adjust between games:
//! task difficulty, lives per player, and which bottle sits in the middle
//! of the ring. All adjustments are clamped to their bounds, never
//! rejected, and the settings live for the whole session (they survive a
//! restart, unlike the roster).

use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::constants;

/// Task difficulty selected for the session
///
/// The difficulty only influences the wording of generated tasks; the
/// game loop itself does not read it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    /// Gentle warm-up tasks
    Easy,
    /// The default
    #[default]
    Normal,
    /// Tasks with some bite
    Hard,
    /// No mercy
    Insane,
}

impl Difficulty {
    /// Returns the display label for this difficulty
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Normal => "Normal",
            Self::Hard => "Hard",
            Self::Insane => "Insane",
        }
    }

    /// Returns the next harder difficulty, clamped at the hardest
    pub fn harder(self) -> Self {
        match self {
            Self::Easy => Self::Normal,
            Self::Normal => Self::Hard,
            Self::Hard | Self::Insane => Self::Insane,
        }
    }

    /// Returns the next easier difficulty, clamped at the easiest
    pub fn easier(self) -> Self {
        match self {
            Self::Easy | Self::Normal => Self::Easy,
            Self::Hard => Self::Normal,
            Self::Insane => Self::Hard,
        }
    }

    /// Returns the zero-based position of this difficulty
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Which bottle spins in the middle of the ring
///
/// Purely cosmetic; the frontend picks the matching sprite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BottleType {
    /// A cola bottle
    #[default]
    Cola,
    /// A sprite bottle
    Sprite,
    /// A Božkov bottle
    Bozkov,
    /// A Finlandia bottle
    Finlandia,
    /// Whatever bottle happens to be at hand
    Other,
}

impl BottleType {
    /// Returns the display label for this bottle
    pub fn label(self) -> &'static str {
        match self {
            Self::Cola => "coca cola",
            Self::Sprite => "sprite",
            Self::Bozkov => "božkov",
            Self::Finlandia => "finlandia",
            Self::Other => "jiná",
        }
    }

    /// Returns the next bottle in the list, clamped at the last
    pub fn next(self) -> Self {
        match self {
            Self::Cola => Self::Sprite,
            Self::Sprite => Self::Bozkov,
            Self::Bozkov => Self::Finlandia,
            Self::Finlandia | Self::Other => Self::Other,
        }
    }

    /// Returns the previous bottle in the list, clamped at the first
    pub fn prev(self) -> Self {
        match self {
            Self::Cola | Self::Sprite => Self::Cola,
            Self::Bozkov => Self::Sprite,
            Self::Finlandia => Self::Bozkov,
            Self::Other => Self::Finlandia,
        }
    }

    /// Returns the zero-based position of this bottle
    pub fn index(self) -> usize {
        self as usize
    }
}

/// The adjustable session settings
///
/// Mutated only through the clamped stepping methods, so the bounds hold
/// after any sequence of adjustments.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct Settings {
    /// Task difficulty
    #[garde(skip)]
    difficulty: Difficulty,
    /// Lives each player starts the round with
    #[garde(range(min = constants::settings::MIN_LIVES, max = constants::settings::MAX_LIVES))]
    lives: u8,
    /// Bottle shown in the middle of the ring
    #[garde(skip)]
    bottle: BottleType,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            lives: constants::settings::DEFAULT_LIVES,
            bottle: BottleType::default(),
        }
    }
}

impl Settings {
    /// Returns the current difficulty
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Returns the lives each player starts with
    pub fn lives(&self) -> u8 {
        self.lives
    }

    /// Returns the current bottle type
    pub fn bottle(&self) -> BottleType {
        self.bottle
    }

    /// Steps the difficulty up, clamped at the hardest
    pub fn raise_difficulty(&mut self) {
        self.difficulty = self.difficulty.harder();
    }

    /// Steps the difficulty down, clamped at the easiest
    pub fn lower_difficulty(&mut self) {
        self.difficulty = self.difficulty.easier();
    }

    /// Adds a starting life, clamped at the maximum
    pub fn more_lives(&mut self) {
        self.lives = (self.lives + 1).min(constants::settings::MAX_LIVES);
    }

    /// Removes a starting life, clamped at the minimum
    pub fn fewer_lives(&mut self) {
        self.lives = self.lives.saturating_sub(1).max(constants::settings::MIN_LIVES);
    }

    /// Steps to the next bottle, clamped at the last
    pub fn next_bottle(&mut self) {
        self.bottle = self.bottle.next();
    }

    /// Steps to the previous bottle, clamped at the first
    pub fn prev_bottle(&mut self) {
        self.bottle = self.bottle.prev();
    }

    /// Returns the serializable view of the settings screen
    pub fn view(&self) -> SettingsView {
        SettingsView {
            difficulty: self.difficulty.label(),
            lives: self.lives,
            bottle: self.bottle.label(),
        }
    }
}

/// View model of the settings screen
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct SettingsView {
    /// Display label of the selected difficulty
    pub difficulty: &'static str,
    /// Lives each player starts with
    pub lives: u8,
    /// Display label of the selected bottle
    pub bottle: &'static str,
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.difficulty(), Difficulty::Normal);
        assert_eq!(settings.lives(), 3);
        assert_eq!(settings.bottle(), BottleType::Cola);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_difficulty_clamps_at_both_ends() {
        let mut settings = Settings::default();
        for _ in 0..10 {
            settings.raise_difficulty();
        }
        assert_eq!(settings.difficulty(), Difficulty::Insane);
        assert_eq!(settings.difficulty().index(), 3);

        for _ in 0..10 {
            settings.lower_difficulty();
        }
        assert_eq!(settings.difficulty(), Difficulty::Easy);
        assert_eq!(settings.difficulty().index(), 0);
    }

    #[test]
    fn test_lives_clamp_at_both_ends() {
        let mut settings = Settings::default();
        for _ in 0..10 {
            settings.more_lives();
        }
        assert_eq!(settings.lives(), constants::settings::MAX_LIVES);

        for _ in 0..10 {
            settings.fewer_lives();
        }
        assert_eq!(settings.lives(), constants::settings::MIN_LIVES);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_bottle_clamps_at_both_ends() {
        let mut settings = Settings::default();
        for _ in 0..10 {
            settings.next_bottle();
        }
        assert_eq!(settings.bottle(), BottleType::Other);
        assert_eq!(settings.bottle().index(), 4);

        for _ in 0..10 {
            settings.prev_bottle();
        }
        assert_eq!(settings.bottle(), BottleType::Cola);
        assert_eq!(settings.bottle().index(), 0);
    }

    #[test]
    fn test_bounds_hold_under_mixed_adjustments() {
        let mut settings = Settings::default();
        for step in 0..100 {
            match step % 6 {
                0 => settings.raise_difficulty(),
                1 => settings.more_lives(),
                2 => settings.next_bottle(),
                3 => settings.lower_difficulty(),
                4 => settings.fewer_lives(),
                _ => settings.prev_bottle(),
            }
            assert!(settings.difficulty().index() <= 3);
            assert!(settings.lives() >= constants::settings::MIN_LIVES);
            assert!(settings.lives() <= constants::settings::MAX_LIVES);
            assert!(settings.bottle().index() <= 4);
        }
    }

    #[test]
    fn test_view_labels() {
        let mut settings = Settings::default();
        settings.raise_difficulty();
        let view = settings.view();
        assert_eq!(view.difficulty, "Hard");
        assert_eq!(view.lives, 3);
        assert_eq!(view.bottle, "coca cola");
    }

    #[test]
    fn test_settings_serialization_round_trip() {
        let mut settings = Settings::default();
        settings.raise_difficulty();
        settings.more_lives();

        let json = serde_json::to_string(&settings).unwrap();
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.difficulty(), Difficulty::Hard);
        assert_eq!(back.lives(), 4);
    }
}
