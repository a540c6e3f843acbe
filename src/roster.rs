//! Player roster building and elimination bookkeeping
//!
//! This module turns the name-entry slots into the ordered list of
//! [`Player`] records for a round, derives the deterministic avatar color
//! for each name, and owns the elimination primitives the game loop uses:
//! losing lives, the one-way eliminated flag, and survivor counting.

use garde::Validate;
use heck::ToTitleCase;
use rustrict::CensorStr;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use crate::constants;

/// Defines the style of automatically generated player names
///
/// When the generated-name fill is enabled, this enum determines what
/// kind of name a blank entry slot receives.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Validate)]
pub enum NameStyle {
    /// Roman-style names (praenomen + nomen, optionally + cognomen)
    Roman(#[garde(range(min = 2, max = 3))] usize),
    /// Pet-style names (adjective + animal combinations)
    Petname(#[garde(range(min = 2, max = 3))] usize),
}

impl Default for NameStyle {
    /// Default name style is Petname with 2 words
    fn default() -> Self {
        Self::Petname(2)
    }
}

impl NameStyle {
    /// Generates a random name according to this style
    pub fn get_name(&self) -> String {
        match self {
            Self::Roman(count) => romanname::romanname(romanname::NameConfig {
                praenomen: *count > 2,
            }),
            Self::Petname(count) => petname::petname(*count as u8, " ").unwrap_or_default(),
        }
        .to_title_case()
    }
}

/// Policy for filling blank name-entry slots
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub enum BlankNames {
    /// Use a numbered placeholder (`Player N`)
    #[default]
    Numbered,
    /// Generate a name in the given style
    Generated(NameStyle),
}

impl BlankNames {
    /// Produces the name for a blank slot at the given position
    fn fill(&self, index: usize) -> String {
        match self {
            Self::Numbered => format!("Player {}", index + 1),
            Self::Generated(style) => style.get_name(),
        }
    }
}

/// An avatar color in HSL space
///
/// The hue is derived from the player name; saturation and lightness are
/// fixed so the ring stays readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    /// Hue in degrees, 0..360
    pub hue: u16,
    /// Saturation percentage
    pub saturation: u8,
    /// Lightness percentage
    pub lightness: u8,
}

impl Color {
    /// Derives the color for a player name
    ///
    /// The hash folds the UTF-16 code units of the name with 32-bit
    /// wrapping arithmetic (`hash = c + (hash << 5) - hash`), so the same
    /// name always maps to the same hue. Different names may collide.
    pub fn from_name(name: &str) -> Self {
        let mut hash: i32 = 0;
        for unit in name.encode_utf16() {
            hash = (i32::from(unit)).wrapping_add(hash.wrapping_shl(5).wrapping_sub(hash));
        }
        Self {
            hue: (hash.unsigned_abs() % 360) as u16,
            saturation: constants::color::SATURATION,
            lightness: constants::color::LIGHTNESS,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "hsl({}, {}%, {}%)",
            self.hue, self.saturation, self.lightness
        )
    }
}

/// A single player in the round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Display name, never empty
    pub name: String,
    /// Remaining lives; the round loop only ever decrements this
    pub lives: u8,
    /// Set once the lives run out, never cleared within a round
    pub eliminated: bool,
    /// Avatar color derived from the name
    pub color: Color,
}

/// The ordered players of a round
///
/// Built when name entry is confirmed and discarded when a new game
/// starts. Order is the seat order around the ring.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    /// Builds the roster from the name-entry slots
    ///
    /// Every slot becomes a player: entered names are trimmed, truncated
    /// to the maximum length and censored when inappropriate; blank slots
    /// are filled per the blank-name policy. Each player starts with the
    /// configured lives and is not eliminated.
    pub fn build(slots: &[String], lives: u8, blank_names: &BlankNames) -> Self {
        let players = slots
            .iter()
            .enumerate()
            .map(|(index, slot)| {
                let name = clean_name(slot).unwrap_or_else(|| blank_names.fill(index));
                let color = Color::from_name(&name);
                Player {
                    name,
                    lives,
                    eliminated: false,
                    color,
                }
            })
            .collect();
        Self { players }
    }

    /// Returns the number of players in the roster
    pub fn len(&self) -> usize {
        self.players.len()
    }

    /// Returns `true` if the roster has no players
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Returns the player at `index`
    pub fn get(&self, index: usize) -> Option<&Player> {
        self.players.get(index)
    }

    /// Returns all players in seat order
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Returns the number of players still in the game
    pub fn survivor_count(&self) -> usize {
        self.players.iter().filter(|p| !p.eliminated).count()
    }

    /// Returns the first surviving player, if any
    ///
    /// Meaningful as the round winner once the survivor count has
    /// dropped to one or zero.
    pub fn sole_survivor(&self) -> Option<&Player> {
        self.players.iter().find(|p| !p.eliminated)
    }

    /// Applies a failed task to the player at `index`
    ///
    /// Removes one life; at zero lives the player is eliminated for the
    /// rest of the round. Returns `true` if this failure eliminated them.
    /// Out-of-range indices are ignored.
    pub fn apply_failure(&mut self, index: usize) -> bool {
        let Some(player) = self.players.get_mut(index) else {
            return false;
        };
        player.lives = player.lives.saturating_sub(1);
        if player.lives == 0 && !player.eliminated {
            player.eliminated = true;
            return true;
        }
        false
    }

    /// Produces the seat views for the ring display
    ///
    /// # Arguments
    ///
    /// * `selected` - Seat index to mark as selected, if any
    pub fn seat_views(&self, selected: Option<usize>) -> Vec<SeatView> {
        let total = self.players.len();
        self.players
            .iter()
            .enumerate()
            .map(|(index, player)| SeatView {
                name: player.name.clone(),
                initials: initials(&player.name),
                color: player.color,
                angle: seat_angle(index, total),
                lives: player.lives,
                eliminated: player.eliminated,
                selected: selected == Some(index),
            })
            .collect()
    }
}

/// Trims, truncates and censors an entered name
///
/// Returns `None` for names that are blank after trimming, so the caller
/// can substitute the blank-slot fill. Inappropriate names are censored
/// rather than rejected; roster building never fails.
fn clean_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let truncated: String = trimmed
        .chars()
        .take(constants::roster::MAX_NAME_LENGTH)
        .collect();
    if truncated.is_inappropriate() {
        Some(truncated.censor())
    } else {
        Some(truncated)
    }
}

/// Returns the uppercased initials of up to two name parts
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Returns the seat angle in radians for a seat on the ring
///
/// Seats are evenly spaced, starting at the top of the ring and going
/// clockwise: `index / total * 2π − π/2`.
pub fn seat_angle(index: usize, total: usize) -> f32 {
    if total == 0 {
        return 0.0;
    }
    (index as f32 / total as f32) * std::f32::consts::TAU - std::f32::consts::FRAC_PI_2
}

/// View model of one seat on the ring
#[derive(Debug, Serialize, Clone)]
pub struct SeatView {
    /// Player display name
    pub name: String,
    /// Uppercased initials shown on the avatar
    pub initials: String,
    /// Avatar color
    pub color: Color,
    /// Seat angle in radians
    pub angle: f32,
    /// Remaining lives
    pub lives: u8,
    /// Whether the player is out of the game
    pub eliminated: bool,
    /// Whether the bottle currently points at this seat
    pub selected: bool,
}
