//! Bottle spin state machine and animation plan
//!
//! A spin is planned up front: the target seat and the number of turns
//! are drawn when the spin starts, and the animation merely plays the
//! plan out. The state machine is Idle → Spinning → Resolved; resolution
//! happens when the scheduled alarm fires, mirroring how the animation
//! callback of the original UI completed.

use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::constants;

/// Returns the fixed length of the spin animation
pub fn spin_duration() -> Duration {
    Duration::from_millis(constants::spin::SPIN_DURATION_MS)
}

/// Cubic ease-out progress curve
///
/// `t` is clamped to `[0, 1]`; the result starts fast and settles into
/// the target, `1 - (1 - t)^3`.
pub fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// A planned spin: where the bottle will stop and how it gets there
///
/// The target seat is drawn uniformly over ALL seats, eliminated players
/// included. The bottle can point at an empty chair; the round loop
/// still treats that seat as the chosen player.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpinPlan {
    /// Seat index the bottle will stop at
    pub target: usize,
    /// Full turns the bottle makes before stopping, in `[3, 5)`
    turns: f64,
    /// Serial of this spin, used to match its resolve alarm
    pub serial: u64,
}

impl SpinPlan {
    /// Draws a fresh spin plan for a ring of `player_count` seats
    ///
    /// # Arguments
    ///
    /// * `player_count` - Number of seats on the ring (must be nonzero)
    /// * `serial` - Serial the resolve alarm will carry
    pub fn roll(player_count: usize, serial: u64) -> Self {
        Self {
            target: fastrand::usize(..player_count),
            turns: constants::spin::MIN_TURNS
                + fastrand::f64() * (constants::spin::MAX_TURNS - constants::spin::MIN_TURNS),
            serial,
        }
    }

    /// Returns the rotation in degrees at which the bottle stops
    ///
    /// Full turns plus the slice of the ring that points at the target:
    /// `360 · turns + (360 / n) · target`.
    pub fn total_rotation(&self, player_count: usize) -> f64 {
        constants::spin::FULL_TURN_DEGREES * self.turns
            + (constants::spin::FULL_TURN_DEGREES / player_count as f64) * self.target as f64
    }

    /// Returns the eased rotation in degrees after `elapsed` time
    ///
    /// Purely cosmetic; the target seat is fixed from the moment the
    /// plan is drawn.
    pub fn rotation_at(&self, elapsed: Duration, player_count: usize) -> f64 {
        let t = elapsed.as_secs_f64() / spin_duration().as_secs_f64();
        self.total_rotation(player_count) * ease_out_cubic(t)
    }
}

/// The phase of the turn selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum SpinPhase {
    /// No spin in flight; a spin request is accepted
    #[default]
    Idle,
    /// The bottle is turning; further spin requests are ignored
    Spinning(SpinPlan),
    /// The bottle stopped on a seat and its task is being presented
    Resolved {
        /// Seat index the bottle stopped at
        target: usize,
    },
}

/// Alarm messages for spin resolution
///
/// Scheduled when a spin starts and fed back when the animation time has
/// passed. The serial lets the game discard alarms from spins that are
/// no longer in flight.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum AlarmMessage {
    /// The spin with the given serial has finished turning
    Resolve {
        /// Serial of the spin to resolve
        serial: u64,
    },
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn test_roll_stays_in_bounds() {
        fastrand::seed(7);
        for _ in 0..200 {
            let plan = SpinPlan::roll(6, 1);
            assert!(plan.target < 6);
            assert!(plan.turns >= constants::spin::MIN_TURNS);
            assert!(plan.turns < constants::spin::MAX_TURNS);
        }
    }

    #[test]
    fn test_roll_can_hit_every_seat() {
        fastrand::seed(11);
        let mut seen = [false; 4];
        for _ in 0..500 {
            seen[SpinPlan::roll(4, 0).target] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
    }

    #[test]
    fn test_total_rotation_formula() {
        let plan = SpinPlan {
            target: 2,
            turns: 3.5,
            serial: 0,
        };
        let expected = 360.0 * 3.5 + (360.0 / 8.0) * 2.0;
        assert!((plan.total_rotation(8) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_ease_out_cubic_endpoints_and_clamping() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert_eq!(ease_out_cubic(-0.5), 0.0);
        assert_eq!(ease_out_cubic(2.0), 1.0);
        // Ease-out: the first half covers most of the distance.
        assert!(ease_out_cubic(0.5) > 0.5);
    }

    #[test]
    fn test_ease_out_cubic_is_monotonic() {
        let mut last = 0.0;
        for step in 0..=100 {
            let eased = ease_out_cubic(f64::from(step) / 100.0);
            assert!(eased >= last);
            last = eased;
        }
    }

    #[test]
    fn test_rotation_at_reaches_target_and_stays() {
        let plan = SpinPlan {
            target: 1,
            turns: 4.0,
            serial: 0,
        };
        let total = plan.total_rotation(4);

        assert_eq!(plan.rotation_at(Duration::ZERO, 4), 0.0);
        let at_end = plan.rotation_at(spin_duration(), 4);
        assert!((at_end - total).abs() < 1e-9);
        // Clamped past the duration.
        let past_end = plan.rotation_at(spin_duration() * 2, 4);
        assert!((past_end - total).abs() < 1e-9);
    }

    #[test]
    fn test_spin_phase_default_is_idle() {
        assert_eq!(SpinPhase::default(), SpinPhase::Idle);
    }
}
