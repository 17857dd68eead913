//! Boat side and timed transit between the banks.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::numbers::clamp_f64_to_f32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Right,
    Left,
}

impl Side {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Right => write!(f, "right"),
            Self::Left => write!(f, "left"),
        }
    }
}

/// Two-state transit machine: docked on a side, or gliding away from one.
///
/// Times are session-clock seconds, so pausing the clock pauses the glide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BoatTransit {
    Idle { side: Side },
    Transiting { from: Side, started_at: f64 },
}

impl Default for BoatTransit {
    fn default() -> Self {
        Self::Idle { side: Side::Right }
    }
}

impl BoatTransit {
    #[must_use]
    pub const fn docked(side: Side) -> Self {
        Self::Idle { side }
    }

    /// The side passengers are attributed to: the dock, or the departure
    /// side while gliding.
    #[must_use]
    pub const fn side(&self) -> Side {
        match *self {
            Self::Idle { side } => side,
            Self::Transiting { from, .. } => from,
        }
    }

    #[must_use]
    pub const fn in_transit(&self) -> bool {
        matches!(self, Self::Transiting { .. })
    }

    /// Begin a crossing. Returns false when already under way.
    pub fn launch(&mut self, now: f64) -> bool {
        match *self {
            Self::Idle { side } => {
                *self = Self::Transiting {
                    from: side,
                    started_at: now,
                };
                true
            }
            Self::Transiting { .. } => false,
        }
    }

    /// Finish the crossing once `duration` has elapsed, returning the new side.
    pub fn advance(&mut self, now: f64, duration: f64) -> Option<Side> {
        let Self::Transiting { from, started_at } = *self else {
            return None;
        };
        if now - started_at < duration {
            return None;
        }
        let arrived = from.opposite();
        *self = Self::Idle { side: arrived };
        Some(arrived)
    }

    /// Glide fraction in `[0, 1]` for presentation; zero while docked.
    #[must_use]
    pub fn progress(&self, now: f64, duration: f64) -> f32 {
        let Self::Transiting { started_at, .. } = *self else {
            return 0.0;
        };
        if duration <= 0.0 {
            return 1.0;
        }
        clamp_f64_to_f32(((now - started_at) / duration).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_then_arrive_flips_side() {
        let mut boat = BoatTransit::default();
        assert!(boat.launch(10.0));
        assert!(boat.in_transit());
        assert_eq!(boat.side(), Side::Right);
        assert!(!boat.launch(10.5), "second launch mid-crossing is rejected");

        assert_eq!(boat.advance(12.9, 3.0), None);
        assert!(boat.in_transit());
        assert_eq!(boat.advance(13.0, 3.0), Some(Side::Left));
        assert_eq!(boat, BoatTransit::docked(Side::Left));
        assert_eq!(boat.advance(20.0, 3.0), None);
    }

    #[test]
    fn progress_is_clamped() {
        let mut boat = BoatTransit::docked(Side::Left);
        assert!(boat.progress(5.0, 3.0).abs() < f32::EPSILON);
        boat.launch(0.0);
        assert!((boat.progress(1.5, 3.0) - 0.5).abs() < 1e-6);
        assert!((boat.progress(9.0, 3.0) - 1.0).abs() < f32::EPSILON);
    }
}
