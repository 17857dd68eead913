//! Scenario configuration and its validation.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_BANK_SLOTS, DEFAULT_BOAT_SEATS, DEFAULT_CROSSING_SECS, DEFAULT_KILLERS,
    DEFAULT_TUTORIAL_SECS, DEFAULT_VILLAGERS, EXPRESS_BOAT_SEATS,
};

/// Errors raised when a scenario cannot produce a playable session.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("scenario has no characters")]
    EmptyRoster,
    #[error("boat needs at least one seat")]
    NoBoatSeats,
    #[error("right bank holds {slots} slots but {characters} characters start there")]
    StartingBankTooSmall { slots: usize, characters: usize },
    #[error("{field} must be a positive number of seconds (got {value})")]
    Duration { field: &'static str, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default = "ScenarioConfig::default_villagers")]
    pub villagers: u8,
    #[serde(default = "ScenarioConfig::default_killers")]
    pub killers: u8,
    /// Slots per bank; both banks share the count, so the far bank can
    /// always take everyone.
    #[serde(default = "ScenarioConfig::default_bank_slots")]
    pub bank_slots: usize,
    #[serde(default = "ScenarioConfig::default_boat_seats")]
    pub boat_seats: usize,
    #[serde(default = "ScenarioConfig::default_crossing_secs")]
    pub crossing_secs: f64,
    #[serde(default = "ScenarioConfig::default_tutorial_secs")]
    pub tutorial_secs: f64,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            villagers: Self::default_villagers(),
            killers: Self::default_killers(),
            bank_slots: Self::default_bank_slots(),
            boat_seats: Self::default_boat_seats(),
            crossing_secs: Self::default_crossing_secs(),
            tutorial_secs: Self::default_tutorial_secs(),
        }
    }
}

impl ScenarioConfig {
    const fn default_villagers() -> u8 {
        DEFAULT_VILLAGERS
    }

    const fn default_killers() -> u8 {
        DEFAULT_KILLERS
    }

    const fn default_bank_slots() -> usize {
        DEFAULT_BANK_SLOTS
    }

    const fn default_boat_seats() -> usize {
        DEFAULT_BOAT_SEATS
    }

    const fn default_crossing_secs() -> f64 {
        DEFAULT_CROSSING_SECS
    }

    const fn default_tutorial_secs() -> f64 {
        DEFAULT_TUTORIAL_SECS
    }

    /// Three villagers, three killers, two seats.
    #[must_use]
    pub fn classic() -> Self {
        Self::default()
    }

    /// Same roster with a three-seat boat.
    #[must_use]
    pub fn express() -> Self {
        Self {
            boat_seats: EXPRESS_BOAT_SEATS,
            ..Self::default()
        }
    }

    /// Parse a scenario from JSON; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn total_characters(&self) -> usize {
        usize::from(self.villagers) + usize::from(self.killers)
    }

    /// Check that a session built from this scenario can start and be won.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let characters = self.total_characters();
        if characters == 0 {
            return Err(ConfigError::EmptyRoster);
        }
        if self.boat_seats == 0 {
            return Err(ConfigError::NoBoatSeats);
        }
        if self.bank_slots < characters {
            return Err(ConfigError::StartingBankTooSmall {
                slots: self.bank_slots,
                characters,
            });
        }
        for (field, value) in [
            ("crossing_secs", self.crossing_secs),
            ("tutorial_secs", self.tutorial_secs),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Duration { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert_eq!(ScenarioConfig::classic().validate(), Ok(()));
        assert_eq!(ScenarioConfig::express().boat_seats, 3);
        assert_eq!(ScenarioConfig::express().validate(), Ok(()));
    }

    #[test]
    fn json_fills_missing_fields() {
        let cfg = ScenarioConfig::from_json(r#"{ "boat_seats": 3, "crossing_secs": 1.5 }"#).unwrap();
        assert_eq!(cfg.boat_seats, 3);
        assert_eq!(cfg.villagers, 3);
        assert_eq!(cfg.bank_slots, 6);
        assert!((cfg.crossing_secs - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_reports_each_violation() {
        let empty = ScenarioConfig {
            villagers: 0,
            killers: 0,
            ..ScenarioConfig::default()
        };
        assert_eq!(empty.validate(), Err(ConfigError::EmptyRoster));

        let seatless = ScenarioConfig {
            boat_seats: 0,
            ..ScenarioConfig::default()
        };
        assert_eq!(seatless.validate(), Err(ConfigError::NoBoatSeats));

        let cramped = ScenarioConfig {
            bank_slots: 3,
            ..ScenarioConfig::default()
        };
        assert_eq!(
            cramped.validate(),
            Err(ConfigError::StartingBankTooSmall {
                slots: 3,
                characters: 6
            })
        );

        let frozen = ScenarioConfig {
            crossing_secs: 0.0,
            ..ScenarioConfig::default()
        };
        assert!(matches!(
            frozen.validate(),
            Err(ConfigError::Duration {
                field: "crossing_secs",
                ..
            })
        ));
    }

    #[test]
    fn error_messages_are_readable() {
        let err = ConfigError::StartingBankTooSmall {
            slots: 3,
            characters: 6,
        };
        assert_eq!(
            err.to_string(),
            "right bank holds 3 slots but 6 characters start there"
        );
    }
}
