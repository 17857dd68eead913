//! Crossing state machine: boarding, disembarking, launching, and arrival.
//!
//! Every rejected request is a silent no-op for the player. The returned
//! [`Rejection`] exists for diagnostics and tests only; nothing in the
//! registry, roster, or boat changes when one is produced.
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::boat::{BoatTransit, Side};
use crate::config::{ConfigError, ScenarioConfig};
use crate::roster::{CharacterId, Roster};
use crate::zones::{SlotRef, ZoneId, ZoneRegistry};

/// Why a gameplay request was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Rejection {
    UnknownCharacter { character: CharacterId },
    BoatInTransit,
    /// The character stands on the bank the boat is not docked at.
    WrongBank {
        character: CharacterId,
        boat_side: Side,
    },
    NotAboard { character: CharacterId },
    BoatFull,
    BankFull { bank: ZoneId },
    /// Launch attempted with every seat empty.
    NoDriver,
    /// The outcome has latched; only a reset accepts input again.
    GameOver,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownCharacter { character } => write!(f, "no character {character}"),
            Self::BoatInTransit => write!(f, "boat is mid-crossing"),
            Self::WrongBank {
                character,
                boat_side,
            } => write!(
                f,
                "cannot board {character}: boat is on the {boat_side} bank"
            ),
            Self::NotAboard { character } => write!(f, "{character} is not in the boat"),
            Self::BoatFull => write!(f, "no free seat in the boat"),
            Self::BankFull { bank } => write!(f, "no free slot on the {bank}"),
            Self::NoDriver => write!(f, "boat needs a driver"),
            Self::GameOver => write!(f, "the game is over"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum MoveOutcome {
    Boarded {
        character: CharacterId,
        seat: SlotRef,
    },
    Disembarked {
        character: CharacterId,
        slot: SlotRef,
    },
    Rejected(Rejection),
}

impl MoveOutcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum LaunchOutcome {
    Launched { from: Side, passengers: usize },
    Rejected(Rejection),
}

impl LaunchOutcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Launched { .. })
    }
}

/// Owns who stands where and where the boat is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossingState {
    roster: Roster,
    registry: ZoneRegistry,
    boat: BoatTransit,
    crossing_secs: f64,
}

impl CrossingState {
    /// Build the starting layout: everyone on the right bank, boat docked right.
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario fails validation.
    pub fn new(config: &ScenarioConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let roster = Roster::with_counts(config.villagers, config.killers);
        let mut registry = ZoneRegistry::new(config.bank_slots, config.boat_seats);
        for character in roster.iter() {
            let slot = registry.find_free_slot(ZoneId::RightBank);
            debug_assert!(slot.is_some(), "validated right bank ran out of slots");
            if let Some(slot) = slot {
                registry.occupy(slot, character.id);
            }
        }
        Ok(Self {
            roster,
            registry,
            boat: BoatTransit::docked(Side::Right),
            crossing_secs: config.crossing_secs,
        })
    }

    #[must_use]
    pub const fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub const fn registry(&self) -> &ZoneRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn boat(&self) -> &BoatTransit {
        &self.boat
    }

    #[must_use]
    pub const fn boat_side(&self) -> Side {
        self.boat.side()
    }

    #[must_use]
    pub const fn in_transit(&self) -> bool {
        self.boat.in_transit()
    }

    #[must_use]
    pub const fn crossing_secs(&self) -> f64 {
        self.crossing_secs
    }

    #[must_use]
    pub fn transit_progress(&self, now: f64) -> f32 {
        self.boat.progress(now, self.crossing_secs)
    }

    #[must_use]
    pub fn zone_of(&self, character: CharacterId) -> Option<ZoneId> {
        self.registry.zone_of(character)
    }

    /// Single entry point for "interact with this character".
    pub fn request_move(&mut self, character: CharacterId) -> MoveOutcome {
        let Some(in_boat) = self.roster.get(character).map(|c| c.in_boat) else {
            return reject_move(Rejection::UnknownCharacter { character });
        };
        if self.boat.in_transit() {
            return reject_move(Rejection::BoatInTransit);
        }
        if in_boat {
            self.try_disembark(character)
        } else {
            self.try_board(character)
        }
    }

    /// Step off the boat onto the bank it is docked at.
    pub fn try_disembark(&mut self, character: CharacterId) -> MoveOutcome {
        if self.roster.get(character).is_none() {
            return reject_move(Rejection::UnknownCharacter { character });
        }
        if self.boat.in_transit() {
            return reject_move(Rejection::BoatInTransit);
        }
        if self.registry.zone_of(character) != Some(ZoneId::Boat) {
            return reject_move(Rejection::NotAboard { character });
        }
        let bank = ZoneId::bank(self.boat.side());
        let Some(slot) = self.registry.find_free_slot(bank) else {
            return reject_move(Rejection::BankFull { bank });
        };

        self.registry.occupy(slot, character);
        self.registry.release_slot_of(ZoneId::Boat, character);
        self.set_in_boat(character, false);
        debug!("{character} disembarked onto the {bank}");
        MoveOutcome::Disembarked { character, slot }
    }

    /// Take a free seat, provided the character waits on the boat's bank.
    pub fn try_board(&mut self, character: CharacterId) -> MoveOutcome {
        if self.roster.get(character).is_none() {
            return reject_move(Rejection::UnknownCharacter { character });
        }
        if self.boat.in_transit() {
            return reject_move(Rejection::BoatInTransit);
        }
        let boat_side = self.boat.side();
        if self.registry.zone_of(character) != Some(ZoneId::bank(boat_side)) {
            return reject_move(Rejection::WrongBank {
                character,
                boat_side,
            });
        }
        let Some(seat) = self.registry.find_free_slot(ZoneId::Boat) else {
            return reject_move(Rejection::BoatFull);
        };

        // Clear both banks so a stale reference cannot survive the move.
        self.registry.release_slot_of(ZoneId::RightBank, character);
        self.registry.release_slot_of(ZoneId::LeftBank, character);
        self.registry.occupy(seat, character);
        self.set_in_boat(character, true);
        debug!("{character} boarded seat {}", seat.index);
        MoveOutcome::Boarded { character, seat }
    }

    /// Lever pull: start a crossing if anyone is aboard.
    pub fn try_launch(&mut self, now: f64) -> LaunchOutcome {
        if self.boat.in_transit() {
            return reject_launch(Rejection::BoatInTransit);
        }
        let passengers = self.registry.zone(ZoneId::Boat).occupied();
        if passengers == 0 {
            return reject_launch(Rejection::NoDriver);
        }
        let from = self.boat.side();
        if !self.boat.launch(now) {
            return reject_launch(Rejection::BoatInTransit);
        }
        info!("boat launched from the {from} bank with {passengers} aboard");
        LaunchOutcome::Launched { from, passengers }
    }

    /// Complete a crossing whose duration has elapsed.
    pub fn advance(&mut self, now: f64) -> Option<Side> {
        let arrived = self.boat.advance(now, self.crossing_secs)?;
        info!("boat arrived at the {arrived} bank");
        Some(arrived)
    }

    fn set_in_boat(&mut self, character: CharacterId, in_boat: bool) {
        if let Some(entry) = self.roster.get_mut(character) {
            entry.in_boat = in_boat;
        }
    }
}

fn reject_move(reason: Rejection) -> MoveOutcome {
    debug!("move ignored: {reason}");
    MoveOutcome::Rejected(reason)
}

fn reject_launch(reason: Rejection) -> LaunchOutcome {
    debug!("launch ignored: {reason}");
    LaunchOutcome::Rejected(reason)
}
