//! Occupiable slots and the three zones that own them.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::boat::Side;
use crate::constants::INLINE_SLOTS;
use crate::roster::CharacterId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneId {
    RightBank,
    Boat,
    LeftBank,
}

impl ZoneId {
    pub const ALL: [Self; 3] = [Self::RightBank, Self::Boat, Self::LeftBank];

    /// The bank zone on the given side of the river.
    #[must_use]
    pub const fn bank(side: Side) -> Self {
        match side {
            Side::Right => Self::RightBank,
            Side::Left => Self::LeftBank,
        }
    }

    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Self::RightBank => Some(Side::Right),
            Self::LeftBank => Some(Side::Left),
            Self::Boat => None,
        }
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RightBank => write!(f, "right bank"),
            Self::Boat => write!(f, "boat"),
            Self::LeftBank => write!(f, "left bank"),
        }
    }
}

/// A single occupiable location. Holds a character's identity, not the character.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub occupant: Option<CharacterId>,
}

impl Slot {
    #[must_use]
    pub const fn is_free(&self) -> bool {
        self.occupant.is_none()
    }
}

/// Address of a slot inside the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    pub zone: ZoneId,
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub slots: SmallVec<[Slot; INLINE_SLOTS]>,
}

impl Zone {
    #[must_use]
    pub fn with_capacity(id: ZoneId, capacity: usize) -> Self {
        Self {
            id,
            slots: smallvec::smallvec![Slot::default(); capacity],
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn occupants(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.slots.iter().filter_map(|slot| slot.occupant)
    }

    #[must_use]
    pub fn occupied(&self) -> usize {
        self.occupants().count()
    }

    #[must_use]
    pub fn contains(&self, character: CharacterId) -> bool {
        self.occupants().any(|id| id == character)
    }
}

/// The right bank, boat, and left bank slot collections.
///
/// Mutations are unchecked here; the crossing state machine validates
/// before it writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRegistry {
    right_bank: Zone,
    boat: Zone,
    left_bank: Zone,
}

impl ZoneRegistry {
    #[must_use]
    pub fn new(bank_slots: usize, boat_seats: usize) -> Self {
        Self {
            right_bank: Zone::with_capacity(ZoneId::RightBank, bank_slots),
            boat: Zone::with_capacity(ZoneId::Boat, boat_seats),
            left_bank: Zone::with_capacity(ZoneId::LeftBank, bank_slots),
        }
    }

    #[must_use]
    pub const fn zone(&self, id: ZoneId) -> &Zone {
        match id {
            ZoneId::RightBank => &self.right_bank,
            ZoneId::Boat => &self.boat,
            ZoneId::LeftBank => &self.left_bank,
        }
    }

    const fn zone_mut(&mut self, id: ZoneId) -> &mut Zone {
        match id {
            ZoneId::RightBank => &mut self.right_bank,
            ZoneId::Boat => &mut self.boat,
            ZoneId::LeftBank => &mut self.left_bank,
        }
    }

    /// First unoccupied slot of `zone` in insertion order.
    #[must_use]
    pub fn find_free_slot(&self, zone: ZoneId) -> Option<SlotRef> {
        self.zone(zone)
            .slots
            .iter()
            .position(Slot::is_free)
            .map(|index| SlotRef { zone, index })
    }

    /// Clear whichever slot of `zone` holds `character`. Absent is fine.
    pub fn release_slot_of(&mut self, zone: ZoneId, character: CharacterId) {
        if let Some(slot) = self
            .zone_mut(zone)
            .slots
            .iter_mut()
            .find(|slot| slot.occupant == Some(character))
        {
            slot.occupant = None;
        }
    }

    /// Write `character` into `slot` without checking that it was free.
    pub fn occupy(&mut self, slot: SlotRef, character: CharacterId) {
        debug_assert!(
            slot.index < self.zone(slot.zone).capacity(),
            "slot {slot:?} outside zone capacity"
        );
        if let Some(target) = self.zone_mut(slot.zone).slots.get_mut(slot.index) {
            target.occupant = Some(character);
        }
    }

    #[must_use]
    pub fn zone_of(&self, character: CharacterId) -> Option<ZoneId> {
        ZoneId::ALL
            .into_iter()
            .find(|&id| self.zone(id).contains(character))
    }

    #[must_use]
    pub fn occupant(&self, slot: SlotRef) -> Option<CharacterId> {
        self.zone(slot.zone)
            .slots
            .get(slot.index)
            .and_then(|s| s.occupant)
    }

    /// How many slots across all zones reference `character`.
    #[must_use]
    pub fn references_to(&self, character: CharacterId) -> usize {
        ZoneId::ALL
            .into_iter()
            .flat_map(|id| self.zone(id).occupants())
            .filter(|&id| id == character)
            .count()
    }

    #[must_use]
    pub fn total_occupied(&self) -> usize {
        ZoneId::ALL
            .into_iter()
            .map(|id| self.zone(id).occupied())
            .sum()
    }
}
