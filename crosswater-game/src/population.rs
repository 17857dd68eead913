//! Per-bank head counts, re-derived from the zone registry on every tick.
use serde::{Deserialize, Serialize};

use crate::boat::Side;
use crate::roster::{CharacterKind, Roster};
use crate::zones::{Zone, ZoneId, ZoneRegistry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankCount {
    pub villagers: u32,
    pub killers: u32,
}

impl BankCount {
    #[must_use]
    pub const fn new(villagers: u32, killers: u32) -> Self {
        Self { villagers, killers }
    }

    #[must_use]
    pub const fn total(&self) -> u32 {
        self.villagers + self.killers
    }

    /// Killers strictly outnumber villagers and at least one villager is present.
    #[must_use]
    pub const fn is_unsafe(&self) -> bool {
        self.villagers > 0 && self.villagers < self.killers
    }

    const fn add(&mut self, kind: CharacterKind) {
        match kind {
            CharacterKind::Villager => self.villagers += 1,
            CharacterKind::Killer => self.killers += 1,
        }
    }
}

/// Counts attributed to each bank, with boat passengers folded into the
/// bank the boat currently belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationCensus {
    pub right: BankCount,
    pub left: BankCount,
    /// Passengers alone, already included in one of the banks above.
    pub aboard: BankCount,
}

impl PopulationCensus {
    /// Recount from scratch. `boat_side` is the departure side while gliding.
    #[must_use]
    pub fn take(registry: &ZoneRegistry, roster: &Roster, boat_side: Side) -> Self {
        let mut census = Self::default();
        tally(registry.zone(ZoneId::RightBank), roster, &mut census.right);
        tally(registry.zone(ZoneId::LeftBank), roster, &mut census.left);
        tally(registry.zone(ZoneId::Boat), roster, &mut census.aboard);

        let aboard = census.aboard;
        let docked = census.bank_mut(boat_side);
        docked.villagers += aboard.villagers;
        docked.killers += aboard.killers;
        census
    }

    #[must_use]
    pub const fn bank(&self, side: Side) -> BankCount {
        match side {
            Side::Right => self.right,
            Side::Left => self.left,
        }
    }

    const fn bank_mut(&mut self, side: Side) -> &mut BankCount {
        match side {
            Side::Right => &mut self.right,
            Side::Left => &mut self.left,
        }
    }
}

fn tally(zone: &Zone, roster: &Roster, count: &mut BankCount) {
    for kind in zone.occupants().filter_map(|id| roster.kind_of(id)) {
        count.add(kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::CharacterId;
    use crate::zones::SlotRef;

    fn seat(registry: &mut ZoneRegistry, zone: ZoneId, id: u16) {
        let slot: SlotRef = registry.find_free_slot(zone).unwrap();
        registry.occupy(slot, CharacterId(id));
    }

    #[test]
    fn passengers_count_toward_docked_bank() {
        let roster = Roster::with_counts(3, 3);
        let mut registry = ZoneRegistry::new(6, 2);
        seat(&mut registry, ZoneId::RightBank, 0);
        seat(&mut registry, ZoneId::RightBank, 3);
        seat(&mut registry, ZoneId::Boat, 1);
        seat(&mut registry, ZoneId::Boat, 4);
        seat(&mut registry, ZoneId::LeftBank, 2);
        seat(&mut registry, ZoneId::LeftBank, 5);

        let right = PopulationCensus::take(&registry, &roster, Side::Right);
        assert_eq!(right.right, BankCount::new(2, 2));
        assert_eq!(right.left, BankCount::new(1, 1));
        assert_eq!(right.aboard, BankCount::new(1, 1));

        let left = PopulationCensus::take(&registry, &roster, Side::Left);
        assert_eq!(left.right, BankCount::new(1, 1));
        assert_eq!(left.left, BankCount::new(2, 2));
    }

    #[test]
    fn full_boat_folds_into_its_side() {
        let roster = Roster::with_counts(3, 3);
        let mut registry = ZoneRegistry::new(6, 6);
        for id in 0..6 {
            seat(&mut registry, ZoneId::Boat, id);
        }

        let census = PopulationCensus::take(&registry, &roster, Side::Left);
        assert_eq!(census.left, BankCount::new(3, 3));
        assert_eq!(census.right, BankCount::default());
        assert_eq!(census.aboard, BankCount::new(3, 3));
        assert_eq!(census.bank(Side::Left).total(), 6);
    }

    #[test]
    fn unsafe_needs_a_victim() {
        assert!(BankCount::new(1, 2).is_unsafe());
        assert!(BankCount::new(2, 3).is_unsafe());
        assert!(!BankCount::new(0, 3).is_unsafe());
        assert!(!BankCount::new(2, 2).is_unsafe());
        assert!(!BankCount::new(3, 1).is_unsafe());
    }
}
