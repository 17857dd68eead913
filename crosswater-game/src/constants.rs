//! Centralized tuning constants for the Crosswater crossing logic.
//!
//! The reference scenario ships three villagers and three killers on the
//! right bank with a two-seat boat. Anything a scenario may override lives
//! in [`crate::config::ScenarioConfig`]; these are its defaults.

// Roster -------------------------------------------------------------------
pub(crate) const DEFAULT_VILLAGERS: u8 = 3;
pub(crate) const DEFAULT_KILLERS: u8 = 3;

// Zones --------------------------------------------------------------------
pub(crate) const DEFAULT_BANK_SLOTS: usize = 6;
pub(crate) const DEFAULT_BOAT_SEATS: usize = 2;
pub(crate) const EXPRESS_BOAT_SEATS: usize = 3;

/// Inline capacity for zone slot storage; larger zones spill to the heap.
pub(crate) const INLINE_SLOTS: usize = 6;

// Timing -------------------------------------------------------------------
pub(crate) const DEFAULT_CROSSING_SECS: f64 = 3.0;
pub(crate) const DEFAULT_TUTORIAL_SECS: f64 = 12.0;

// Interaction labels -------------------------------------------------------
pub(crate) const LABEL_MOVE_VILLAGER: &str = "E to move Person";
pub(crate) const LABEL_MOVE_KILLER: &str = "E to move Killer";
pub(crate) const LABEL_PULL_LEVER: &str = "Press E to pull Lever";
pub(crate) const LABEL_TUTORIAL: &str = "Press E for Tutorial";

// Outcome panel text -------------------------------------------------------
pub(crate) const HEADLINE_WON: &str = "You win";
pub(crate) const HEADLINE_LOST: &str = "You Lose!";
