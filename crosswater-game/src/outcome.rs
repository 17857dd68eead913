//! Win/lose evaluation and the exactly-once outcome latch.
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::boat::Side;
use crate::constants::{HEADLINE_LOST, HEADLINE_WON};
use crate::population::{BankCount, PopulationCensus};

/// The bank where killers outnumbered villagers, with the counts seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LossReason {
    pub side: Side,
    pub villagers: u32,
    pub killers: u32,
}

impl fmt::Display for LossReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} killers outnumbered {} villagers on the {} bank",
            self.killers, self.villagers, self.side
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GameOutcome {
    #[default]
    Ongoing,
    Won,
    Lost(LossReason),
}

impl GameOutcome {
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Ongoing)
    }

    /// End-panel text, if the game is over.
    #[must_use]
    pub const fn headline(&self) -> Option<&'static str> {
        match self {
            Self::Ongoing => None,
            Self::Won => Some(HEADLINE_WON),
            Self::Lost(_) => Some(HEADLINE_LOST),
        }
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ongoing => write!(f, "ongoing"),
            Self::Won => write!(f, "won"),
            Self::Lost(reason) => write!(f, "lost ({reason})"),
        }
    }
}

/// Roster totals the win check compares the far bank against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub villagers: u32,
    pub killers: u32,
}

/// Win first, then loss on either bank; otherwise the game goes on.
#[must_use]
pub fn evaluate_outcome(census: &PopulationCensus, totals: Totals) -> GameOutcome {
    if census.left.villagers == totals.villagers && census.left.killers == totals.killers {
        return GameOutcome::Won;
    }
    for side in [Side::Right, Side::Left] {
        let BankCount { villagers, killers } = census.bank(side);
        if census.bank(side).is_unsafe() {
            return GameOutcome::Lost(LossReason {
                side,
                villagers,
                killers,
            });
        }
    }
    GameOutcome::Ongoing
}

/// Holds the first terminal outcome and ignores every later evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeLatch {
    totals: Totals,
    outcome: GameOutcome,
    latched_at: Option<f64>,
}

impl OutcomeLatch {
    #[must_use]
    pub const fn new(totals: Totals) -> Self {
        Self {
            totals,
            outcome: GameOutcome::Ongoing,
            latched_at: None,
        }
    }

    #[must_use]
    pub const fn outcome(&self) -> GameOutcome {
        self.outcome
    }

    /// Session-clock seconds at which the outcome latched.
    #[must_use]
    pub const fn latched_at(&self) -> Option<f64> {
        self.latched_at
    }

    /// Evaluate once; returns the outcome only on the tick it latches.
    pub fn observe(&mut self, census: &PopulationCensus, now: f64) -> Option<GameOutcome> {
        if self.outcome.is_terminal() {
            return None;
        }
        let outcome = evaluate_outcome(census, self.totals);
        if !outcome.is_terminal() {
            return None;
        }
        info!("outcome latched at {now:.2}s: {outcome}");
        self.outcome = outcome;
        self.latched_at = Some(now);
        Some(outcome)
    }
}
