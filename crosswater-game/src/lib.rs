//! Crosswater Game Engine
//!
//! Platform-agnostic core logic for the Crosswater river-crossing puzzle.
//! Villagers and killers start on the right bank; the player ferries them
//! across without ever letting killers outnumber villagers on a bank.
//! This crate owns the rules and timing, with no rendering or input code.

pub mod boat;
pub mod clock;
pub mod config;
pub mod constants;
pub mod crossing;
pub mod interaction;
pub mod numbers;
pub mod outcome;
pub mod population;
pub mod records;
pub mod roster;
pub mod session;
pub mod zones;

// Re-export commonly used types
pub use boat::{BoatTransit, Side};
pub use clock::SessionClock;
pub use config::{ConfigError, ScenarioConfig};
pub use crossing::{CrossingState, LaunchOutcome, MoveOutcome, Rejection};
pub use interaction::{
    Affordance, CharacterTarget, Interactable, Interaction, Lever, Narration, TutorialGuide,
    TutorialOutcome,
};
pub use outcome::{GameOutcome, LossReason, OutcomeLatch, Totals, evaluate_outcome};
pub use population::{BankCount, PopulationCensus};
pub use records::{BestTime, MemoryRecordStore, RecordStore, RecordUpdate, record_win};
pub use roster::{Character, CharacterId, CharacterKind, Roster};
pub use session::{CrossingSession, SessionSnapshot, TickOutcome, ZoneSnapshot};
pub use zones::{Slot, SlotRef, Zone, ZoneId, ZoneRegistry};

/// Entry point binding a scenario to a best-time store.
pub struct CrossingEngine<S>
where
    S: RecordStore,
{
    config: ScenarioConfig,
    store: S,
}

impl<S> CrossingEngine<S>
where
    S: RecordStore,
{
    pub const fn new(config: ScenarioConfig, store: S) -> Self {
        Self { config, store }
    }

    /// Build an engine from a JSON scenario, validating it up front.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not parse or the scenario is unplayable.
    pub fn from_json(json: &str, store: S) -> Result<Self, anyhow::Error> {
        let config = ScenarioConfig::from_json(json)?;
        config.validate()?;
        Ok(Self::new(config, store))
    }

    #[must_use]
    pub const fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Start a fresh playthrough.
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario fails validation.
    pub fn create_session(&self) -> Result<CrossingSession, ConfigError> {
        CrossingSession::new(self.config.clone())
    }

    /// Current best time, if any.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the record cannot be read.
    pub fn best_time(&self) -> Result<Option<BestTime>, S::Error> {
        self.store.load_best()
    }

    /// Record a won session's time; other outcomes leave the store alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    pub fn finish_session(
        &self,
        session: &CrossingSession,
    ) -> Result<Option<RecordUpdate>, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let Some(elapsed) = session.won_at() else {
            return Ok(None);
        };
        let update = record_win(&self.store, elapsed).map_err(Into::into)?;
        Ok(Some(update))
    }
}
