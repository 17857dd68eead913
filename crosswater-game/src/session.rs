//! Session wrapper tying the crossing state, clock, and outcome latch together.
use log::info;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::boat::{BoatTransit, Side};
use crate::clock::SessionClock;
use crate::config::{ConfigError, ScenarioConfig};
use crate::crossing::{CrossingState, LaunchOutcome, MoveOutcome, Rejection};
use crate::interaction::{CharacterTarget, Interactable, Interaction, Narration, TutorialOutcome};
use crate::numbers::secs_to_duration;
use crate::outcome::{GameOutcome, OutcomeLatch, Totals};
use crate::population::PopulationCensus;
use crate::roster::{CharacterId, CharacterKind};
use crate::zones::{ZoneId, ZoneRegistry};

/// What one frame of simulation produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TickOutcome {
    pub now: f64,
    /// Bank the boat docked at during this tick, if a crossing finished.
    pub arrived: Option<Side>,
    pub census: PopulationCensus,
    pub outcome: GameOutcome,
    /// True only on the tick the outcome latched.
    pub newly_latched: bool,
}

/// Occupants of one zone, slot by slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    pub zone: ZoneId,
    pub slots: Vec<Option<CharacterId>>,
}

/// Read-only view for whatever draws the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub elapsed_secs: f64,
    pub paused: bool,
    pub boat: BoatTransit,
    pub boat_side: Side,
    pub transit_progress: f32,
    pub zones: Vec<ZoneSnapshot>,
    pub census: PopulationCensus,
    pub outcome: GameOutcome,
    pub tutorial_speaking: bool,
}

/// One playthrough of a scenario, from the first tick to the latched outcome.
#[derive(Debug, Clone)]
pub struct CrossingSession {
    config: ScenarioConfig,
    crossing: CrossingState,
    clock: SessionClock,
    latch: OutcomeLatch,
    census: PopulationCensus,
    narration: Narration,
}

impl CrossingSession {
    /// Start a session with everyone on the right bank.
    ///
    /// # Errors
    ///
    /// Returns an error if the scenario fails validation.
    pub fn new(config: ScenarioConfig) -> Result<Self, ConfigError> {
        let crossing = CrossingState::new(&config)?;
        let totals = Totals {
            villagers: crossing.roster().count_kind(CharacterKind::Villager),
            killers: crossing.roster().count_kind(CharacterKind::Killer),
        };
        let census =
            PopulationCensus::take(crossing.registry(), crossing.roster(), crossing.boat_side());
        Ok(Self {
            config,
            crossing,
            clock: SessionClock::default(),
            latch: OutcomeLatch::new(totals),
            census,
            narration: Narration::default(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    #[must_use]
    pub const fn crossing(&self) -> &CrossingState {
        &self.crossing
    }

    #[must_use]
    pub const fn registry(&self) -> &ZoneRegistry {
        self.crossing.registry()
    }

    #[must_use]
    pub const fn clock(&self) -> &SessionClock {
        &self.clock
    }

    /// Counts from the most recent tick.
    #[must_use]
    pub const fn census(&self) -> &PopulationCensus {
        &self.census
    }

    #[must_use]
    pub const fn outcome(&self) -> GameOutcome {
        self.latch.outcome()
    }

    #[must_use]
    pub const fn now(&self) -> f64 {
        self.clock.now()
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Play time at which the session was won.
    #[must_use]
    pub fn won_at(&self) -> Option<Duration> {
        match self.latch.outcome() {
            GameOutcome::Won => self.latch.latched_at().map(secs_to_duration),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_tutorial_speaking(&self) -> bool {
        self.narration.is_speaking()
    }

    /// Interaction target for a character, if the id exists.
    #[must_use]
    pub fn target(&self, character: CharacterId) -> Option<CharacterTarget> {
        self.crossing
            .roster()
            .kind_of(character)
            .map(|kind| CharacterTarget {
                id: character,
                kind,
            })
    }

    pub fn request_move(&mut self, character: CharacterId) -> MoveOutcome {
        if self.latch.outcome().is_terminal() {
            return MoveOutcome::Rejected(Rejection::GameOver);
        }
        self.crossing.request_move(character)
    }

    pub fn try_launch(&mut self) -> LaunchOutcome {
        if self.latch.outcome().is_terminal() {
            return LaunchOutcome::Rejected(Rejection::GameOver);
        }
        let now = self.clock.now();
        self.crossing.try_launch(now)
    }

    pub fn start_tutorial(&mut self) -> TutorialOutcome {
        let now = self.clock.now();
        self.narration.start(now, self.config.tutorial_secs)
    }

    pub fn interact(&mut self, target: &impl Interactable) -> Interaction {
        target.interact(self)
    }

    /// Advance one frame.
    ///
    /// Moves requested since the last tick are already applied, so the
    /// recount and the outcome check below always see them.
    pub fn tick(&mut self, real_dt: f64) -> TickOutcome {
        let now = self.clock.advance(real_dt);
        let arrived = self.crossing.advance(now);
        if self.narration.update(now) {
            info!("tutorial narration finished at {now:.2}s");
        }
        self.census = PopulationCensus::take(
            self.crossing.registry(),
            self.crossing.roster(),
            self.crossing.boat_side(),
        );
        let newly_latched = self.latch.observe(&self.census, now).is_some();
        if newly_latched {
            self.clock.pause();
        }
        TickOutcome {
            now,
            arrived,
            census: self.census,
            outcome: self.latch.outcome(),
            newly_latched,
        }
    }

    pub fn pause(&mut self) {
        self.clock.pause();
    }

    /// Resume play; a finished session stays frozen.
    pub fn resume(&mut self) {
        if !self.latch.outcome().is_terminal() {
            self.clock.resume();
        }
    }

    pub fn set_time_scale(&mut self, scale: f64) {
        if self.latch.outcome().is_terminal() {
            return;
        }
        self.clock.set_time_scale(scale);
    }

    /// Rebuild everything from the same scenario.
    pub fn reset(&mut self) {
        // Construction only fails validation, and this config already passed it.
        if let Ok(fresh) = Self::new(self.config.clone()) {
            *self = fresh;
            info!("session reset");
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        let now = self.clock.now();
        let zones = ZoneId::ALL
            .iter()
            .map(|&zone| ZoneSnapshot {
                zone,
                slots: self
                    .crossing
                    .registry()
                    .zone(zone)
                    .slots
                    .iter()
                    .map(|slot| slot.occupant)
                    .collect(),
            })
            .collect();
        SessionSnapshot {
            elapsed_secs: now,
            paused: self.clock.is_paused(),
            boat: *self.crossing.boat(),
            boat_side: self.crossing.boat_side(),
            transit_progress: self.crossing.transit_progress(now),
            zones,
            census: self.census,
            outcome: self.latch.outcome(),
            tutorial_speaking: self.narration.is_speaking(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{Lever, TutorialGuide};
    use crate::population::BankCount;

    fn session() -> CrossingSession {
        CrossingSession::new(ScenarioConfig::classic()).unwrap()
    }

    fn ids(session: &CrossingSession, kind: CharacterKind) -> Vec<CharacterId> {
        session.crossing().roster().ids_of_kind(kind)
    }

    #[test]
    fn initial_census_counts_everyone_on_the_right() {
        let session = session();
        assert_eq!(session.census().right, BankCount::new(3, 3));
        assert_eq!(session.census().left, BankCount::default());
        assert_eq!(session.outcome(), GameOutcome::Ongoing);
    }

    #[test]
    fn arrival_is_counted_on_the_tick_it_happens() {
        let mut session = session();
        let killer = ids(&session, CharacterKind::Killer)[0];
        session.request_move(killer);
        let docked = session.tick(0.25);
        assert_eq!(docked.census.aboard, BankCount::new(0, 1));
        assert_eq!(docked.census.right, BankCount::new(3, 3));

        assert!(session.try_launch().is_applied());
        let gliding = session.tick(1.0);
        assert_eq!(gliding.arrived, None);
        assert_eq!(gliding.census.right, BankCount::new(3, 3));

        let landed = session.tick(2.0);
        assert_eq!(landed.arrived, Some(Side::Left));
        assert_eq!(landed.census.right, BankCount::new(3, 2));
        assert_eq!(landed.census.left, BankCount::new(0, 1));
        assert_eq!(landed.outcome, GameOutcome::Ongoing);
    }

    #[test]
    fn loss_latches_once_and_freezes_the_clock() {
        let mut session = session();
        let villagers = ids(&session, CharacterKind::Villager);
        session.request_move(villagers[0]);
        session.request_move(villagers[1]);
        assert!(session.try_launch().is_applied());
        assert!(!session.tick(0.5).newly_latched);

        // Right bank keeps 1v against 3k once the boat docks left.
        let tick = session.tick(2.5);
        assert_eq!(tick.arrived, Some(Side::Left));
        assert!(tick.newly_latched);
        assert!(matches!(
            tick.outcome,
            GameOutcome::Lost(reason) if reason.side == Side::Right
        ));
        let frozen_at = session.now();

        let again = session.tick(5.0);
        assert!(!again.newly_latched);
        assert!((session.now() - frozen_at).abs() < f64::EPSILON);
        assert_eq!(
            session.request_move(villagers[2]),
            MoveOutcome::Rejected(Rejection::GameOver)
        );
        assert_eq!(
            session.try_launch(),
            LaunchOutcome::Rejected(Rejection::GameOver)
        );
        session.resume();
        assert!(session.clock().is_paused());
        assert_eq!(session.won_at(), None);
    }

    #[test]
    fn interact_dispatches_by_target() {
        let mut session = session();
        let villager = ids(&session, CharacterKind::Villager)[0];
        let target = session.target(villager).unwrap();

        assert!(matches!(
            session.interact(&target),
            Interaction::Move(MoveOutcome::Boarded { .. })
        ));
        assert!(matches!(
            session.interact(&Lever),
            Interaction::Launch(LaunchOutcome::Launched {
                from: Side::Right,
                passengers: 1
            })
        ));
        assert_eq!(
            session.interact(&TutorialGuide),
            Interaction::Tutorial(TutorialOutcome::Started { until: 12.0 })
        );
        assert_eq!(
            session.interact(&TutorialGuide),
            Interaction::Tutorial(TutorialOutcome::AlreadySpeaking)
        );
        assert!(session.target(CharacterId(99)).is_none());
    }

    #[test]
    fn tutorial_ends_on_the_session_clock() {
        let mut session = session();
        session.start_tutorial();
        session.tick(6.0);
        session.pause();
        session.tick(60.0);
        assert!(session.is_tutorial_speaking());
        session.resume();
        session.tick(6.0);
        assert!(!session.is_tutorial_speaking());
    }

    #[test]
    fn pause_holds_the_boat_mid_crossing() {
        let mut session = session();
        let killer = ids(&session, CharacterKind::Killer)[0];
        session.request_move(killer);
        session.try_launch();
        session.tick(1.5);
        session.pause();
        let held = session.tick(10.0);
        assert_eq!(held.arrived, None);
        assert!(session.crossing().in_transit());
        assert!((session.snapshot().transit_progress - 0.5).abs() < 1e-6);
        session.resume();
        assert_eq!(session.tick(1.5).arrived, Some(Side::Left));
    }

    #[test]
    fn reset_restores_the_opening_layout() {
        let mut session = session();
        let fresh = session.snapshot();
        let villagers = ids(&session, CharacterKind::Villager);
        session.request_move(villagers[0]);
        session.request_move(villagers[1]);
        session.try_launch();
        session.tick(3.0);
        assert!(session.outcome().is_terminal());

        session.reset();
        assert_eq!(session.snapshot(), fresh);
        assert!(!session.clock().is_paused());
    }

    #[test]
    fn snapshot_lists_every_zone() {
        let mut session = session();
        let killer = ids(&session, CharacterKind::Killer)[0];
        session.request_move(killer);
        let snapshot = session.snapshot();
        assert_eq!(snapshot.zones.len(), 3);
        assert_eq!(snapshot.zones[1].zone, ZoneId::Boat);
        assert_eq!(snapshot.zones[1].slots, vec![Some(killer), None]);
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("\"status\":\"ongoing\""));
    }
}
