use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;
use crosswater_game::{
    BankCount, CharacterId, CharacterKind, ConfigError, CrossingSession, GameOutcome,
    LaunchOutcome, MoveOutcome, Rejection, ScenarioConfig, Side, TickOutcome, ZoneId,
};
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::logic::script::{Crossing, parse_script};

const MIN_FRAME_SECS: f64 = 1.0 / 120.0;
const MAX_FRAME_SECS: f64 = 1.0 / 30.0;
/// Glide frames allowed before a crossing counts as stuck.
const MAX_GLIDE_FRAMES: usize = 10_000;
/// Inputs thrown at a finished session before the walk resets it.
const POST_OUTCOME_PROBES: usize = 5;
const UNKNOWN_CHARACTER: CharacterId = CharacterId(u16::MAX);

/// How a plan drives the session.
#[derive(Debug, Clone)]
pub enum PlanDriver {
    /// Play crossings written in move notation.
    Script(String),
    /// Seeded random interactions, checked after every input and frame.
    RandomWalk { steps: usize },
    /// Probe every input while the boat glides.
    TransitGate,
}

/// Declarative plan for running a simulation session.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub config: ScenarioConfig,
    pub driver: PlanDriver,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(config: ScenarioConfig, driver: PlanDriver) -> Self {
        Self {
            config,
            driver,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    /// Crossings that reached the far bank.
    pub crossings: usize,
    pub ticks: usize,
    pub actions: usize,
    pub rejections: usize,
    /// Latches seen in the session that was live when the run ended.
    pub latch_events: usize,
    pub wins: usize,
    pub losses: usize,
    pub outcome: GameOutcome,
    pub fastest_win: Option<Duration>,
    pub elapsed_secs: f64,
    pub violations: Vec<String>,
}

impl SimulationSummary {
    fn config_failure(seed: u64, err: &ConfigError) -> Self {
        Self {
            seed,
            crossings: 0,
            ticks: 0,
            actions: 0,
            rejections: 0,
            latch_events: 0,
            wins: 0,
            losses: 0,
            outcome: GameOutcome::Ongoing,
            fastest_win: None,
            elapsed_secs: 0.0,
            violations: vec![format!("scenario rejected: {err}")],
        }
    }
}

/// Headless deterministic runner for the crossing engine.
#[derive(Debug, Clone, Copy)]
pub struct GameTester {
    verbose: bool,
}

impl GameTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> SimulationSummary {
        let mut run = match PlanRun::start(plan.config.clone(), seed) {
            Ok(run) => run,
            Err(err) => return SimulationSummary::config_failure(seed, &err),
        };
        if self.verbose {
            println!(
                "🚣 Starting run | seed:{seed} seats:{} villagers:{} killers:{}",
                plan.config.boat_seats, plan.config.villagers, plan.config.killers
            );
        }

        match &plan.driver {
            PlanDriver::Script(script) => run.play_script(script),
            PlanDriver::RandomWalk { steps } => run.random_walk(*steps),
            PlanDriver::TransitGate => run.transit_gate(),
        }

        let summary = run.finish();
        if self.verbose {
            println!(
                "🏁 Run finished | outcome:{} crossings:{} ticks:{} violations:{}",
                summary.outcome,
                summary.crossings,
                summary.ticks,
                summary.violations.len().to_string().yellow()
            );
        }
        summary
    }
}

/// Live state of one plan execution.
struct PlanRun {
    seed: u64,
    session: CrossingSession,
    rng: ChaCha8Rng,
    totals: BankCount,
    crossings: usize,
    ticks: usize,
    actions: usize,
    rejections: usize,
    latch_events: usize,
    wins: usize,
    losses: usize,
    latched: Option<GameOutcome>,
    fastest_win: Option<Duration>,
    violations: Vec<String>,
}

impl PlanRun {
    fn start(config: ScenarioConfig, seed: u64) -> Result<Self, ConfigError> {
        let session = CrossingSession::new(config)?;
        let roster = session.crossing().roster();
        let totals = BankCount::new(
            roster.count_kind(CharacterKind::Villager),
            roster.count_kind(CharacterKind::Killer),
        );
        Ok(Self {
            seed,
            session,
            rng: ChaCha8Rng::seed_from_u64(seed),
            totals,
            crossings: 0,
            ticks: 0,
            actions: 0,
            rejections: 0,
            latch_events: 0,
            wins: 0,
            losses: 0,
            latched: None,
            fastest_win: None,
            violations: Vec::new(),
        })
    }

    fn finish(self) -> SimulationSummary {
        SimulationSummary {
            seed: self.seed,
            crossings: self.crossings,
            ticks: self.ticks,
            actions: self.actions,
            rejections: self.rejections,
            latch_events: self.latch_events,
            wins: self.wins,
            losses: self.losses,
            outcome: self.session.outcome(),
            fastest_win: self.fastest_win,
            elapsed_secs: self.session.now(),
            violations: self.violations,
        }
    }

    fn violation(&mut self, message: String) {
        debug!("seed {}: {message}", self.seed);
        self.violations.push(message);
    }

    fn frame_secs(&mut self) -> f64 {
        self.rng.gen_range(MIN_FRAME_SECS..=MAX_FRAME_SECS)
    }

    fn tick(&mut self) -> TickOutcome {
        let dt = self.frame_secs();
        let tick = self.session.tick(dt);
        self.ticks += 1;
        if tick.arrived.is_some() {
            self.crossings += 1;
        }
        self.check_tick(&tick);
        tick
    }

    fn request(&mut self, character: CharacterId) -> MoveOutcome {
        self.actions += 1;
        let outcome = self.session.request_move(character);
        if !outcome.is_applied() {
            self.rejections += 1;
        }
        self.check_slots();
        outcome
    }

    fn launch(&mut self) -> LaunchOutcome {
        self.actions += 1;
        let outcome = self.session.try_launch();
        if !outcome.is_applied() {
            self.rejections += 1;
        }
        outcome
    }

    /// Every character sits in exactly one slot and its boat flag agrees.
    fn check_slots(&mut self) {
        let crossing = self.session.crossing();
        let mut problems = Vec::new();
        for character in crossing.roster().iter() {
            let references = crossing.registry().references_to(character.id);
            if references != 1 {
                problems.push(format!(
                    "{} occupies {references} slots at {:.3}s",
                    character.id,
                    self.session.now()
                ));
            }
            let aboard = crossing.zone_of(character.id) == Some(ZoneId::Boat);
            if aboard != character.in_boat {
                problems.push(format!("{} boat flag disagrees with its slot", character.id));
            }
        }
        for problem in problems {
            self.violation(problem);
        }
    }

    fn check_tick(&mut self, tick: &TickOutcome) {
        self.check_slots();

        let recount = self.recount();
        if (tick.census.right, tick.census.left) != recount {
            self.violation(format!(
                "census {:?}/{:?} disagrees with slot recount {recount:?}",
                tick.census.right, tick.census.left
            ));
        }

        if tick.newly_latched {
            self.latch_events += 1;
            match tick.outcome {
                GameOutcome::Won => {
                    self.wins += 1;
                    if let Some(at) = self.session.won_at() {
                        self.fastest_win = Some(self.fastest_win.map_or(at, |best| best.min(at)));
                    }
                }
                GameOutcome::Lost(_) => self.losses += 1,
                GameOutcome::Ongoing => {}
            }
        }
        if self.latch_events > 1 {
            self.violation(format!("outcome latched {} times", self.latch_events));
        }

        if let Some(previous) = self.latched {
            if tick.outcome != previous {
                self.violation(format!(
                    "latched outcome changed from {previous} to {}",
                    tick.outcome
                ));
            }
            return;
        }

        let (right, left) = recount;
        let everyone_left = left == self.totals;
        let doomed = [(Side::Right, right), (Side::Left, left)]
            .into_iter()
            .find(|(_, bank)| bank.villagers > 0 && bank.villagers < bank.killers);
        let consistent = match tick.outcome {
            GameOutcome::Won => everyone_left,
            GameOutcome::Lost(reason) => {
                !everyone_left
                    && doomed.is_some_and(|(side, bank)| {
                        side == reason.side
                            && bank.villagers == reason.villagers
                            && bank.killers == reason.killers
                    })
            }
            GameOutcome::Ongoing => !everyone_left && doomed.is_none(),
        };
        if !consistent {
            self.violation(format!(
                "outcome {} does not follow from right {right:?} left {left:?}",
                tick.outcome
            ));
        }
        if tick.outcome.is_terminal() {
            self.latched = Some(tick.outcome);
        }
    }

    /// Count banks straight from the slots, folding passengers into the boat's side.
    fn recount(&self) -> (BankCount, BankCount) {
        let crossing = self.session.crossing();
        let boat_side = crossing.boat_side();
        let mut right = BankCount::default();
        let mut left = BankCount::default();
        for zone in ZoneId::ALL {
            let side = zone.side().unwrap_or(boat_side);
            let bank = match side {
                Side::Right => &mut right,
                Side::Left => &mut left,
            };
            for id in crossing.registry().zone(zone).occupants() {
                match crossing.roster().kind_of(id) {
                    Some(CharacterKind::Villager) => bank.villagers += 1,
                    Some(CharacterKind::Killer) => bank.killers += 1,
                    None => {}
                }
            }
        }
        (right, left)
    }

    fn waiting(&self, kind: CharacterKind, count: usize, side: Side) -> Option<Vec<CharacterId>> {
        let crossing = self.session.crossing();
        let picked: Vec<CharacterId> = crossing
            .roster()
            .ids_of_kind(kind)
            .into_iter()
            .filter(|id| crossing.zone_of(*id) == Some(ZoneId::bank(side)))
            .take(count)
            .collect();
        (picked.len() == count).then_some(picked)
    }

    fn glide_to_arrival(&mut self) -> Option<TickOutcome> {
        for _ in 0..MAX_GLIDE_FRAMES {
            let tick = self.tick();
            if tick.arrived.is_some() {
                return Some(tick);
            }
        }
        self.violation(format!("boat never arrived after {MAX_GLIDE_FRAMES} frames"));
        None
    }

    fn play_script(&mut self, script: &str) {
        let crossings = match parse_script(script) {
            Ok(crossings) => crossings,
            Err(err) => {
                self.violation(format!("script error: {err}"));
                return;
            }
        };
        for (index, crossing) in crossings.iter().enumerate() {
            if !self.play_crossing(index + 1, *crossing) {
                break;
            }
        }
    }

    /// Returns false once the script cannot or should not continue.
    fn play_crossing(&mut self, number: usize, crossing: Crossing) -> bool {
        if self.session.outcome().is_terminal() {
            self.violation(format!("crossing {number} ({crossing}) scripted after the outcome"));
            return false;
        }
        let seats = self.session.config().boat_seats;
        if crossing.riders() > seats {
            self.violation(format!(
                "crossing {number} ({crossing}) needs {} seats, the boat has {seats}",
                crossing.riders()
            ));
            return false;
        }
        let boat_side = self.session.crossing().boat_side();
        if boat_side != crossing.from {
            self.violation(format!(
                "crossing {number} ({crossing}) expects the boat on the {} bank, it is on the {boat_side}",
                crossing.from
            ));
            return false;
        }
        let riders = self
            .waiting(CharacterKind::Villager, crossing.villagers, boat_side)
            .zip(self.waiting(CharacterKind::Killer, crossing.killers, boat_side))
            .map(|(mut villagers, killers)| {
                villagers.extend(killers);
                villagers
            });
        let Some(riders) = riders else {
            self.violation(format!(
                "crossing {number} ({crossing}): not enough riders on the {boat_side} bank"
            ));
            return false;
        };

        for &id in &riders {
            let outcome = self.request(id);
            if !matches!(outcome, MoveOutcome::Boarded { .. }) {
                self.violation(format!("crossing {number}: boarding {id} gave {outcome:?}"));
                return false;
            }
            self.tick();
        }
        let launch = self.launch();
        if !launch.is_applied() {
            self.violation(format!("crossing {number}: launch gave {launch:?}"));
            return false;
        }
        let Some(arrival) = self.glide_to_arrival() else {
            return false;
        };
        if arrival.outcome.is_terminal() {
            return false;
        }
        for &id in &riders {
            let outcome = self.request(id);
            if !matches!(outcome, MoveOutcome::Disembarked { .. }) {
                self.violation(format!("crossing {number}: landing {id} gave {outcome:?}"));
                return false;
            }
        }
        self.tick();
        true
    }

    fn random_walk(&mut self, steps: usize) {
        let mut ids: Vec<CharacterId> = self
            .session
            .crossing()
            .roster()
            .iter()
            .map(|c| c.id)
            .collect();
        ids.push(UNKNOWN_CHARACTER);
        let mut probes_left = POST_OUTCOME_PROBES;

        for _ in 0..steps {
            if self.session.outcome().is_terminal() {
                if probes_left == 0 {
                    self.session.reset();
                    self.latch_events = 0;
                    self.latched = None;
                    probes_left = POST_OUTCOME_PROBES;
                    continue;
                }
                probes_left -= 1;
                self.probe_finished_session(&ids);
                continue;
            }

            match self.rng.gen_range(0..100) {
                0..60 => {
                    let id = ids[self.rng.gen_range(0..ids.len())];
                    self.request(id);
                }
                60..75 => {
                    self.launch();
                }
                75..97 => {
                    self.tick();
                }
                _ => {
                    if self.session.clock().is_paused() {
                        self.session.resume();
                    } else {
                        self.session.pause();
                    }
                }
            }
        }
    }

    fn probe_finished_session(&mut self, ids: &[CharacterId]) {
        let id = ids[self.rng.gen_range(0..ids.len())];
        let moved = self.request(id);
        if moved != MoveOutcome::Rejected(Rejection::GameOver) {
            self.violation(format!("finished session accepted a move: {moved:?}"));
        }
        let launched = self.launch();
        if launched != LaunchOutcome::Rejected(Rejection::GameOver) {
            self.violation(format!("finished session accepted a launch: {launched:?}"));
        }
        let tick = self.tick();
        if tick.newly_latched {
            self.violation("finished session latched again".to_string());
        }
    }

    fn transit_gate(&mut self) {
        let empty = self.launch();
        if empty != LaunchOutcome::Rejected(Rejection::NoDriver) {
            self.violation(format!("empty boat launch gave {empty:?}"));
        }

        let Some(driver) = self
            .waiting(CharacterKind::Killer, 1, Side::Right)
            .and_then(|ids| ids.first().copied())
        else {
            self.violation("no killer waiting on the right bank".to_string());
            return;
        };
        self.request(driver);
        let launched = self.launch();
        if !matches!(launched, LaunchOutcome::Launched { from: Side::Right, .. }) {
            self.violation(format!("loaded launch gave {launched:?}"));
            return;
        }
        self.tick();

        let before = self.session.crossing().clone();
        let everyone: Vec<CharacterId> = before.roster().iter().map(|c| c.id).collect();
        for id in everyone {
            let outcome = self.request(id);
            if outcome != MoveOutcome::Rejected(Rejection::BoatInTransit) {
                self.violation(format!("move of {id} mid-glide gave {outcome:?}"));
            }
        }
        let relaunch = self.launch();
        if relaunch != LaunchOutcome::Rejected(Rejection::BoatInTransit) {
            self.violation(format!("launch mid-glide gave {relaunch:?}"));
        }
        if self.session.crossing() != &before {
            self.violation("rejected inputs changed the crossing state".to_string());
        }

        let Some(arrival) = self.glide_to_arrival() else {
            return;
        };
        if arrival.arrived != Some(Side::Left) || self.session.crossing().in_transit() {
            self.violation(format!("boat ended at {:?}", arrival.arrived));
        }
        let landed = self.request(driver);
        if !matches!(landed, MoveOutcome::Disembarked { slot, .. } if slot.zone == ZoneId::LeftBank)
        {
            self.violation(format!("landing after arrival gave {landed:?}"));
        }
        self.tick();
    }
}
