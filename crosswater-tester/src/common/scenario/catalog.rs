use anyhow::{Result, anyhow, ensure};
use crosswater_game::{
    GameOutcome, MemoryRecordStore, RecordUpdate, ScenarioConfig, Side, record_win,
};
use std::time::Duration;

use crate::common::scenario::TestScenario;
use crate::logic::{PlanDriver, SimulationPlan, SimulationSummary};

pub const CLASSIC_SOLUTION: &str = "KK> K< KK> K< VV> VK< VV> K< KK> K< KK>";
pub const EXPRESS_SOLUTION: &str = "VK> V< KK> K< VVV> K< KK>";
pub const BLUNDER_OPENING: &str = "VV>";
const RANDOM_WALK_STEPS: usize = 5_000;
/// Empty launch, six mid-glide moves, and one mid-glide launch.
const TRANSIT_GATE_REJECTIONS: usize = 8;

pub fn classic_scenario() -> TestScenario {
    TestScenario::simulation(
        "Classic Solution",
        SimulationPlan::new(
            ScenarioConfig::classic(),
            PlanDriver::Script(CLASSIC_SOLUTION.to_string()),
        )
        .with_expectation(|summary: &SimulationSummary| won_in(summary, 11)),
    )
}

pub fn express_scenario() -> TestScenario {
    TestScenario::simulation(
        "Express Solution",
        SimulationPlan::new(
            ScenarioConfig::express(),
            PlanDriver::Script(EXPRESS_SOLUTION.to_string()),
        )
        .with_expectation(|summary: &SimulationSummary| won_in(summary, 7)),
    )
}

pub fn blunder_scenario() -> TestScenario {
    TestScenario::simulation(
        "Blunder Opening",
        SimulationPlan::new(
            ScenarioConfig::classic(),
            PlanDriver::Script(BLUNDER_OPENING.to_string()),
        )
        .with_expectation(blunder_expectation),
    )
}

pub fn transit_gate_scenario() -> TestScenario {
    TestScenario::simulation(
        "Transit Gating",
        SimulationPlan::new(ScenarioConfig::classic(), PlanDriver::TransitGate)
            .with_expectation(transit_gate_expectation),
    )
}

pub fn random_walk_scenario() -> TestScenario {
    TestScenario::simulation(
        "Random Walk Invariants",
        SimulationPlan::new(
            ScenarioConfig::classic(),
            PlanDriver::RandomWalk {
                steps: RANDOM_WALK_STEPS,
            },
        )
        .with_expectation(random_walk_expectation),
    )
}

pub fn records_scenario() -> TestScenario {
    TestScenario::simulation(
        "Best Time Records",
        SimulationPlan::new(
            ScenarioConfig::express(),
            PlanDriver::Script(EXPRESS_SOLUTION.to_string()),
        )
        .with_expectation(records_expectation),
    )
}

fn won_in(summary: &SimulationSummary, crossings: usize) -> Result<()> {
    ensure!(
        summary.outcome == GameOutcome::Won,
        "expected a win, got {}",
        summary.outcome
    );
    ensure!(
        summary.crossings == crossings,
        "expected {crossings} crossings, played {}",
        summary.crossings
    );
    ensure!(
        summary.latch_events == 1 && summary.losses == 0,
        "outcome latched {} times with {} losses",
        summary.latch_events,
        summary.losses
    );
    Ok(())
}

fn blunder_expectation(summary: &SimulationSummary) -> Result<()> {
    let GameOutcome::Lost(reason) = summary.outcome else {
        return Err(anyhow!("expected a loss, got {}", summary.outcome));
    };
    ensure!(
        reason.side == Side::Right && reason.villagers == 1 && reason.killers == 3,
        "unexpected loss: {reason}"
    );
    ensure!(summary.crossings == 1, "loss should land on the first arrival");
    Ok(())
}

fn transit_gate_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.crossings == 1, "boat should complete one crossing");
    ensure!(
        summary.rejections == TRANSIT_GATE_REJECTIONS,
        "expected {TRANSIT_GATE_REJECTIONS} rejected inputs, saw {}",
        summary.rejections
    );
    ensure!(
        summary.outcome == GameOutcome::Ongoing,
        "a lone killer crossing must not end the game"
    );
    Ok(())
}

fn random_walk_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.ticks > 0, "walk never advanced the clock");
    ensure!(summary.actions > 0, "walk never interacted");
    Ok(())
}

fn records_expectation(summary: &SimulationSummary) -> Result<()> {
    let won_at = summary
        .fastest_win
        .ok_or_else(|| anyhow!("express run did not record a win time"))?;
    let store = MemoryRecordStore::default();

    let first = record_win(&store, won_at)?;
    ensure!(
        matches!(first, RecordUpdate::FirstRecord { .. }),
        "first win should set the record, got {first:?}"
    );
    let slower = record_win(&store, won_at + Duration::from_secs(15))?;
    ensure!(
        slower.best().elapsed == won_at,
        "slower run replaced the record: {slower:?}"
    );
    let faster = record_win(&store, won_at / 2)?;
    ensure!(
        matches!(faster, RecordUpdate::Improved { previous, .. } if previous.elapsed == won_at),
        "faster run should improve the record, got {faster:?}"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::GameTester;

    fn run(scenario: &TestScenario, seed: u64) -> Result<()> {
        let summary = GameTester::new(false).run_plan(&scenario.plan, seed);
        ensure!(summary.violations.is_empty(), "{:?}", summary.violations);
        for expectation in &scenario.plan.expectations {
            expectation.evaluate(&summary)?;
        }
        Ok(())
    }

    #[test]
    fn catalog_scenarios_pass() {
        for scenario in [
            classic_scenario(),
            express_scenario(),
            blunder_scenario(),
            transit_gate_scenario(),
            records_scenario(),
        ] {
            run(&scenario, 1337).unwrap_or_else(|err| panic!("{}: {err}", scenario.name));
        }
    }

    #[test]
    fn random_walk_passes_across_seeds() {
        let scenario = random_walk_scenario();
        for seed in 0..5 {
            run(&scenario, seed).unwrap();
        }
    }
}
