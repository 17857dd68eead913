pub mod catalog;

use crate::logic::SimulationPlan;
use catalog::{
    blunder_scenario, classic_scenario, express_scenario, random_walk_scenario, records_scenario,
    transit_gate_scenario,
};

// Logic test scenario
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    match name.to_lowercase().as_str() {
        "classic" | "classic-solution" => Some(classic_scenario()),
        "express" | "express-solution" => Some(express_scenario()),
        "blunder" | "blunder-opening" => Some(blunder_scenario()),
        "transit-gate" | "transit" => Some(transit_gate_scenario()),
        "random-walk" | "fuzz" => Some(random_walk_scenario()),
        "records" | "best-time" => Some(records_scenario()),
        _ => None,
    }
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    vec![
        ("classic", "Classic Solution (2 seats, 11 crossings)"),
        ("express", "Express Solution (3 seats, 7 crossings)"),
        ("blunder", "Blunder Opening"),
        ("transit-gate", "Transit Gating"),
        ("random-walk", "Random Walk Invariants"),
        ("records", "Best Time Records"),
    ]
}
