#[path = "../../crosswater-game/tests/full_solution.rs"]
mod full_solution;

#[path = "../../crosswater-game/tests/rule_coverage.rs"]
mod rule_coverage;
