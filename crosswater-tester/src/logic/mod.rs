pub mod game_tester;
pub mod reports;
pub mod script;
pub mod seeds;
pub mod store;
pub mod tester;

pub use game_tester::{GameTester, PlanDriver, SimulationPlan, SimulationSummary};
pub use seeds::resolve_seed_inputs;
pub use store::JsonFileRecordStore;
pub use tester::*;
