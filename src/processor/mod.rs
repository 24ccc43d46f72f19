pub mod job;
pub mod runner;

pub use self::job::CalculationJob;
pub use self::runner::{BatchRunner, PairOutcome};
