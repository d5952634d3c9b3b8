pub mod coordinator;
pub mod mutation;
pub mod runner;
pub mod worker;

pub use self::coordinator::{Coordinator, ProgressCallback, SearchSnapshot};
pub use self::runner::{OptimizationOptions, Optimizer};
pub use self::worker::{Phase, Worker};
