pub mod pending_sweep;
pub mod runner;

pub use pending_sweep::PendingQuerySweepJob;
pub use runner::JobRunner;
