pub mod branch_deletion;
pub mod sweep;

pub use sweep::{SweepSummary, sweep};
