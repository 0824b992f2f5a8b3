pub mod classify;
pub mod config;
pub mod git;
pub mod issue;
pub mod protection;
pub mod shell_exec;
pub mod styling;

// Re-export the types most callers need
pub use classify::{Classifier, Verdict};
pub use config::RunConfig;
