//! Attack patterns and the engine that runs them

pub mod catalog;
pub mod constants;
pub mod engine;
pub mod executors;
pub mod scheduler;

pub use catalog::{PatternExecutor, PatternId, PatternSpec};
pub use engine::PatternEngine;
pub use executors::lead_target;
pub use scheduler::{ScheduledTask, TaskAction, TaskQueue};
