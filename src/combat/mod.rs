pub mod constants;
pub mod damage;
pub mod resistance;

pub use damage::{DamageOutcome, DamagePipeline};
pub use resistance::ResistanceMap;
