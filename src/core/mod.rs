pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, parse_config, EncounterConfig};
pub use error::{NemesisError, Result};
