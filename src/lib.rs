//! Nemesis - adaptive boss combat engine

pub mod boss;
pub mod combat;
pub mod core;
pub mod effects;
pub mod entities;
pub mod events;
pub mod history;
pub mod patterns;
pub mod player;
