//! Spawned entities - drones, mines, bombs, shells and plain shots
//!
//! The pattern engine creates entities, stores them in its arena, advances
//! them every tick and sweeps the ones that terminated.

pub mod arena;
pub mod constants;
pub mod detonation;
pub mod entity;

pub use arena::EntityArena;
pub use detonation::{falloff_fraction, resolve_blast, BlastHit, Detonation};
pub use entity::{Behavior, EntityKind, EntityStep, FireLoop, SpawnedEntity, TerminationCause};
