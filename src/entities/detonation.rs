//! Area damage with linear falloff
//!
//! Returns results. Does NOT touch the player - the caller applies them.

use serde::{Deserialize, Serialize};

use crate::core::types::Vec2;
use crate::entities::constants::KNOCKBACK_FORCE;
use crate::entities::EntityKind;

/// A pending explosion produced by a terminating entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detonation {
    pub kind: EntityKind,
    pub position: Vec2,
    pub radius: f32,
    pub damage: f32,
    /// Smaller follow-up explosions to scatter inside the radius
    pub secondary_bursts: u32,
}

/// Effect of a blast on one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlastHit {
    pub damage: f32,
    pub knockback: Vec2,
}

/// Fraction of full damage remaining at a distance (1.0 at center, 0.0 at edge)
pub fn falloff_fraction(radius: f32, distance: f32) -> f32 {
    if radius <= 0.0 || distance >= radius {
        return 0.0;
    }
    1.0 - distance / radius
}

/// Resolve a blast against a target position
///
/// Knockback points away from the center and scales with the remaining
/// damage fraction. Targets outside the radius are untouched.
pub fn resolve_blast(center: Vec2, radius: f32, damage: f32, target: Vec2) -> Option<BlastHit> {
    let offset = target - center;
    let fraction = falloff_fraction(radius, offset.length());
    if fraction <= 0.0 {
        return None;
    }

    Some(BlastHit {
        damage: damage * fraction,
        knockback: offset.normalize_or_zero() * KNOCKBACK_FORCE * fraction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_damage_at_center() {
        let hit = resolve_blast(Vec2::ZERO, 100.0, 40.0, Vec2::ZERO).unwrap();
        assert_eq!(hit.damage, 40.0);
        assert_eq!(hit.knockback, Vec2::ZERO);
    }

    #[test]
    fn test_linear_falloff() {
        let hit = resolve_blast(Vec2::ZERO, 100.0, 40.0, Vec2::new(50.0, 0.0)).unwrap();
        assert!((hit.damage - 20.0).abs() < 1e-4);
        assert!((hit.knockback.x - KNOCKBACK_FORCE * 0.5).abs() < 1e-3);
        assert!(hit.knockback.y.abs() < 1e-5);
    }

    #[test]
    fn test_outside_radius_untouched() {
        assert!(resolve_blast(Vec2::ZERO, 100.0, 40.0, Vec2::new(0.0, 100.0)).is_none());
        assert!(resolve_blast(Vec2::ZERO, 100.0, 40.0, Vec2::new(0.0, 250.0)).is_none());
    }

    #[test]
    fn test_zero_radius_never_hits() {
        assert_eq!(falloff_fraction(0.0, 0.0), 0.0);
    }
}
