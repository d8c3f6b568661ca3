//! Spatial target resolution for spawned spell effects.

use arena_core::{ArenaState, CharacterId, TargetResolver, WorldPoint};

/// Radius substituted for point-effect spells so a direct hit still catches
/// the character standing on the spawn point.
pub const DIRECT_HIT_RADIUS: f32 = 50.0;

/// Sphere-overlap resolver over replicated positions.
///
/// Stands in for a physics scene query; only living characters can be hit,
/// corpses and hidden bodies are transparent to effects.
pub struct SphereOverlap;

impl TargetResolver for SphereOverlap {
    fn targets_in(&self, state: &ArenaState, origin: WorldPoint, radius: f32) -> Vec<CharacterId> {
        let radius = if radius > 0.0 { radius } else { DIRECT_HIT_RADIUS };
        state
            .living()
            .filter(|c| c.position().distance_squared(&origin) <= radius * radius)
            .map(|c| c.id())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arena_core::{CombatEngine, TeamId};
    use arena_content::Guardian;

    use super::*;

    fn arena() -> CombatEngine {
        let mut engine = CombatEngine::new();
        let archetype: Arc<dyn arena_core::Archetype> = Arc::new(Guardian);
        for (i, x) in [0.0_f32, 100.0, 1000.0].into_iter().enumerate() {
            engine.spawn_character(
                CharacterId(i as u32 + 1),
                TeamId(i as u8),
                Arc::clone(&archetype),
                WorldPoint { x, y: 0.0, z: 0.0 },
            );
        }
        engine
    }

    #[test]
    fn only_characters_inside_the_sphere_are_hit() {
        let engine = arena();
        let hits = SphereOverlap.targets_in(engine.state(), WorldPoint::default(), 150.0);
        assert_eq!(hits, vec![CharacterId(1), CharacterId(2)]);
    }

    #[test]
    fn zero_radius_degrades_to_a_direct_hit() {
        let engine = arena();
        let origin = WorldPoint { x: 100.0, y: 0.0, z: 0.0 };
        let hits = SphereOverlap.targets_in(engine.state(), origin, 0.0);
        assert_eq!(hits, vec![CharacterId(2)]);
    }
}
