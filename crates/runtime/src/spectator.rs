//! Spectator target selection for dead or respawn-denied players.

use arena_core::{ArenaState, CharacterId, WorldPoint};

/// What the spectator camera points at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpectateTarget {
    /// Follow a living character.
    Character(CharacterId),
    /// Fixed overview transform used when nobody is spectatable.
    DeathCam(WorldPoint),
}

/// Tracks which living character a spectating player is watching.
///
/// The camera target is always defined: when the watched character dies
/// or leaves, the controller falls through to the next living one, and to
/// the fixed death-cam transform when the arena has no living characters.
#[derive(Debug, Default)]
pub struct SpectatorController {
    watching: Option<CharacterId>,
    death_cam: WorldPoint,
}

impl SpectatorController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place the fallback death cam somewhere other than the origin.
    pub fn with_death_cam(death_cam: WorldPoint) -> Self {
        Self { watching: None, death_cam }
    }

    pub fn watching(&self) -> Option<CharacterId> {
        self.watching
    }

    /// Validate the current target against a state snapshot, retargeting
    /// if it is gone or no longer alive.
    pub fn retarget(&mut self, state: &ArenaState) -> SpectateTarget {
        let still_valid = self
            .watching
            .and_then(|id| state.character(id))
            .is_some_and(|c| c.lifecycle().is_alive());
        if !still_valid {
            self.watching = state.living().map(|c| c.id()).next();
        }
        self.target()
    }

    /// Cycle to the next or previous living character in id order,
    /// wrapping at the ends.
    pub fn advance(&mut self, state: &ArenaState, direction: i32) -> SpectateTarget {
        let living: Vec<CharacterId> = state.living().map(|c| c.id()).collect();
        if living.is_empty() {
            self.watching = None;
            return self.target();
        }
        let current = self
            .watching
            .and_then(|id| living.iter().position(|&l| l == id));
        let next = match current {
            Some(index) => {
                let len = living.len() as i32;
                (index as i32 + direction.signum()).rem_euclid(len) as usize
            }
            None => 0,
        };
        self.watching = Some(living[next]);
        self.target()
    }

    fn target(&self) -> SpectateTarget {
        match self.watching {
            Some(id) => SpectateTarget::Character(id),
            None => SpectateTarget::DeathCam(self.death_cam),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arena_core::{CombatEngine, Element, TeamId, WorldPoint};
    use arena_content::Sorcerer;

    use crate::rules::TeamRules;

    use super::*;

    fn arena(count: u32) -> CombatEngine {
        let mut engine = CombatEngine::new();
        let archetype: Arc<dyn arena_core::Archetype> = Arc::new(Sorcerer);
        for i in 1..=count {
            engine.spawn_character(
                CharacterId(i),
                TeamId(i as u8),
                Arc::clone(&archetype),
                WorldPoint::default(),
            );
        }
        engine
    }

    #[test]
    fn retarget_falls_through_to_a_living_character() {
        let mut engine = arena(2);
        let mut rules = TeamRules::default();
        let mut spectator = SpectatorController::new();

        assert_eq!(
            spectator.retarget(engine.state()),
            SpectateTarget::Character(CharacterId(1))
        );

        engine.inflict_damage(
            CharacterId(1),
            1000.0,
            Element::Fire,
            None,
            &mut rules,
            arena_core::GameTime::ZERO,
        );
        assert_eq!(
            spectator.retarget(engine.state()),
            SpectateTarget::Character(CharacterId(2))
        );
    }

    #[test]
    fn empty_arena_falls_back_to_the_death_cam() {
        let engine = arena(0);
        let overview = WorldPoint { x: 0.0, y: 0.0, z: 4000.0 };
        let mut spectator = SpectatorController::with_death_cam(overview);

        assert_eq!(spectator.retarget(engine.state()), SpectateTarget::DeathCam(overview));
        assert_eq!(spectator.advance(engine.state(), 1), SpectateTarget::DeathCam(overview));
        assert_eq!(spectator.watching(), None);
    }

    #[test]
    fn advance_wraps_in_both_directions() {
        let engine = arena(3);
        let mut spectator = SpectatorController::new();
        spectator.retarget(engine.state());

        assert_eq!(
            spectator.advance(engine.state(), 1),
            SpectateTarget::Character(CharacterId(2))
        );
        assert_eq!(
            spectator.advance(engine.state(), 1),
            SpectateTarget::Character(CharacterId(3))
        );
        assert_eq!(
            spectator.advance(engine.state(), 1),
            SpectateTarget::Character(CharacterId(1))
        );
        assert_eq!(
            spectator.advance(engine.state(), -1),
            SpectateTarget::Character(CharacterId(3))
        );
    }

    #[test]
    fn retarget_keeps_a_valid_target() {
        let engine = arena(3);
        let mut spectator = SpectatorController::new();
        spectator.retarget(engine.state());
        spectator.advance(engine.state(), 1);
        // A second validation pass must not jump off a living target.
        assert_eq!(
            spectator.retarget(engine.state()),
            SpectateTarget::Character(CharacterId(2))
        );
    }

    #[test]
    fn last_death_drops_to_the_death_cam() {
        let mut engine = arena(1);
        let mut rules = TeamRules::default();
        let mut spectator = SpectatorController::new();
        spectator.retarget(engine.state());

        engine.inflict_damage(
            CharacterId(1),
            1000.0,
            Element::Fire,
            None,
            &mut rules,
            arena_core::GameTime::ZERO,
        );
        assert_eq!(
            spectator.retarget(engine.state()),
            SpectateTarget::DeathCam(WorldPoint::default())
        );
    }
}
