//! The Guardian: a front-line physical bruiser.

use arena_core::{
    Archetype, ArchetypeConfig, Element, ElementMap, MAX_STANCES, SpellPayload, SpellSpec,
    StanceKind, StanceProfile,
};
use arrayvec::ArrayVec;

/// Durable melee-range archetype. Slow, hard to kill, and its damage stance
/// only sharpens physical strikes.
pub struct Guardian;

impl Archetype for Guardian {
    fn name(&self) -> &str {
        "guardian"
    }

    fn config(&self) -> ArchetypeConfig {
        ArchetypeConfig {
            max_health: 140.0,
            max_oil: 80.0,
            movement_speed: 540.0,
            base_resists: {
                let mut resists = ElementMap::splat(0.1);
                resists[Element::Physical] = 0.25;
                resists[Element::Lightning] = 0.0;
                resists
            },
            // Waiting out a Guardian should be costly; it comes back slower.
            respawn_time: 6.0,
            ..ArchetypeConfig::default()
        }
    }

    fn stances(&self) -> ArrayVec<StanceKind, MAX_STANCES> {
        [StanceKind::Defense, StanceKind::Damage, StanceKind::Mobility]
            .into_iter()
            .collect()
    }

    fn profile(&self, kind: StanceKind) -> StanceProfile {
        match kind {
            StanceKind::Mobility => StanceProfile {
                mobility_mod: 0.2,
                damage_mod: -0.15,
                defense_mod: 0.0,
            },
            StanceKind::Damage => StanceProfile {
                mobility_mod: -0.1,
                damage_mod: 0.2,
                defense_mod: -0.1,
            },
            StanceKind::Defense => StanceProfile {
                mobility_mod: -0.15,
                damage_mod: -0.15,
                defense_mod: 0.35,
            },
        }
    }

    fn damage_modifier(&self, element: Element, profile: &StanceProfile) -> f32 {
        // Pure weapon work; borrowed elements gain nothing.
        match element {
            Element::Physical => profile.damage_mod,
            _ => 0.0,
        }
    }

    fn loadout(&self) -> Vec<SpellSpec> {
        vec![
            SpellSpec {
                name: "shield-bash".into(),
                element: Element::Physical,
                cast_time: 0.0,
                cost: 15.0,
                cooldown: 5.0,
                castable_while_moving: true,
                payload: SpellPayload {
                    stun: Some(1.0),
                    knockback: Some(800.0),
                    ..SpellPayload::damage(12.0, 150.0)
                },
            },
            SpellSpec {
                name: "ground-slam".into(),
                element: Element::Physical,
                cast_time: 0.6,
                cost: 25.0,
                cooldown: 7.0,
                castable_while_moving: false,
                payload: SpellPayload::damage(28.0, 350.0),
            },
            SpellSpec {
                name: "judgement".into(),
                element: Element::Holy,
                cast_time: 1.8,
                cost: 40.0,
                cooldown: 14.0,
                castable_while_moving: false,
                payload: SpellPayload::damage(45.0, 200.0),
            },
        ]
    }
}
