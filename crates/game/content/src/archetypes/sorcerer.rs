//! The Sorcerer: a ranged elemental caster.

use arena_core::{
    Archetype, ArchetypeConfig, Element, ElementMap, MAX_STANCES, ResistDebuff, SlowPayload,
    SpellPayload, SpellSpec, StanceKind, StanceProfile,
};
use arrayvec::ArrayVec;

/// Glass-cannon elemental caster. Its damage stance boosts every elemental
/// school at once; physical strikes gain nothing.
pub struct Sorcerer;

impl Archetype for Sorcerer {
    fn name(&self) -> &str {
        "sorcerer"
    }

    fn config(&self) -> ArchetypeConfig {
        ArchetypeConfig {
            max_health: 90.0,
            max_oil: 100.0,
            // Squishy but quick.
            movement_speed: 620.0,
            base_resists: {
                let mut resists = ElementMap::splat(0.0);
                resists[Element::Fire] = 0.1;
                resists[Element::Physical] = -0.1;
                resists
            },
            ..ArchetypeConfig::default()
        }
    }

    fn stances(&self) -> ArrayVec<StanceKind, MAX_STANCES> {
        [StanceKind::Mobility, StanceKind::Damage, StanceKind::Defense]
            .into_iter()
            .collect()
    }

    fn profile(&self, kind: StanceKind) -> StanceProfile {
        match kind {
            StanceKind::Mobility => StanceProfile {
                mobility_mod: 0.3,
                damage_mod: -0.1,
                defense_mod: -0.1,
            },
            StanceKind::Damage => StanceProfile {
                mobility_mod: -0.1,
                damage_mod: 0.3,
                defense_mod: -0.1,
            },
            StanceKind::Defense => StanceProfile {
                mobility_mod: -0.2,
                damage_mod: -0.2,
                defense_mod: 0.3,
            },
        }
    }

    fn damage_modifier(&self, element: Element, profile: &StanceProfile) -> f32 {
        // The stance boost covers the elemental schools, never raw strikes.
        match element {
            Element::Physical => 0.0,
            _ => profile.damage_mod,
        }
    }

    fn loadout(&self) -> Vec<SpellSpec> {
        vec![
            SpellSpec {
                name: "fireball".into(),
                element: Element::Fire,
                cast_time: 1.2,
                cost: 25.0,
                cooldown: 4.0,
                castable_while_moving: false,
                payload: SpellPayload::damage(35.0, 250.0),
            },
            SpellSpec {
                name: "frost-nova".into(),
                element: Element::Ice,
                cast_time: 0.8,
                cost: 20.0,
                cooldown: 6.0,
                castable_while_moving: false,
                payload: SpellPayload {
                    slow: Some(SlowPayload { modifier: -0.4, duration: 3.0 }),
                    ..SpellPayload::damage(15.0, 400.0)
                },
            },
            SpellSpec {
                name: "lightning-bolt".into(),
                element: Element::Lightning,
                cast_time: 0.0,
                cost: 15.0,
                cooldown: 2.0,
                castable_while_moving: true,
                payload: SpellPayload::damage(18.0, 0.0),
            },
            SpellSpec {
                name: "corrosion".into(),
                element: Element::Poison,
                cast_time: 1.5,
                cost: 30.0,
                cooldown: 10.0,
                castable_while_moving: false,
                payload: SpellPayload {
                    resist_debuff: Some(ResistDebuff { delta: -0.25, all_elements: false }),
                    ..SpellPayload::damage(10.0, 300.0)
                },
            },
        ]
    }
}
