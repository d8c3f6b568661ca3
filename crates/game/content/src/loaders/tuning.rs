//! Archetype tuning loader.
//!
//! Tuning files carry partial overrides: absent fields keep the archetype's
//! built-in defaults, so a balance patch only states what it changes.

use std::path::Path;
use std::sync::Arc;

use arena_core::{
    Archetype, ArchetypeConfig, Element, MAX_STANCES, SpellSpec, StanceKind, StanceProfile,
};
use arrayvec::ArrayVec;
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// Partial override of one archetype's combat defaults.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchetypeTuning {
    pub max_health: Option<f32>,
    pub max_oil: Option<f32>,
    pub movement_speed: Option<f32>,
    pub min_movement_speed: Option<f32>,
    pub max_movement_speed: Option<f32>,
    pub global_cooldown: Option<f32>,
    pub stance_switch_cooldown: Option<f32>,
    pub respawn_time: Option<f32>,
    pub respawn_death_scale: Option<f32>,
    pub death_feedback_duration: Option<f32>,
    pub resists: Option<ResistTuning>,
}

/// Per-element base resist overrides.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResistTuning {
    pub physical: Option<f32>,
    pub ice: Option<f32>,
    pub lightning: Option<f32>,
    pub holy: Option<f32>,
    pub poison: Option<f32>,
    pub fire: Option<f32>,
}

impl ArchetypeTuning {
    /// Overlay onto `config`, leaving unset fields alone.
    pub fn apply(&self, config: &mut ArchetypeConfig) {
        let scalars = [
            (&self.max_health, &mut config.max_health),
            (&self.max_oil, &mut config.max_oil),
            (&self.movement_speed, &mut config.movement_speed),
            (&self.min_movement_speed, &mut config.min_movement_speed),
            (&self.max_movement_speed, &mut config.max_movement_speed),
            (&self.global_cooldown, &mut config.global_cooldown),
            (&self.stance_switch_cooldown, &mut config.stance_switch_cooldown),
            (&self.respawn_time, &mut config.respawn_time),
            (&self.respawn_death_scale, &mut config.respawn_death_scale),
            (&self.death_feedback_duration, &mut config.death_feedback_duration),
        ];
        for (source, target) in scalars {
            if let Some(value) = source {
                *target = *value;
            }
        }
        if let Some(resists) = &self.resists {
            let overrides = [
                (Element::Physical, resists.physical),
                (Element::Ice, resists.ice),
                (Element::Lightning, resists.lightning),
                (Element::Holy, resists.holy),
                (Element::Poison, resists.poison),
                (Element::Fire, resists.fire),
            ];
            for (element, value) in overrides {
                if let Some(value) = value {
                    config.base_resists[element] = value;
                }
            }
        }
    }
}

/// Loader for archetype tuning from TOML files.
pub struct TuningLoader;

impl TuningLoader {
    pub fn load(path: &Path) -> LoadResult<ArchetypeTuning> {
        let content = read_file(path)?;
        let tuning: ArchetypeTuning = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse tuning TOML: {}", e))?;
        Ok(tuning)
    }
}

/// An archetype with tuning overrides baked into its config.
///
/// Wraps the built-in archetype so every other hook (stances, profiles,
/// damage modifier interpretation, loadout) stays code-defined.
pub struct TunedArchetype {
    inner: Arc<dyn Archetype>,
    config: ArchetypeConfig,
}

impl TunedArchetype {
    pub fn new(inner: Arc<dyn Archetype>, tuning: &ArchetypeTuning) -> Self {
        let mut config = inner.config();
        tuning.apply(&mut config);
        Self { inner, config }
    }
}

impl Archetype for TunedArchetype {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn config(&self) -> ArchetypeConfig {
        self.config
    }

    fn stances(&self) -> ArrayVec<StanceKind, MAX_STANCES> {
        self.inner.stances()
    }

    fn profile(&self, kind: StanceKind) -> StanceProfile {
        self.inner.profile(kind)
    }

    fn damage_modifier(&self, element: Element, profile: &StanceProfile) -> f32 {
        self.inner.damage_modifier(element, profile)
    }

    fn loadout(&self) -> Vec<SpellSpec> {
        self.inner.loadout()
    }
}
