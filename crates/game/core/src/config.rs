//! Archetype configuration and engine-wide constants.

use crate::combat::ResistTable;
use crate::combat::element::ElementMap;

/// Fixed capacity of the spell bar.
pub const SPELL_BAR_SIZE: usize = 6;

/// Floor applied to cast times so a zero-duration cast still schedules a
/// strictly-future deadline instead of being treated as already fired.
pub const CAST_TIME_EPSILON: f32 = 0.01;

/// Squared movement speed above which a pending, non-movable cast is
/// interrupted. Near-zero so drift doesn't cancel casts.
pub const MOVE_INTERRUPT_THRESHOLD_SQ: f32 = 5.0;

/// Upper bound on the delay between death feedback and ragdoll entry; the
/// actual delay is the shorter of this and the feedback duration.
pub const RAGDOLL_DELAY_CAP: f32 = 0.1;

/// How long a ragdolled body persists before cleanup.
pub const RAGDOLL_REMOVAL_DELAY: f32 = 10.0;

/// How long a hidden (no physics body) corpse persists before cleanup.
pub const HIDDEN_REMOVAL_DELAY: f32 = 1.0;

/// Per-archetype combat defaults, immutable after spawn.
///
/// The live character config is derived from these plus the modifier layers;
/// features never mutate the base directly.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArchetypeConfig {
    pub max_health: f32,
    pub max_oil: f32,

    /// Base movement speed before stance/slow modifiers.
    pub movement_speed: f32,
    /// Live movement speed is clamped to this range after modifiers.
    pub min_movement_speed: f32,
    pub max_movement_speed: f32,

    /// Shared minimum interval between any two casts.
    pub global_cooldown: f32,
    pub stance_switch_cooldown: f32,

    pub base_resists: ResistTable,

    /// Base respawn delay; each consecutive death adds `respawn_death_scale`
    /// on top as an escalating penalty.
    pub respawn_time: f32,
    pub respawn_death_scale: f32,

    /// Duration of the external death feedback, bounding the ragdoll delay.
    pub death_feedback_duration: f32,
}

impl Default for ArchetypeConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            max_oil: 100.0,
            movement_speed: 600.0,
            min_movement_speed: 200.0,
            max_movement_speed: 900.0,
            global_cooldown: 1.0,
            stance_switch_cooldown: 2.0,
            base_resists: ElementMap::splat(0.0),
            respawn_time: 5.0,
            respawn_death_scale: 2.0,
            death_feedback_duration: 1.2,
        }
    }
}
