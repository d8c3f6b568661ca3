//! Damage math.

use super::resist::{RESIST_MAX, RESIST_MIN};
use crate::state::CharacterId;

/// Incoming damage after the target's effective resistance.
///
/// # Formula
///
/// ```text
/// final = |raw × (1 − clamp(resist, −1, 1))|
/// ```
///
/// A resistance of `1` negates the hit, `-1` doubles it. The absolute value
/// means an out-of-range negative resist still produces positive (amplified)
/// damage rather than healing the target.
#[inline]
pub fn final_damage(raw: f32, resist: f32) -> f32 {
    let resist_modifier = 1.0 - resist.clamp(RESIST_MIN, RESIST_MAX);
    (raw * resist_modifier).abs()
}

/// Outgoing damage after the caster's stance damage modifier.
///
/// # Formula
///
/// ```text
/// final = |raw × (1 + clamp(modifier, −1, 1))|
/// ```
#[inline]
pub fn modified_outgoing(raw: f32, modifier: f32) -> f32 {
    let damage_modifier = 1.0 + modifier.clamp(RESIST_MIN, RESIST_MAX);
    (raw * damage_modifier).abs()
}

/// Outcome of a damage attempt against one character.
///
/// Refusals here are expected, player-triggered conditions (friendly fire,
/// hitting a corpse), so they are values rather than errors.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppliedDamage {
    /// Damage landed; carries the post-resist amount subtracted from health.
    Applied { amount: f32, lethal: bool },
    /// Match rules refused the instigator/target pairing.
    Suppressed { instigator: Option<CharacterId> },
    /// Target was already at or below zero health. No overkill accounting.
    AlreadyDead,
}

impl AppliedDamage {
    /// Damage actually subtracted from the target's health.
    pub fn amount(&self) -> f32 {
        match self {
            AppliedDamage::Applied { amount, .. } => *amount,
            _ => 0.0,
        }
    }

    pub fn is_lethal(&self) -> bool {
        matches!(self, AppliedDamage::Applied { lethal: true, .. })
    }
}
