//! Spell descriptors, the spell bar, and cast bookkeeping.

use arrayvec::ArrayVec;

use crate::combat::Element;
use crate::config::SPELL_BAR_SIZE;
use crate::state::{GameTime, SpellHandle, WorldPoint};

/// Movement slow imposed by a spell: a non-positive speed-multiplier delta
/// held for `duration` seconds. More negative is stronger.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SlowPayload {
    pub modifier: f32,
    pub duration: f32,
}

/// Resistance debuff carried by a spell, applied to the victim's
/// buff/debuff layer. Negative `delta` weakens the victim.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResistDebuff {
    pub delta: f32,
    /// Uniform across all six elements, or just the spell's own element.
    pub all_elements: bool,
}

/// What a spell does to each character it hits.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellPayload {
    /// Raw damage before caster modifier and target resistance.
    pub damage: f32,
    /// Effect radius around the spawn point; targets inside are hit.
    pub radius: f32,
    pub slow: Option<SlowPayload>,
    pub resist_debuff: Option<ResistDebuff>,
    /// Stun duration in seconds.
    pub stun: Option<f32>,
    /// Impulse magnitude pushing victims away from the spawn point.
    pub knockback: Option<f32>,
}

impl SpellPayload {
    /// Pure damage payload, the common case.
    pub const fn damage(amount: f32, radius: f32) -> Self {
        Self {
            damage: amount,
            radius,
            slow: None,
            resist_debuff: None,
            stun: None,
            knockback: None,
        }
    }
}

/// Immutable descriptor of one castable ability.
///
/// Doubles as the recreate-after-reset blueprint: slots keep the spec and
/// rebuild their transient cooldown state from it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellSpec {
    pub name: String,
    pub element: Element,
    /// Seconds between cast authorization and effect spawn.
    pub cast_time: f32,
    /// Oil cost, deducted at cast start.
    pub cost: f32,
    /// Per-slot cooldown started when the cast resolves.
    pub cooldown: f32,
    /// Whether movement interrupts a pending cast of this spell.
    pub castable_while_moving: bool,
    pub payload: SpellPayload,
}

/// One populated spell-bar slot: the spec plus its cooldown state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellSlot {
    spec: SpellSpec,
    cooldown_until: GameTime,
}

impl SpellSlot {
    pub fn new(spec: SpellSpec) -> Self {
        Self {
            spec,
            cooldown_until: GameTime::ZERO,
        }
    }

    pub fn spec(&self) -> &SpellSpec {
        &self.spec
    }

    pub fn on_cooldown(&self, now: GameTime) -> bool {
        now < self.cooldown_until
    }

    pub fn cooldown_remaining(&self, now: GameTime) -> f32 {
        now.until(self.cooldown_until)
    }

    pub(crate) fn trigger_cooldown(&mut self, now: GameTime) {
        self.cooldown_until = now.after(self.spec.cooldown);
    }

    pub(crate) fn reset(&mut self) {
        self.cooldown_until = GameTime::ZERO;
    }
}

/// Ordered, fixed-capacity sequence of castable abilities.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellBar {
    slots: ArrayVec<SpellSlot, SPELL_BAR_SIZE>,
}

impl SpellBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a spell; refused (false) once the bar is full.
    pub fn add(&mut self, spec: SpellSpec) -> bool {
        self.slots.try_push(SpellSlot::new(spec)).is_ok()
    }

    pub fn get(&self, index: usize) -> Option<&SpellSlot> {
        self.slots.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut SpellSlot> {
        self.slots.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpellSlot> {
        self.slots.iter()
    }

    /// Clear transient cooldown state on every slot (round reset).
    pub(crate) fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.reset();
        }
    }
}

/// The single cast a character may have in flight.
///
/// Its resolution deadline lives in the character's
/// [`TimerSet`](crate::timer::TimerSet) under
/// [`TimerSlot::Cast`](crate::timer::TimerSlot::Cast).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PendingCast {
    pub slot: usize,
    /// Target point recorded at cast start; the effect spawns here even if
    /// the cursor moved since.
    pub target: WorldPoint,
    /// Snapshot of the spell's castable-while-moving flag.
    pub movable: bool,
}

/// The one authoritative slow on a character. Weaker slows never displace
/// it; a stronger slow replaces it and cancels its timer.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActiveSlow {
    pub modifier: f32,
    pub source: SpellHandle,
}
