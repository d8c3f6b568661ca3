//! Gate checks for player-triggered requests.
//!
//! Rule violations here are expected, frequent conditions, not faults: gates
//! return typed refusal values the engine swallows into silent no-ops (plus
//! a diagnostic event for combat logs). Nothing in this module mutates
//! state, so a request is always evaluated against one consistent snapshot.

use crate::state::{CharacterState, GameTime};
use crate::timer::TimerSlot;

/// Why a cast request was refused. Diagnostic only; the requesting client
/// learns nothing beyond "not castable".
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CastRefusal {
    #[error("casting is disabled")]
    CastingDisabled,
    #[error("caster is stunned")]
    Stunned,
    /// Slot index out of range or unpopulated.
    #[error("spell slot is empty")]
    EmptySlot,
    /// The slot's own cooldown is still running.
    #[error("spell is on cooldown")]
    OnCooldown,
    #[error("global cooldown has not elapsed")]
    GlobalCooldownActive,
    /// A cast is already in flight; one at a time.
    #[error("another cast is pending")]
    CastPending,
    #[error("caster is dying")]
    Dying,
    #[error("not enough oil")]
    InsufficientOil,
}

/// Why a stance-switch request was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StanceRefusal {
    /// The per-character switch cooldown has not elapsed.
    #[error("stance switch is on cooldown")]
    OnCooldown,
    #[error("character is dying")]
    Dying,
}

/// Evaluate every cast gate in order. Returns the spell's oil cost on
/// success so the caller deducts exactly what was checked.
pub(crate) fn cast_gate(
    character: &CharacterState,
    slot: usize,
    now: GameTime,
) -> Result<f32, CastRefusal> {
    if !character.casting_enabled() {
        return Err(CastRefusal::CastingDisabled);
    }
    if character.is_stunned() {
        return Err(CastRefusal::Stunned);
    }
    let Some(spell) = character.spell_slot(slot) else {
        return Err(CastRefusal::EmptySlot);
    };
    if spell.on_cooldown(now) {
        return Err(CastRefusal::OnCooldown);
    }
    if character.timers().is_running(TimerSlot::GlobalCooldown, now) {
        return Err(CastRefusal::GlobalCooldownActive);
    }
    if character.pending_cast().is_some() {
        return Err(CastRefusal::CastPending);
    }
    if character.lifecycle().is_dying() {
        return Err(CastRefusal::Dying);
    }
    let cost = spell.spec().cost;
    if !character.oil().can_afford(cost) {
        return Err(CastRefusal::InsufficientOil);
    }
    Ok(cost)
}

pub(crate) fn stance_gate(
    character: &CharacterState,
    now: GameTime,
) -> Result<(), StanceRefusal> {
    if character.lifecycle().is_dying() {
        return Err(StanceRefusal::Dying);
    }
    if character.timers().is_running(TimerSlot::StanceSwitch, now) {
        return Err(StanceRefusal::OnCooldown);
    }
    Ok(())
}
