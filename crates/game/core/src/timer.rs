//! Per-character timer registry.
//!
//! Every wait in the simulation is a deadline in this registry, fired by the
//! periodic [`CombatEngine::tick`](crate::engine::CombatEngine::tick) and
//! cancellable on its own. Binding a slot always replaces any deadline
//! already there: a stale timer firing after its owning effect was superseded
//! is the principal bug class this registry exists to prevent, so the
//! cancel-before-rebind rule lives in exactly one place.

use strum::EnumCount;

use crate::state::GameTime;

/// Logical purpose of a timer. One deadline may be live per slot per
/// character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumCount, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimerSlot {
    /// Pending cast resolution.
    Cast,
    /// Shared minimum interval between any two casts.
    GlobalCooldown,
    /// Stance-switch cooldown.
    StanceSwitch,
    /// Active slow expiry.
    Slow,
    /// Stun expiry.
    Stun,
    /// Delay between death feedback and ragdoll entry.
    Ragdoll,
    /// Corpse/hidden-body cleanup.
    Removal,
    /// Scheduled respawn.
    Respawn,
}

impl TimerSlot {
    fn all() -> impl Iterator<Item = TimerSlot> {
        <TimerSlot as strum::IntoEnumIterator>::iter()
    }
}

/// One optional deadline per [`TimerSlot`].
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimerSet {
    deadlines: [Option<GameTime>; TimerSlot::COUNT],
}

impl TimerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a deadline, cancelling any prior one in the same slot. Returns
    /// the deadline that was replaced, if any.
    pub fn bind(&mut self, slot: TimerSlot, deadline: GameTime) -> Option<GameTime> {
        self.deadlines[slot as usize].replace(deadline)
    }

    /// Cancel the slot's deadline, returning it if one was live.
    pub fn cancel(&mut self, slot: TimerSlot) -> Option<GameTime> {
        self.deadlines[slot as usize].take()
    }

    pub fn deadline(&self, slot: TimerSlot) -> Option<GameTime> {
        self.deadlines[slot as usize]
    }

    /// True while a deadline is bound and still in the future. Cooldown-style
    /// slots are queried with this rather than fired.
    pub fn is_running(&self, slot: TimerSlot, now: GameTime) -> bool {
        matches!(self.deadlines[slot as usize], Some(deadline) if now < deadline)
    }

    /// Pop every slot whose deadline has arrived, in declaration order.
    /// Fired slots are cleared before the caller reacts, so a handler that
    /// rebinds the same slot cannot double-fire.
    pub fn fire_due(&mut self, now: GameTime) -> impl Iterator<Item = TimerSlot> + use<> {
        let mut due: [Option<TimerSlot>; TimerSlot::COUNT] = [None; TimerSlot::COUNT];
        for (i, slot) in TimerSlot::all().enumerate() {
            if matches!(self.deadlines[slot as usize], Some(deadline) if deadline <= now) {
                self.deadlines[slot as usize] = None;
                due[i] = Some(slot);
            }
        }
        due.into_iter().flatten()
    }

    /// Cancel everything (round reset, character removal).
    pub fn clear(&mut self) {
        self.deadlines = [None; TimerSlot::COUNT];
    }
}
