//! Death/respawn lifecycle states.

/// Lifecycle of one character:
/// `Alive → Dying → (Ragdoll | Hidden) → Respawning → Alive`.
///
/// Transitions are driven by [`CombatEngine`](crate::engine::CombatEngine);
/// this type only records where in the sequence a character is. Entry to
/// `Dying` happens at most once per life (double-kill races are silent
/// no-ops), and combat state is reset on respawn rather than destroyed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Lifecycle {
    #[default]
    Alive,
    /// Death confirmed; feedback playing, ragdoll or hide pending.
    Dying,
    /// Physical body simulating ragdoll physics until cleanup.
    Ragdoll,
    /// No usable physical body: hidden immediately, removal scheduled.
    Hidden,
    /// Body cleaned up, waiting on the respawn timer (or spectating).
    Respawning,
}

impl Lifecycle {
    /// Alive and able to act.
    pub fn is_alive(self) -> bool {
        matches!(self, Lifecycle::Alive)
    }

    /// Anywhere in the death sequence, including waiting to respawn.
    pub fn is_dying(self) -> bool {
        !self.is_alive()
    }
}
