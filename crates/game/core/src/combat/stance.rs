//! Combat stances.
//!
//! Each archetype exposes an ordered list of stances cycled with the scroll
//! wheel. Entering a stance applies its whole modifier profile atomically,
//! overwriting the previous stance's contribution.

use arrayvec::ArrayVec;

/// Most stances an archetype may define.
pub const MAX_STANCES: usize = 4;

/// Named stance selectable from an archetype's ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StanceKind {
    /// Faster movement at the price of defense.
    Mobility,
    /// Boosted outgoing spell damage.
    Damage,
    /// Boosted resistances, slower movement.
    Defense,
}

/// Modifier profile applied on stance entry.
///
/// `damage_mod` is interpreted through the archetype's
/// [`Archetype::damage_modifier`](crate::Archetype::damage_modifier) hook, so
/// archetypes may reinterpret it per element.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StanceProfile {
    /// Additive movement-speed modifier (stance layer).
    pub mobility_mod: f32,
    /// Outgoing spell damage modifier.
    pub damage_mod: f32,
    /// Uniform stance resistance shift (replaces the stance resist layer).
    pub defense_mod: f32,
}

/// Cyclic stance selector.
///
/// The selection index is a monotonic signed counter; the active stance is
/// `stances[abs(index) % len]`. Absolute value before modulo is
/// order-sensitive for negative indices and must not be "fixed" to euclidean
/// remainder: deterministic replays depend on the exact traversal.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StanceRing {
    stances: ArrayVec<StanceKind, MAX_STANCES>,
    index: i32,
}

impl StanceRing {
    /// Build a ring from an archetype's stance list. Panics on an empty
    /// list; archetypes must define at least one stance.
    pub fn new(stances: ArrayVec<StanceKind, MAX_STANCES>) -> Self {
        assert!(!stances.is_empty(), "archetype defined no stances");
        Self { stances, index: 0 }
    }

    /// The stance the current counter selects.
    pub fn current(&self) -> StanceKind {
        let wrapped = self.index.unsigned_abs() as usize % self.stances.len();
        self.stances[wrapped]
    }

    /// Step the counter and return the newly selected stance. Only the sign
    /// of `direction` matters.
    pub fn advance(&mut self, direction: i32) -> StanceKind {
        self.index = self.index.wrapping_add(direction.signum());
        self.current()
    }

    /// Back to the archetype's default stance (round reset).
    pub fn reset(&mut self) {
        self.index = 0;
    }

    pub fn len(&self) -> usize {
        self.stances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stances.is_empty()
    }
}
