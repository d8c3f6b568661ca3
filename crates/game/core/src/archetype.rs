//! Character archetypes.
//!
//! Archetypes supply the concrete stance list, modifier profiles, base
//! config, and spell loadout. They are variant implementations behind one
//! trait rather than an inheritance chain; `arena-content` provides the
//! shipped ones.

use arrayvec::ArrayVec;

use crate::combat::stance::{MAX_STANCES, StanceKind, StanceProfile};
use crate::combat::Element;
use crate::config::ArchetypeConfig;
use crate::spell::SpellSpec;

/// Capability set a character archetype must provide.
pub trait Archetype: Send + Sync {
    /// Display name, used in logs and events.
    fn name(&self) -> &str;

    /// Combat defaults applied once at spawn.
    fn config(&self) -> ArchetypeConfig;

    /// Ordered stance ring. Must be non-empty; index 0 is the spawn stance.
    fn stances(&self) -> ArrayVec<StanceKind, MAX_STANCES>;

    /// Modifier profile applied atomically on entering `kind`.
    fn profile(&self, kind: StanceKind) -> StanceProfile;

    /// How the active stance's damage modifier applies to an outgoing spell
    /// of `element`. Default: the profile's modifier, element-agnostic.
    /// Archetypes override this to reinterpret the modifier (e.g. only their
    /// signature elements benefit).
    fn damage_modifier(&self, _element: Element, profile: &StanceProfile) -> f32 {
        profile.damage_mod
    }

    /// Spells granted at spawn, in bar order.
    fn loadout(&self) -> Vec<SpellSpec>;
}
