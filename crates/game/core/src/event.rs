//! Events emitted by the combat engine.
//!
//! Events are the replication surface: the runtime broadcasts them to
//! observers, which learn about authoritative state changes only this way.
//! Every engine operation returns the events it produced so request paths
//! can also reply with them directly.

use crate::combat::{Element, StanceKind};
use crate::engine::CastRefusal;
use crate::state::{CharacterId, GameTime, SpellHandle, WorldPoint};

/// Authoritative state change notification.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    /// A character joined the arena with archetype defaults applied.
    Spawned { id: CharacterId, archetype: String },
    Left { id: CharacterId },

    /// A cast was authorized; cost already deducted, resolution scheduled.
    CastStarted {
        caster: CharacterId,
        slot: usize,
        target: WorldPoint,
        resolve_at: GameTime,
        oil_remaining: f32,
    },
    /// A cast request failed one of the gates. Diagnostic only; the caster
    /// sees "not castable", nothing more.
    CastRefused {
        caster: CharacterId,
        slot: usize,
        reason: CastRefusal,
    },
    /// The cast deadline fired and the effect spawned at the recorded point.
    CastResolved {
        caster: CharacterId,
        slot: usize,
        origin: WorldPoint,
    },
    /// A pending cast was cancelled by movement. No refund.
    CastInterrupted { caster: CharacterId, slot: usize },

    DamageApplied {
        target: CharacterId,
        instigator: Option<CharacterId>,
        element: Element,
        amount: f32,
        remaining_health: f32,
    },
    /// Match rules suppressed the hit (friendly fire, etc.).
    DamageSuppressed {
        target: CharacterId,
        instigator: Option<CharacterId>,
    },

    StanceChanged {
        id: CharacterId,
        stance: StanceKind,
        movement_speed: f32,
    },

    SlowApplied {
        target: CharacterId,
        modifier: f32,
        source: SpellHandle,
    },
    /// A weaker slow arrived while a stronger one was active and was
    /// discarded before taking effect.
    SlowOverridden {
        target: CharacterId,
        rejected: SpellHandle,
    },
    SlowExpired { target: CharacterId },

    StunApplied { target: CharacterId, until: GameTime },
    StunExpired { target: CharacterId },

    /// Buff/debuff resist layer shifted. `element` is `None` for a uniform
    /// shift across all elements.
    ResistShifted {
        target: CharacterId,
        element: Option<Element>,
        delta: f32,
    },

    Knockback {
        target: CharacterId,
        impulse: WorldPoint,
    },

    /// Authoritative re-application of a client-predicted facing.
    FacingChanged { id: CharacterId, yaw: f32 },

    Died {
        victim: CharacterId,
        killer: Option<CharacterId>,
        element: Element,
    },
    RagdollEntered { id: CharacterId },
    /// Corpse hidden or cleaned up.
    BodyRemoved { id: CharacterId },
    Respawned { id: CharacterId },
    /// Respawn denied by match rules; the controller should spectate.
    SpectateRequested { id: CharacterId },

    RoundReset,
}
