//! Deterministic arena combat and spellcasting logic.
//!
//! `arena-core` defines the canonical rules (damage resolution, stances,
//! spell-bar casting, death/respawn) and exposes pure APIs reusable by both
//! the authoritative runtime and offline tools. All state mutation flows
//! through [`engine::CombatEngine`]; time is an explicit [`GameTime`]
//! argument, never a wall clock, so every rule is replayable and unit
//! testable without an async executor.
pub mod archetype;
pub mod authority;
pub mod combat;
pub mod config;
pub mod engine;
pub mod event;
pub mod lifecycle;
pub mod spell;
pub mod state;
pub mod timer;

pub use archetype::Archetype;
pub use authority::Authority;
pub use combat::{
    AppliedDamage, Element, ElementMap, MAX_STANCES, ResistLayers, ResistTable, StanceKind,
    StanceProfile, StanceRing, final_damage, modified_outgoing,
};
pub use config::{ArchetypeConfig, CAST_TIME_EPSILON, MOVE_INTERRUPT_THRESHOLD_SQ, SPELL_BAR_SIZE};
pub use engine::{
    ArenaState, CastRefusal, CombatEngine, MatchPhase, MatchRules, StanceRefusal, TargetResolver,
};
pub use event::CombatEvent;
pub use lifecycle::Lifecycle;
pub use spell::{
    ActiveSlow, PendingCast, ResistDebuff, SlowPayload, SpellBar, SpellPayload, SpellSlot,
    SpellSpec,
};
pub use state::{CharacterId, CharacterState, GameTime, ResourceMeter, SpellHandle, TeamId, WorldPoint};
pub use timer::{TimerSet, TimerSlot};
