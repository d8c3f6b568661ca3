//! Authoritative arena runtime.
//!
//! Hosts the deterministic [`arena_core::CombatEngine`] inside a single
//! tokio task, exposes a command-based API through [`RuntimeHandle`], and
//! broadcasts every [`arena_core::CombatEvent`] to subscribers. Clients are
//! never trusted: each request is re-validated by the engine on arrival.

pub mod error;
pub mod handle;
pub mod resolver;
pub mod rules;
pub mod runtime;
pub mod spectator;
pub mod worker;

pub use error::{Result, RuntimeError};
pub use handle::RuntimeHandle;
pub use resolver::{DIRECT_HIT_RADIUS, SphereOverlap};
pub use rules::TeamRules;
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig};
pub use spectator::{SpectateTarget, SpectatorController};
pub use worker::{Command, SimulationWorker};
