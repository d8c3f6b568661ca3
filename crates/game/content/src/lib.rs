//! Shipped character archetypes and data-driven tuning loaders.
//!
//! This crate houses the concrete [`Archetype`](arena_core::Archetype)
//! implementations (Sorcerer, Guardian) and loaders that override their
//! combat defaults from TOML tuning files:
//! - archetype tuning (health, oil, speeds, cooldowns, base resists)
//! - spellbooks (full spell loadouts)
//!
//! Content is consumed by the runtime at spawn time and never appears in
//! engine state beyond the `Arc<dyn Archetype>` handle.

pub mod archetypes;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use archetypes::{Guardian, Sorcerer};

#[cfg(feature = "loaders")]
pub use loaders::{SpellbookLoader, TunedArchetype, TuningLoader};
