//! Tuning loaders for reading archetype overrides from TOML files.
//!
//! Loaders never construct engine state; they produce plain data the
//! runtime feeds into an [`Archetype`](arena_core::Archetype) at spawn.

pub mod spellbook;
pub mod tuning;

pub use spellbook::SpellbookLoader;
pub use tuning::{TunedArchetype, TuningLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
