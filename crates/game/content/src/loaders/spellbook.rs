//! Spellbook loader.

use std::path::Path;

use arena_core::SpellSpec;
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

#[derive(Clone, Debug, Deserialize)]
struct Spellbook {
    spells: Vec<SpellSpec>,
}

/// Loader for full spell loadouts from TOML files.
///
/// A spellbook replaces an archetype's built-in loadout wholesale; partial
/// overrides are not supported because bar order is part of the design.
pub struct SpellbookLoader;

impl SpellbookLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SpellSpec>> {
        let content = read_file(path)?;
        let book: Spellbook = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spellbook TOML: {}", e))?;
        if book.spells.is_empty() {
            anyhow::bail!("Spellbook {} contains no spells", path.display());
        }
        Ok(book.spells)
    }
}
