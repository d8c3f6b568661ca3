//! Concrete archetype implementations.

pub mod guardian;
pub mod sorcerer;

pub use guardian::Guardian;
pub use sorcerer::Sorcerer;
