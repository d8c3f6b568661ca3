//! Damage elements, resistance layering, and combat stances.

pub mod damage;
pub mod element;
pub mod resist;
pub mod stance;

pub use damage::{AppliedDamage, final_damage, modified_outgoing};
pub use element::{Element, ElementMap};
pub use resist::{ResistLayers, ResistTable};
pub use stance::{MAX_STANCES, StanceKind, StanceProfile, StanceRing};
