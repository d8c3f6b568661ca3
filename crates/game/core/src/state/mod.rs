//! Identifiers, simulation time, and per-character combat state.

pub mod character;
pub mod meter;
pub mod time;

pub use character::CharacterState;
pub use meter::ResourceMeter;
pub use time::GameTime;

use core::fmt;

/// Unique identifier for a character tracked by the authoritative state.
///
/// Handles, never references: cross-character links (caster of a slow,
/// damage instigator) are stored as ids looked up in the owning registry, so
/// a destroyed character can never dangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterId(pub u32);

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Team membership used by match rules for friendly-fire checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamId(pub u8);

/// World-space point fed in by the targeting collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorldPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl WorldPoint {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance_squared(&self, other: &WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        dx * dx + dy * dy + dz * dz
    }

    /// Unit vector from `from` towards `self`, or `None` when coincident.
    pub fn direction_from(&self, from: &WorldPoint) -> Option<WorldPoint> {
        let dx = self.x - from.x;
        let dy = self.y - from.y;
        let dz = self.z - from.z;
        let len = (dx * dx + dy * dy + dz * dz).sqrt();
        if len <= f32::EPSILON {
            return None;
        }
        Some(WorldPoint::new(dx / len, dy / len, dz / len))
    }

    pub fn scaled(&self, factor: f32) -> WorldPoint {
        WorldPoint::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

/// Weak reference to one spell-bar slot on a caster.
///
/// Identifies the spell instance currently imposing an effect (e.g. the
/// strongest active slow) without owning the caster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpellHandle {
    pub caster: CharacterId,
    pub slot: usize,
}
