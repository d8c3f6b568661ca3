//! Simulation clock.

/// Monotonic simulation time in seconds since match start.
///
/// The runtime derives it from its tick loop; core code only ever compares
/// and offsets it. Keeping time explicit (rather than reading a wall clock)
/// is what makes the engine deterministic.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameTime(f64);

impl GameTime {
    pub const ZERO: Self = Self(0.0);

    pub const fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(self) -> f64 {
        self.0
    }

    /// This instant plus `secs` seconds.
    pub fn after(self, secs: f32) -> Self {
        Self(self.0 + secs as f64)
    }

    /// Seconds remaining until `deadline`, zero if already past.
    pub fn until(self, deadline: GameTime) -> f32 {
        (deadline.0 - self.0).max(0.0) as f32
    }
}
