//! Clamped resource pools (health, oil).

/// Numeric pool clamped to `[0, max]` on every mutation.
///
/// `max` is fixed at spawn from archetype config; round reset refills the
/// pool rather than rebuilding it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    current: f32,
    max: f32,
}

impl ResourceMeter {
    /// A full meter with the given maximum.
    pub fn full(max: f32) -> Self {
        Self { current: max, max }
    }

    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// True while the pool is above zero.
    pub fn has_remaining(&self) -> bool {
        self.current > 0.0
    }

    /// Add `delta` (negative to spend), clamped to `[0, max]`. Returns the
    /// change actually applied.
    pub fn apply(&mut self, delta: f32) -> f32 {
        let before = self.current;
        self.current = (self.current + delta).clamp(0.0, self.max);
        self.current - before
    }

    /// Whether spending `cost` would leave the pool non-negative.
    pub fn can_afford(&self, cost: f32) -> bool {
        self.current - cost >= 0.0
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_at_both_bounds() {
        let mut meter = ResourceMeter::full(100.0);
        assert_eq!(meter.apply(50.0), 0.0);
        assert_eq!(meter.current(), 100.0);

        assert_eq!(meter.apply(-130.0), -100.0);
        assert_eq!(meter.current(), 0.0);
        assert!(!meter.has_remaining());
    }

    #[test]
    fn affordability_is_exact_at_the_boundary() {
        let mut meter = ResourceMeter::full(50.0);
        meter.apply(-30.0);
        assert!(meter.can_afford(20.0));
        assert!(!meter.can_afford(20.01));
    }
}
