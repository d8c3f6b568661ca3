//! Layered elemental resistance.
//!
//! Three additive layers feed a character's effective resistance:
//! - **base**: archetype defaults, immutable after spawn
//! - **stance**: one scalar shift replaced wholesale on every stance entry
//! - **buff/debuff**: per-element spell contributions that stack additively
//!   and persist across stance switches
//!
//! The live table is recomputed eagerly every time any layer changes so
//! damage resolution stays a single table read.

use super::element::{Element, ElementMap};

/// Per-element resistance values. `1.0` negates damage, `-1.0` doubles it.
pub type ResistTable = ElementMap<f32>;

/// Effective resistance is always clamped to this range after combining
/// layers. A negative value amplifies damage rather than healing.
pub const RESIST_MIN: f32 = -1.0;
pub const RESIST_MAX: f32 = 1.0;

/// Base, stance, and buff/debuff resistance layers plus the derived live
/// table read during damage resolution.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResistLayers {
    base: ResistTable,
    stance_shift: f32,
    buff_debuff: ResistTable,
    live: ResistTable,
}

impl ResistLayers {
    pub fn new(base: ResistTable) -> Self {
        let mut layers = Self {
            base,
            stance_shift: 0.0,
            buff_debuff: ElementMap::splat(0.0),
            live: ElementMap::splat(0.0),
        };
        layers.recompute();
        layers
    }

    /// Effective resistance for one element, already clamped.
    #[inline]
    pub fn live(&self, element: Element) -> f32 {
        self.live[element]
    }

    pub fn stance_shift(&self) -> f32 {
        self.stance_shift
    }

    pub fn buff_debuff(&self, element: Element) -> f32 {
        self.buff_debuff[element]
    }

    /// Replace the stance layer wholesale. Stance resistance is absolute per
    /// stance, never accumulated across switches.
    pub fn set_stance_shift(&mut self, shift: f32) {
        self.stance_shift = shift;
        self.recompute();
    }

    /// Add a buff/debuff contribution to a single element.
    pub fn shift_element(&mut self, element: Element, delta: f32) {
        self.buff_debuff[element] += delta;
        self.recompute();
    }

    /// Add a clamped uniform contribution to every element's buff/debuff
    /// layer at once (uniform debuff application).
    pub fn shift_all(&mut self, delta: f32) {
        let delta = delta.clamp(RESIST_MIN, RESIST_MAX);
        self.buff_debuff.update_all(|value| *value += delta);
        self.recompute();
    }

    /// Drop all spell buff/debuff contributions (round reset).
    pub fn clear_buffs(&mut self) {
        self.buff_debuff = ElementMap::splat(0.0);
        self.recompute();
    }

    fn recompute(&mut self) {
        for element in Element::all() {
            let combined = self.base[element] + self.stance_shift + self.buff_debuff[element];
            self.live[element] = combined.clamp(RESIST_MIN, RESIST_MAX);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_resist_is_clamped_for_every_element() {
        let mut layers = ResistLayers::new(ElementMap::splat(0.4));
        layers.set_stance_shift(0.5);
        layers.shift_all(0.9);
        for element in Element::all() {
            assert_eq!(layers.live(element), RESIST_MAX);
        }

        layers.set_stance_shift(-0.5);
        layers.shift_all(-1.0);
        layers.shift_all(-1.0);
        for element in Element::all() {
            assert_eq!(layers.live(element), RESIST_MIN);
        }
    }

    #[test]
    fn stance_layer_replaces_rather_than_stacks() {
        let mut layers = ResistLayers::new(ElementMap::splat(0.0));
        layers.set_stance_shift(0.3);
        layers.set_stance_shift(0.1);
        assert!((layers.live(Element::Fire) - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn buffs_survive_stance_switches() {
        let mut layers = ResistLayers::new(ElementMap::splat(0.0));
        layers.shift_element(Element::Ice, -0.2);
        layers.set_stance_shift(0.25);
        layers.set_stance_shift(0.0);
        assert!((layers.live(Element::Ice) + 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn uniform_shift_clamps_the_delta_itself() {
        let mut layers = ResistLayers::new(ElementMap::splat(0.0));
        layers.shift_all(-3.0); // clamped to -1 before application
        for element in Element::all() {
            assert!((layers.buff_debuff(element) + 1.0).abs() < f32::EPSILON);
        }
    }
}
