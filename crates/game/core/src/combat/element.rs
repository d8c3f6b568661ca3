//! Damage elements and element-keyed lookup tables.

use core::ops::{Index, IndexMut};

use strum::EnumCount;

/// Damage element carried by every spell and resisted per-character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumCount, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    /// Physical damage (melee, projectiles).
    Physical,
    /// Ice damage (frost, slows).
    Ice,
    /// Lightning damage (electricity, storms).
    Lightning,
    /// Holy damage (smites, consecration).
    Holy,
    /// Poison damage (toxins, venom).
    Poison,
    /// Fire damage (burns, explosions).
    Fire,
}

impl Element {
    /// All elements in declaration order.
    pub fn all() -> impl Iterator<Item = Element> {
        <Element as strum::IntoEnumIterator>::iter()
    }
}

/// Dense table keyed by [`Element`].
///
/// Element dispatch is a plain array index, keeping resistance lookup O(1)
/// during damage resolution and trivially extensible when elements are added.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementMap<T>([T; Element::COUNT]);

impl<T> ElementMap<T> {
    /// Build a table from one entry per element, in declaration order.
    pub const fn from_array(values: [T; Element::COUNT]) -> Self {
        Self(values)
    }

    /// Iterate entries paired with their element.
    pub fn iter(&self) -> impl Iterator<Item = (Element, &T)> {
        Element::all().zip(self.0.iter())
    }

    /// Apply `f` to every entry in place.
    pub fn update_all(&mut self, mut f: impl FnMut(&mut T)) {
        for value in &mut self.0 {
            f(value);
        }
    }
}

impl<T: Copy> ElementMap<T> {
    /// Build a table with the same value for every element.
    pub const fn splat(value: T) -> Self {
        Self([value; Element::COUNT])
    }
}

impl<T: Copy + Default> Default for ElementMap<T> {
    fn default() -> Self {
        Self::splat(T::default())
    }
}

impl<T> Index<Element> for ElementMap<T> {
    type Output = T;

    #[inline]
    fn index(&self, element: Element) -> &T {
        &self.0[element as usize]
    }
}

impl<T> IndexMut<Element> for ElementMap<T> {
    #[inline]
    fn index_mut(&mut self, element: Element) -> &mut T {
        &mut self.0[element as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_covers_every_element() {
        let mut table = ElementMap::splat(0u32);
        for (i, element) in Element::all().enumerate() {
            table[element] = i as u32;
        }
        assert_eq!(table[Element::Physical], 0);
        assert_eq!(table[Element::Fire], 5);
        assert_eq!(table.iter().count(), Element::COUNT);
    }
}
