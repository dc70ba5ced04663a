use std::{fmt::Debug, hash::Hash};

use itertools::Itertools;

use crate::show::Show;

/// A symbol of an alphabet, which is also the type of the individual letters making up a
/// [`crate::word::Word`]. Anything that is cheap to copy, comparable and hashable qualifies.
pub trait Symbol: PartialEq + Eq + Debug + Copy + Ord + PartialOrd + Hash + Show {}
impl<S: PartialEq + Eq + Debug + Copy + Ord + PartialOrd + Hash + Show> Symbol for S {}

/// A finite, fixed collection of [`Symbol`]s. It is set once when a classification tree is
/// created and never mutated afterwards. The tree itself does not iterate the alphabet; it is
/// carried for collaborators that need it, e.g. for completeness checks when enumerating
/// transitions of an extracted hypothesis.
#[derive(Clone, Hash, PartialEq, Eq, Debug, PartialOrd, Ord)]
pub struct Alphabet<S: Symbol = char>(Vec<S>);

impl Alphabet<char> {
    /// Creates an alphabet of the given size whose symbols are the first `size` lowercase
    /// letters, i.e. 'a' to 'z'.
    pub fn of_size(size: usize) -> Self {
        assert!(size < 26, "Alphabet is too large");
        Self((0..size).map(|i| (b'a' + i as u8) as char).collect())
    }
}

impl<S: Symbol> Alphabet<S> {
    /// Returns an iterator over all symbols in the alphabet.
    pub fn universe(&self) -> impl Iterator<Item = S> + '_ {
        self.0.iter().copied()
    }

    /// Returns true if the given symbol is present in the alphabet.
    pub fn contains(&self, sym: S) -> bool {
        self.0.contains(&sym)
    }

    /// Returns the number of symbols in the alphabet.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Whether the alphabet contains no symbols at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Symbol> std::ops::Index<usize> for Alphabet<S> {
    type Output = S;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<S: Symbol> From<Vec<S>> for Alphabet<S> {
    fn from(value: Vec<S>) -> Self {
        value.into_iter().collect()
    }
}

impl<S: Symbol> FromIterator<S> for Alphabet<S> {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().unique().sorted().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_construction() {
        let alphabet = Alphabet::of_size(3);
        assert_eq!(alphabet.size(), 3);
        assert!(alphabet.contains('c'));
        assert!(!alphabet.contains('d'));

        let deduped: Alphabet<u32> = [1, 0, 1, 2].into_iter().collect();
        assert_eq!(deduped.size(), 3);
        assert_eq!(deduped[0], 0);
    }
}
