use std::ops::Deref;

use itertools::Itertools;

use crate::{alphabet::Symbol, show::Show};

/// A finite word over symbols of type `S`, including the empty word. Words are immutable
/// values; operations that "modify" a word return a fresh one. A classification tree uses
/// words in two roles: as access word of a leaf (the shortest known word reaching the state
/// the leaf represents) and as distinguishing suffix of an inner node.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Word<S: Symbol = char>(Vec<S>);

impl<S: Symbol> Word<S> {
    /// Creates an instance of the empty word.
    pub fn epsilon() -> Self {
        Self(vec![])
    }

    /// The word consisting of the single symbol `sym`.
    pub fn letter(sym: S) -> Self {
        Self(vec![sym])
    }

    /// Returns the concatenation `self ++ other`.
    pub fn concat(&self, other: &Word<S>) -> Word<S> {
        self.0.iter().chain(other.0.iter()).copied().collect()
    }

    /// Returns `self` extended by one symbol, i.e. `self ++ (sym,)`.
    pub fn extended(&self, sym: S) -> Word<S> {
        let mut symbols = self.0.clone();
        symbols.push(sym);
        Self(symbols)
    }

    /// Iterates over all prefixes of `self` in order of increasing length, starting with the
    /// empty word and ending with `self` itself. Yields `self.len() + 1` words.
    pub fn prefixes(&self) -> impl Iterator<Item = Word<S>> + '_ {
        (0..=self.0.len()).map(|i| Self(self.0[..i].to_vec()))
    }
}

impl<S: Symbol> Deref for Word<S> {
    type Target = [S];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Symbol> From<Vec<S>> for Word<S> {
    fn from(value: Vec<S>) -> Self {
        Self(value)
    }
}

impl<S: Symbol> FromIterator<S> for Word<S> {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<S: Symbol> Show for Word<S> {
    fn show(&self) -> String {
        if self.is_empty() {
            "ε".to_string()
        } else {
            self.0.iter().map(|sym| sym.show()).join("")
        }
    }
}

impl<S: Symbol> std::fmt::Debug for Word<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.show())
    }
}
