use crate::{alphabet::Symbol, math, word::Word};

/// A membership oracle answers whether a word belongs to the (unknown) target language. It is
/// injected into a classification tree as a capability rather than accessed through some
/// global state, which keeps the tree testable with deterministic stubs.
///
/// Implementations must be deterministic and total: querying the same word twice has to yield
/// the same answer, for every word. The tree relies on this for its invariants and performs no
/// detection or recovery if an oracle misbehaves.
pub trait MembershipOracle<S: Symbol> {
    /// Returns whether `word` is a member of the target language.
    fn query(&self, word: &Word<S>) -> bool;
}

/// Wraps a plain function over words as a [`MembershipOracle`].
#[derive(Debug, Clone)]
pub struct FnOracle<F>(F);

impl<F> FnOracle<F> {
    /// Creates an oracle from the given function.
    pub fn new(fun: F) -> Self {
        Self(fun)
    }
}

impl<S: Symbol, F: Fn(&Word<S>) -> bool> MembershipOracle<S> for FnOracle<F> {
    fn query(&self, word: &Word<S>) -> bool {
        (self.0)(word)
    }
}

/// An oracle backed by a finite sample of positive words: a word is a member iff it occurs in
/// the sample. Useful for tests and for learning finite languages.
#[derive(Debug, Clone)]
pub struct SampleOracle<S: Symbol> {
    positive: math::Set<Word<S>>,
}

impl<S: Symbol> SampleOracle<S> {
    /// Creates an oracle accepting exactly the given words.
    pub fn new<I: IntoIterator<Item = Word<S>>>(positive: I) -> Self {
        Self {
            positive: positive.into_iter().collect(),
        }
    }
}

impl<S: Symbol> MembershipOracle<S> for SampleOracle<S> {
    fn query(&self, word: &Word<S>) -> bool {
        self.positive.contains(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fn_oracle() {
        let oracle = FnOracle::new(|w: &Word<char>| w.len() % 2 == 0);
        assert!(oracle.query(&Word::epsilon()));
        assert!(!oracle.query(&Word::letter('a')));
    }

    #[test]
    fn sample_oracle() {
        let oracle = SampleOracle::new([Word::letter('a'), vec!['a', 'b'].into()]);
        assert!(oracle.query(&Word::letter('a')));
        assert!(oracle.query(&vec!['a', 'b'].into()));
        assert!(!oracle.query(&Word::epsilon()));
    }
}
