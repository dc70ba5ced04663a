use crate::{alphabet::Symbol, word::Word};

/// The interface of a hypothesis automaton as consumed during refinement. States are
/// identified by their access words, so a hypothesis is fully described by its start state,
/// its acceptance predicate and its transition function; running a word and tracing the
/// visited states come for free as provided methods.
///
/// The canonical implementor is [`crate::tree::TreeDfa`], the live view extracted from a
/// classification tree, but any complete deterministic automaton over access words works.
pub trait Hypothesis<S: Symbol> {
    /// The state the automaton starts in.
    fn start(&self) -> Word<S>;

    /// Whether the given state is accepting.
    fn is_accepting(&self, state: &Word<S>) -> bool;

    /// The state reached from `state` when reading the symbol `sym`.
    fn transition(&self, state: &Word<S>, sym: S) -> Word<S>;

    /// The sequence of states visited while reading `word`: the `i`-th element is the state
    /// after the first `i` symbols. Has length `|word| + 1`, with the start state first.
    fn trace(&self, word: &Word<S>) -> Vec<Word<S>> {
        let mut states = Vec::with_capacity(word.len() + 1);
        let mut current = self.start();
        for sym in word.iter().copied() {
            states.push(current.clone());
            current = self.transition(&current, sym);
        }
        states.push(current);
        states
    }

    /// Runs `word` through the automaton and returns whether the reached state is accepting.
    fn classify(&self, word: &Word<S>) -> bool {
        let states = self.trace(word);
        let reached = states.last().expect("a trace is never empty");
        self.is_accepting(reached)
    }
}
