//! Classification trees for Kearns–Vazirani style active automata learning.
//!
//! The central data structure of this crate is the [`tree::ClassificationTree`]: a binary
//! decision tree over distinguishing suffixes whose leaves correspond to the states of an
//! unknown target automaton. States are discovered incrementally through yes/no membership
//! queries posed to an injected [`oracle::MembershipOracle`].
//!
//! A tree starts out as a single leaf labeled with the empty word and grows monotonically:
//! every call to [`tree::ClassificationTree::update_tree`] incorporates one counterexample and
//! adds exactly one new leaf (one newly discovered state). In between refinements,
//! [`tree::ClassificationTree::extract_dfa`] exposes the current hypothesis automaton as a
//! live, lazily evaluated view over the tree. The outer learning loop, equivalence queries
//! and counterexample generation are deliberately not part of this crate; they interact with
//! the tree solely through the [`hypothesis::Hypothesis`] and [`oracle::MembershipOracle`]
//! interfaces.
//!
//! # Example
//! ```
//! use classification_tree::prelude::*;
//!
//! let contains_b = FnOracle::new(|w: &Word<char>| w.contains(&'b'));
//! let tree = ClassificationTree::new(Alphabet::of_size(2), contains_b);
//!
//! // the initial hypothesis has a single state and rejects everything
//! let hypothesis = tree.extract_dfa();
//! assert!(!hypothesis.classify(&Word::from(vec!['b'])));
//!
//! // refine with the counterexample "b"
//! tree.update_tree(&Word::from(vec!['b']), &hypothesis);
//! assert!(tree.extract_dfa().classify(&Word::from(vec!['b'])));
//! assert_eq!(tree.leaf_count(), 2);
//! ```
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this crate easier. Importing everything, i.e.
/// `use classification_tree::prelude::*;` should be enough to use the crate.
pub mod prelude {
    pub use super::{
        alphabet::{Alphabet, Symbol},
        hypothesis::Hypothesis,
        math,
        oracle::{FnOracle, MembershipOracle, SampleOracle},
        show::Show,
        tree::{ClassificationTree, NodeId, Sift, TreeDfa},
        word::Word,
    };
}

/// This module contains type aliases for sets and maps which are used throughout the crate.
pub mod math;

/// Helper trait for displaying symbols, words and nodes in a human readable way.
pub mod show;

/// Module that contains definitions for dealing with symbols and alphabets.
pub mod alphabet;

/// Module that contains definitions for dealing with finite words.
pub mod word;

/// Defines the membership oracle interface together with some simple oracles.
pub mod oracle;

/// Defines the interface of hypothesis automata consumed during refinement.
pub mod hypothesis;

/// The classification tree itself, together with sifting and refinement.
pub mod tree;
