use std::cell::RefCell;

use tracing::{debug, trace};

use crate::{
    alphabet::{Alphabet, Symbol},
    hypothesis::Hypothesis,
    oracle::MembershipOracle,
    show::Show,
    word::Word,
};

/// Identity of a node in the arena of a [`ClassificationTree`]. Two nodes are the same node
/// iff their ids coincide; labels of distinct nodes may transiently coincide, so comparing
/// labels is never a substitute for comparing ids.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

const ROOT: NodeId = NodeId(0);

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A single tree node. A leaf carries an access word, an inner node carries a distinguishing
/// suffix and its children indexed by query outcome. An inner node with a missing child exists
/// only transiently, between a sift producing a previously unseen outcome and the creation of
/// the corresponding fresh leaf.
#[derive(Clone, Debug)]
enum Node<S: Symbol> {
    Leaf { data: Word<S> },
    Inner { data: Word<S>, children: [Option<NodeId>; 2] },
}

impl<S: Symbol> Node<S> {
    fn data(&self) -> &Word<S> {
        match self {
            Node::Leaf { data } | Node::Inner { data, .. } => data,
        }
    }

    fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    fn child(&self, outcome: bool) -> Option<NodeId> {
        match self {
            Node::Leaf { .. } => None,
            Node::Inner { children, .. } => children[usize::from(outcome)],
        }
    }

    fn set_child(&mut self, outcome: bool, child: NodeId) {
        let Node::Inner { children, .. } = self else {
            panic!("cannot attach a child to a leaf")
        };
        children[usize::from(outcome)] = Some(child);
    }
}

fn child_pair(on_true: bool, first: NodeId, second: NodeId) -> [Option<NodeId>; 2] {
    let mut children = [None; 2];
    children[usize::from(on_true)] = Some(first);
    children[usize::from(!on_true)] = Some(second);
    children
}

/// The classification tree of Kearns–Vazirani style learning. Inner nodes are labeled with
/// distinguishing suffixes, leaves with access words; every leaf represents one state of the
/// hypothesis automaton. The tree owns its alphabet, the injected membership oracle and an
/// arena of nodes. It starts as a single leaf labeled ε and is uninitialized until the first
/// [`Self::update_tree`] splits the root; from then on it grows by exactly one leaf per
/// refinement and nodes are never removed.
///
/// The node arena sits behind a [`RefCell`] because sifting mutates the tree (see
/// [`Self::sift_trace`]) while the extracted hypothesis holds a shared borrow of the same
/// tree. The structure is strictly single-threaded; there is exactly one logical writer.
pub struct ClassificationTree<S: Symbol, O> {
    alphabet: Alphabet<S>,
    membership: O,
    nodes: RefCell<Vec<Node<S>>>,
}

impl<S: Symbol, O: MembershipOracle<S>> ClassificationTree<S, O> {
    /// Creates an uninitialized tree over the given alphabet, classifying against the given
    /// membership oracle.
    pub fn new(alphabet: Alphabet<S>, membership: O) -> Self {
        Self {
            alphabet,
            membership,
            nodes: RefCell::new(vec![Node::Leaf {
                data: Word::epsilon(),
            }]),
        }
    }

    /// The alphabet this tree was created over.
    pub fn alphabet(&self) -> &Alphabet<S> {
        &self.alphabet
    }

    /// The root node. Its id never changes, even when the root is split in place.
    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// The label of the given node: the access word of a leaf, or the distinguishing suffix
    /// of an inner node.
    pub fn label(&self, node: NodeId) -> Word<S> {
        let nodes = self.nodes.borrow();
        assert!(node.0 < nodes.len(), "invalid node index");
        nodes[node.0].data().clone()
    }

    /// Whether the given node currently is a leaf.
    pub fn is_leaf(&self, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        assert!(node.0 < nodes.len(), "invalid node index");
        nodes[node.0].is_leaf()
    }

    /// The child of `node` for the given query outcome, if it exists.
    pub fn child(&self, node: NodeId, outcome: bool) -> Option<NodeId> {
        let nodes = self.nodes.borrow();
        assert!(node.0 < nodes.len(), "invalid node index");
        nodes[node.0].child(outcome)
    }

    /// The number of leaves, i.e. the number of hypothesis states discovered so far.
    pub fn leaf_count(&self) -> usize {
        self.nodes.borrow().iter().filter(|n| n.is_leaf()).count()
    }

    /// The access words of all current leaves.
    pub fn leaves(&self) -> Vec<Word<S>> {
        self.nodes
            .borrow()
            .iter()
            .filter(|n| n.is_leaf())
            .map(|n| n.data().clone())
            .collect()
    }

    fn push_leaf(&self, data: Word<S>) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(Node::Leaf { data });
        id
    }

    fn child_or_discover(&self, node: NodeId, outcome: bool, word: &Word<S>) -> NodeId {
        if let Some(child) = self.child(node, outcome) {
            return child;
        }
        // unseen outcome, so word reaches a state no leaf represents yet
        let child = self.push_leaf(word.clone());
        self.nodes.borrow_mut()[node.0].set_child(outcome, child);
        trace!(
            "sift discovered new leaf {:?} with access word {} below {:?}",
            child,
            word.show(),
            node
        );
        child
    }

    /// Lazily walks the sift path of `word`, yielding every visited node starting at the root
    /// and ending at the leaf that `word` classifies into. The walk is restartable: each call
    /// starts fresh at the root, there is no shared iterator state.
    ///
    /// Sifting is not read-only. At an inner node whose query outcome has no child yet, a
    /// fresh leaf labeled `word` is created on the spot and descended into.
    pub fn sift_trace<'a>(&'a self, word: &'a Word<S>) -> Sift<'a, S, O> {
        Sift {
            tree: self,
            word,
            current: Some(ROOT),
        }
    }

    /// Classifies `word` into a leaf by walking its sift path to the end. Shares the mutation
    /// contract of [`Self::sift_trace`].
    pub fn sift(&self, word: &Word<S>) -> NodeId {
        self.sift_trace(word)
            .last()
            .expect("a sift trace contains at least the root")
    }

    /// Least common ancestor: returns the label of the deepest node that the sift paths of
    /// `word1` and `word2` have in common. Nodes are compared by identity, not by label. Since
    /// this sifts both words, it can grow the tree just like [`Self::sift`] does.
    pub fn lca(&self, word1: &Word<S>, word2: &Word<S>) -> Word<S> {
        let deepest = self
            .sift_trace(word1)
            .zip(self.sift_trace(word2))
            .filter(|(n1, n2)| n1 == n2)
            .last()
            .map(|(n, _)| n)
            .expect("sift paths always share the root");
        self.label(deepest)
    }

    /// Extracts the current hypothesis automaton. The returned value is a live view over this
    /// tree, not a snapshot: its transitions are computed by sifting on demand (which may grow
    /// the tree), and refining the tree changes the behavior of previously extracted views.
    pub fn extract_dfa(&self) -> TreeDfa<'_, S, O> {
        TreeDfa { tree: self }
    }

    /// Incorporates a counterexample, splitting one leaf into an inner node with two leaf
    /// children and thereby growing the tree by exactly one state.
    ///
    /// `word` must be a genuine counterexample, i.e. a word on which `hypothesis` and the
    /// target language disagree, and `hypothesis` must be the automaton extracted from this
    /// tree just before the call.
    ///
    /// On an uninitialized tree the root is split on the empty word right away. Otherwise the
    /// prefixes of `word` are walked in increasing length, comparing the sifted leaf against
    /// the hypothesis state for each, until the two diverge; the leaf reached by the last
    /// agreeing prefix is then rewritten in place (same node id) into an inner node whose
    /// distinguishing suffix separates its old access word from the newly discovered state.
    ///
    /// # Panics
    /// If no divergence is found. That means `word` was not a genuine counterexample, a
    /// contract violation by the caller that leaves the tree unusable; it is reported as a
    /// fatal panic instead of a recoverable error.
    pub fn update_tree<H: Hypothesis<S>>(&self, word: &Word<S>, hypothesis: &H) {
        if self.is_leaf(ROOT) {
            debug_assert!(self.label(ROOT).is_empty());
            let init = self.membership.query(&Word::epsilon());
            let kept = self.push_leaf(Word::epsilon());
            let discovered = self.push_leaf(word.clone());
            self.nodes.borrow_mut()[ROOT.0] = Node::Inner {
                data: Word::epsilon(),
                children: child_pair(init, kept, discovered),
            };
            debug!(
                "initialized root: outcome {} keeps ε, outcome {} gets {}",
                init,
                !init,
                word.show()
            );
            return;
        }

        let states = hypothesis.trace(word);
        let mut agreeing: Option<(Word<S>, NodeId)> = None;
        let mut diverging: Option<(Word<S>, NodeId, Word<S>)> = None;
        for (prefix, state) in word.prefixes().zip(states) {
            let leaf = self.sift(&prefix);
            if self.label(leaf) != state {
                diverging = Some((prefix, leaf, state));
                break;
            }
            agreeing = Some((prefix, leaf));
        }

        let (prefix, s_tree, s_cnd) = diverging
            .expect("tree and hypothesis never diverged, word is not a genuine counterexample");
        let (prefix_prev, s_tree_prev) =
            agreeing.expect("tree and hypothesis agree at least on the empty prefix");

        let last = *prefix
            .last()
            .expect("the diverging prefix is never empty");
        let test = Word::letter(last).concat(&self.lca(&self.label(s_tree), &s_cnd));
        let test_res = self
            .membership
            .query(&self.label(s_tree_prev).concat(&test));

        // rewrite the last agreeing leaf in place so its id stays valid
        let old = self.label(s_tree_prev);
        let kept = self.push_leaf(old.clone());
        let discovered = self.push_leaf(prefix_prev.clone());
        self.nodes.borrow_mut()[s_tree_prev.0] = Node::Inner {
            data: test.clone(),
            children: child_pair(test_res, kept, discovered),
        };
        debug!(
            "split {:?} on suffix {}, keeping state {} and discovering {}",
            s_tree_prev,
            test.show(),
            old.show(),
            prefix_prev.show()
        );
    }
}

impl<S: Symbol, O> std::fmt::Debug for ClassificationTree<S, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let nodes = self.nodes.borrow();
        let mut stack = vec![(ROOT, 0usize, None::<bool>)];
        while let Some((id, depth, outcome)) = stack.pop() {
            let branch = match outcome {
                Some(true) => "⊤ ",
                Some(false) => "⊥ ",
                None => "",
            };
            match &nodes[id.0] {
                Node::Leaf { data } => {
                    writeln!(f, "{}{}[{}]", "  ".repeat(depth), branch, data.show())?
                }
                Node::Inner { data, children } => {
                    writeln!(f, "{}{}({})", "  ".repeat(depth), branch, data.show())?;
                    for (i, child) in children.iter().enumerate().rev() {
                        if let Some(c) = child {
                            stack.push((*c, depth + 1, Some(i == 1)));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Lazy iterator over the nodes on the sift path of one word, root first, reached leaf last.
/// Created by [`ClassificationTree::sift_trace`]; every creation recomputes the walk.
pub struct Sift<'a, S: Symbol, O> {
    tree: &'a ClassificationTree<S, O>,
    word: &'a Word<S>,
    current: Option<NodeId>,
}

impl<'a, S: Symbol, O: MembershipOracle<S>> Iterator for Sift<'a, S, O> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.current?;
        if self.tree.is_leaf(node) {
            self.current = None;
            return Some(node);
        }
        let outcome = self
            .tree
            .membership
            .query(&self.word.concat(&self.tree.label(node)));
        self.current = Some(self.tree.child_or_discover(node, outcome, self.word));
        Some(node)
    }
}

impl<'a, S: Symbol, O: MembershipOracle<S>> std::iter::FusedIterator for Sift<'a, S, O> {}

/// The hypothesis automaton extracted from a [`ClassificationTree`]: a live, lazily evaluated
/// view rather than a snapshot. Its start state is ε, state acceptance is taken from the
/// membership oracle directly (so it is always consistent with the target, not with the tree
/// structure) and transitions are computed by sifting one-symbol extensions, which may grow
/// the underlying tree as a side effect.
pub struct TreeDfa<'a, S: Symbol, O> {
    tree: &'a ClassificationTree<S, O>,
}

impl<'a, S: Symbol, O: MembershipOracle<S>> TreeDfa<'a, S, O> {
    /// The alphabet of the underlying tree.
    pub fn alphabet(&self) -> &Alphabet<S> {
        self.tree.alphabet()
    }
}

impl<'a, S: Symbol, O: MembershipOracle<S>> Hypothesis<S> for TreeDfa<'a, S, O> {
    fn start(&self) -> Word<S> {
        Word::epsilon()
    }

    fn is_accepting(&self, state: &Word<S>) -> bool {
        self.tree.membership.query(state)
    }

    fn transition(&self, state: &Word<S>, sym: S) -> Word<S> {
        self.tree.label(self.tree.sift(&state.extended(sym)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::FnOracle;

    fn contains_b(w: &Word<char>) -> bool {
        w.contains(&'b')
    }

    fn contains_ab(w: &Word<char>) -> bool {
        w.windows(2).any(|infix| infix == ['a', 'b'])
    }

    /// All words over the alphabet up to the given length, shortest first.
    fn words_up_to(alphabet: &Alphabet<char>, len: usize) -> Vec<Word<char>> {
        let mut out = vec![Word::epsilon()];
        let mut frontier = vec![Word::epsilon()];
        for _ in 0..len {
            let next: Vec<_> = frontier
                .iter()
                .flat_map(|w| alphabet.universe().map(move |sym| w.extended(sym)))
                .collect();
            out.extend(next.iter().cloned());
            frontier = next;
        }
        out
    }

    fn contains_b_tree() -> ClassificationTree<char, FnOracle<fn(&Word<char>) -> bool>> {
        let tree = ClassificationTree::new(
            Alphabet::of_size(2),
            FnOracle::new(contains_b as fn(&Word<char>) -> bool),
        );
        tree.update_tree(&Word::letter('b'), &tree.extract_dfa());
        tree
    }

    #[test_log::test]
    fn root_initialization() {
        let alphabet: Alphabet<u32> = vec![0, 1].into();
        let tree = ClassificationTree::new(alphabet, FnOracle::new(|_: &Word<u32>| false));
        assert!(tree.is_leaf(tree.root()));
        assert_eq!(tree.leaf_count(), 1);

        tree.update_tree(&Word::letter(1), &tree.extract_dfa());

        assert!(!tree.is_leaf(tree.root()));
        assert_eq!(tree.leaf_count(), 2);
        let low = tree.child(tree.root(), false).unwrap();
        let high = tree.child(tree.root(), true).unwrap();
        assert!(tree.is_leaf(low) && tree.is_leaf(high));
        // membership(ε) is false, so ε stays on the false branch
        assert_eq!(tree.label(low), Word::epsilon());
        assert_eq!(tree.label(high), Word::letter(1));
        assert_eq!(tree.sift(&Word::epsilon()), low);
        assert_eq!(tree.leaves(), vec![Word::epsilon(), Word::letter(1)]);
    }

    #[test_log::test]
    fn sift_is_deterministic_without_refinement() {
        let tree = contains_b_tree();
        let word = Word::letter('a');
        assert_eq!(tree.sift(&word), tree.sift(&word));
        assert_eq!(
            tree.sift_trace(&word).collect::<Vec<_>>(),
            tree.sift_trace(&word).collect::<Vec<_>>()
        );
    }

    #[test_log::test]
    fn lca_symmetry_and_self_identity() {
        let tree = contains_b_tree();
        let words: Vec<Word<char>> = words_up_to(tree.alphabet(), 2);
        for left in &words {
            assert_eq!(tree.lca(left, left), tree.label(tree.sift(left)));
            for right in &words {
                assert_eq!(tree.lca(left, right), tree.lca(right, left));
            }
        }
    }

    #[test_log::test]
    fn contains_b_routing() {
        let tree = contains_b_tree();
        assert_eq!(tree.leaf_count(), 2);

        // words without b route through the false branch to ε
        assert_eq!(tree.label(tree.sift(&Word::letter('a'))), Word::epsilon());
        // words containing b route to the accepting access word
        assert_eq!(
            tree.label(tree.sift(&vec!['b', 'a'].into())),
            Word::letter('b')
        );

        let hypothesis = tree.extract_dfa();
        assert_eq!(hypothesis.transition(&Word::epsilon(), 'a'), Word::epsilon());
        assert!(hypothesis.classify(&vec!['b', 'a'].into()));
        assert!(!hypothesis.classify(&vec!['a', 'a'].into()));
    }

    #[test_log::test]
    fn refinement_splits_the_last_agreeing_leaf() {
        let tree = ClassificationTree::new(Alphabet::of_size(2), FnOracle::new(contains_ab));
        let cex: Word<char> = vec!['a', 'b'].into();

        tree.update_tree(&cex, &tree.extract_dfa());
        assert_eq!(tree.leaf_count(), 2);

        // the two-state hypothesis still misclassifies ab, refining again splits the ε leaf
        let hypothesis = tree.extract_dfa();
        assert!(!hypothesis.classify(&cex));
        let epsilon_leaf = tree.sift(&Word::epsilon());
        tree.update_tree(&cex, &hypothesis);
        assert_eq!(tree.leaf_count(), 3);

        // rewritten in place: same id, now an inner node labeled with the suffix b
        assert!(!tree.is_leaf(epsilon_leaf));
        assert_eq!(tree.label(epsilon_leaf), Word::letter('b'));

        // afterwards the hypothesis trace of the counterexample agrees with the tree on
        // every prefix and classifies the counterexample like the oracle does
        let refined = tree.extract_dfa();
        for (prefix, state) in cex.prefixes().zip(refined.trace(&cex)) {
            assert_eq!(tree.label(tree.sift(&prefix)), state);
        }
        assert!(refined.classify(&cex));
    }

    #[test_log::test]
    fn converges_on_contains_ab() {
        let tree = ClassificationTree::new(Alphabet::of_size(2), FnOracle::new(contains_ab));
        let all_words = words_up_to(tree.alphabet(), 4);

        let mut leaves = tree.leaf_count();
        for _ in 0..8 {
            let Some(cex) = all_words
                .iter()
                .find(|w| tree.extract_dfa().classify(w) != contains_ab(w))
            else {
                break;
            };
            tree.update_tree(cex, &tree.extract_dfa());
            assert_eq!(tree.leaf_count(), leaves + 1);
            leaves = tree.leaf_count();
        }

        assert_eq!(tree.leaf_count(), 3);
        let hypothesis = tree.extract_dfa();
        for word in words_up_to(tree.alphabet(), 5) {
            assert_eq!(hypothesis.classify(&word), contains_ab(&word));
        }
    }

    #[test_log::test]
    #[should_panic(expected = "not a genuine counterexample")]
    fn update_tree_rejects_non_counterexample() {
        let tree = contains_b_tree();
        // the two-state hypothesis for "contains b" is already correct on this word
        tree.update_tree(&Word::letter('a'), &tree.extract_dfa());
    }
}
