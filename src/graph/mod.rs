//! Rule graph model for the crate.
//!
//! This module defines the containment rule set (`ContainmentGraph`, `Edge`)
//! and the lazily built weighted transitive closure it answers queries from.
//!
//! A graph is populated with `ContainmentGraph::add_rule` (usually by
//! `crate::parser::RuleParser`) and then queried directly or through the
//! query types in `crate::query`.
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use crate::errors::ContainmentError;

pub mod closure;

pub use closure::TransitiveClosure;

/// Requirements on node identifiers: equality, hashing and ordering for the
/// rule and closure maps. Nothing else is assumed.
pub trait NodeId: Clone + Eq + Hash + Ord {}

impl<T: Clone + Eq + Hash + Ord> NodeId for T {}

/// A direct containment rule: one `container` holds `multiplicity` units of `contained`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge<N> {
    pub container: N,
    pub contained: N,
    pub multiplicity: u64,
}

/// Lifecycle of the derived closure. `add_rule` forces `Stale`; the first
/// query afterwards rebuilds and moves to `Fresh`.
#[derive(Debug, Clone)]
enum ClosureState<N> {
    Stale,
    Fresh(TransitiveClosure<N>),
}

/// Directed, edge-weighted containment rules plus their cached weighted closure.
#[derive(Debug, Clone)]
pub struct ContainmentGraph<N = String> {
    // Edges in first-insertion order; a restated rule replaces the weight in place
    edges: Vec<Edge<N>>,
    index: HashMap<(N, N), usize>,
    state: ClosureState<N>,
}

impl<N> Default for ContainmentGraph<N> {
    fn default() -> Self {
        Self { edges: Vec::new(), index: HashMap::new(), state: ClosureState::Stale }
    }
}

impl<N: NodeId> ContainmentGraph<N> {
    /// Create an empty rule graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare what one `container` holds.
    ///
    /// Every `(contained, multiplicity)` pair with a positive multiplicity
    /// stores or replaces the edge `container -> contained`. Zero entries are
    /// skipped and create neither an edge nor a node. The closure is always
    /// invalidated, even when the edge set did not change.
    pub fn add_rule<I>(&mut self, container: N, contents: I)
    where
        I: IntoIterator<Item = (N, u64)>,
    {
        for (contained, multiplicity) in contents {
            if multiplicity == 0 {
                continue;
            }
            let key = (container.clone(), contained);
            if let Some(&pos) = self.index.get(&key) {
                self.edges[pos].multiplicity = multiplicity;
            } else {
                self.edges.push(Edge {
                    container: key.0.clone(),
                    contained: key.1.clone(),
                    multiplicity,
                });
                self.index.insert(key, self.edges.len() - 1);
            }
        }
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.state = ClosureState::Stale;
    }

    /// Whether the cached closure matches the current rule set.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        matches!(self.state, ClosureState::Fresh(_))
    }

    /// Every node mentioned by a stored edge, in first-seen order
    /// (container before contained, edges in insertion order).
    #[must_use]
    pub fn all_nodes(&self) -> Vec<N> {
        let mut seen: HashSet<&N> = HashSet::with_capacity(self.index.len());
        let mut out = Vec::new();
        for edge in &self.edges {
            for node in [&edge.container, &edge.contained] {
                if seen.insert(node) {
                    out.push(node.clone());
                }
            }
        }
        out
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.all_nodes().len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Stored edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge<N>] {
        &self.edges
    }

    /// Multiplicity of the direct edge `container -> contained`, if stored.
    #[must_use]
    pub fn edge_weight(&self, container: &N, contained: &N) -> Option<u64> {
        let key = (container.clone(), contained.clone());
        self.index.get(&key).map(|&pos| self.edges[pos].multiplicity)
    }

    /// Direct contents of `container`, in insertion order.
    #[must_use]
    pub fn contents_of(&self, container: &N) -> Vec<(N, u64)> {
        self.edges
            .iter()
            .filter(|e| &e.container == container)
            .map(|e| (e.contained.clone(), e.multiplicity))
            .collect()
    }

    /// Borrow the weighted transitive closure, rebuilding it first if stale.
    ///
    /// # Errors
    /// Returns `ContainmentError::CyclicContainment` when the rules contain a
    /// cycle and `ContainmentError::MultiplicityOverflow` when a path count
    /// does not fit in a `u64`. The state stays `Stale` on error.
    pub fn closure(&mut self) -> Result<&TransitiveClosure<N>, ContainmentError<N>> {
        match self.state {
            ClosureState::Fresh(ref cached) => Ok(cached),
            ClosureState::Stale => {
                self.state = ClosureState::Fresh(closure::build(&self.edges)?);
                self.closure()
            }
        }
    }

    /// True iff a path of one or more edges leads from `container` to `contained`.
    ///
    /// # Errors
    /// Propagates closure construction failures (see `closure`).
    pub fn can_transitively_contain(
        &mut self,
        container: &N,
        contained: &N,
    ) -> Result<bool, ContainmentError<N>> {
        Ok(self.closure()?.contains(container, contained))
    }

    /// Total number of items one `container` ends up holding, summed over every path.
    ///
    /// # Errors
    /// Propagates closure construction failures (see `closure`).
    pub fn total_contained_transitively(&mut self, container: &N) -> Result<u64, ContainmentError<N>> {
        Ok(self.closure()?.total_from(container))
    }

    /// Every node that can transitively contain `contained`, in `all_nodes` order.
    ///
    /// # Errors
    /// Propagates closure construction failures (see `closure`).
    pub fn containers_of(&mut self, contained: &N) -> Result<Vec<N>, ContainmentError<N>> {
        let nodes = self.all_nodes();
        let closure = self.closure()?;
        Ok(nodes.into_iter().filter(|n| closure.contains(n, contained)).collect())
    }

    /// Reachable nodes from `origin` with their path-weighted counts, sorted by node.
    ///
    /// # Errors
    /// Propagates closure construction failures (see `closure`).
    pub fn reachable_from(&mut self, origin: &N) -> Result<Vec<(N, u64)>, ContainmentError<N>> {
        Ok(self.closure()?.reachable_from(origin).map(|(n, c)| (n.clone(), c)).collect())
    }
}

impl<N: fmt::Debug> fmt::Display for ContainmentGraph<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<ContainmentGraph rules=[")?;
        for (i, e) in self.edges.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?} -> {}x {:?}", e.container, e.multiplicity, e.contained)?;
        }
        write!(f, "]>")
    }
}
