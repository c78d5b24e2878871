//! Weighted transitive closure over containment rules.
//!
//! The closure maps every `(origin, destination)` pair connected by at least
//! one path to the sum, over all such paths, of the product of edge
//! multiplicities along the path. It is built by a worklist expansion seeded
//! with one entry per origin; a depth-first cycle check runs first so a
//! cyclic rule set is reported instead of expanding forever.
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use super::{Edge, NodeId};
use crate::errors::ContainmentError;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Reach<N> {
    counts: BTreeMap<N, u64>,
    total: u64,
}

/// Path-weighted reachability from every origin. Absent pairs read as zero.
#[derive(Debug, Clone)]
pub struct TransitiveClosure<N> {
    reach: HashMap<N, Reach<N>>,
    pairs: usize,
}

impl<N: Eq + Hash> PartialEq for TransitiveClosure<N> {
    fn eq(&self, other: &Self) -> bool {
        self.pairs == other.pairs && self.reach == other.reach
    }
}

impl<N: Eq + Hash> Eq for TransitiveClosure<N> {}

impl<N: NodeId> TransitiveClosure<N> {
    /// Whether `destination` is reachable from `origin` through one or more edges.
    #[must_use]
    pub fn contains(&self, origin: &N, destination: &N) -> bool {
        self.reach.get(origin).is_some_and(|r| r.counts.contains_key(destination))
    }

    /// Path-weighted count of `destination` inside one `origin`.
    #[must_use]
    pub fn count(&self, origin: &N, destination: &N) -> u64 {
        self.reach.get(origin).and_then(|r| r.counts.get(destination)).copied().unwrap_or(0)
    }

    /// Sum of `count(origin, n)` over every reachable `n`.
    #[must_use]
    pub fn total_from(&self, origin: &N) -> u64 {
        self.reach.get(origin).map_or(0, |r| r.total)
    }

    /// Reachable nodes and their counts, ordered by node.
    pub fn reachable_from<'a>(&'a self, origin: &N) -> impl Iterator<Item = (&'a N, u64)> + 'a {
        self.reach.get(origin).into_iter().flat_map(|r| r.counts.iter().map(|(n, &c)| (n, c)))
    }

    /// Number of reachable `(origin, destination)` pairs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs == 0
    }
}

fn overflow<N: NodeId>(nodes: &[&N], origin: usize, destination: usize) -> ContainmentError<N> {
    ContainmentError::MultiplicityOverflow {
        origin: nodes[origin].clone(),
        destination: nodes[destination].clone(),
    }
}

/// Build the closure from scratch over `edges`.
///
/// # Errors
/// `CyclicContainment` if any cycle exists, `MultiplicityOverflow` if a path
/// product, a pair sum or an origin total exceeds `u64::MAX`.
pub(crate) fn build<N: NodeId>(
    edges: &[Edge<N>],
) -> Result<TransitiveClosure<N>, ContainmentError<N>> {
    // Index nodes in first-seen order and build the adjacency view
    let mut ids: HashMap<&N, usize> = HashMap::new();
    let mut nodes: Vec<&N> = Vec::new();
    for edge in edges {
        for n in [&edge.container, &edge.contained] {
            if !ids.contains_key(n) {
                ids.insert(n, nodes.len());
                nodes.push(n);
            }
        }
    }
    let mut adj: Vec<Vec<(usize, u64)>> = vec![Vec::new(); nodes.len()];
    for edge in edges {
        adj[ids[&edge.container]].push((ids[&edge.contained], edge.multiplicity));
    }

    if let Some(cycle) = find_cycle(&adj) {
        return Err(ContainmentError::CyclicContainment {
            cycle: cycle.into_iter().map(|i| nodes[i].clone()).collect(),
        });
    }

    let mut paths: Vec<HashMap<usize, u64>> = vec![HashMap::new(); nodes.len()];
    let mut worklist: Vec<(usize, usize, u64)> =
        (0..nodes.len()).filter(|&i| !adj[i].is_empty()).map(|i| (i, i, 1)).collect();

    while let Some((origin, via, count)) = worklist.pop() {
        for &(successor, weight) in &adj[via] {
            let total =
                count.checked_mul(weight).ok_or_else(|| overflow(&nodes, origin, successor))?;
            let slot = paths[origin].entry(successor).or_insert(0);
            *slot = slot.checked_add(total).ok_or_else(|| overflow(&nodes, origin, successor))?;
            worklist.push((origin, successor, total));
        }
    }

    let mut reach: HashMap<N, Reach<N>> = HashMap::new();
    let mut pairs = 0usize;
    for (origin, found) in paths.into_iter().enumerate() {
        if found.is_empty() {
            continue;
        }
        let mut counts = BTreeMap::new();
        let mut total = 0u64;
        for (dest, c) in found {
            total = total.checked_add(c).ok_or_else(|| overflow(&nodes, origin, dest))?;
            counts.insert(nodes[dest].clone(), c);
        }
        pairs += counts.len();
        reach.insert(nodes[origin].clone(), Reach { counts, total });
    }

    tracing::debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        pairs,
        "rebuilt transitive closure"
    );
    Ok(TransitiveClosure { reach, pairs })
}

// Depth-first search with an on-stack marker; returns the first cycle found
// as a node path that starts and ends on the same node. The traversal keeps
// its own frame stack of (node, next edge index) so path length is unbounded.
fn find_cycle(adj: &[Vec<(usize, u64)>]) -> Option<Vec<usize>> {
    let n = adj.len();
    let mut visited = vec![false; n];
    let mut on_stack = vec![false; n];
    let mut path: Vec<usize> = Vec::new();
    let mut frames: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        on_stack[root] = true;
        path.push(root);
        frames.push((root, 0));

        while let Some(frame) = frames.last_mut() {
            let (u, next) = *frame;
            let Some(&(v, _)) = adj[u].get(next) else {
                frames.pop();
                path.pop();
                on_stack[u] = false;
                continue;
            };
            frame.1 += 1;
            if !visited[v] {
                visited[v] = true;
                on_stack[v] = true;
                path.push(v);
                frames.push((v, 0));
            } else if on_stack[v] {
                if let Some(pos) = path.iter().position(|&x| x == v) {
                    let mut cycle = path[pos..].to_vec();
                    cycle.push(v);
                    return Some(cycle);
                }
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(list: &[(&'static str, &'static str, u64)]) -> Vec<Edge<&'static str>> {
        list.iter()
            .map(|&(container, contained, multiplicity)| Edge { container, contained, multiplicity })
            .collect()
    }

    #[test]
    fn empty_rules_give_empty_closure() {
        let c = build::<&str>(&[]).unwrap();
        assert!(c.is_empty());
        assert_eq!(c.total_from(&"x"), 0);
    }

    #[test]
    fn diamond_counts_each_path() {
        let c = build(&edges(&[("A", "B", 1), ("A", "C", 1), ("B", "D", 2), ("C", "D", 3)])).unwrap();
        assert_eq!(c.count(&"A", &"D"), 5);
        assert_eq!(c.total_from(&"A"), 7);
        assert_eq!(c.len(), 5);
        let rows: Vec<_> = c.reachable_from(&"A").collect();
        assert_eq!(rows, vec![(&"B", 1), (&"C", 1), (&"D", 5)]);
    }

    #[test]
    fn seeds_are_not_recorded() {
        let c = build(&edges(&[("A", "B", 4)])).unwrap();
        assert!(!c.contains(&"A", &"A"));
        assert!(!c.contains(&"B", &"B"));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let err = build(&edges(&[("A", "A", 1)])).unwrap_err();
        assert_eq!(err, ContainmentError::CyclicContainment { cycle: vec!["A".into(), "A".into()] });
    }

    #[test]
    fn cycle_path_is_reported_in_order() {
        let err = build(&edges(&[("X", "A", 1), ("A", "B", 1), ("B", "C", 1), ("C", "A", 2)]))
            .unwrap_err();
        assert_eq!(
            err,
            ContainmentError::CyclicContainment {
                cycle: vec!["A".into(), "B".into(), "C".into(), "A".into()]
            }
        );
        assert_eq!(err.to_string(), "Cyclic containment detected: A -> B -> C -> A");
    }

    #[test]
    fn long_cycle_is_reported_without_recursion() {
        let n = 100_000usize;
        let ring: Vec<Edge<usize>> = (0..n)
            .map(|i| Edge { container: i, contained: (i + 1) % n, multiplicity: 1 })
            .collect();
        let Err(ContainmentError::CyclicContainment { cycle }) = build(&ring) else {
            panic!("expected a cycle");
        };
        assert_eq!(cycle.len(), n + 1);
        assert_eq!(cycle.first(), Some(&0));
        assert_eq!(cycle.last(), Some(&0));
        assert_eq!(cycle[n - 1], n - 1);
    }

    #[test]
    fn long_chain_passes_the_cycle_check() {
        let n = 100_000usize;
        let mut adj: Vec<Vec<(usize, u64)>> = vec![Vec::new(); n];
        for (i, out) in adj.iter_mut().enumerate().take(n - 1) {
            out.push((i + 1, 1));
        }
        assert_eq!(find_cycle(&adj), None);
    }

    #[test]
    fn overflow_is_reported() {
        let err = build(&edges(&[("A", "B", u64::MAX), ("B", "C", 2)])).unwrap_err();
        assert_eq!(
            err,
            ContainmentError::MultiplicityOverflow { origin: "A".into(), destination: "C".into() }
        );
    }
}
