use crate::errors::ContainmentError;
use crate::graph::ContainmentGraph;

/// Query trait implemented by all query types.
///
/// Queries take the graph mutably because the first query after a rule
/// change rebuilds the cached closure.
pub trait Query<R> {
    /// # Errors
    /// Returns `ContainmentError` when the closure cannot be built.
    fn run(&self, graph: &mut ContainmentGraph) -> Result<R, ContainmentError>;
}

/// Every node that can eventually contain `target`, in first-seen order.
pub struct ContainersQuery {
    pub target: String,
}

impl ContainersQuery {
    #[must_use]
    pub fn new(target: &str) -> Self {
        Self { target: target.to_string() }
    }
}

impl Query<Vec<String>> for ContainersQuery {
    fn run(&self, graph: &mut ContainmentGraph) -> Result<Vec<String>, ContainmentError> {
        graph.containers_of(&self.target)
    }
}

/// Total number of items one `container` ends up holding.
pub struct TotalContainedQuery {
    pub container: String,
}

impl TotalContainedQuery {
    #[must_use]
    pub fn new(container: &str) -> Self {
        Self { container: container.to_string() }
    }
}

impl Query<u64> for TotalContainedQuery {
    fn run(&self, graph: &mut ContainmentGraph) -> Result<u64, ContainmentError> {
        graph.total_contained_transitively(&self.container)
    }
}

/// Whether `container` can eventually contain `contained`.
pub struct CanContainQuery {
    pub container: String,
    pub contained: String,
}

impl CanContainQuery {
    #[must_use]
    pub fn new(container: &str, contained: &str) -> Self {
        Self { container: container.to_string(), contained: contained.to_string() }
    }
}

impl Query<bool> for CanContainQuery {
    fn run(&self, graph: &mut ContainmentGraph) -> Result<bool, ContainmentError> {
        graph.can_transitively_contain(&self.container, &self.contained)
    }
}

/// Nodes reachable from `origin` with their path-weighted counts, sorted by node.
pub struct ReachableQuery {
    pub origin: String,
}

impl ReachableQuery {
    #[must_use]
    pub fn new(origin: &str) -> Self {
        Self { origin: origin.to_string() }
    }
}

impl Query<Vec<(String, u64)>> for ReachableQuery {
    fn run(&self, graph: &mut ContainmentGraph) -> Result<Vec<(String, u64)>, ContainmentError> {
        graph.reachable_from(&self.origin)
    }
}

/// All nodes named by any rule, in first-seen order. Never rebuilds the closure.
#[derive(Default)]
pub struct NodesQuery;

impl NodesQuery {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Query<Vec<String>> for NodesQuery {
    fn run(&self, graph: &mut ContainmentGraph) -> Result<Vec<String>, ContainmentError> {
        Ok(graph.all_nodes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_fixture(with_cycle: bool) -> ContainmentGraph {
        let mut g = ContainmentGraph::new();
        g.add_rule("a".to_string(), [("b".to_string(), 2), ("c".to_string(), 1)]);
        g.add_rule("b".to_string(), [("c".to_string(), 3)]);
        if with_cycle {
            g.add_rule("c".to_string(), [("a".to_string(), 1)]);
        }
        g
    }

    #[test]
    fn containers_query_lists_every_ancestor() {
        let mut g = graph_fixture(false);
        let rows = ContainersQuery::new("c").run(&mut g).unwrap();
        assert_eq!(rows, vec!["a".to_string(), "b".to_string()]);
        assert!(ContainersQuery::new("a").run(&mut g).unwrap().is_empty());
    }

    #[test]
    fn total_and_reachable_agree() {
        let mut g = graph_fixture(false);
        // a: 2 b + (2*3 + 1) c
        assert_eq!(TotalContainedQuery::new("a").run(&mut g).unwrap(), 9);
        let rows = ReachableQuery::new("a").run(&mut g).unwrap();
        assert_eq!(rows, vec![("b".to_string(), 2), ("c".to_string(), 7)]);
        let sum: u64 = rows.iter().map(|(_, c)| c).sum();
        assert_eq!(sum, 9);
    }

    #[test]
    fn can_contain_query() {
        let mut g = graph_fixture(false);
        assert!(CanContainQuery::new("a", "c").run(&mut g).unwrap());
        assert!(!CanContainQuery::new("c", "a").run(&mut g).unwrap());
    }

    #[test]
    fn nodes_query_works_on_cyclic_rules() {
        let mut g = graph_fixture(true);
        let nodes = NodesQuery::new().run(&mut g).unwrap();
        assert_eq!(nodes, vec!["a".to_string(), "b".to_string(), "c".to_string()]);
        assert!(TotalContainedQuery::new("a").run(&mut g).is_err());
    }
}
