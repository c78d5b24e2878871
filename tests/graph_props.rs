use containment_graph::graph::ContainmentGraph;
use proptest::prelude::*;
use std::collections::HashMap;

type Rule = (usize, Vec<(usize, u64)>);

// Rules only point from lower to higher node numbers, so every generated set is acyclic
fn acyclic_rules() -> impl Strategy<Value = Vec<Rule>> {
    prop::collection::vec(
        (0usize..8, prop::collection::vec((0usize..8, 0u64..5), 0..4)),
        0..16,
    )
    .prop_map(|rules| {
        rules
            .into_iter()
            .map(|(c, items)| (c, items.into_iter().filter(|(x, _)| *x > c).collect()))
            .collect()
    })
}

fn final_edges(rules: &[Rule]) -> HashMap<(usize, usize), u64> {
    let mut edges = HashMap::new();
    for (c, items) in rules {
        for &(x, w) in items {
            if w > 0 {
                edges.insert((*c, x), w);
            }
        }
    }
    edges
}

// Direct recursive path sum, independent of the worklist construction
fn naive_count(edges: &HashMap<(usize, usize), u64>, from: usize, to: usize) -> u64 {
    edges
        .iter()
        .filter(|((c, _), _)| *c == from)
        .map(|(&(_, x), &w)| w * (u64::from(x == to) + naive_count(edges, x, to)))
        .sum()
}

fn build(rules: &[Rule]) -> ContainmentGraph<usize> {
    let mut g = ContainmentGraph::new();
    for (c, items) in rules {
        g.add_rule(*c, items.iter().copied());
    }
    g
}

proptest! {
    #[test]
    fn closure_matches_naive_path_sum(rules in acyclic_rules()) {
        let edges = final_edges(&rules);
        let mut g = build(&rules);
        for a in 0..8 {
            let mut expected_total = 0;
            for b in 0..8 {
                let expected = naive_count(&edges, a, b);
                expected_total += expected;
                prop_assert_eq!(g.closure().unwrap().count(&a, &b), expected);
                prop_assert_eq!(g.can_transitively_contain(&a, &b).unwrap(), expected > 0);
            }
            prop_assert_eq!(g.total_contained_transitively(&a).unwrap(), expected_total);
        }
    }

    #[test]
    fn interleaved_queries_do_not_change_final_closure(rules in acyclic_rules()) {
        let mut batch = build(&rules);
        let mut stepwise = ContainmentGraph::new();
        for (c, items) in &rules {
            stepwise.add_rule(*c, items.iter().copied());
            let _ = stepwise.total_contained_transitively(c).unwrap();
        }
        prop_assert_eq!(batch.all_nodes(), stepwise.all_nodes());
        prop_assert_eq!(batch.closure().unwrap(), stepwise.closure().unwrap());
    }

    #[test]
    fn reinserting_every_rule_is_idempotent(rules in acyclic_rules()) {
        let mut once = build(&rules);
        let mut doubled: Vec<Rule> = rules.clone();
        doubled.extend(rules.iter().cloned());
        let mut twice = build(&doubled);
        prop_assert_eq!(once.all_nodes(), twice.all_nodes());
        prop_assert_eq!(once.closure().unwrap(), twice.closure().unwrap());
    }
}
