//! containment-graph: transitive containment over weighted rules
//!
//! Record rules of the form "one X holds n of Y" and ask which nodes can
//! eventually hold a target, and how many items a node ends up holding once
//! every nested level is counted.
//!
//! # Features
//! - Incremental rule insertion with last-write-wins edge weights
//! - Lazily rebuilt, path-weighted transitive closure (invalidated on every change)
//! - Cyclic rule sets reported as `CyclicContainment` instead of looping
//! - Text rule-file parser and a CLI with text or JSON output
//!
//! # Quickstart (Library)
//! ```
//! use containment_graph::graph::ContainmentGraph;
//!
//! let mut graph: ContainmentGraph<&str> = ContainmentGraph::new();
//! graph.add_rule("A", [("B", 2)]);
//! graph.add_rule("B", [("C", 3)]);
//! assert!(graph.can_transitively_contain(&"A", &"C").unwrap());
//! assert_eq!(graph.total_contained_transitively(&"A").unwrap(), 8);
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! containment-graph containers rules.txt --target "shiny gold bags"
//! containment-graph total rules.txt --format json
//! ```
//!
//! # Logging
//! Set `CONTAINMENT_LOG` to an `EnvFilter` directive (e.g. `containment_graph=debug`)
//! and `CONTAINMENT_LOG_FORMAT=json` for JSON lines on stderr.
pub mod app;
pub mod cli;
pub mod errors;
pub mod graph;
pub mod parser;
pub mod query;
pub mod utils;
