use crate::cli::{Cli, Commands, OutputFormat, DEFAULT_TARGET};
use crate::errors::AppError;
use crate::graph::ContainmentGraph;
use crate::parser::RuleParser;
use crate::query::{ContainersQuery, NodesQuery, Query, ReachableQuery, TotalContainedQuery};
use crate::utils::config::{self, Config};
use clap::CommandFactory;
use clap_complete::generate;
use serde::Serialize;
use std::io;
use std::path::Path;

#[derive(Serialize)]
struct ContainersReport<'a> {
    target: &'a str,
    count: usize,
    containers: &'a [String],
}

#[derive(Serialize)]
struct TotalReport<'a> {
    target: &'a str,
    total: u64,
}

#[derive(Serialize)]
struct ReachableRow<'a> {
    node: &'a str,
    count: u64,
}

/// Run the CLI logic in-process.
///
/// Returns an exit code (0 = success, 1 = load or graph error).
#[must_use]
pub fn run_cli(cli: Cli) -> i32 {
    match run(cli) {
        Ok(()) => 0,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("{e}");
            1
        }
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let quiet = cli.quiet;
    let verbose = cli.verbose;
    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let bin_name = env!("CARGO_PKG_NAME");
            generate(shell, &mut cmd, bin_name, &mut io::stdout());
        }
        Commands::Containers { source, target, list, config, format } => {
            let cfg = config::resolve(config.as_deref(), &source);
            let target = effective_target(target, cfg.as_ref());
            let fmt = effective_format(format, cfg.as_ref());
            let mut graph = load_graph(&source, quiet)?;

            let found = ContainersQuery::new(&target).run(&mut graph)?;
            if verbose {
                for c in &found {
                    eprintln!("Found container: {c}");
                }
            }
            if fmt == OutputFormat::Json {
                let report =
                    ContainersReport { target: &target, count: found.len(), containers: &found };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                if list {
                    let rows: Vec<Vec<String>> = found
                        .iter()
                        .enumerate()
                        .map(|(i, c)| vec![format!("{}", i + 1), c.clone()])
                        .collect();
                    println!("{}", crate::utils::table::render(&["#", "Container"], &rows));
                }
                println!("{}", found.len());
            }
        }
        Commands::Total { source, target, config, format } => {
            let cfg = config::resolve(config.as_deref(), &source);
            let target = effective_target(target, cfg.as_ref());
            let fmt = effective_format(format, cfg.as_ref());
            let mut graph = load_graph(&source, quiet)?;

            let total = TotalContainedQuery::new(&target).run(&mut graph)?;
            if fmt == OutputFormat::Json {
                let report = TotalReport { target: &target, total };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{total}");
            }
        }
        Commands::Reachable { source, from, config, format, offset, limit } => {
            let cfg = config::resolve(config.as_deref(), &source);
            let fmt = effective_format(format, cfg.as_ref());
            let mut graph = load_graph(&source, quiet)?;

            let rows = ReachableQuery::new(&from).run(&mut graph)?;
            let page = paginate(&rows, offset, limit);
            if fmt == OutputFormat::Json {
                let out: Vec<ReachableRow<'_>> =
                    page.iter().map(|(n, c)| ReachableRow { node: n, count: *c }).collect();
                println!("{}", serde_json::to_string_pretty(&out)?);
            } else if page.is_empty() {
                println!("<nothing reachable from {from}>");
            } else {
                let body: Vec<Vec<String>> =
                    page.iter().map(|(n, c)| vec![n.clone(), c.to_string()]).collect();
                println!("{}", crate::utils::table::render(&["Node", "Count"], &body));
            }
        }
        Commands::Nodes { source, config, format, offset, limit } => {
            let cfg = config::resolve(config.as_deref(), &source);
            let fmt = effective_format(format, cfg.as_ref());
            let mut graph = load_graph(&source, quiet)?;

            let nodes = NodesQuery::new().run(&mut graph)?;
            let page = paginate(&nodes, offset, limit);
            if fmt == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(page)?);
            } else {
                for n in page {
                    println!("{n}");
                }
            }
        }
    }
    Ok(())
}

fn load_graph(source: &Path, quiet: bool) -> Result<ContainmentGraph, AppError> {
    let graph = RuleParser::new()
        .load_rules(source)
        .map_err(|e| AppError::Parse { file: source.to_path_buf(), source: e })?;
    if !quiet {
        eprintln!(
            "Loaded {} rules ({} nodes) from {}",
            graph.edge_count(),
            graph.node_count(),
            source.display()
        );
    }
    Ok(graph)
}

fn effective_target(flag: Option<String>, cfg: Option<&Config>) -> String {
    flag.or_else(|| cfg.and_then(|c| c.target.clone()))
        .unwrap_or_else(|| DEFAULT_TARGET.to_string())
}

fn effective_format(flag: Option<OutputFormat>, cfg: Option<&Config>) -> OutputFormat {
    if let Some(f) = flag {
        return f;
    }
    match cfg.and_then(|c| c.query.as_ref()).and_then(|q| q.default_format.as_deref()) {
        Some("json") => OutputFormat::Json,
        _ => OutputFormat::Text,
    }
}

fn paginate<T>(rows: &[T], offset: usize, limit: Option<usize>) -> &[T] {
    let start = offset.min(rows.len());
    let end = match limit {
        Some(l) => start.saturating_add(l).min(rows.len()),
        None => rows.len(),
    };
    &rows[start..end]
}
