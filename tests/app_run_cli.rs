use containment_graph::app::run_cli;
use containment_graph::cli::{Cli, Commands, OutputFormat};
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use tempfile::tempdir;

fn write_file(path: &PathBuf, content: &str) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let mut f = fs::File::create(path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
}

fn cli(command: Commands) -> Cli {
    Cli { quiet: true, verbose: false, command }
}

#[test]
fn app_total_succeeds_on_valid_rules() {
    let dir = tempdir().unwrap();
    let rules = dir.path().join("rules.txt");
    write_file(&rules, "shiny gold bags contain 2 dark red bags.\ndark red bags contain no other bags.\n");

    let code = run_cli(cli(Commands::Total {
        source: rules,
        target: None,
        config: None,
        format: Some(OutputFormat::Json),
    }));
    assert_eq!(code, 0);
}

#[test]
fn app_containers_missing_file_returns_error_code() {
    let dir = tempdir().unwrap();
    let code = run_cli(cli(Commands::Containers {
        source: dir.path().join("missing.txt"),
        target: None,
        list: false,
        config: None,
        format: None,
    }));
    assert_eq!(code, 1);
}

#[test]
fn app_reachable_on_cycle_returns_error_code() {
    let dir = tempdir().unwrap();
    let rules = dir.path().join("rules.txt");
    write_file(&rules, "a bags contain 1 a bag.\n");

    let code = run_cli(cli(Commands::Reachable {
        source: rules,
        from: "a bags".to_string(),
        config: None,
        format: None,
        offset: 0,
        limit: None,
    }));
    assert_eq!(code, 1);
}

#[test]
fn app_nodes_ignores_cycles() {
    let dir = tempdir().unwrap();
    let rules = dir.path().join("rules.txt");
    write_file(&rules, "a bags contain 1 b bag.\nb bags contain 1 a bag.\n");

    let code = run_cli(cli(Commands::Nodes {
        source: rules,
        config: None,
        format: Some(OutputFormat::Text),
        offset: 0,
        limit: Some(1),
    }));
    assert_eq!(code, 0);
}
