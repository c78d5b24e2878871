fn main() {
    use containment_graph::cli::parse;
    let cli = parse();
    containment_graph::utils::logging::init(cli.verbose);
    let code = containment_graph::app::run_cli(cli);
    if code != 0 {
        std::process::exit(code);
    }
}
