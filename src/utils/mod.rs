// Output, configuration and logging helpers for the CLI
pub mod table {
    fn is_numeric(cell: &str) -> bool {
        !cell.is_empty() && cell.bytes().all(|b| b.is_ascii_digit())
    }

    fn sep(widths: &[usize]) -> String {
        let mut s = String::from("+");
        for w in widths {
            s.push_str(&"-".repeat(w + 2));
            s.push('+');
        }
        s
    }

    // Numeric cells are right-aligned, everything else left-aligned
    fn line(cells: &[String], widths: &[usize]) -> String {
        let mut s = String::from("|");
        for (cell, &w) in cells.iter().zip(widths) {
            if is_numeric(cell) {
                s.push_str(&format!(" {cell:>w$} |"));
            } else {
                s.push_str(&format!(" {cell:<w$} |"));
            }
        }
        s
    }

    /// Render an ASCII table. Missing cells render empty; extra cells are dropped.
    #[must_use]
    pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
        let cols = headers.len();
        let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
        for row in rows {
            for (c, w) in widths.iter_mut().enumerate() {
                *w = (*w).max(row.get(c).map_or(0, |s| s.chars().count()));
            }
        }

        let header_cells: Vec<String> = headers.iter().map(|s| (*s).to_string()).collect();
        let mut lines = vec![sep(&widths), line(&header_cells, &widths), sep(&widths)];
        for row in rows {
            let cells: Vec<String> =
                (0..cols).map(|i| row.get(i).cloned().unwrap_or_default()).collect();
            lines.push(line(&cells, &widths));
        }
        lines.push(sep(&widths));
        lines.join("\n")
    }
}

pub mod config {
    use serde::Deserialize;
    use std::fs;
    use std::path::{Path, PathBuf};

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct QueryConfig {
        pub default_format: Option<String>, // "text" | "json"
    }

    #[derive(Debug, Clone, Deserialize, Default)]
    pub struct Config {
        /// Node used by `containers` and `total` when `--target` is not given.
        pub target: Option<String>,
        pub query: Option<QueryConfig>,
    }

    pub const DEFAULT_CONFIG_NAME: &str = "containment-graph.toml";

    #[must_use]
    pub fn load_config_at(path: &Path) -> Option<Config> {
        let data = fs::read_to_string(path).ok()?;
        match toml::from_str::<Config>(&data) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Look for `containment-graph.toml` in `dir`.
    #[must_use]
    pub fn load_config_near(dir: &Path) -> Option<Config> {
        let p: PathBuf = dir.join(DEFAULT_CONFIG_NAME);
        if p.exists() {
            load_config_at(&p)
        } else {
            None
        }
    }

    /// Explicit `--config` path first, then the default file beside the rule source.
    #[must_use]
    pub fn resolve(explicit: Option<&Path>, source: &Path) -> Option<Config> {
        if let Some(p) = explicit {
            return load_config_at(p);
        }
        let dir = source.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
        load_config_near(dir)
    }
}

pub mod logging {
    use std::env;
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    pub const LOG_ENV: &str = "CONTAINMENT_LOG";
    pub const LOG_FORMAT_ENV: &str = "CONTAINMENT_LOG_FORMAT";

    /// Install the global subscriber. Logs go to stderr so stdout stays machine-readable.
    ///
    /// `CONTAINMENT_LOG` takes an `EnvFilter` directive; otherwise `verbose`
    /// selects debug level for this crate. `CONTAINMENT_LOG_FORMAT=json` switches
    /// to JSON lines. Calling this twice is harmless.
    pub fn init(verbose: bool) {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
            EnvFilter::new(if verbose { "containment_graph=debug,info" } else { "warn" })
        });

        let format = env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "compact".to_string());
        let registry = tracing_subscriber::registry().with(filter);

        let _ = match format.as_str() {
            "json" => registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .try_init(),
            _ => registry.with(fmt::layer().compact().with_writer(std::io::stderr)).try_init(),
        };
    }
}
