use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Malformed rule on line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Closure construction failures, carrying the offending node identifiers.
///
/// Rendering needs `N: Display`; the graph itself does not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainmentError<N = String> {
    /// Path that starts and ends on the same node.
    CyclicContainment { cycle: Vec<N> },
    MultiplicityOverflow { origin: N, destination: N },
}

impl<N: fmt::Display> fmt::Display for ContainmentError<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CyclicContainment { cycle } => {
                write!(f, "Cyclic containment detected: ")?;
                for (i, node) in cycle.iter().enumerate() {
                    if i > 0 {
                        write!(f, " -> ")?;
                    }
                    write!(f, "{node}")?;
                }
                Ok(())
            }
            Self::MultiplicityOverflow { origin, destination } => {
                write!(f, "Multiplicity overflow while expanding {origin} -> {destination}")
            }
        }
    }
}

impl<N: fmt::Debug + fmt::Display> std::error::Error for ContainmentError<N> {}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Parse error in file {file}: {source}")]
    Parse { file: PathBuf, source: ParseError },

    #[error("Graph error: {0}")]
    Graph(#[from] ContainmentError),

    #[error("JSON encode error: {0}")]
    Json(#[from] serde_json::Error),
}
