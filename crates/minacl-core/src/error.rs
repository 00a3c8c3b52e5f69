//! Error types for the minimal ACL pipeline.

use crate::types::SolveStatus;
use std::path::{Path, PathBuf};

/// Errors that can occur while deriving a minimal ACL.
///
/// Parse and structural errors abort a run before any optimization is
/// attempted. Solver statuses other than `Optimal` are surfaced verbatim
/// through the `Model*` variants.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A graph or policy record could not be parsed.
    #[error("Parse error in {input} at line {line}: {message}")]
    Parse {
        /// Name of the input (usually a file path).
        input: String,
        /// 1-based line number of the offending record.
        line: u64,
        /// What went wrong.
        message: String,
    },

    /// The graph yields no usable source/target pairs.
    #[error("Empty graph: {message}")]
    EmptyGraph {
        /// Why the graph is unusable.
        message: String,
    },

    /// The solver proved the covering model has no feasible assignment.
    #[error("Model infeasible during {stage}")]
    ModelInfeasible {
        /// Pipeline stage that produced the status.
        stage: String,
    },

    /// The solver reported an unbounded objective.
    #[error("Model unbounded during {stage}")]
    ModelUnbounded {
        /// Pipeline stage that produced the status.
        stage: String,
    },

    /// The solver hit its wall-clock limit before proving optimality.
    #[error("Model solve timed out after {seconds}s during {stage}")]
    ModelTimedOut {
        /// Configured time limit in seconds.
        seconds: u64,
        /// Pipeline stage that produced the status.
        stage: String,
    },

    /// The integer program handed to a solver is malformed.
    #[error("Invalid model: {message}")]
    InvalidModel {
        /// What is wrong with the model.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic.
        message: String,
    },

    /// I/O error, optionally tied to a path.
    #[error("I/O error{}: {source}", path_suffix(.path))]
    Io {
        /// Path being read or written, if known.
        path: Option<PathBuf>,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// CSV reader or writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A background enumeration worker failed.
    #[error("Worker error: {message}")]
    Worker {
        /// Description of the failure.
        message: String,
    },
}

/// Convenience `Result` type alias for minimal ACL operations.
pub type Result<T> = std::result::Result<T, Error>;

fn path_suffix(path: &Option<PathBuf>) -> String {
    path.as_ref()
        .map(|p| format!(" at {}", p.display()))
        .unwrap_or_default()
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io { path: None, source }
    }
}

impl Error {
    /// Creates a new parse error.
    pub fn parse<I, M>(input: I, line: u64, message: M) -> Self
    where
        I: Into<String>,
        M: Into<String>,
    {
        Error::Parse {
            input: input.into(),
            line,
            message: message.into(),
        }
    }

    /// Creates a new empty-graph error.
    pub fn empty_graph<S: Into<String>>(message: S) -> Self {
        Error::EmptyGraph {
            message: message.into(),
        }
    }

    /// Creates a new invalid-model error.
    pub fn invalid_model<S: Into<String>>(message: S) -> Self {
        Error::InvalidModel {
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a new worker error.
    pub fn worker<S: Into<String>>(message: S) -> Self {
        Error::Worker {
            message: message.into(),
        }
    }

    /// Wraps an I/O error with the path it concerns.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: Some(path.as_ref().to_path_buf()),
            source,
        }
    }

    /// Maps a non-optimal solver status to its error.
    ///
    /// Returns `None` for [`SolveStatus::Optimal`].
    pub fn from_status(status: SolveStatus, stage: &str, time_limit_secs: u64) -> Option<Self> {
        let stage = stage.to_string();
        match status {
            SolveStatus::Optimal => None,
            SolveStatus::Infeasible => Some(Error::ModelInfeasible { stage }),
            SolveStatus::Unbounded => Some(Error::ModelUnbounded { stage }),
            SolveStatus::TimedOut => Some(Error::ModelTimedOut {
                seconds: time_limit_secs,
                stage,
            }),
        }
    }

    /// Returns whether this error came from the optimization stage.
    pub fn is_model_status(&self) -> bool {
        matches!(
            self,
            Error::ModelInfeasible { .. } | Error::ModelUnbounded { .. } | Error::ModelTimedOut { .. }
        )
    }
}
