use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

use thiserror::Error;

/// Ways the delegated print step can fail.
///
/// None of these reach the host under the default policy: the printer logs
/// them and hands back the original text.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("athon formatter not found (searched: {})", display_paths(.searched))]
    NotFound { searched: Vec<PathBuf> },

    #[error("failed to spawn `{interpreter}`: {source}")]
    Spawn {
        interpreter: String,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o error talking to formatter: {0}")]
    Io(#[from] std::io::Error),

    #[error("formatter exited with {status}: {stderr}")]
    Exit { status: ExitStatus, stderr: String },

    #[error("formatter timed out after {after:?}")]
    Timeout { after: Duration },
}

impl FormatError {
    /// Missing formatter is a setup problem and logged as a warning;
    /// everything else is a failed run.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
