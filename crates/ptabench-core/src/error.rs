//! Error taxonomy for the benchmark runner.

use std::path::PathBuf;

/// Invalid or missing selection on the command line.
#[derive(Debug, thiserror::Error)]
pub enum UsageError {
    #[error("benchmark(s) not specified")]
    NoBenchmarks,

    #[error("unknown analysis or benchmark: {0}")]
    UnknownTarget(String),
}

/// Malformed exclusion table data.
#[derive(Debug, thiserror::Error)]
pub enum ExclusionError {
    #[error("exclusion table is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("exclusion table lists {variant} more than once ({mode} context)")]
    DuplicateVariant { mode: &'static str, variant: String },

    #[error("exclusion table lists {program} more than once for {variant} ({mode} context)")]
    DuplicateEntry {
        mode: &'static str,
        variant: String,
        program: String,
    },

    #[error("cannot read exclusion table {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Failures of the output artifact store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("cannot create output dir {0}: already exists as a file")]
    OutputPathConflict(PathBuf),

    #[error("output store io error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Failures while launching or supervising the engine process.
#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error("empty engine command")]
    EmptyCommand,

    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        source: std::io::Error,
    },

    #[error("failed waiting on engine process: {0}")]
    Wait(std::io::Error),
}

/// Top-level error for runner operations.
#[derive(Debug, thiserror::Error)]
pub enum PtaBenchError {
    #[error("usage error: {0}")]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Exclusion(#[from] ExclusionError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Supervisor(#[from] SupervisorError),
}

/// Result type for runner operations.
pub type Result<T> = std::result::Result<T, PtaBenchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_error_converts_into_top_level() {
        let err: PtaBenchError = UsageError::NoBenchmarks.into();
        assert_eq!(err.to_string(), "usage error: benchmark(s) not specified");
    }

    #[test]
    fn test_output_path_conflict_message_names_path() {
        let err = StoreError::OutputPathConflict(PathBuf::from("/tmp/out"));
        assert!(err.to_string().contains("/tmp/out"));
        assert!(err.to_string().contains("already exists as a file"));
    }
}
