//! Immutable run configuration, built once from parsed CLI input.

use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::ContextMode;

/// Default wall-clock ceiling per job (one day).
pub const DEFAULT_TIMEOUT_SECS: i64 = 86_400;

/// Directory under the benchmarks root holding archive-style programs.
pub const ARCHIVE_FAMILY_DIR: &str = "dacapo";

/// Directory under the benchmarks root holding directory-style programs.
pub const APP_FAMILY_DIR: &str = "applications";

/// Package prefix of archive-style main classes.
pub const MAIN_CLASS_NAMESPACE: &str = "dacapo";

/// Wall-clock budget for a single engine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutBudget {
    secs: i64,
}

impl TimeoutBudget {
    /// A negative value means unlimited.
    pub fn from_secs(secs: i64) -> Self {
        Self { secs }
    }

    pub fn unlimited() -> Self {
        Self { secs: -1 }
    }

    /// The ceiling as given, passed verbatim to the engine.
    pub fn as_secs(&self) -> i64 {
        self.secs
    }

    /// `None` when unlimited.
    pub fn as_duration(&self) -> Option<Duration> {
        u64::try_from(self.secs).ok().map(Duration::from_secs)
    }
}

impl Default for TimeoutBudget {
    fn default() -> Self {
        Self::from_secs(DEFAULT_TIMEOUT_SECS)
    }
}

/// Configuration threaded through every component of a run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Argument-vector prefix that starts the engine.
    pub engine: Vec<String>,

    /// Working directory of the engine process.
    pub engine_dir: PathBuf,

    /// Root of the benchmark input trees.
    pub benchmarks_root: PathBuf,

    /// Directory receiving one artifact per job.
    pub output_root: PathBuf,

    /// Per-job wall-clock ceiling.
    pub timeout: TimeoutBudget,

    /// Extra options passed to the engine after `-timeout=`.
    pub engine_options: Vec<String>,

    /// Static-call context handling; also selects the exclusion table.
    pub context_mode: ContextMode,

    /// Print engine output to the terminal instead of the output store.
    pub interactive: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            engine: vec!["python3".to_string(), "pta.py".to_string()],
            engine_dir: PathBuf::from("pta"),
            benchmarks_root: PathBuf::from("benchmarks"),
            output_root: PathBuf::from("output"),
            timeout: TimeoutBudget::default(),
            engine_options: Vec::new(),
            context_mode: ContextMode::Default,
            interactive: false,
        }
    }
}

impl RunnerConfig {
    /// Options passed to every engine invocation, ceiling first.
    pub fn global_options(&self) -> Vec<String> {
        let mut options = Vec::with_capacity(self.engine_options.len() + 1);
        options.push(format!("-timeout={}", self.timeout.as_secs()));
        options.extend(self.engine_options.iter().cloned());
        options
    }
}
