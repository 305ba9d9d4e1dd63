//! PTA benchmark runner core.
//!
//! Expands a selection of analysis variants and benchmark programs into a job
//! matrix, then runs the pointer-analysis engine for each job under a
//! wall-clock budget:
//!
//! - [`matrix`] builds the ordered job list from the user's selection
//! - [`exclusion`] predicts jobs known to be unscalable
//! - [`store`] memoizes finished jobs as artifact files
//! - [`command`] synthesizes the engine command line
//! - [`supervisor`] launches and time-bounds the engine process
//! - [`scheduler`] ties the above together, one job at a time

pub mod catalog;
pub mod command;
pub mod config;
pub mod error;
pub mod exclusion;
pub mod matrix;
pub mod report;
pub mod scheduler;
pub mod store;
pub mod supervisor;
pub mod telemetry;

pub use catalog::{AnalysisVariant, BenchmarkLayout, BenchmarkProgram, ContextMode};
pub use command::synthesize;
pub use config::{RunnerConfig, TimeoutBudget, DEFAULT_TIMEOUT_SECS};
pub use error::{
    ExclusionError, PtaBenchError, Result, StoreError, SupervisorError, UsageError,
};
pub use exclusion::{ExclusionTable, ExclusionTables, ScalabilityPredictor};
pub use matrix::{Job, JobMatrix, Selection};
pub use report::{JobRecord, MatrixReport, OutcomeCounts, RunOutcome};
pub use scheduler::Scheduler;
pub use store::{OutputStore, PLACEHOLDER_TEXT};
pub use supervisor::{EngineLauncher, OutputSink, ProcessSupervisor, RunStatus, TIMEOUT_NOTICE};
pub use telemetry::init_tracing;
