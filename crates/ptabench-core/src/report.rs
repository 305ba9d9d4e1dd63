//! Per-run reporting of job outcomes.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::{AnalysisVariant, BenchmarkProgram};
use crate::supervisor::RunStatus;

/// What happened to a single job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    SkippedCached,
    SkippedPredictedUnscalable,
    Completed,
    TimedOut,
    /// The engine could not be started; only this job is affected.
    LaunchFailed { reason: String },
}

impl From<RunStatus> for RunOutcome {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Completed => RunOutcome::Completed,
            RunStatus::TimedOut => RunOutcome::TimedOut,
        }
    }
}

impl RunOutcome {
    /// Whether the engine process was started for this job.
    pub fn launched(&self) -> bool {
        matches!(self, RunOutcome::Completed | RunOutcome::TimedOut)
    }
}

/// Record of one scheduled job.
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub variant: AnalysisVariant,
    pub program: BenchmarkProgram,
    pub artifact: PathBuf,
    #[serde(flatten)]
    pub outcome: RunOutcome,
    pub duration_ms: u64,
}

/// Counts of each outcome across a matrix run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub skipped_cached: usize,
    pub skipped_unscalable: usize,
    pub completed: usize,
    pub timed_out: usize,
    pub launch_failed: usize,
}

/// Result of running a whole job matrix.
#[derive(Debug, Clone, Serialize)]
pub struct MatrixReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub jobs: Vec<JobRecord>,
}

impl MatrixReport {
    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for job in &self.jobs {
            match job.outcome {
                RunOutcome::SkippedCached => counts.skipped_cached += 1,
                RunOutcome::SkippedPredictedUnscalable => counts.skipped_unscalable += 1,
                RunOutcome::Completed => counts.completed += 1,
                RunOutcome::TimedOut => counts.timed_out += 1,
                RunOutcome::LaunchFailed { .. } => counts.launch_failed += 1,
            }
        }
        counts
    }

    /// Number of jobs for which the engine was actually started.
    pub fn launched_count(&self) -> usize {
        self.jobs.iter().filter(|j| j.outcome.launched()).count()
    }

    /// One-line human summary.
    pub fn summary_line(&self) -> String {
        let c = self.counts();
        format!(
            "{} job(s): {} completed, {} timed out, {} cached, {} predicted unscalable, {} failed to launch",
            self.jobs.len(),
            c.completed,
            c.timed_out,
            c.skipped_cached,
            c.skipped_unscalable,
            c.launch_failed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(outcome: RunOutcome) -> JobRecord {
        JobRecord {
            variant: AnalysisVariant::Insens,
            program: BenchmarkProgram::Antlr,
            artifact: PathBuf::from("/out/antlr_insens.o"),
            outcome,
            duration_ms: 0,
        }
    }

    #[test]
    fn test_counts_and_summary() {
        let now = Utc::now();
        let report = MatrixReport {
            started_at: now,
            finished_at: now,
            jobs: vec![
                record(RunOutcome::Completed),
                record(RunOutcome::TimedOut),
                record(RunOutcome::SkippedCached),
                record(RunOutcome::LaunchFailed {
                    reason: "no such file".to_string(),
                }),
            ],
        };
        let counts = report.counts();
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.timed_out, 1);
        assert_eq!(counts.skipped_cached, 1);
        assert_eq!(counts.launch_failed, 1);
        assert_eq!(report.launched_count(), 2);
        assert!(report.summary_line().starts_with("4 job(s): 1 completed"));
    }

    #[test]
    fn test_record_serializes_flat_outcome() {
        let json = serde_json::to_value(record(RunOutcome::LaunchFailed {
            reason: "boom".to_string(),
        }))
        .unwrap();
        assert_eq!(json["outcome"], "launch_failed");
        assert_eq!(json["reason"], "boom");
        assert_eq!(json["variant"], "insens");
        assert_eq!(json["program"], "antlr");
    }
}
