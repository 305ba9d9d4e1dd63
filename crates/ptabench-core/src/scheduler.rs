//! Top-level scheduling loop over a job matrix.

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::command::synthesize;
use crate::config::RunnerConfig;
use crate::exclusion::ScalabilityPredictor;
use crate::matrix::{Job, JobMatrix};
use crate::report::{JobRecord, MatrixReport, RunOutcome};
use crate::store::OutputStore;
use crate::supervisor::{EngineLauncher, OutputSink};

/// Runs jobs one at a time, skipping cached and predicted-unscalable ones.
pub struct Scheduler {
    config: RunnerConfig,
    store: OutputStore,
    predictor: ScalabilityPredictor,
    launcher: Arc<dyn EngineLauncher>,
}

impl Scheduler {
    /// The predictor must be built for `config.context_mode`.
    pub fn new(
        config: RunnerConfig,
        predictor: ScalabilityPredictor,
        launcher: Arc<dyn EngineLauncher>,
    ) -> Self {
        let store = OutputStore::new(config.output_root.clone());
        Self {
            config,
            store,
            predictor,
            launcher,
        }
    }

    pub fn store(&self) -> &OutputStore {
        &self.store
    }

    /// Run every job in order. Individual job failures never stop the matrix.
    pub async fn run(&self, matrix: &JobMatrix) -> MatrixReport {
        let started_at = Utc::now();
        let mut jobs = Vec::with_capacity(matrix.len());

        info!(jobs = matrix.len(), mode = ?self.predictor.mode(), "Starting job matrix");
        for job in matrix {
            let start = Instant::now();
            let outcome = self.run_job(*job).await;
            jobs.push(JobRecord {
                variant: job.variant,
                program: job.program,
                artifact: self.store.artifact_path(job.program, job.variant),
                outcome,
                duration_ms: start.elapsed().as_millis() as u64,
            });
        }

        MatrixReport {
            started_at,
            finished_at: Utc::now(),
            jobs,
        }
    }

    /// Decide and carry out a single job.
    pub async fn run_job(&self, job: Job) -> RunOutcome {
        let Job { variant, program } = job;
        let interactive = self.config.interactive;

        if !interactive && self.store.exists(program, variant) {
            debug!(%variant, %program, "Old result found, skipping");
            return RunOutcome::SkippedCached;
        }

        if self.predictor.predict(variant, program) {
            info!(%variant, %program, "predicted unscalable. skip this.");
            if !interactive {
                if let Err(e) = self.store.write_placeholder(program, variant) {
                    warn!(%variant, %program, error = %e, "Failed to write placeholder");
                }
            }
            return RunOutcome::SkippedPredictedUnscalable;
        }

        let argv = synthesize(variant, program, &self.config);
        let sink = if interactive {
            OutputSink::Inherit
        } else {
            match self.store.open_for_write(program, variant) {
                Ok(file) => OutputSink::File(file),
                Err(e) => {
                    warn!(%variant, %program, error = %e, "Cannot open artifact");
                    return RunOutcome::LaunchFailed {
                        reason: e.to_string(),
                    };
                }
            }
        };

        info!(%variant, %program, "now running {} for {} ...", variant, program);
        debug!(command = %argv.join(" "), "Engine command");
        match self
            .launcher
            .launch(&argv, &self.config.engine_dir, sink, self.config.timeout)
            .await
        {
            Ok(status) => status.into(),
            Err(e) => {
                warn!(%variant, %program, error = %e, "Engine launch failed");
                RunOutcome::LaunchFailed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
