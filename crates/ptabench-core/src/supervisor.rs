//! Timeout-bounded supervision of the engine process.
//!
//! A single timer is armed at launch around the child's exit. If it fires
//! first the child's whole process group is force-killed, so helpers the
//! engine forked cannot keep writing into the artifact. Supervision blocks the
//! caller until the child reaches a terminal state.

use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::config::TimeoutBudget;
use crate::error::SupervisorError;

/// Notice recorded when the budget runs out.
pub const TIMEOUT_NOTICE: &str = "Time is out!";

/// Where the child's standard output goes.
#[derive(Debug)]
pub enum OutputSink {
    /// Share the runner's terminal.
    Inherit,
    /// Redirect into an artifact file.
    File(File),
}

/// Terminal state of a supervised run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The child exited on its own (any exit status).
    Completed,
    /// The budget expired and the child was killed.
    TimedOut,
}

/// Launches an engine command and waits for it to finish.
#[async_trait]
pub trait EngineLauncher: Send + Sync {
    async fn launch(
        &self,
        argv: &[String],
        cwd: &Path,
        sink: OutputSink,
        budget: TimeoutBudget,
    ) -> Result<RunStatus, SupervisorError>;
}

/// Runs the engine as a real child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessSupervisor;

impl ProcessSupervisor {
    /// Launch `argv` in `cwd` and supervise it under `budget`.
    pub async fn run(
        argv: &[String],
        cwd: &Path,
        sink: OutputSink,
        budget: TimeoutBudget,
    ) -> Result<RunStatus, SupervisorError> {
        let (program, args) = argv.split_first().ok_or(SupervisorError::EmptyCommand)?;

        let mut notice_sink = None;
        let stdout = match sink {
            OutputSink::Inherit => Stdio::inherit(),
            OutputSink::File(file) => {
                notice_sink = match file.try_clone() {
                    Ok(clone) => Some(clone),
                    Err(e) => {
                        warn!(error = %e, "Cannot keep a handle for the timeout notice");
                        None
                    }
                };
                Stdio::from(file)
            }
        };

        let mut command = Command::new(program);
        command
            .args(args)
            .current_dir(cwd)
            .stdout(stdout)
            .kill_on_drop(true);
        // Lead a fresh process group so a timeout can reach every descendant.
        #[cfg(unix)]
        command.process_group(0);

        let start = Instant::now();
        let mut child = command.spawn().map_err(|source| SupervisorError::Launch {
            program: program.clone(),
            source,
        })?;
        // Release the parent's handle on the sink; the child keeps its own.
        drop(command);
        let mut group = ProcessGroup::new(&child);

        let Some(limit) = budget.as_duration() else {
            let status = child.wait().await.map_err(SupervisorError::Wait)?;
            group.disarm();
            debug!(?status, elapsed_ms = start.elapsed().as_millis() as u64, "Engine exited");
            return Ok(RunStatus::Completed);
        };

        match tokio::time::timeout(limit, child.wait()).await {
            Ok(waited) => {
                let status = waited.map_err(SupervisorError::Wait)?;
                group.disarm();
                debug!(?status, elapsed_ms = start.elapsed().as_millis() as u64, "Engine exited");
                Ok(RunStatus::Completed)
            }
            Err(_elapsed) => {
                terminate(&mut child, &mut group).await;
                warn!(limit_secs = budget.as_secs(), "{}", TIMEOUT_NOTICE);
                if let Some(mut file) = notice_sink {
                    if let Err(e) = writeln!(file, "{TIMEOUT_NOTICE}") {
                        warn!(error = %e, "Failed to record timeout in artifact");
                    }
                }
                Ok(RunStatus::TimedOut)
            }
        }
    }
}

/// Kill the child's process group, then the child itself, and reap it.
async fn terminate(child: &mut Child, group: &mut ProcessGroup) {
    group.kill();
    if let Err(e) = child.kill().await {
        warn!(error = %e, "Failed to kill engine process");
    }
}

/// Process group led by a supervised child.
///
/// Dropping it while armed kills every member, which covers a run future that
/// is cancelled mid-wait (e.g. on Ctrl-C). It must be dropped before the
/// child is reaped so the group id cannot be reused.
struct ProcessGroup {
    leader: Option<u32>,
}

impl ProcessGroup {
    fn new(child: &Child) -> Self {
        Self { leader: child.id() }
    }

    /// The leader exited on its own; leave any survivors alone.
    fn disarm(&mut self) {
        self.leader = None;
    }

    fn kill(&mut self) {
        let Some(pid) = self.leader.take() else {
            return;
        };
        #[cfg(unix)]
        {
            use nix::sys::signal::{killpg, Signal};
            use nix::unistd::Pid;

            match killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
                Ok(()) | Err(nix::errno::Errno::ESRCH) => {}
                Err(e) => warn!(pid, error = %e, "Failed to kill engine process group"),
            }
        }
        #[cfg(not(unix))]
        let _ = pid;
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        self.kill();
    }
}

#[async_trait]
impl EngineLauncher for ProcessSupervisor {
    async fn launch(
        &self,
        argv: &[String],
        cwd: &Path,
        sink: OutputSink,
        budget: TimeoutBudget,
    ) -> Result<RunStatus, SupervisorError> {
        Self::run(argv, cwd, sink, budget).await
    }
}
