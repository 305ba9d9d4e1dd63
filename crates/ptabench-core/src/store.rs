//! Output artifact store.
//!
//! One file per (program, variant) under the output root. A non-empty
//! artifact marks the job as already attempted.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::catalog::{AnalysisVariant, BenchmarkProgram};
use crate::error::StoreError;

/// Text written in place of engine output for skipped unscalable jobs.
pub const PLACEHOLDER_TEXT: &str = "predicted unscalable.";

/// Filesystem-backed artifact store rooted at the output directory.
#[derive(Debug, Clone)]
pub struct OutputStore {
    root: PathBuf,
}

impl OutputStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Ensure the output root is a usable directory, creating it if absent.
    pub fn prepare(&self) -> Result<(), StoreError> {
        if self.root.is_dir() {
            return Ok(());
        }
        if self.root.exists() {
            return Err(StoreError::OutputPathConflict(self.root.clone()));
        }
        fs::create_dir_all(&self.root).map_err(|source| self.io_error(&self.root, source))?;
        debug!(root = %self.root.display(), "Created output root");
        Ok(())
    }

    /// Remove the whole output root. Returns whether anything was removed.
    pub fn clean(&self) -> Result<bool, StoreError> {
        if self.root.is_dir() {
            fs::remove_dir_all(&self.root).map_err(|source| self.io_error(&self.root, source))?;
            info!(root = %self.root.display(), "Removed previous outputs");
            Ok(true)
        } else if self.root.exists() {
            Err(StoreError::OutputPathConflict(self.root.clone()))
        } else {
            Ok(false)
        }
    }

    /// Deterministic artifact location for a job.
    pub fn artifact_path(&self, program: BenchmarkProgram, variant: AnalysisVariant) -> PathBuf {
        self.root.join(format!("{program}_{variant}.o"))
    }

    /// True iff the artifact exists with any content, placeholder included.
    pub fn exists(&self, program: BenchmarkProgram, variant: AnalysisVariant) -> bool {
        fs::metadata(self.artifact_path(program, variant))
            .map(|meta| meta.is_file() && meta.len() > 0)
            .unwrap_or(false)
    }

    /// Write the placeholder unless an artifact is already there.
    ///
    /// Creation is exclusive, so a prior run's output is never clobbered.
    /// Returns whether the placeholder was written.
    pub fn write_placeholder(
        &self,
        program: BenchmarkProgram,
        variant: AnalysisVariant,
    ) -> Result<bool, StoreError> {
        let path = self.artifact_path(program, variant);
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
            Err(source) => return Err(self.io_error(&path, source)),
        };
        file.write_all(PLACEHOLDER_TEXT.as_bytes())
            .map_err(|source| self.io_error(&path, source))?;
        Ok(true)
    }

    /// Truncating write handle for redirecting a child's standard output.
    pub fn open_for_write(
        &self,
        program: BenchmarkProgram,
        variant: AnalysisVariant,
    ) -> Result<File, StoreError> {
        let path = self.artifact_path(program, variant);
        File::create(&path).map_err(|source| self.io_error(&path, source))
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
