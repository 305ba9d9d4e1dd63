//! Job matrix expansion from the user's selection.

use serde::Serialize;

use crate::catalog::{AnalysisVariant, BenchmarkProgram};
use crate::error::UsageError;

/// One unit of scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Job {
    pub variant: AnalysisVariant,
    pub program: BenchmarkProgram,
}

/// Analyses and benchmarks requested on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub analyses: Vec<AnalysisVariant>,
    pub benchmarks: Vec<BenchmarkProgram>,
    pub all: bool,
}

impl Selection {
    /// Classify free-form tokens by catalog membership.
    ///
    /// Repeated tokens keep their first position.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S], all: bool) -> Result<Self, UsageError> {
        let mut selection = Selection {
            all,
            ..Selection::default()
        };
        for token in tokens {
            let token = token.as_ref();
            if let Ok(variant) = token.parse::<AnalysisVariant>() {
                if !selection.analyses.contains(&variant) {
                    selection.analyses.push(variant);
                }
            } else if let Ok(program) = token.parse::<BenchmarkProgram>() {
                if !selection.benchmarks.contains(&program) {
                    selection.benchmarks.push(program);
                }
            } else {
                return Err(UsageError::UnknownTarget(token.to_string()));
            }
        }
        Ok(selection)
    }
}

/// Ordered list of jobs: every selected variant crossed with every selected program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobMatrix {
    jobs: Vec<Job>,
}

impl JobMatrix {
    pub fn build(selection: &Selection) -> Result<Self, UsageError> {
        let mut analyses = selection.analyses.clone();
        let mut benchmarks = selection.benchmarks.clone();

        if selection.all {
            if benchmarks.is_empty() {
                benchmarks = BenchmarkProgram::ALL.to_vec();
            }
            if analyses.is_empty() {
                analyses = AnalysisVariant::ALL.to_vec();
            }
        }
        if benchmarks.is_empty() {
            return Err(UsageError::NoBenchmarks);
        }
        if analyses.is_empty() {
            analyses.push(AnalysisVariant::Insens);
        }

        let jobs = analyses
            .iter()
            .flat_map(|&variant| {
                benchmarks
                    .iter()
                    .map(move |&program| Job { variant, program })
            })
            .collect();
        Ok(Self { jobs })
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl<'a> IntoIterator for &'a JobMatrix {
    type Item = &'a Job;
    type IntoIter = std::slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}
