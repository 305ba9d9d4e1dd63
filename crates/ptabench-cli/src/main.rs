//! `ptabench` - run a pointer-analysis engine over a matrix of analyses and benchmarks.
//!
//! Each (analysis, benchmark) job writes its engine output to
//! `<output>/<benchmark>_<analysis>.o`. Jobs whose artifact already exists are
//! skipped, and jobs known to be unscalable get a placeholder instead of a run.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use ptabench_core::{
    ContextMode, ExclusionTables, JobMatrix, OutputStore, ProcessSupervisor, RunnerConfig,
    ScalabilityPredictor, Scheduler, Selection, TimeoutBudget, UsageError, DEFAULT_TIMEOUT_SECS,
};
use tracing::{info, warn, Level};

#[derive(Parser, Debug)]
#[command(name = "ptabench")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Batch runner for pointer-analysis benchmark experiments", long_about = None)]
struct Cli {
    /// Analyses (e.g. insens, 2o, e-3t) and benchmarks (e.g. antlr, JPC) to run
    targets: Vec<String>,

    /// Fill an unspecified side with every analysis or every benchmark
    #[arg(long)]
    all: bool,

    /// Remove previous outputs and exit
    #[arg(long)]
    clean: bool,

    /// Print analysis results on screen instead of storing them (disables caching)
    #[arg(long)]
    print: bool,

    /// Use the empty context for static calls instead of the virtualised default
    #[arg(long)]
    empty_context: bool,

    /// Directory receiving one output file per job
    #[arg(long, env = "PTABENCH_OUTPUT", default_value = "output")]
    output_path: PathBuf,

    /// Root of the benchmark inputs (dacapo/ and applications/)
    #[arg(long, env = "PTABENCH_BENCHMARKS", default_value = "benchmarks")]
    benchmarks: PathBuf,

    /// Working directory of the engine
    #[arg(long, env = "PTABENCH_ENGINE_DIR", default_value = "pta")]
    engine_dir: PathBuf,

    /// Engine entry point, split on whitespace
    #[arg(long, default_value = "python3 pta.py")]
    engine: String,

    /// Per-job timeout in seconds (negative for unlimited)
    #[arg(long, env = "PTABENCH_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECS, allow_negative_numbers = true)]
    timeout: i64,

    /// Extra option passed through to the engine (repeatable)
    #[arg(long = "engine-opt", allow_hyphen_values = true)]
    engine_opts: Vec<String>,

    /// JSON exclusion table replacing the built-in one
    #[arg(long)]
    exclusions: Option<PathBuf>,

    /// Write a JSON report of the run to this file
    #[arg(long)]
    report: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    ptabench_core::init_tracing(cli.json, level);

    let cwd = std::env::current_dir().context("Failed to read current directory")?;

    if cli.clean {
        clean_outputs(&cli, &cwd)?;
        return Ok(());
    }

    let matrix = match Selection::from_tokens(&cli.targets, cli.all)
        .and_then(|selection| JobMatrix::build(&selection))
    {
        Ok(matrix) => matrix,
        Err(e) => {
            let kind = match e {
                UsageError::NoBenchmarks => ErrorKind::MissingRequiredArgument,
                UsageError::UnknownTarget(_) => ErrorKind::InvalidValue,
            };
            Cli::command().error(kind, e).exit()
        }
    };

    let tables = match &cli.exclusions {
        Some(path) => ExclusionTables::from_file(path)?,
        None => ExclusionTables::embedded()?,
    };

    let config = build_config(&cli, &cwd);
    let predictor = ScalabilityPredictor::new(&tables, config.context_mode);
    let report_path = cli.report.as_ref().map(|p| absolutize(&cwd, p));

    let scheduler = Scheduler::new(config, predictor, Arc::new(ProcessSupervisor));
    scheduler
        .store()
        .prepare()
        .context("Cannot use output directory")?;

    // Dropping an in-flight run tears down the engine's process group.
    let report = tokio::select! {
        report = scheduler.run(&matrix) => report,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, stopping the running job");
            anyhow::bail!("interrupted");
        }
    };
    info!("{}", report.summary_line());

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    Ok(())
}

/// Remove the output directory named on the command line.
///
/// Returns whether there was anything to remove.
fn clean_outputs(cli: &Cli, cwd: &Path) -> Result<bool> {
    OutputStore::new(absolutize(cwd, &cli.output_path))
        .clean()
        .context("Failed to remove previous outputs")
}

/// Freeze parsed arguments into the run configuration.
///
/// Paths handed to the engine are made absolute because it runs in `engine_dir`.
fn build_config(cli: &Cli, cwd: &Path) -> RunnerConfig {
    RunnerConfig {
        engine: cli.engine.split_whitespace().map(str::to_string).collect(),
        engine_dir: absolutize(cwd, &cli.engine_dir),
        benchmarks_root: absolutize(cwd, &cli.benchmarks),
        output_root: absolutize(cwd, &cli.output_path),
        timeout: TimeoutBudget::from_secs(cli.timeout),
        engine_options: cli.engine_opts.clone(),
        context_mode: if cli.empty_context {
            ContextMode::Empty
        } else {
            ContextMode::Default
        },
        interactive: cli.print,
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("ptabench").chain(args.iter().copied()))
            .expect("arguments should parse")
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["antlr"]);
        let config = build_config(&cli, Path::new("/work"));
        assert_eq!(config.engine, vec!["python3", "pta.py"]);
        assert_eq!(config.engine_dir, PathBuf::from("/work/pta"));
        assert_eq!(config.benchmarks_root, PathBuf::from("/work/benchmarks"));
        assert_eq!(config.output_root, PathBuf::from("/work/output"));
        assert_eq!(config.timeout.as_secs(), DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.context_mode, ContextMode::Default);
        assert!(!config.interactive);
    }

    #[test]
    fn test_flags_map_onto_config() {
        let cli = parse(&[
            "--print",
            "--empty-context",
            "--output-path",
            "/results",
            "--timeout",
            "-1",
            "--engine-opt",
            "-Xmx64g",
            "--engine",
            "pypy3 -O pta.py",
            "2o",
            "JPC",
        ]);
        let config = build_config(&cli, Path::new("/work"));
        assert!(config.interactive);
        assert_eq!(config.context_mode, ContextMode::Empty);
        assert_eq!(config.output_root, PathBuf::from("/results"));
        assert_eq!(config.timeout.as_duration(), None);
        assert_eq!(config.engine_options, vec!["-Xmx64g"]);
        assert_eq!(config.engine, vec!["pypy3", "-O", "pta.py"]);
        assert_eq!(cli.targets, vec!["2o", "JPC"]);
    }

    #[test]
    fn test_targets_feed_the_matrix() {
        let cli = parse(&["--all", "e-2t"]);
        let selection = Selection::from_tokens(&cli.targets, cli.all).unwrap();
        let matrix = JobMatrix::build(&selection).unwrap();
        assert_eq!(matrix.len(), 12);
    }

    #[test]
    fn test_clean_removes_relative_output_dir() {
        let work = tempfile::tempdir().unwrap();
        let output = work.path().join("results");
        std::fs::create_dir(&output).unwrap();
        std::fs::write(output.join("antlr_insens.o"), "done").unwrap();

        let cli = parse(&["--clean", "--output-path", "results"]);
        assert!(clean_outputs(&cli, work.path()).unwrap());
        assert!(!output.exists());
        assert!(work.path().exists());

        // Nothing left to remove.
        assert!(!clean_outputs(&cli, work.path()).unwrap());
    }

    #[test]
    fn test_absolutize_keeps_absolute_paths() {
        assert_eq!(
            absolutize(Path::new("/work"), Path::new("/abs/out")),
            PathBuf::from("/abs/out")
        );
        assert_eq!(
            absolutize(Path::new("/work"), Path::new("out")),
            PathBuf::from("/work/out")
        );
    }
}
