//! Engine command-line synthesis.

use std::path::Path;

use crate::catalog::{AnalysisVariant, BenchmarkLayout, BenchmarkProgram, ContextMode};
use crate::config::{RunnerConfig, APP_FAMILY_DIR, ARCHIVE_FAMILY_DIR, MAIN_CLASS_NAMESPACE};

/// Build the full argument vector for one engine run.
///
/// Layout: engine prefix, global options, `-pta=<variant>`, optional
/// `-sctx=empty`, then the benchmark input paths for the program's family.
/// Identifiers are catalog values, so no validation happens here.
pub fn synthesize(
    variant: AnalysisVariant,
    program: BenchmarkProgram,
    config: &RunnerConfig,
) -> Vec<String> {
    let mut argv = config.engine.clone();
    argv.extend(config.global_options());
    argv.push(format!("-pta={variant}"));
    if config.context_mode == ContextMode::Empty {
        argv.push("-sctx=empty".to_string());
    }
    argv.extend(benchmark_args(program, &config.benchmarks_root));
    argv
}

fn benchmark_args(program: BenchmarkProgram, root: &Path) -> Vec<String> {
    match program.layout() {
        BenchmarkLayout::Archive => {
            let dir = root.join(ARCHIVE_FAMILY_DIR);
            vec![
                "-apppath".to_string(),
                path_arg(&dir.join(format!("{program}.jar"))),
                "-mainclass".to_string(),
                format!("{MAIN_CLASS_NAMESPACE}.{program}.Main"),
                "-libpath".to_string(),
                path_arg(&dir.join(format!("{program}-deps.jar"))),
                "-reflectionlog".to_string(),
                path_arg(&dir.join(format!("{program}-refl.log"))),
            ]
        }
        BenchmarkLayout::Directory { jar } => {
            let dir = root.join(APP_FAMILY_DIR).join(program.token());
            vec![
                "-apppath".to_string(),
                path_arg(&dir.join(format!("{jar}.jar"))),
                "-libpath".to_string(),
                path_arg(&dir),
                "-reflectionlog".to_string(),
                path_arg(&dir.join(format!("{program}-refl.log"))),
            ]
        }
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}
