//! Log setup for the `ptabench` binary.
//!
//! Runner events are what an operator watches during a matrix run, so the
//! default filter opens `level` only for the runner's own crates and keeps
//! dependencies at `warn`. `RUST_LOG` replaces the default entirely.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Layer};

/// Crates whose events follow the requested level.
const RUNNER_TARGETS: [&str; 2] = ["ptabench_core", "ptabench"];

/// Filter directives used when `RUST_LOG` is unset.
pub fn default_directives(level: Level) -> String {
    let level = level.as_str().to_ascii_lowercase();
    RUNNER_TARGETS
        .iter()
        .fold(String::from("warn"), |mut directives, target| {
            directives.push_str(&format!(",{target}={level}"));
            directives
        })
}

/// Install the global subscriber; only the first call in a process takes effect.
pub fn init_tracing(json: bool, level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(level)));

    let output = fmt::layer().with_target(false);
    let output = if json {
        output.json().boxed()
    } else {
        output.boxed()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_scope_level_to_runner() {
        assert_eq!(
            default_directives(Level::DEBUG),
            "warn,ptabench_core=debug,ptabench=debug"
        );
        assert_eq!(
            default_directives(Level::INFO),
            "warn,ptabench_core=info,ptabench=info"
        );
    }

    #[test]
    fn test_default_directives_parse() {
        for level in [Level::INFO, Level::DEBUG] {
            EnvFilter::try_new(default_directives(level)).unwrap();
        }
    }

    #[test]
    fn test_init_tracing_is_idempotent() {
        init_tracing(false, Level::DEBUG);
        init_tracing(true, Level::INFO);
    }
}
