//! Check runner
//!
//! Reads an annotated file, extracts its directives and runs every run
//! directive through the engine, collecting one result per run directive.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use crate::commands::CaptureMode;
use crate::engine::Engine;
use crate::error::CheckError;
use crate::parser::collect_directives;
use crate::state::LogLevel;

/// Configuration for the check runner
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Minimum level of execution-log lines recorded per check
    pub log_level: LogLevel,
    /// How command output is captured
    pub capture: CaptureMode,
    /// Report failing checks through the exit status
    pub fail_on_error: bool,
    /// Directory commands run in
    pub working_dir: Option<PathBuf>,
}

/// Outcome of one run directive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckResult {
    /// The command as it was executed
    pub command: String,
    pub failed: bool,
    /// First diagnostic encountered, empty when passed
    pub error_message: String,
    /// Execution log
    pub log: String,
}

impl CheckResult {
    pub fn passed(&self) -> bool {
        !self.failed
    }
}

/// Results of checking one file, in run-directive order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub path: PathBuf,
    pub results: Vec<CheckResult>,
}

impl CheckReport {
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(CheckResult::passed)
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| r.failed).count()
    }

    /// Format a summary line
    pub fn summary(&self) -> String {
        format!("{} passed, {} failed", self.passed_count(), self.failed_count())
    }

    /// Render every result as one block, blank-line separated.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, result) in self.results.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "[Check {}] ({}):", i + 1, result.command);
            if result.failed {
                let _ = writeln!(out, "{}", result.error_message);
            } else {
                out.push_str("Passed!\n");
            }
        }
        out
    }
}

/// The check runner
pub struct CheckRunner {
    engine: Engine,
    config: RunConfig,
}

impl CheckRunner {
    /// Create a new runner with the given config
    pub fn new(config: RunConfig) -> Self {
        let engine = Engine {
            log_level: config.log_level,
            capture: config.capture,
            working_dir: config.working_dir.clone(),
        };
        Self { engine, config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Read `path` and check it.
    pub fn run_file(&self, path: impl AsRef<Path>) -> Result<CheckReport, CheckError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let source = String::from_utf8_lossy(&bytes);
        Ok(self.run_source(&source, path))
    }

    /// Check already-loaded source text; `path` is what `%s` expands to.
    pub fn run_source(&self, source: &str, path: impl AsRef<Path>) -> CheckReport {
        let path = path.as_ref();
        let filepath = path.to_string_lossy();
        let check = collect_directives(source);

        let mut cmd = Vec::new();
        let results = check
            .run_directives
            .iter()
            .map(|run| {
                self.engine
                    .run_directive(run, &check.match_directives, &filepath, &mut cmd)
            })
            .collect();

        CheckReport {
            path: path.to_path_buf(),
            results,
        }
    }
}

/// Builder API for convenient runner construction
#[derive(Default)]
pub struct CheckRunnerBuilder {
    config: RunConfig,
}

impl CheckRunnerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.log_level = level;
        self
    }

    pub fn capture(mut self, capture: CaptureMode) -> Self {
        self.config.capture = capture;
        self
    }

    pub fn fail_on_error(mut self, fail: bool) -> Self {
        self.config.fail_on_error = fail;
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.working_dir = Some(dir.into());
        self
    }

    pub fn build(self) -> CheckRunner {
        CheckRunner::new(self.config)
    }

    /// Build and check one file
    pub fn run(self, path: impl AsRef<Path>) -> Result<CheckReport, CheckError> {
        self.build().run_file(path)
    }
}

/// Convenience function: start building a runner
pub fn run() -> CheckRunnerBuilder {
    CheckRunnerBuilder::new()
}

/// Check an annotated file and integrate with `#[test]` by panicking on failure.
///
/// Set `CANAL_VERBOSE=1` to include each check's execution log.
///
/// ```rust,ignore
/// #[test]
/// fn golden_output() {
///     canal::run_and_assert("tests/checks/hello.c");
/// }
/// ```
pub fn run_and_assert(path: impl AsRef<Path>) {
    let path = path.as_ref();
    let level = if std::env::var("CANAL_VERBOSE").is_ok() {
        LogLevel::Info
    } else {
        LogLevel::NoLogs
    };

    let report = match run().log_level(level).run(path) {
        Ok(report) => report,
        Err(e) => panic!("could not read file '{}': {}", path.display(), e),
    };

    eprint!("{}", report.render());
    for result in report.results.iter().filter(|r| !r.log.is_empty()) {
        eprint!("{}", result.log);
    }
    eprintln!("\n{}", report.summary());

    if !report.all_passed() {
        panic!("{}: {} check(s) failed", path.display(), report.failed_count());
    }
}
