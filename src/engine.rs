//! Check engine
//!
//! The Engine replays match directives against captured output and drives one
//! run directive from rendering to result. It is stateless config: one engine
//! can check many files.

use std::path::PathBuf;
use crate::commands::{exec, output, CaptureMode};
use crate::error::CheckError;
use crate::parser::{Action, Directive};
use crate::runner::CheckResult;
use crate::state::{Cursor, Log, LogLevel};

/// The check engine
#[derive(Debug, Clone, Default)]
pub struct Engine {
    /// Minimum level of execution-log lines kept per run
    pub log_level: LogLevel,
    /// How command output is captured
    pub capture: CaptureMode,
    /// Directory commands run in; inherited when `None`
    pub working_dir: Option<PathBuf>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `directives` in order to the output under `cursor`, stopping at
    /// the first failure.
    pub fn execute(
        &self,
        cursor: &mut Cursor<'_>,
        directives: &[Directive<'_>],
        log: &mut Log,
    ) -> Result<(), CheckError> {
        for directive in directives {
            let pattern = directive.arguments;
            match directive.action {
                Action::Star => output::star(cursor, pattern, log)?,
                Action::Plus => output::plus(cursor, pattern, log)?,
                Action::Bang => output::bang(cursor, pattern, log)?,
                // run directives are never part of the match list
                Action::Run => continue,
            }
        }
        Ok(())
    }

    /// Render, execute and verify one run directive.
    ///
    /// `cmd` is a reusable argument buffer; it is empty again on return.
    pub fn run_directive(
        &self,
        run: &Directive<'_>,
        directives: &[Directive<'_>],
        filepath: &str,
        cmd: &mut Vec<String>,
    ) -> CheckResult {
        let mut log = Log::new(self.log_level);

        exec::render_args(cmd, run.arguments, filepath);
        let command = exec::render_command(cmd);
        log.log_cmd(&command);

        let outcome = exec::run_command(cmd, self.capture, self.working_dir.as_deref(), &mut log);
        cmd.clear();

        let outcome = outcome.and_then(|stdout| {
            let mut cursor = Cursor::new(&stdout);
            self.execute(&mut cursor, directives, &mut log)
        });

        if let Err(ref e) = outcome {
            log.logf(LogLevel::Error, &e.to_string());
        }

        CheckResult {
            command,
            failed: outcome.is_err(),
            error_message: outcome.err().map(|e| e.to_string()).unwrap_or_default(),
            log: log.into_string(),
        }
    }
}
