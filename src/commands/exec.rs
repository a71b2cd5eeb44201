//! R — render and execute a run directive's command

use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::process::{Command as ProcessCommand, ExitStatus, Stdio};
use std::str::FromStr;
use crate::error::CheckError;
use crate::state::{Log, LogLevel};

/// Token replaced by the checked file's path
pub const PATH_PLACEHOLDER: &str = "%s";

/// Diagnostic used when a failing command wrote nothing to stderr
pub const NO_MESSAGE: &str = "<command failed with no message>";

/// How a command's stdout/stderr are captured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptureMode {
    /// In-memory pipes
    #[default]
    Pipe,
    /// Anonymous temporary files, removed when dropped
    TempFile,
}

impl FromStr for CaptureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pipe" => Ok(CaptureMode::Pipe),
            "file" | "tempfile" => Ok(CaptureMode::TempFile),
            other => Err(format!("unknown capture mode: {}", other)),
        }
    }
}

impl fmt::Display for CaptureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureMode::Pipe => f.write_str("pipe"),
            CaptureMode::TempFile => f.write_str("file"),
        }
    }
}

/// Everything a finished command wrote
pub struct Captured {
    pub stdout: String,
    pub stderr: String,
    pub status: ExitStatus,
}

/// Append the arguments of a run directive to `cmd`, substituting `%s`.
pub fn render_args(cmd: &mut Vec<String>, arguments: &str, filepath: &str) {
    for token in arguments.split_whitespace() {
        if token == PATH_PLACEHOLDER {
            cmd.push(filepath.to_string());
        } else {
            cmd.push(token.to_string());
        }
    }
}

/// Render an argument list as a single command line for display.
pub fn render_command(cmd: &[String]) -> String {
    cmd.iter()
        .map(|a| {
            if a.is_empty() || a.contains(char::is_whitespace) {
                format!("'{}'", a)
            } else {
                a.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Run `cmd` to completion and return its stdout.
///
/// A command that cannot be started or exits unsuccessfully yields a spawn
/// error carrying its stderr, or a placeholder when stderr was empty.
pub fn run_command(
    cmd: &[String],
    capture: CaptureMode,
    working_dir: Option<&Path>,
    log: &mut Log,
) -> Result<String, CheckError> {
    let Some((program, args)) = cmd.split_first() else {
        log.logf(LogLevel::Error, "could not run empty command");
        return Err(CheckError::spawn(NO_MESSAGE));
    };

    let mut command = ProcessCommand::new(program);
    command.args(args);
    command.stdin(Stdio::null());
    if let Some(dir) = working_dir {
        command.current_dir(dir);
    }

    let captured = match capture {
        CaptureMode::Pipe => run_piped(&mut command),
        CaptureMode::TempFile => run_to_files(&mut command),
    };

    let captured = captured.map_err(|e| {
        log.logf(LogLevel::Error, &format!("could not start '{}': {}", program, e));
        CheckError::spawn(NO_MESSAGE)
    })?;

    if !captured.status.success() {
        log.logf(LogLevel::Error, &format!("command exited with {}", captured.status));
        let message = captured.stderr.trim_end_matches(['\r', '\n']);
        if message.is_empty() {
            return Err(CheckError::spawn(NO_MESSAGE));
        }
        return Err(CheckError::spawn(message));
    }

    log.logf(LogLevel::Info, &format!("command exited with {}", captured.status));
    if !captured.stderr.is_empty() {
        log.logf(LogLevel::Warning, &format!("[stderr]\n{}", captured.stderr));
    }
    Ok(captured.stdout)
}

fn run_piped(command: &mut ProcessCommand) -> std::io::Result<Captured> {
    command.stdout(Stdio::piped());
    command.stderr(Stdio::piped());
    let output = command.output()?;
    Ok(Captured {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        status: output.status,
    })
}

fn run_to_files(command: &mut ProcessCommand) -> std::io::Result<Captured> {
    // Both files are unlinked by the OS once the last handle drops, so every
    // early return below releases them.
    let mut out = tempfile::tempfile()?;
    let mut err = tempfile::tempfile()?;
    command.stdout(Stdio::from(out.try_clone()?));
    command.stderr(Stdio::from(err.try_clone()?));

    let status = command.status()?;
    Ok(Captured {
        stdout: read_back(&mut out)?,
        stderr: read_back(&mut err)?,
        status,
    })
}

fn read_back(file: &mut File) -> std::io::Result<String> {
    file.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
