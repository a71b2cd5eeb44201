//! Check errors

use std::fmt;

/// The kind of check error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The checked file could not be read
    Input,
    /// The command could not be started or exited unsuccessfully
    Spawn,
    /// A match directive did not hold against the command output
    Match,
}

/// A check error, optionally tied to a line of the command output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckError {
    pub kind: ErrorKind,
    pub message: String,
    /// 1-based output line the failure was detected at
    pub line: Option<usize>,
}

impl CheckError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            line: None,
        }
    }

    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    pub fn spawn(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Spawn, msg)
    }

    pub fn mismatch(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Match, msg)
    }

    pub fn is_match(&self) -> bool {
        self.kind == ErrorKind::Match
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(line) = self.line {
            write!(f, "{}: ", line)?;
        }
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CheckError {}

impl From<std::io::Error> for CheckError {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::Input, e.to_string())
    }
}
