//! Per-run state
//!
//! Holds the mutable state that lives for exactly one run directive: the
//! cursor over the command's captured stdout and the execution log.

use std::fmt;
use std::str::FromStr;

/// Severity of an execution log line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    /// Record nothing
    #[default]
    NoLogs,
}

impl LogLevel {
    fn tag(self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
            LogLevel::NoLogs => "",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(LogLevel::Info),
            "warning" | "warn" => Ok(LogLevel::Warning),
            "error" => Ok(LogLevel::Error),
            "none" | "off" => Ok(LogLevel::NoLogs),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::NoLogs => f.write_str("none"),
            level => f.write_str(&level.tag().to_ascii_lowercase()),
        }
    }
}

/// Execution log of one run directive
#[derive(Debug, Clone, Default)]
pub struct Log {
    min_level: LogLevel,
    buf: String,
}

impl Log {
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            min_level,
            buf: String::new(),
        }
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::NoLogs && level >= self.min_level
    }

    /// Write a log entry tagged with its level
    pub fn logf(&mut self, level: LogLevel, msg: &str) {
        if !self.enabled(level) {
            return;
        }
        self.write(&format!("[{}] {}", level.tag(), msg));
    }

    /// Record the command about to be executed
    pub fn log_cmd(&mut self, rendered: &str) {
        if !self.enabled(LogLevel::Info) {
            return;
        }
        self.write(&format!("[CMD] {}", rendered));
    }

    fn write(&mut self, entry: &str) {
        self.buf.push_str(entry);
        if !entry.ends_with('\n') {
            self.buf.push('\n');
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

/// Cursor over one run's captured output, advanced a line at a time
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    remaining: &'a str,
    last_line: &'a str,
    line: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            remaining: content,
            last_line: "",
            line: 0,
        }
    }

    /// True once only whitespace is left
    pub fn is_exhausted(&self) -> bool {
        self.remaining.trim_start().is_empty()
    }

    /// Skip leading blank content and consume the next line.
    pub fn next_line(&mut self) -> Option<&'a str> {
        self.remaining = self.remaining.trim_start();
        if self.remaining.is_empty() {
            return None;
        }
        let (line, rest) = match self.remaining.find('\n') {
            Some(i) => (&self.remaining[..i], &self.remaining[i + 1..]),
            None => (self.remaining, ""),
        };
        let line = line.strip_suffix('\r').unwrap_or(line);
        self.remaining = rest;
        self.line += 1;
        self.last_line = line;
        Some(line)
    }

    /// The most recently consumed line, empty before the first
    pub fn last_line(&self) -> &'a str {
        self.last_line
    }

    /// Number of lines consumed so far
    pub fn line(&self) -> usize {
        self.line
    }
}
