//! canal: an annotation-driven output checker
//!
//! A source file declares, in its own line comments, the commands to run
//! against it and the output those commands must produce. canal extracts the
//! directives, runs each command and matches its stdout line by line.
//!
//! # Directive Syntax
//!
//! ```text
//! // R cc -fsyntax-only %s
//! // * warning: unused variable
//! // + note: declared here
//! // ! error
//! ```
//!
//! # Actions
//!
//! | Action | Description |
//! |--------|-------------|
//! | `R` | Run a command; `%s` expands to the checked file's path |
//! | `*` | Skip output lines until one matches |
//! | `+` | The next output line must match |
//! | `!` | The last consumed output line must not match |
//!
//! Lines are compared token by token, ignoring whitespace. Every run
//! directive is checked against the full list of match directives.

mod engine;
mod state;
mod parser;
mod commands;
mod runner;
mod error;

pub use engine::Engine;
pub use state::{Cursor, Log, LogLevel};
pub use parser::{Action, Check, Directive, DIRECTIVE_PREFIX, collect_directives, parse_directive};
pub use commands::{CaptureMode, NO_MESSAGE, PATH_PLACEHOLDER, lines_match, render_args, render_command};
pub use runner::{CheckRunner, CheckRunnerBuilder, CheckReport, CheckResult, RunConfig};
pub use error::{CheckError, ErrorKind};

// Convenience functions for cargo test integration
pub use runner::{run_and_assert, run};
