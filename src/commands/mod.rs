//! Directive actions
//!
//! `exec` turns a run directive into a subprocess and captures its output;
//! `output` implements the three match actions over that output.

pub mod exec;
pub mod output;

pub use exec::{render_args, render_command, run_command, CaptureMode, NO_MESSAGE, PATH_PLACEHOLDER};
pub use output::lines_match;
