//! canal CLI
//!
//! Check one annotated source file.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use canal::{CaptureMode, CheckRunner, LogLevel, RunConfig};

#[derive(Parser, Debug)]
#[command(name = "canal")]
#[command(version)]
#[command(about = "Run the commands an annotated file declares and check their output")]
struct Cli {
    /// Annotated source file to check
    path: PathBuf,

    /// Verbose output: show each check's execution log
    #[arg(short, long)]
    verbose: bool,

    /// Minimum execution-log level (info, warning, error, none)
    #[arg(long = "log-level", conflicts_with = "verbose")]
    log_level: Option<LogLevel>,

    /// How command output is captured (pipe, file)
    #[arg(long, default_value_t = CaptureMode::Pipe)]
    capture: CaptureMode,

    /// Exit with a failure status when any check fails
    #[arg(long = "fail-on-error")]
    fail_on_error: bool,

    /// Directory to run commands in
    #[arg(short = 'C', long = "dir")]
    dir: Option<PathBuf>,

    /// List the extracted directives without running anything
    #[arg(long)]
    list: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if cli.list {
        let source = std::fs::read_to_string(&cli.path)
            .with_context(|| format!("could not read file '{}'", cli.path.display()))?;
        print_directives(&source);
        return Ok(ExitCode::SUCCESS);
    }

    let log_level = match (cli.verbose, cli.log_level) {
        (true, _) => LogLevel::Info,
        (false, Some(level)) => level,
        (false, None) => LogLevel::NoLogs,
    };

    let config = RunConfig {
        log_level,
        capture: cli.capture,
        fail_on_error: cli.fail_on_error,
        working_dir: cli.dir,
    };
    let runner = CheckRunner::new(config);

    let report = runner
        .run_file(&cli.path)
        .with_context(|| format!("could not read file '{}'", cli.path.display()))?;

    for (i, result) in report.results.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("[Check {}] ({}):", i + 1, result.command);
        if !result.log.is_empty() {
            eprint!("{}", result.log);
        }
        if result.failed {
            eprintln!("{}", result.error_message);
        } else {
            println!("Passed!");
        }
    }

    if log_level != LogLevel::NoLogs {
        println!();
        println!("{}", report.summary());
    }

    if runner.config().fail_on_error && !report.all_passed() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn print_directives(source: &str) {
    let check = canal::collect_directives(source);

    println!("Run directives:");
    for d in &check.run_directives {
        println!("  {} {}", d.action, d.arguments);
    }

    println!();
    println!("Match directives:");
    for d in &check.match_directives {
        println!("  {} {}", d.action, d.arguments);
    }
}
