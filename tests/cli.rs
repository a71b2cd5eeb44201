//! CLI tests: drive the built `canal` binary

use std::path::Path;
use std::process::{Command, Output};

fn canal(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_canal"))
        .args(args)
        .output()
        .expect("failed to run canal")
}

fn write(dir: &Path, name: &str, source: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, source).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn missing_argument_fails() {
    let out = canal(&[]);
    assert!(!out.status.success());
    assert!(!out.stderr.is_empty());
}

#[test]
fn unreadable_file_fails() {
    let out = canal(&["/canal/no/such/file.c"]);
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("could not read file '/canal/no/such/file.c'"), "{}", stderr);
}

#[test]
fn list_prints_directives() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "list.c", "// R cc %s\n// + ok\n// ? ignored\n");
    let out = canal(&["--list", path.as_str()]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout, "Run directives:\n  R cc %s\n\nMatch directives:\n  + ok\n");
}

#[cfg(unix)]
#[test]
fn reports_each_check() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "report.c", "// R echo hello\n// R echo wrong\n// + hello\n");
    let out = canal(&[path.as_str()]);
    // failing checks do not change the exit status by default
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert_eq!(stdout, "[Check 1] (echo hello):\nPassed!\n\n[Check 2] (echo wrong):\n");
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(stderr, "1: found 'wrong', expected 'hello'\n");
}

#[cfg(unix)]
#[test]
fn fail_on_error_sets_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "strict.c", "// R echo wrong\n// + hello\n");
    let out = canal(&["--fail-on-error", path.as_str()]);
    assert!(!out.status.success());

    let path = write(dir.path(), "strict_ok.c", "// R echo hello\n// + hello\n");
    let out = canal(&["--fail-on-error", path.as_str()]);
    assert!(out.status.success());
}

#[cfg(unix)]
#[test]
fn verbose_prints_log_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "verbose.c", "// R echo hello\n// + hello\n");
    let out = canal(&["-v", "--capture", "file", path.as_str()]);
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("[CMD] echo hello"), "{}", stderr);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.ends_with("1 passed, 0 failed\n"), "{}", stdout);
}
