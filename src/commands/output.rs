//! `*` / `+` / `!` — output line matching actions

use similar::{ChangeTag, TextDiff};
use crate::error::CheckError;
use crate::state::{Cursor, Log, LogLevel};

/// Whitespace-insensitive, order-preserving line comparison.
///
/// Tokens are compared pairwise only while both sides still have tokens, so
/// whichever side is shorter only has to be a prefix of the other. An empty
/// pattern (or an empty line) therefore always matches.
pub fn lines_match(line: &str, pattern: &str) -> bool {
    line.split_whitespace()
        .zip(pattern.split_whitespace())
        .all(|(a, b)| a == b)
}

// ──────────────────────────────────────────────────────────
// * — consume lines until one matches
// ──────────────────────────────────────────────────────────

pub fn star(cursor: &mut Cursor<'_>, pattern: &str, log: &mut Log) -> Result<(), CheckError> {
    loop {
        let Some(line) = next_line(cursor) else {
            return Err(CheckError::mismatch(format!(
                "reached end of input, expected '{}'", pattern
            ))
            .with_line(cursor.line()));
        };
        if lines_match(line, pattern) {
            log.logf(LogLevel::Info, &format!("{}: matched '{}'", cursor.line(), pattern));
            return Ok(());
        }
    }
}

// ──────────────────────────────────────────────────────────
// + — the next line must match
// ──────────────────────────────────────────────────────────

pub fn plus(cursor: &mut Cursor<'_>, pattern: &str, log: &mut Log) -> Result<(), CheckError> {
    let Some(line) = next_line(cursor) else {
        return Err(CheckError::mismatch("unexpected end of input"));
    };
    if !lines_match(line, pattern) {
        if log.enabled(LogLevel::Info) {
            log.logf(LogLevel::Info, &format!("diff: {}", word_diff(line, pattern)));
        }
        return Err(CheckError::mismatch(format!(
            "found '{}', expected '{}'", line, pattern
        ))
        .with_line(cursor.line()));
    }
    log.logf(LogLevel::Info, &format!("{}: matched '{}'", cursor.line(), pattern));
    Ok(())
}

// ──────────────────────────────────────────────────────────
// ! — the last consumed line must not match
// ──────────────────────────────────────────────────────────

pub fn bang(cursor: &Cursor<'_>, pattern: &str, log: &mut Log) -> Result<(), CheckError> {
    let line = cursor.last_line();
    if lines_match(line, pattern) {
        return Err(CheckError::mismatch(format!("found unexpected '{}'", line))
            .with_line(cursor.line()));
    }
    log.logf(LogLevel::Info, &format!("{}: not '{}'", cursor.line(), pattern));
    Ok(())
}

// ──────────────────────────────────────────────────────────
// Shared helpers
// ──────────────────────────────────────────────────────────

/// Take the next line, or `None` once only whitespace remains.
fn next_line<'a>(cursor: &mut Cursor<'a>) -> Option<&'a str> {
    if cursor.is_exhausted() {
        return None;
    }
    cursor.next_line()
}

/// Inline word diff of found vs expected: `[-removed-]` / `{+added+}`.
fn word_diff(found: &str, expected: &str) -> String {
    let diff = TextDiff::from_words(found.trim(), expected.trim());
    let mut out = String::new();
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Equal => out.push_str(change.value()),
            ChangeTag::Delete => {
                out.push_str("[-");
                out.push_str(change.value());
                out.push_str("-]");
            }
            ChangeTag::Insert => {
                out.push_str("{+");
                out.push_str(change.value());
                out.push_str("+}");
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> Log {
        Log::default()
    }

    #[test]
    fn test_lines_match_exact() {
        assert!(lines_match("a b c", "a b c"));
        assert!(lines_match("  a   b\tc  ", "a b c"));
    }

    #[test]
    fn test_lines_match_mismatch() {
        assert!(!lines_match("a c", "a b"));
        assert!(!lines_match("hello", "world"));
    }

    // Known quirk: the shorter token sequence only needs to be a prefix of
    // the longer one, in either direction.
    #[test]
    fn test_lines_match_prefix_quirk() {
        assert!(lines_match("a b c", "a b"));
        assert!(lines_match("a b", "a b c"));
        assert!(lines_match("anything at all", ""));
        assert!(lines_match("", "anything at all"));
    }

    #[test]
    fn test_star_finds_target() {
        let mut cursor = Cursor::new("x\ny\ntarget\nafter\n");
        star(&mut cursor, "target", &mut quiet()).unwrap();
        assert_eq!(cursor.line(), 3);
        assert_eq!(cursor.last_line(), "target");
    }

    #[test]
    fn test_star_reaches_end() {
        let mut cursor = Cursor::new("x\ny\n");
        let err = star(&mut cursor, "target", &mut quiet()).unwrap_err();
        assert!(err.is_match());
        assert_eq!(err.line, Some(2));
        assert_eq!(err.to_string(), "2: reached end of input, expected 'target'");
    }

    #[test]
    fn test_star_on_trailing_blank_output() {
        let mut cursor = Cursor::new("x\n\n\n");
        star(&mut cursor, "x", &mut quiet()).unwrap();
        let err = star(&mut cursor, "y", &mut quiet()).unwrap_err();
        assert!(err.message.contains("reached end of input"));
    }

    #[test]
    fn test_plus_matches_next_line() {
        let mut cursor = Cursor::new("foo\nbar\n");
        plus(&mut cursor, "foo", &mut quiet()).unwrap();
        plus(&mut cursor, "bar", &mut quiet()).unwrap();
        assert_eq!(cursor.line(), 2);
    }

    #[test]
    fn test_plus_mismatch_names_both() {
        let mut cursor = Cursor::new("foo\n");
        let err = plus(&mut cursor, "bar", &mut quiet()).unwrap_err();
        assert_eq!(err.to_string(), "1: found 'foo', expected 'bar'");
    }

    #[test]
    fn test_plus_end_of_input() {
        let mut cursor = Cursor::new("only\n");
        plus(&mut cursor, "only", &mut quiet()).unwrap();
        let err = plus(&mut cursor, "more", &mut quiet()).unwrap_err();
        assert_eq!(err.to_string(), "unexpected end of input");
        assert_eq!(err.line, None);
    }

    #[test]
    fn test_plus_mismatch_logs_diff() {
        let mut log = Log::new(LogLevel::Info);
        let mut cursor = Cursor::new("hello old world\n");
        plus(&mut cursor, "hello new world", &mut log).unwrap_err();
        let text = log.into_string();
        assert!(text.contains("[-old-]"), "log: {}", text);
        assert!(text.contains("{+new+}"), "log: {}", text);
    }

    #[test]
    fn test_bang_does_not_advance() {
        let mut cursor = Cursor::new("ok\nnext\n");
        plus(&mut cursor, "ok", &mut quiet()).unwrap();
        bang(&cursor, "error", &mut quiet()).unwrap();
        assert_eq!(cursor.line(), 1);
        assert_eq!(cursor.last_line(), "ok");
        plus(&mut cursor, "next", &mut quiet()).unwrap();
    }

    #[test]
    fn test_bang_fails_on_last_line() {
        let mut cursor = Cursor::new("ok\n");
        plus(&mut cursor, "ok", &mut quiet()).unwrap();
        let err = bang(&cursor, "ok", &mut quiet()).unwrap_err();
        assert_eq!(err.to_string(), "1: found unexpected 'ok'");
    }

    // Known quirk: before any line is consumed the last line is empty, and an
    // empty line matches every pattern.
    #[test]
    fn test_bang_before_any_line_fails() {
        let cursor = Cursor::new("ok\n");
        let err = bang(&cursor, "anything", &mut quiet()).unwrap_err();
        assert_eq!(err.to_string(), "0: found unexpected ''");
    }

    #[test]
    fn test_word_diff() {
        assert_eq!(word_diff("a b", "a c"), "a [-b-]{+c+}");
    }
}
