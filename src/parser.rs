//! Directive extractor
//!
//! Scans a source file for line comments of the form `// <action> <arguments>`:
//! - `*` skip output lines until one matches
//! - `+` the next output line must match
//! - `!` the last consumed output line must not match
//! - `R` a command to run against the file
//!
//! Lines with any other action token are inert. Arguments are kept as
//! zero-copy slices of the source text.

use std::fmt;

/// Marker that introduces a directive line
pub const DIRECTIVE_PREFIX: &str = "//";

/// What a directive does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// `*` — consume lines until one matches
    Star,
    /// `+` — the next line must match
    Plus,
    /// `!` — the last consumed line must not match
    Bang,
    /// `R` — run a command
    Run,
}

impl Action {
    /// Map an action token to its action. Unknown tokens yield `None`.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "*" => Some(Action::Star),
            "+" => Some(Action::Plus),
            "!" => Some(Action::Bang),
            "R" => Some(Action::Run),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Action::Star => "*",
            Action::Plus => "+",
            Action::Bang => "!",
            Action::Run => "R",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A recognized directive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive<'a> {
    pub action: Action,
    /// Remainder of the line after the action token, unparsed
    pub arguments: &'a str,
}

/// All directives of one source file, split by role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Check<'a> {
    /// `R` directives, in file order
    pub run_directives: Vec<Directive<'a>>,
    /// `*`, `+` and `!` directives, in file order
    pub match_directives: Vec<Directive<'a>>,
}

impl<'a> Check<'a> {
    pub fn is_empty(&self) -> bool {
        self.run_directives.is_empty() && self.match_directives.is_empty()
    }
}

/// Parse a single source line into a directive.
///
/// Returns `None` for lines that are not comments and for comments whose
/// action token is not recognized (including an empty token).
pub fn parse_directive(line: &str) -> Option<Directive<'_>> {
    let body = line.trim_start().strip_prefix(DIRECTIVE_PREFIX)?.trim();

    // The action token runs up to the first whitespace character; that one
    // separator is dropped and everything after it belongs to the arguments.
    let (token, arguments) = match body.char_indices().find(|(_, c)| c.is_whitespace()) {
        Some((i, c)) => (&body[..i], &body[i + c.len_utf8()..]),
        None => (body, ""),
    };

    let action = Action::from_token(token)?;
    Some(Directive { action, arguments })
}

/// Collect every directive in `source`, preserving file order within each list.
pub fn collect_directives(source: &str) -> Check<'_> {
    let mut check = Check::default();
    for line in source.split('\n') {
        let Some(directive) = parse_directive(line) else {
            continue;
        };
        if directive.action == Action::Run {
            check.run_directives.push(directive);
        } else {
            check.match_directives.push(directive);
        }
    }
    check
}
