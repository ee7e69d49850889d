//! Cleanup passes applied to a document body.
//!
//! Each pass is a function `&str -> String` applied in sequence.

use std::sync::LazyLock;

use regex::Regex;

use texprose_shared::{Result, TexProseError};

/// A compiled `\begin{name}` ... `\end{name}` matcher.
#[derive(Debug, Clone)]
pub(crate) struct EnvironmentPattern {
    name: String,
    re: Regex,
}

impl EnvironmentPattern {
    pub(crate) fn new(name: &str) -> Result<Self> {
        if name.trim().is_empty() {
            return Err(TexProseError::config("environment name must not be empty"));
        }

        let escaped = regex::escape(name);
        let re = Regex::new(&format!(r"(?s)\\begin\{{{escaped}\}}.*?\\end\{{{escaped}\}}"))
            .map_err(|e| TexProseError::config(format!("invalid environment '{name}': {e}")))?;

        Ok(Self {
            name: name.to_string(),
            re,
        })
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }
}

/// Run every pass over the raw body text.
pub(crate) fn run_pipeline(
    body: &str,
    environments: &[EnvironmentPattern],
    skip_line_prefixes: &[String],
) -> String {
    let mut result = strip_environments(body, environments);
    result = strip_display_math(&result);
    result = filter_lines(&result, skip_line_prefixes);
    result.trim_matches(is_blank).to_string()
}

// ---------------------------------------------------------------------------
// Pass 1: Non-prose environments
// ---------------------------------------------------------------------------

/// Remove each listed environment, one pattern at a time, in list order.
fn strip_environments(body: &str, environments: &[EnvironmentPattern]) -> String {
    let mut result = body.to_string();
    for env in environments {
        result = env.re.replace_all(&result, "").into_owned();
    }
    result
}

// ---------------------------------------------------------------------------
// Pass 2: Display math
// ---------------------------------------------------------------------------

/// Remove `\[ .. \]` spans, then `$$ .. $$` spans.
fn strip_display_math(body: &str) -> String {
    static BRACKET_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)\\\[.*?\\\]").expect("valid regex"));
    static DOLLAR_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?s)\$\$.*?\$\$").expect("valid regex"));

    let without_brackets = BRACKET_RE.replace_all(body, "");
    DOLLAR_RE.replace_all(&without_brackets, "").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 3: Line filter
// ---------------------------------------------------------------------------

/// Drop blank lines and lines whose trimmed form starts with a skip prefix.
///
/// Surviving lines are kept verbatim, including their indentation, and
/// rejoined with `\n`.
fn filter_lines(body: &str, skip_line_prefixes: &[String]) -> String {
    body.split(is_line_break)
        .filter(|line| {
            let trimmed = line.trim_matches(is_blank);
            !trimmed.is_empty()
                && !skip_line_prefixes
                    .iter()
                    .any(|prefix| trimmed.starts_with(prefix.as_str()))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Line boundaries: `\n`, `\r`, vertical tab, form feed, the ASCII
/// file/group/record separators, NEL, and the Unicode line and paragraph
/// separators.
///
/// A `\r\n` pair splits into a line and an empty piece, which the blank
/// filter drops.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n'
            | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Whitespace for trimming. The ASCII separators `\x1c`..=`\x1f` count.
fn is_blank(c: char) -> bool {
    c.is_whitespace() || matches!(c, '\x1c'..='\x1f')
}
