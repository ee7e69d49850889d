//! LaTeX-to-prose extraction.
//!
//! Locates the `\begin{document}` ... `\end{document}` body of a source file,
//! then applies a series of cleanup passes that drop non-prose environments,
//! display math, comments, and include directives.
//!
//! Region removal is pattern-based and does not nest: the first matching end
//! marker closes a region.

mod cleanup;

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use texprose_shared::{ExtractConfig, Result, TexProseError};

use cleanup::EnvironmentPattern;

// ---------------------------------------------------------------------------
// Extractor
// ---------------------------------------------------------------------------

/// Compiled extraction rules.
///
/// Build once per run with [`Extractor::new`] and reuse for every document.
#[derive(Debug, Clone)]
pub struct Extractor {
    environments: Vec<EnvironmentPattern>,
    skip_line_prefixes: Vec<String>,
}

impl Extractor {
    /// Compile the environment patterns named in `config`.
    pub fn new(config: &ExtractConfig) -> Result<Self> {
        let environments = config
            .environments
            .iter()
            .map(|name| EnvironmentPattern::new(name))
            .collect::<Result<Vec<_>>>()?;

        if let Some(empty) = config.skip_line_prefixes.iter().position(|p| p.is_empty()) {
            return Err(TexProseError::config(format!(
                "skip_line_prefixes[{empty}] is empty and would drop every line"
            )));
        }

        Ok(Self {
            environments,
            skip_line_prefixes: config.skip_line_prefixes.clone(),
        })
    }

    /// Names of the environments this extractor removes, in application order.
    pub fn environments(&self) -> impl Iterator<Item = &str> {
        self.environments.iter().map(EnvironmentPattern::name)
    }

    /// Extract the cleaned prose body of one document.
    ///
    /// Returns `None` when the text has no `\begin{document}` ...
    /// `\end{document}` region. The result may be empty when the body holds
    /// nothing but removed markup.
    pub fn extract(&self, text: &str) -> Option<String> {
        let body = document_body(text)?;
        let cleaned = cleanup::run_pipeline(body, &self.environments, &self.skip_line_prefixes);

        debug!(
            input_len = text.len(),
            body_len = body.len(),
            output_len = cleaned.len(),
            "extracted document body"
        );

        Some(cleaned)
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&ExtractConfig::default()).expect("default extraction rules compile")
    }
}

/// Extract a document body using the default rules.
///
/// See [`Extractor::extract`].
pub fn extract_body(text: &str) -> Option<String> {
    static DEFAULT: LazyLock<Extractor> = LazyLock::new(Extractor::default);
    DEFAULT.extract(text)
}

/// Slice out the first `\begin{document}` ... `\end{document}` region.
fn document_body(text: &str) -> Option<&str> {
    static BODY_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"(?s)\\begin\{document\}(.*?)\\end\{document\}").expect("valid regex")
    });

    BODY_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(body: &str) -> String {
        format!("\\documentclass{{article}}\n\\begin{{document}}\n{body}\n\\end{{document}}\n")
    }

    // --- Body location ---

    #[test]
    fn table_between_prose_is_removed() {
        let text = r"\begin{document}X\begin{table}T\end{table}Y\end{document}";
        assert_eq!(extract_body(text).as_deref(), Some("XY"));
    }

    #[test]
    fn preamble_and_trailer_are_ignored() {
        let text = "\\usepackage{amsmath}\nPreamble words\n\\begin{document}\nBody words\n\\end{document}\nAfter words";
        assert_eq!(extract_body(text).as_deref(), Some("Body words"));
    }

    #[test]
    fn missing_end_marker_returns_none() {
        assert_eq!(extract_body("\\begin{document}\nNever closed."), None);
    }

    #[test]
    fn missing_begin_marker_returns_none() {
        assert_eq!(extract_body("Just prose.\n\\end{document}"), None);
    }

    #[test]
    fn plain_text_returns_none() {
        assert_eq!(extract_body("no markers at all"), None);
    }

    #[test]
    fn only_first_document_region_is_used() {
        let text = "\\begin{document}first\\end{document}\\begin{document}second\\end{document}";
        assert_eq!(extract_body(text).as_deref(), Some("first"));
    }

    #[test]
    fn extraction_is_idempotent_to_none() {
        let text = wrap("We study prose.\n\n\\begin{figure}\nplot\n\\end{figure}\nMore prose.");
        let once = extract_body(&text).expect("body present");
        assert_eq!(once, "We study prose.\nMore prose.");
        assert_eq!(extract_body(&once), None);
    }

    #[test]
    fn body_of_only_markup_is_empty() {
        let text = wrap("\\begin{equation}\nx = 1\n\\end{equation}\n% note");
        assert_eq!(extract_body(&text).as_deref(), Some(""));
    }

    // --- Environments ---

    #[test]
    fn every_default_environment_is_removed() {
        let mut body = String::from("Intro.\n");
        for env in texprose_shared::DEFAULT_ENVIRONMENTS {
            body.push_str(&format!("\\begin{{{env}}}\ninside {env}\n\\end{{{env}}}\n"));
        }
        body.push_str("Outro.");

        let out = extract_body(&wrap(&body)).expect("body present");
        assert_eq!(out, "Intro.\nOutro.");
        assert!(!out.contains("\\begin{"));
        assert!(!out.contains("\\end{"));
    }

    #[test]
    fn starred_equation_is_matched_literally() {
        let out = extract_body(&wrap("A\n\\begin{equation*}\ny=2\n\\end{equation*}\nB")).unwrap();
        assert_eq!(out, "A\nB");
    }

    #[test]
    fn unlisted_environments_are_kept() {
        let out = extract_body(&wrap("\\begin{itemize}\n\\item one\n\\end{itemize}")).unwrap();
        assert_eq!(out, "\\begin{itemize}\n\\item one\n\\end{itemize}");
    }

    #[test]
    fn nested_regions_close_at_first_end() {
        let text = wrap(
            "Before\n\\begin{figure}\nouter\n\\begin{figure}\ninner\n\\end{figure}\nleft over\n\\end{figure}\nAfter",
        );
        let out = extract_body(&text).unwrap();
        assert_eq!(out, "Before\nleft over\n\\end{figure}\nAfter");
    }

    #[test]
    fn each_region_is_removed_non_greedily() {
        let out = extract_body(&wrap(
            "one\n\\begin{table}a\\end{table}\ntwo\n\\begin{table}b\\end{table}\nthree",
        ))
        .unwrap();
        assert_eq!(out, "one\ntwo\nthree");
    }

    // --- Display math ---

    #[test]
    fn bracket_and_dollar_math_are_removed() {
        let text = wrap("Energy is\n\\[\nE = mc^2\n\\]\nand also\n$$\na^2 + b^2\n$$\nas shown.");
        let out = extract_body(&text).unwrap();
        assert_eq!(out, "Energy is\nand also\nas shown.");
        assert!(!out.contains("\\["));
        assert!(!out.contains("$$"));
    }

    #[test]
    fn inline_math_is_kept() {
        let out = extract_body(&wrap("Let $x$ be given.")).unwrap();
        assert_eq!(out, "Let $x$ be given.");
    }

    // --- Line filtering ---

    #[test]
    fn comment_input_and_blank_lines_are_dropped() {
        let text = wrap("First line.\n% comment\n\n   \n\\input{chapter1}\n\\include{chapter2}\nLast line.");
        assert_eq!(extract_body(&text).as_deref(), Some("First line.\nLast line."));
    }

    #[test]
    fn indented_comment_is_dropped() {
        let out = extract_body(&wrap("Keep.\n    % indented comment\nAlso keep.")).unwrap();
        assert_eq!(out, "Keep.\nAlso keep.");
    }

    #[test]
    fn include_prefix_matches_includegraphics() {
        let out = extract_body(&wrap("Text.\n\\includegraphics{fig.png}")).unwrap();
        assert_eq!(out, "Text.");
    }

    #[test]
    fn trailing_comment_on_prose_line_is_kept() {
        let out = extract_body(&wrap("Prose % with a trailing note")).unwrap();
        assert_eq!(out, "Prose % with a trailing note");
    }

    #[test]
    fn surviving_lines_keep_inner_indentation() {
        let out = extract_body(&wrap("  first\n    second")).unwrap();
        assert_eq!(out, "first\n    second");
    }

    // --- Configured rules ---

    #[test]
    fn custom_environment_list() {
        let config = ExtractConfig {
            environments: vec!["lstlisting".into()],
            skip_line_prefixes: vec!["%".into()],
        };
        let extractor = Extractor::new(&config).unwrap();
        let out = extractor
            .extract(&wrap("Code:\n\\begin{lstlisting}\nfn main() {}\n\\end{lstlisting}\n\\begin{table}kept\\end{table}\n\\input{x}"))
            .unwrap();
        assert_eq!(out, "Code:\n\\begin{table}kept\\end{table}\n\\input{x}");
        assert_eq!(extractor.environments().collect::<Vec<_>>(), vec!["lstlisting"]);
    }

    #[test]
    fn empty_environment_name_is_rejected() {
        let config = ExtractConfig {
            environments: vec!["figure".into(), "  ".into()],
            ..ExtractConfig::default()
        };
        let err = Extractor::new(&config).unwrap_err();
        assert!(err.to_string().contains("environment"));
    }

    #[test]
    fn empty_skip_prefix_is_rejected() {
        let config = ExtractConfig {
            skip_line_prefixes: vec!["%".into(), String::new()],
            ..ExtractConfig::default()
        };
        assert!(Extractor::new(&config).is_err());
    }

    #[test]
    fn comment_after_form_feed_is_dropped() {
        let text = "\\begin{document}\nProse\x0c% hidden comment\n\\end{document}";
        assert_eq!(extract_body(text).as_deref(), Some("Prose"));
    }

    #[test]
    fn input_after_latin1_ellipsis_is_dropped() {
        let text = "\\begin{document}\nKeep\u{85}\\input{ch1}\n\\end{document}";
        assert_eq!(extract_body(text).as_deref(), Some("Keep"));
    }

    #[test]
    fn default_extractor_lists_environments_in_order() {
        let extractor = Extractor::default();
        let names: Vec<&str> = extractor.environments().collect();
        assert_eq!(names, texprose_shared::DEFAULT_ENVIRONMENTS);
    }
}
