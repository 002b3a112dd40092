//! Traits for language readers and writers.

use crate::ast::Node;
use crate::intent::{IntentRecognizer, Resynthesizer};
use crate::output::WriteOptions;
use std::fmt;

/// A syntax error reported by the native parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 1-based line.
    pub line: usize,
    /// 1-based column, in bytes.
    pub column: usize,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

fn join_diagnostics(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(Diagnostic::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Error that can occur when reading source code into the tree.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("parse error: {}", join_diagnostics(.diagnostics))]
    Parse { diagnostics: Vec<Diagnostic> },

    #[error("failed to load grammar: {0}")]
    Language(String),
}

/// A reader parses source code into the language-neutral tree.
pub trait Reader: Send + Sync {
    /// Canonical language identifier (e.g., "csharp", "powershell").
    fn language(&self) -> &'static str;

    /// Alternate names accepted by registry lookups (e.g., "cs", "ps1").
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// File extensions this reader handles (e.g., &["ps1", "psm1"]).
    fn extensions(&self) -> &'static [&'static str];

    /// Parse source code into a tree rooted at a `Block`.
    fn read(&self, source: &str) -> Result<Node, ReadError>;

    /// Recognizer for this language's intent-bearing calls, if any.
    fn intents(&self) -> Option<&dyn IntentRecognizer> {
        None
    }
}

/// A writer renders the tree as source code in a target language.
pub trait Writer: Send + Sync {
    /// Canonical language identifier (e.g., "csharp", "powershell").
    fn language(&self) -> &'static str;

    /// Alternate names accepted by registry lookups.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// File extension for output (e.g., "ps1").
    fn extension(&self) -> &'static str;

    /// Render the tree with explicit layout options.
    fn write_with(&self, root: &Node, options: &WriteOptions) -> String;

    /// Render the tree with default layout.
    fn write(&self, root: &Node) -> String {
        self.write_with(root, &WriteOptions::default())
    }

    /// Resynthesis rules used when converting recognized intents into this
    /// language, if any.
    fn resynthesizer(&self) -> Option<&dyn Resynthesizer> {
        None
    }
}

/// Case-insensitive match against a language name and its aliases.
pub(crate) fn names_match(language: &str, aliases: &[&str], query: &str) -> bool {
    let query = query.trim();
    language.eq_ignore_ascii_case(query) || aliases.iter().any(|a| a.eq_ignore_ascii_case(query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_lists_positions() {
        let err = ReadError::Parse {
            diagnostics: vec![
                Diagnostic {
                    line: 1,
                    column: 5,
                    message: "missing ')'".into(),
                },
                Diagnostic {
                    line: 3,
                    column: 1,
                    message: "unexpected '}'".into(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "parse error: 1:5: missing ')'; 3:1: unexpected '}'"
        );
    }

    #[test]
    fn test_names_match() {
        assert!(names_match("powershell", &["ps1", "pwsh"], "PowerShell"));
        assert!(names_match("powershell", &["ps1", "pwsh"], "PS1"));
        assert!(!names_match("powershell", &["ps1"], "csharp"));
    }
}
