//! The `convert(source, from, to)` entry point.

use crate::config::ConvertConfig;
use crate::intent::rewrite_intents;
use crate::registry::{reader_for_language, writer_for_language};
use crate::traits::ReadError;

/// Error converting source text between languages.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("unsupported source language: {0}")]
    UnsupportedSource(String),

    #[error("unsupported target language: {0}")]
    UnsupportedTarget(String),

    #[error(transparent)]
    Read(#[from] ReadError),
}

/// Converts source text using the registered readers and writers.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: ConvertConfig,
}

impl Converter {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Translate `source` written in `from` into `to`.
    ///
    /// Language names are matched case-insensitively against each adapter's
    /// name and aliases. An unknown source language is reported before an
    /// unknown target.
    pub fn convert(&self, source: &str, from: &str, to: &str) -> Result<String, ConvertError> {
        let _span = tracing::debug_span!("convert", from, to).entered();

        let reader =
            reader_for_language(from).ok_or_else(|| ConvertError::UnsupportedSource(from.into()))?;
        let writer =
            writer_for_language(to).ok_or_else(|| ConvertError::UnsupportedTarget(to.into()))?;

        let mut tree = reader.read(source)?;

        if self.config.recognize_intents {
            match (reader.intents(), writer.resynthesizer()) {
                (Some(recognizer), Some(resynthesizer)) => {
                    tree = rewrite_intents(tree, recognizer, resynthesizer);
                }
                _ => tracing::debug!("intent pass skipped, no recognizer or resynthesizer"),
            }
        }

        let output = writer.write_with(&tree, &self.config.write_options());
        tracing::debug!(bytes = output.len(), "converted");
        Ok(output)
    }
}

/// Convert with the default configuration.
pub fn convert(source: &str, from: &str, to: &str) -> Result<String, ConvertError> {
    Converter::default().convert(source, from, to)
}

#[cfg(all(
    test,
    feature = "read-csharp",
    feature = "read-powershell",
    feature = "write-csharp",
    feature = "write-powershell"
))]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_source_reported_first() {
        let err = convert("x", "cobol", "fortran").unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedSource(ref lang) if lang == "cobol"));
        assert_eq!(err.to_string(), "unsupported source language: cobol");
    }

    #[test]
    fn test_unsupported_target() {
        let err = convert("$x = 1", "powershell", "fortran").unwrap_err();
        assert!(matches!(err, ConvertError::UnsupportedTarget(ref lang) if lang == "fortran"));
    }

    #[test]
    fn test_read_error_propagates() {
        let err = convert("void M( {", "csharp", "powershell").unwrap_err();
        assert!(matches!(err, ConvertError::Read(ReadError::Parse { .. })));
        assert!(err.to_string().starts_with("parse error: "));
    }

    #[test]
    fn test_aliases_accepted() {
        let out = convert("$x = 1", "PS1", "cs").unwrap();
        assert_eq!(out, "x = 1;\n");
    }

    #[test]
    fn test_intent_pass_can_be_disabled() {
        let source = "Add-Content -Path log.txt -Value hi";
        let literal = Converter::new(ConvertConfig {
            recognize_intents: false,
            ..ConvertConfig::default()
        })
        .convert(source, "powershell", "csharp")
        .unwrap();
        assert!(literal.contains("Add-Content"));

        let rewritten = convert(source, "powershell", "csharp").unwrap();
        assert!(rewritten.contains("File.AppendAllText(\"log.txt\", \"hi\")"));
    }

    #[test]
    fn test_indent_from_config() {
        let converter = Converter::new(ConvertConfig {
            indent: 2,
            ..ConvertConfig::default()
        });
        let out = converter
            .convert("while ($a) { $b = 1 }", "powershell", "csharp")
            .unwrap();
        assert_eq!(out, "while (a)\n{\n  b = 1;\n}\n");
    }
}
