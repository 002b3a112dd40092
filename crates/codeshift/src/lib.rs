//! Source-to-source conversion between C# and PowerShell.
//!
//! `codeshift` parses source text with each language's tree-sitter grammar
//! into a shared, language-neutral syntax tree, optionally rewrites
//! well-known calls into the target language's idiom, and renders the tree
//! as target source.
//!
//! # Architecture
//!
//! ```text
//! Source Languages        Tree                  Target Languages
//! ────────────────    ─────────────────────    ────────────────────
//! C#              ─┐                        ┌─> C#
//!                  ├─> Node ─> intents ─────┤
//! PowerShell      ─┘  (ast)   (intent)      └─> PowerShell
//! ```
//!
//! # Example
//!
//! ```ignore
//! use codeshift::convert;
//!
//! let ps = convert("void Method(string name) { }", "csharp", "powershell")?;
//! // => "function Method\n{\n    param([string]$name)\n}\n"
//!
//! let cs = convert("Add-Content -Path log.txt -Value 'hi'", "ps", "cs")?;
//! // => "File.AppendAllText(\"log.txt\", \"hi\");\n"
//! ```
//!
//! # Intents
//!
//! Calls such as `Add-Content` and `File.AppendAllText` are recognized as
//! the same operation and re-emitted as the target's equivalent rather
//! than translated word for word. See [`intent`].
//!
//! # Note on Translation Fidelity
//!
//! This is surface-level translation: it maps syntax and a small set of
//! known calls, not types or runtime semantics. Constructs with no mapping
//! become [`ast::NodeKind::Unknown`] placeholders in the output.

pub mod ast;
pub mod config;
pub mod convert;
pub mod intent;
pub mod registry;
pub mod traits;

pub mod input;
pub mod output;

// Re-exports: tree types
pub use ast::{BinaryOperator, Node, NodeKind, Span, Visitor};

// Re-exports: Traits
pub use intent::{Intent, IntentRecognizer, Resynthesizer, rewrite_intents};
pub use traits::{Diagnostic, ReadError, Reader, Writer};

// Re-exports: conversion
pub use config::{ConfigError, ConvertConfig};
pub use convert::{ConvertError, Converter, convert};

// Re-exports: Registry
pub use registry::{
    reader_for_extension, reader_for_language, readers, register_reader, register_writer,
    writer_for_language, writers,
};
