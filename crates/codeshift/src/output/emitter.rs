//! Indentation-aware text buffer shared by all writers.

use crate::ast::{Node, Visitor};
use serde::{Deserialize, Serialize};

/// Layout options for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteOptions {
    /// Spaces per indentation level.
    pub indent: usize,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self { indent: 4 }
    }
}

/// Output buffer with lazy indentation.
///
/// Indentation is written when the first text of a line is appended, so a
/// line started before an indentation change picks up the level in effect
/// when it receives content.
#[derive(Debug)]
pub struct Emitter {
    output: String,
    unit: String,
    level: usize,
    at_line_start: bool,
}

impl Emitter {
    pub fn new(options: &WriteOptions) -> Self {
        Self {
            output: String::new(),
            unit: " ".repeat(options.indent),
            level: 0,
            at_line_start: true,
        }
    }

    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.at_line_start {
            for _ in 0..self.level {
                self.output.push_str(&self.unit);
            }
            self.at_line_start = false;
        }
        self.output.push_str(text);
    }

    pub fn new_line(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn outdent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn level(&self) -> usize {
        self.level
    }

    /// Bytes written so far; used as a mark for [`Emitter::trim_suffix_after`].
    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    /// Remove a trailing `suffix`, but only if it was written after `mark`.
    pub fn trim_suffix_after(&mut self, mark: usize, suffix: &str) {
        if self.output.len() >= mark + suffix.len() && self.output.ends_with(suffix) {
            self.output.truncate(self.output.len() - suffix.len());
            self.at_line_start = self.output.is_empty() || self.output.ends_with('\n');
        }
    }

    pub fn finish(self) -> String {
        self.output
    }
}

/// A writer driving an [`Emitter`] through the [`Visitor`] protocol.
pub trait Render: Visitor + Sized {
    fn out(&mut self) -> &mut Emitter;

    fn node(&mut self, node: &Node) {
        node.accept(self);
    }

    fn append(&mut self, text: &str) {
        self.out().append(text);
    }

    fn new_line(&mut self) {
        self.out().new_line();
    }

    /// Run `f` one indentation level deeper; the level is restored when `f`
    /// returns.
    fn indented<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.out().indent();
        let result = f(self);
        self.out().outdent();
        result
    }

    /// Render each item followed by `separator`, then drop the separator
    /// after the last item. Nothing is written for an empty list.
    fn separated<T>(&mut self, items: &[T], separator: &str, mut f: impl FnMut(&mut Self, &T)) {
        let mark = self.out().len();
        for item in items {
            f(self, item);
            self.out().append(separator);
        }
        if !items.is_empty() {
            self.out().trim_suffix_after(mark, separator);
        }
    }
}
