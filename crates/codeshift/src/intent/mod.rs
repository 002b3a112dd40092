//! Intent recognition and resynthesis.
//!
//! Some calls mean the same thing in every language but are spelled
//! differently in each: `Add-Content -Path p -Value v` and
//! `File.AppendAllText(p, v)` both append to a file. A source language's
//! [`IntentRecognizer`] maps such calls to an [`Intent`]; a target
//! language's [`Resynthesizer`] turns the intent back into a subtree.
//! [`rewrite_intents`] applies the pair over a whole tree.
//!
//! Intents borrow their argument subtrees from the node they were
//! recognized in, so recognition never copies the tree.

mod arguments;
pub mod csharp;
pub mod powershell;

pub use arguments::{BoundArguments, Parameters};

use crate::ast::Node;

/// A recognized, language-neutral operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent<'a> {
    WriteFile(WriteFileIntent<'a>),
    StartProcess(StartProcessIntent<'a>),
    GetProcess(GetProcessIntent<'a>),
    GetService(GetServiceIntent<'a>),
    WriteHost(WriteHostIntent<'a>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteFileIntent<'a> {
    /// The call this intent was recognized in.
    pub node: &'a Node,
    pub file_path: &'a Node,
    pub content: &'a Node,
    /// Append to the file instead of replacing it.
    pub append: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StartProcessIntent<'a> {
    pub node: &'a Node,
    pub file_path: &'a Node,
    pub arguments: Option<&'a Node>,
}

/// Process query; with neither filter it lists all processes.
#[derive(Debug, Clone, PartialEq)]
pub struct GetProcessIntent<'a> {
    pub node: &'a Node,
    pub name: Option<&'a Node>,
    pub id: Option<&'a Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GetServiceIntent<'a> {
    pub node: &'a Node,
    pub name: Option<&'a Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteHostIntent<'a> {
    pub node: &'a Node,
    pub object: &'a Node,
}

impl<'a> Intent<'a> {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::WriteFile(_) => "WriteFile",
            Intent::StartProcess(_) => "StartProcess",
            Intent::GetProcess(_) => "GetProcess",
            Intent::GetService(_) => "GetService",
            Intent::WriteHost(_) => "WriteHost",
        }
    }

    /// The call this intent was recognized in.
    pub fn node(&self) -> &'a Node {
        match self {
            Intent::WriteFile(i) => i.node,
            Intent::StartProcess(i) => i.node,
            Intent::GetProcess(i) => i.node,
            Intent::GetService(i) => i.node,
            Intent::WriteHost(i) => i.node,
        }
    }

    /// Dispatch to the resynthesizer method for this intent's kind.
    pub fn resynthesize_with(&self, resynthesizer: &dyn Resynthesizer) -> Option<Node> {
        match self {
            Intent::WriteFile(i) => resynthesizer.write_file(i),
            Intent::StartProcess(i) => resynthesizer.start_process(i),
            Intent::GetProcess(i) => resynthesizer.get_process(i),
            Intent::GetService(i) => resynthesizer.get_service(i),
            Intent::WriteHost(i) => resynthesizer.write_host(i),
        }
    }

    /// Resynthesize, or fall back to a copy of the original call.
    pub fn resynthesize(&self, resynthesizer: &dyn Resynthesizer) -> Node {
        self.resynthesize_with(resynthesizer).unwrap_or_else(|| {
            tracing::debug!(intent = self.name(), "no resynthesis, keeping original");
            self.node().clone()
        })
    }
}

/// Recognizes intent-bearing calls of one source language.
pub trait IntentRecognizer: Send + Sync {
    /// The intent `node` expresses, or `None` when it is not a recognized
    /// call, a required argument is missing, or an argument would be lost.
    fn determine_intent<'a>(&self, node: &'a Node) -> Option<Intent<'a>>;
}

/// Rebuilds intents as target-language subtrees.
///
/// Returning `None` keeps the original node.
pub trait Resynthesizer: Send + Sync {
    fn write_file(&self, intent: &WriteFileIntent<'_>) -> Option<Node>;
    fn start_process(&self, intent: &StartProcessIntent<'_>) -> Option<Node>;
    fn get_process(&self, intent: &GetProcessIntent<'_>) -> Option<Node>;
    fn get_service(&self, intent: &GetServiceIntent<'_>) -> Option<Node>;
    fn write_host(&self, intent: &WriteHostIntent<'_>) -> Option<Node>;
}

/// Replace every recognized call in `root` with its resynthesized form.
///
/// The walk is bottom-up: arguments are rewritten before the call that
/// holds them is recognized, so nested calls are converted too. A
/// replacement keeps the span of the node it stands for.
pub fn rewrite_intents(
    root: Node,
    recognizer: &dyn IntentRecognizer,
    resynthesizer: &dyn Resynthesizer,
) -> Node {
    let root = root.map_children(&mut |child| rewrite_intents(child, recognizer, resynthesizer));
    let replacement = recognizer
        .determine_intent(&root)
        .map(|intent| intent.resynthesize(resynthesizer));

    match replacement {
        Some(node) => {
            tracing::trace!(intent = node.kind_name(), "rewrote intent");
            Node {
                span: root.span,
                ..node
            }
        }
        None => root,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Argument, Span};

    struct NeverResynthesize;

    impl Resynthesizer for NeverResynthesize {
        fn write_file(&self, _: &WriteFileIntent<'_>) -> Option<Node> {
            None
        }
        fn start_process(&self, _: &StartProcessIntent<'_>) -> Option<Node> {
            None
        }
        fn get_process(&self, _: &GetProcessIntent<'_>) -> Option<Node> {
            None
        }
        fn get_service(&self, _: &GetServiceIntent<'_>) -> Option<Node> {
            None
        }
        fn write_host(&self, _: &WriteHostIntent<'_>) -> Option<Node> {
            None
        }
    }

    fn add_content() -> Node {
        Node::invocation(
            Node::ident("Add-Content"),
            vec![
                Argument::named("Path", Node::string("log.txt")),
                Argument::named("Value", Node::string("hello")),
            ],
        )
    }

    #[test]
    fn test_rewrite_nested_call() {
        let tree = Node::block(vec![Node::if_stmt(
            Node::ident("verbose"),
            Node::block(vec![add_content()]),
            None,
        )]);
        let rewritten = rewrite_intents(
            tree,
            &powershell::COMMAND_INTENTS,
            &csharp::CSHARP_RESYNTHESIZER,
        );
        let expected = Node::block(vec![Node::if_stmt(
            Node::ident("verbose"),
            Node::block(vec![Node::invocation(
                Node::member(Node::type_ref("File"), "AppendAllText"),
                vec![
                    Argument::positional(Node::string("log.txt")),
                    Argument::positional(Node::string("hello")),
                ],
            )]),
            None,
        )]);
        assert_eq!(rewritten, expected);
    }

    #[test]
    fn test_missing_resynthesis_keeps_original() {
        let tree = Node::block(vec![add_content()]);
        let rewritten = rewrite_intents(tree.clone(), &powershell::COMMAND_INTENTS, &NeverResynthesize);
        assert_eq!(rewritten, tree);
    }

    #[test]
    fn test_replacement_keeps_span() {
        let tree = add_content().with_span(Span::new(0, 42));
        let rewritten = rewrite_intents(
            tree,
            &powershell::COMMAND_INTENTS,
            &csharp::CSHARP_RESYNTHESIZER,
        );
        assert_eq!(rewritten.span, Some(Span::new(0, 42)));
    }

    #[test]
    fn test_nested_intents_are_rewritten() {
        let get_process = Node::invocation(
            Node::ident("Get-Process"),
            vec![Argument::named("Name", Node::string("x"))],
        );
        let tree = Node::block(vec![Node::invocation(
            Node::ident("Write-Host"),
            vec![Argument::positional(get_process)],
        )]);
        let rewritten = rewrite_intents(
            tree,
            &powershell::COMMAND_INTENTS,
            &csharp::CSHARP_RESYNTHESIZER,
        );
        let expected = Node::block(vec![Node::invocation(
            Node::member(Node::type_ref("Console"), "WriteLine"),
            vec![Argument::positional(Node::invocation(
                Node::member(Node::type_ref("Process"), "GetProcessesByName"),
                vec![Argument::positional(Node::string("x"))],
            ))],
        )]);
        assert_eq!(rewritten, expected);
    }

    #[test]
    fn test_fallback_is_the_recognized_call() {
        let call = add_content();
        let intent = powershell::COMMAND_INTENTS
            .determine_intent(&call)
            .expect("recognized");
        assert!(std::ptr::eq(intent.node(), &call));
        assert_eq!(intent.resynthesize(&NeverResynthesize), call);
    }

    #[test]
    fn test_intent_names() {
        let path = Node::string("a");
        let intent = Intent::WriteFile(WriteFileIntent {
            node: &path,
            file_path: &path,
            content: &path,
            append: false,
        });
        assert_eq!(intent.name(), "WriteFile");
    }
}
