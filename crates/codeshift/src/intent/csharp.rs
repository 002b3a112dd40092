//! .NET static call intents.

use super::*;
use crate::ast::{Argument, NodeKind};

/// Recognizer for well-known static framework calls.
pub static STATIC_CALL_INTENTS: StaticCallIntents = StaticCallIntents;

/// Resynthesis rules for C# targets.
pub static CSHARP_RESYNTHESIZER: CSharpResynthesizer = CSharpResynthesizer;

/// Recognized `Type.Method` overloads and their parameter names in
/// position order. Other overloads are translated literally.
const CALLS: &[(&str, &str, Parameters)] = &[
    ("File", "WriteAllText", Parameters::positional(&["path", "contents"])),
    ("File", "AppendAllText", Parameters::positional(&["path", "contents"])),
    ("Process", "Start", Parameters::positional(&["fileName", "arguments"])),
    ("Process", "GetProcesses", Parameters::positional(&[])),
    ("Process", "GetProcessesByName", Parameters::positional(&["processName"])),
    ("Process", "GetProcessById", Parameters::positional(&["processId"])),
    ("ServiceController", "GetServices", Parameters::positional(&[])),
    ("Console", "WriteLine", Parameters::positional(&["value"])),
];

/// Last segment of a dotted type expression (`System.IO.File` -> `File`).
fn type_segment(node: &Node) -> Option<&str> {
    match &node.kind {
        NodeKind::IdentifierName(id) => Some(id.name.as_str()),
        NodeKind::TypeReference(ty) => ty.name.rsplit('.').next(),
        NodeKind::MemberAccess(member) => Some(member.member.as_str()),
        _ => None,
    }
}

/// Maps `Type.Method(...)` calls to intents. Type and method names are
/// case-sensitive; namespace qualification is ignored.
pub struct StaticCallIntents;

impl IntentRecognizer for StaticCallIntents {
    fn determine_intent<'a>(&self, node: &'a Node) -> Option<Intent<'a>> {
        let NodeKind::Invocation(invocation) = &node.kind else {
            return None;
        };
        let NodeKind::MemberAccess(callee) = &invocation.expression.kind else {
            return None;
        };
        let type_name = type_segment(&callee.expression)?;
        let (_, method, parameters) = CALLS
            .iter()
            .find(|(ty, method, _)| *ty == type_name && *method == callee.member)?;
        let args = BoundArguments::bind(&invocation.arguments, parameters)?;

        let intent = match (type_name, *method) {
            ("File", "WriteAllText" | "AppendAllText") => Intent::WriteFile(WriteFileIntent {
                node,
                file_path: args.value("path")?,
                content: args.value("contents")?,
                append: *method == "AppendAllText",
            }),
            ("Process", "Start") => Intent::StartProcess(StartProcessIntent {
                node,
                file_path: args.value("fileName")?,
                arguments: args.value("arguments"),
            }),
            ("Process", "GetProcesses") => Intent::GetProcess(GetProcessIntent {
                node,
                name: None,
                id: None,
            }),
            ("Process", "GetProcessesByName") => Intent::GetProcess(GetProcessIntent {
                node,
                name: Some(args.value("processName")?),
                id: None,
            }),
            ("Process", "GetProcessById") => Intent::GetProcess(GetProcessIntent {
                node,
                name: None,
                id: Some(args.value("processId")?),
            }),
            ("ServiceController", "GetServices") => {
                Intent::GetService(GetServiceIntent { node, name: None })
            }
            ("Console", "WriteLine") => Intent::WriteHost(WriteHostIntent {
                node,
                object: args.value("value")?,
            }),
            _ => return None,
        };
        tracing::trace!(type_name, method, intent = intent.name(), "recognized static call");
        Some(intent)
    }
}

/// Builds static framework calls.
pub struct CSharpResynthesizer;

fn static_call(type_name: &str, method: &str, arguments: Vec<&Node>) -> Node {
    Node::invocation(
        Node::member(Node::type_ref(type_name), method),
        arguments
            .into_iter()
            .map(|a| Argument::positional(a.clone()))
            .collect(),
    )
}

/// Process arguments are a single string in .NET; a list is joined.
fn process_arguments(node: &Node) -> Node {
    match &node.kind {
        NodeKind::ArrayCreation(_) => {
            let separator = Node::string(" ");
            static_call("string", "Join", vec![&separator, node])
        }
        _ => node.clone(),
    }
}

impl Resynthesizer for CSharpResynthesizer {
    fn write_file(&self, intent: &WriteFileIntent<'_>) -> Option<Node> {
        let method = if intent.append {
            "AppendAllText"
        } else {
            "WriteAllText"
        };
        Some(static_call("File", method, vec![intent.file_path, intent.content]))
    }

    fn start_process(&self, intent: &StartProcessIntent<'_>) -> Option<Node> {
        let mut node = static_call("Process", "Start", vec![intent.file_path]);
        if let (Some(arguments), NodeKind::Invocation(call)) = (intent.arguments, &mut node.kind) {
            call.arguments
                .arguments
                .push(Argument::positional(process_arguments(arguments)));
        }
        Some(node)
    }

    fn get_process(&self, intent: &GetProcessIntent<'_>) -> Option<Node> {
        let node = match (intent.id, intent.name) {
            (Some(id), _) => static_call("Process", "GetProcessById", vec![id]),
            (None, Some(name)) => static_call("Process", "GetProcessesByName", vec![name]),
            (None, None) => static_call("Process", "GetProcesses", vec![]),
        };
        Some(node)
    }

    fn get_service(&self, intent: &GetServiceIntent<'_>) -> Option<Node> {
        let node = match intent.name {
            Some(name) => Node::object_creation(
                "ServiceController",
                vec![Argument::positional(name.clone())],
            ),
            None => static_call("ServiceController", "GetServices", vec![]),
        };
        Some(node)
    }

    fn write_host(&self, intent: &WriteHostIntent<'_>) -> Option<Node> {
        Some(static_call("Console", "WriteLine", vec![intent.object]))
    }
}
