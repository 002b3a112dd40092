//! PowerShell cmdlet intents.

use super::*;
use crate::ast::{Argument, NodeKind};

/// Recognizer for calls to well-known cmdlets.
pub static COMMAND_INTENTS: CommandIntents = CommandIntents;

/// Resynthesis rules for PowerShell targets.
pub static POWERSHELL_RESYNTHESIZER: PowerShellResynthesizer = PowerShellResynthesizer;

/// Recognized cmdlets and the parameters an intent can carry over. Any
/// other parameter makes the call a literal translation.
const COMMANDS: &[(&str, Parameters)] = &[
    ("Add-Content", Parameters::positional(&["Path", "Value"])),
    ("Set-Content", Parameters::positional(&["Path", "Value"])),
    (
        "Out-File",
        Parameters {
            positional: &["FilePath"],
            named: &["Path", "InputObject"],
            switches: &["Append"],
        },
    ),
    ("Start-Process", Parameters::positional(&["FilePath", "ArgumentList"])),
    (
        "Get-Process",
        Parameters {
            positional: &["Name"],
            named: &["Id"],
            switches: &[],
        },
    ),
    ("Get-Service", Parameters::positional(&["Name"])),
    ("Write-Host", Parameters::positional(&["Object"])),
];

/// Maps cmdlet invocations (`Name -Param value`) to intents. Command names
/// match case-insensitively.
pub struct CommandIntents;

impl IntentRecognizer for CommandIntents {
    fn determine_intent<'a>(&self, node: &'a Node) -> Option<Intent<'a>> {
        let NodeKind::Invocation(invocation) = &node.kind else {
            return None;
        };
        let NodeKind::IdentifierName(callee) = &invocation.expression.kind else {
            return None;
        };
        let (command, parameters) = COMMANDS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&callee.name))?;
        let args = BoundArguments::bind(&invocation.arguments, parameters)?;

        let intent = match *command {
            "Add-Content" | "Set-Content" => Intent::WriteFile(WriteFileIntent {
                node,
                file_path: args.value("Path")?,
                content: args.value("Value")?,
                append: *command == "Add-Content",
            }),
            "Out-File" => Intent::WriteFile(WriteFileIntent {
                node,
                file_path: args.value("FilePath").or_else(|| args.value("Path"))?,
                content: args.value("InputObject")?,
                append: args.switch("Append"),
            }),
            "Start-Process" => Intent::StartProcess(StartProcessIntent {
                node,
                file_path: args.value("FilePath")?,
                arguments: args.value("ArgumentList"),
            }),
            "Get-Process" => Intent::GetProcess(GetProcessIntent {
                node,
                name: args.value("Name"),
                id: args.value("Id"),
            }),
            "Get-Service" => Intent::GetService(GetServiceIntent {
                node,
                name: args.value("Name"),
            }),
            "Write-Host" => Intent::WriteHost(WriteHostIntent {
                node,
                object: args.value("Object")?,
            }),
            _ => return None,
        };
        tracing::trace!(command, intent = intent.name(), "recognized cmdlet");
        Some(intent)
    }
}

/// Builds cmdlet invocations with named parameters.
pub struct PowerShellResynthesizer;

fn command(name: &str, arguments: Vec<Argument>) -> Node {
    Node::invocation(Node::ident(name), arguments)
}

fn named(name: &str, value: Option<&Node>) -> Option<Argument> {
    value.map(|v| Argument::named(name, v.clone()))
}

impl Resynthesizer for PowerShellResynthesizer {
    fn write_file(&self, intent: &WriteFileIntent<'_>) -> Option<Node> {
        let name = if intent.append {
            "Add-Content"
        } else {
            "Set-Content"
        };
        Some(command(
            name,
            vec![
                Argument::named("Path", intent.file_path.clone()),
                Argument::named("Value", intent.content.clone()),
            ],
        ))
    }

    fn start_process(&self, intent: &StartProcessIntent<'_>) -> Option<Node> {
        let mut arguments = vec![Argument::named("FilePath", intent.file_path.clone())];
        arguments.extend(named("ArgumentList", intent.arguments));
        Some(command("Start-Process", arguments))
    }

    fn get_process(&self, intent: &GetProcessIntent<'_>) -> Option<Node> {
        let arguments = [named("Name", intent.name), named("Id", intent.id)]
            .into_iter()
            .flatten()
            .collect();
        Some(command("Get-Process", arguments))
    }

    fn get_service(&self, intent: &GetServiceIntent<'_>) -> Option<Node> {
        let arguments = named("Name", intent.name).into_iter().collect();
        Some(command("Get-Service", arguments))
    }

    fn write_host(&self, intent: &WriteHostIntent<'_>) -> Option<Node> {
        Some(command(
            "Write-Host",
            vec![Argument::named("Object", intent.object.clone())],
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(name: &str, arguments: Vec<Argument>) -> Node {
        Node::invocation(Node::ident(name), arguments)
    }

    #[test]
    fn test_add_content() {
        let node = call(
            "Add-Content",
            vec![
                Argument::named("Path", Node::string("log.txt")),
                Argument::named("Value", Node::string("hello")),
            ],
        );
        let Some(Intent::WriteFile(intent)) = COMMAND_INTENTS.determine_intent(&node) else {
            panic!("expected WriteFile");
        };
        assert_eq!(intent.file_path, &Node::string("log.txt"));
        assert_eq!(intent.content, &Node::string("hello"));
        assert!(intent.append);
    }

    #[test]
    fn test_command_name_ignores_case() {
        let node = call("add-CONTENT", vec![
            Argument::named("path", Node::string("a")),
            Argument::named("value", Node::string("b")),
        ]);
        assert!(matches!(
            COMMAND_INTENTS.determine_intent(&node),
            Some(Intent::WriteFile(_))
        ));
    }

    #[test]
    fn test_missing_required_argument() {
        let node = call("Add-Content", vec![Argument::named("Path", Node::string("a"))]);
        assert_eq!(COMMAND_INTENTS.determine_intent(&node), None);
    }

    #[test]
    fn test_positional_arguments_bind() {
        let node = call("Write-Host", vec![Argument::positional(Node::string("hi"))]);
        let Some(Intent::WriteHost(intent)) = COMMAND_INTENTS.determine_intent(&node) else {
            panic!("expected WriteHost");
        };
        assert_eq!(intent.object, &Node::string("hi"));
    }

    #[test]
    fn test_out_file_append_switch() {
        let overwrite = call(
            "Out-File",
            vec![
                Argument::named("FilePath", Node::string("out.txt")),
                Argument::named("InputObject", Node::ident("data")),
            ],
        );
        let Some(Intent::WriteFile(intent)) = COMMAND_INTENTS.determine_intent(&overwrite) else {
            panic!("expected WriteFile");
        };
        assert!(!intent.append);

        let append = call(
            "Out-File",
            vec![
                Argument::named("FilePath", Node::string("out.txt")),
                Argument::named("InputObject", Node::ident("data")),
                Argument::switch("Append"),
            ],
        );
        let Some(Intent::WriteFile(intent)) = COMMAND_INTENTS.determine_intent(&append) else {
            panic!("expected WriteFile");
        };
        assert!(intent.append);
    }

    #[test]
    fn test_start_process_without_arguments() {
        let node = call("Start-Process", vec![Argument::named("FilePath", Node::string("notepad"))]);
        let Some(Intent::StartProcess(intent)) = COMMAND_INTENTS.determine_intent(&node) else {
            panic!("expected StartProcess");
        };
        assert_eq!(intent.arguments, None);
    }

    #[test]
    fn test_unrecognized_calls() {
        assert_eq!(COMMAND_INTENTS.determine_intent(&call("Get-ChildItem", vec![])), None);
        let method = Node::invocation(Node::member(Node::ident("x"), "Add-Content"), vec![]);
        assert_eq!(COMMAND_INTENTS.determine_intent(&method), None);
        assert_eq!(COMMAND_INTENTS.determine_intent(&Node::ident("Write-Host")), None);
    }

    #[test]
    fn test_get_process_filters() {
        let all = call("Get-Process", vec![]);
        assert_eq!(
            COMMAND_INTENTS.determine_intent(&all),
            Some(Intent::GetProcess(GetProcessIntent {
                node: &all,
                name: None,
                id: None,
            }))
        );
    }

    #[test]
    fn test_value_after_append_is_the_file() {
        let node = call(
            "Out-File",
            vec![
                Argument::named("Append", Node::string("log.txt")),
                Argument::named("InputObject", Node::ident("d")),
            ],
        );
        let Some(Intent::WriteFile(intent)) = COMMAND_INTENTS.determine_intent(&node) else {
            panic!("expected WriteFile");
        };
        assert_eq!(intent.file_path, &Node::string("log.txt"));
        assert!(intent.append);
    }

    #[test]
    fn test_unhandled_parameter_is_not_recognized() {
        let remote = call(
            "Get-Process",
            vec![Argument::named("ComputerName", Node::string("srv"))],
        );
        assert_eq!(COMMAND_INTENTS.determine_intent(&remote), None);

        let no_newline = call(
            "Write-Host",
            vec![Argument::positional(Node::string("hi")), Argument::switch("NoNewline")],
        );
        assert_eq!(COMMAND_INTENTS.determine_intent(&no_newline), None);

        let extra = call(
            "Write-Host",
            vec![
                Argument::positional(Node::string("a")),
                Argument::positional(Node::string("b")),
            ],
        );
        assert_eq!(COMMAND_INTENTS.determine_intent(&extra), None);
    }

    #[test]
    fn test_resynthesize_write_file() {
        let (path, content) = (Node::string("a.txt"), Node::ident("text"));
        let node = POWERSHELL_RESYNTHESIZER
            .write_file(&WriteFileIntent {
                node: &path,
                file_path: &path,
                content: &content,
                append: false,
            })
            .unwrap();
        assert_eq!(
            node,
            call(
                "Set-Content",
                vec![
                    Argument::named("Path", Node::string("a.txt")),
                    Argument::named("Value", Node::ident("text")),
                ],
            )
        );
    }

    #[test]
    fn test_resynthesize_get_process_by_id() {
        let id = Node::literal("42");
        let node = POWERSHELL_RESYNTHESIZER
            .get_process(&GetProcessIntent {
                node: &id,
                name: None,
                id: Some(&id),
            })
            .unwrap();
        assert_eq!(
            node,
            call("Get-Process", vec![Argument::named("Id", Node::literal("42"))])
        );
    }
}
