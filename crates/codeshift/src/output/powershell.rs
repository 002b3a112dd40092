//! PowerShell writer.
//!
//! Functions become `function Name { param(...) ... }`, calls on bare names
//! use command syntax (`Add-Content -Path $p -Value $v`), and namespaces
//! and classes are flattened into their members.

use super::cstyle::{self, CStyle};
use super::emitter::{Emitter, Render, WriteOptions};
use crate::ast::*;
use crate::intent::{Resynthesizer, powershell::POWERSHELL_RESYNTHESIZER};
use crate::traits::Writer;

/// Static instance of the PowerShell writer for registry.
pub static POWERSHELL_WRITER: PowerShellWriterImpl = PowerShellWriterImpl;

/// PowerShell writer implementing the Writer trait.
pub struct PowerShellWriterImpl;

impl Writer for PowerShellWriterImpl {
    fn language(&self) -> &'static str {
        "powershell"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["ps", "ps1", "pwsh", "posh"]
    }

    fn extension(&self) -> &'static str {
        "ps1"
    }

    fn write_with(&self, root: &Node, options: &WriteOptions) -> String {
        PowerShellWriter::emit_with(root, options)
    }

    fn resynthesizer(&self) -> Option<&dyn Resynthesizer> {
        Some(&POWERSHELL_RESYNTHESIZER)
    }
}

/// Renders a tree as PowerShell source.
pub struct PowerShellWriter {
    out: Emitter,
}

impl PowerShellWriter {
    pub fn new(options: &WriteOptions) -> Self {
        Self {
            out: Emitter::new(options),
        }
    }

    pub fn emit(root: &Node) -> String {
        Self::emit_with(root, &WriteOptions::default())
    }

    pub fn emit_with(root: &Node, options: &WriteOptions) -> String {
        let mut writer = Self::new(options);
        cstyle::statements(&mut writer, root.as_statements());
        writer.out.finish()
    }

    /// Members one per line, with no line break after the last.
    fn flattened(&mut self, members: &[Node]) {
        let mark = self.out.len();
        cstyle::statements(self, members);
        self.out.trim_suffix_after(mark, "\n");
    }

    fn type_literal(&mut self, type_name: &str) {
        self.append("[");
        self.append(type_name);
        self.append("]");
    }

    fn variable(&mut self, name: &str) {
        self.append("$");
        self.append(name);
    }

    fn parameter(&mut self, parameter: &Parameter) {
        if let Some(type_name) = &parameter.type_name {
            self.type_literal(type_name);
        }
        self.variable(&parameter.name);
    }

    /// `Name -Param value positional`.
    fn command(&mut self, name: &str, arguments: &ArgumentList) {
        self.append(name);
        for argument in &arguments.arguments {
            if let Some(name) = &argument.name {
                self.append(" -");
                self.append(name);
            }
            if let Some(value) = &argument.value {
                self.append(" ");
                self.command_argument(value);
            }
        }
    }

    fn command_argument(&mut self, value: &Node) {
        match &value.kind {
            NodeKind::BinaryExpression(_) | NodeKind::Assignment(_) => self.parenthesized(value),
            _ => self.operand(value),
        }
    }

    fn parenthesized(&mut self, node: &Node) {
        self.append("(");
        self.node(node);
        self.append(")");
    }
}

fn is_command(node: &Node) -> bool {
    match &node.kind {
        NodeKind::Invocation(invocation) => {
            matches!(invocation.expression.kind, NodeKind::IdentifierName(_))
        }
        _ => false,
    }
}

fn escape_string(value: &str) -> String {
    value.replace('\'', "''")
}

/// Literal text inside a double-quoted string.
fn escape_expandable(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '`' => escaped.push_str("``"),
            '"' => escaped.push_str("`\""),
            '$' => escaped.push_str("`$"),
            '\n' => escaped.push_str("`n"),
            '\r' => escaped.push_str("`r"),
            '\t' => escaped.push_str("`t"),
            '\0' => escaped.push_str("`0"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Whether `text` would run on into a `$name` placed before it.
fn continues_variable(text: Option<&TemplatePart>) -> bool {
    match text {
        Some(TemplatePart::Text(text)) => text
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '?')),
        _ => false,
    }
}

impl Render for PowerShellWriter {
    fn out(&mut self) -> &mut Emitter {
        &mut self.out
    }
}

impl CStyle for PowerShellWriter {
    fn operators(&self) -> OperatorSpelling {
        OperatorSpelling::powershell()
    }

    fn else_if_keyword(&self) -> &'static str {
        "elseif"
    }

    fn catch_declaration(&mut self, declaration: &CatchDeclaration) {
        self.append(" ");
        self.type_literal(&declaration.type_name);
    }

    // Command calls are statements; inside an expression they need parens.
    fn operand(&mut self, node: &Node) {
        if is_command(node) {
            self.parenthesized(node);
        } else {
            self.node(node);
        }
    }

    fn argument(&mut self, argument: &Argument) {
        match &argument.value {
            Some(value) => self.operand(value),
            None => self.append("$true"),
        }
    }
}

impl Visitor for PowerShellWriter {
    // A bare `{ }` is a script block literal that never runs, so nested
    // blocks are emitted inline.
    fn visit_block(&mut self, node: &Block) {
        self.flattened(&node.statements);
    }

    fn visit_namespace(&mut self, node: &Namespace) {
        self.flattened(&node.members);
    }

    fn visit_class_declaration(&mut self, node: &ClassDeclaration) {
        self.flattened(&node.members);
    }

    fn visit_method_declaration(&mut self, node: &MethodDeclaration) {
        self.append("function ");
        self.append(&node.name);
        self.new_line();
        self.append("{");
        self.indented(|w| {
            w.new_line();
            if !node.parameters.is_empty() {
                w.append("param(");
                w.separated(&node.parameters, ", ", |w, p| w.parameter(p));
                w.append(")");
                w.new_line();
            }
            cstyle::statements(w, &node.body.statements);
        });
        self.append("}");
    }

    fn visit_variable_declaration(&mut self, node: &VariableDeclaration) {
        for (i, declarator) in node.variables.iter().enumerate() {
            if i > 0 {
                self.new_line();
            }
            if let Some(type_name) = &node.type_name {
                self.type_literal(type_name);
            }
            self.variable(&declarator.name);
            self.append(" = ");
            match &declarator.initializer {
                Some(init) => self.node(init),
                None => self.append("$null"),
            }
        }
    }

    fn visit_assignment(&mut self, node: &Assignment) {
        cstyle::assignment(self, node);
    }

    fn visit_binary_expression(&mut self, node: &BinaryExpression) {
        cstyle::binary(self, node);
    }

    fn visit_invocation(&mut self, node: &Invocation) {
        match &node.expression.kind {
            NodeKind::IdentifierName(name) => self.command(&name.name, &node.arguments),
            _ => cstyle::call(self, node),
        }
    }

    fn visit_member_access(&mut self, node: &MemberAccess) {
        if let NodeKind::TypeReference(type_ref) = &node.expression.kind {
            self.type_literal(&type_ref.name);
            self.append("::");
            self.append(&node.member);
        } else {
            cstyle::member_access(self, node);
        }
    }

    fn visit_element_access(&mut self, node: &ElementAccess) {
        cstyle::element_access(self, node);
    }

    fn visit_object_creation(&mut self, node: &ObjectCreation) {
        self.append("(New-Object -TypeName ");
        self.append(&node.type_name);
        if !node.arguments.is_empty() {
            self.append(" -ArgumentList ");
            self.separated(&node.arguments.arguments, ", ", |w, a| w.argument(a));
        }
        self.append(")");
    }

    fn visit_array_creation(&mut self, node: &ArrayCreation) {
        self.append("@(");
        self.separated(&node.elements, ", ", |w, e| w.operand(e));
        self.append(")");
    }

    fn visit_if_statement(&mut self, node: &IfStatement) {
        cstyle::if_statement(self, node);
    }

    fn visit_for_statement(&mut self, node: &ForStatement) {
        cstyle::for_loop(self, node);
    }

    fn visit_for_each_statement(&mut self, node: &ForEachStatement) {
        self.append("foreach (");
        self.variable(&node.variable);
        self.append(" in ");
        self.operand(&node.collection);
        self.append(")");
        cstyle::body(self, &node.body);
    }

    fn visit_while(&mut self, node: &While) {
        cstyle::while_loop(self, node);
    }

    fn visit_try(&mut self, node: &Try) {
        cstyle::try_statement(self, node);
    }

    fn visit_break(&mut self) {
        self.append("break");
    }

    fn visit_continue(&mut self) {
        self.append("continue");
    }

    fn visit_return_statement(&mut self, node: &ReturnStatement) {
        cstyle::keyword_statement(self, "return", node.expression.as_deref());
    }

    fn visit_throw(&mut self, node: &Throw) {
        cstyle::keyword_statement(self, "throw", node.expression.as_deref());
    }

    fn visit_cast(&mut self, node: &Cast) {
        self.type_literal(&node.type_name);
        match &node.expression.kind {
            NodeKind::BinaryExpression(_) => self.parenthesized(&node.expression),
            _ => self.operand(&node.expression),
        }
    }

    fn visit_literal(&mut self, node: &Literal) {
        match node.token.as_str() {
            "true" => self.append("$true"),
            "false" => self.append("$false"),
            "null" => self.append("$null"),
            token => self.append(token),
        }
    }

    fn visit_string_constant(&mut self, node: &StringConstant) {
        self.append("'");
        self.append(&escape_string(&node.value));
        self.append("'");
    }

    fn visit_template_string_constant(&mut self, node: &TemplateStringConstant) {
        self.append("\"");
        for (i, part) in node.parts.iter().enumerate() {
            match part {
                TemplatePart::Text(text) => self.append(&escape_expandable(text)),
                TemplatePart::Hole {
                    expression,
                    format: Some(format),
                } => {
                    self.append("$(\"{0");
                    self.append(&escape_expandable(format));
                    self.append("}\" -f ");
                    self.operand(expression);
                    self.append(")");
                }
                TemplatePart::Hole { expression, .. } => match &expression.kind {
                    NodeKind::IdentifierName(id) if continues_variable(node.parts.get(i + 1)) => {
                        self.append("${");
                        self.append(&id.name);
                        self.append("}");
                    }
                    NodeKind::IdentifierName(id) => self.variable(&id.name),
                    _ => {
                        self.append("$(");
                        self.node(expression);
                        self.append(")");
                    }
                },
            }
        }
        self.append("\"");
    }

    fn visit_identifier_name(&mut self, node: &IdentifierName) {
        self.variable(&node.name);
    }

    fn visit_type_reference(&mut self, node: &TypeReference) {
        self.type_literal(&node.name);
    }

    fn visit_parenthesized_expression(&mut self, node: &ParenthesizedExpression) {
        cstyle::parenthesized(self, node);
    }

    fn visit_prefix_unary_expression(&mut self, node: &UnaryExpression) {
        match node.operator.as_str() {
            "!" => self.append("-not "),
            op => self.append(op),
        }
        self.operand(&node.operand);
    }

    fn visit_postfix_unary_expression(&mut self, node: &UnaryExpression) {
        cstyle::postfix(self, node);
    }

    // One clause per label; clauses sharing a section repeat its body.
    fn visit_switch_statement(&mut self, node: &SwitchStatement) {
        self.append("switch (");
        self.node(&node.expression);
        self.append(")");
        self.new_line();
        self.append("{");
        self.indented(|w| {
            w.new_line();
            for section in &node.sections {
                for label in &section.labels {
                    match label {
                        SwitchLabel::Case(value) => w.operand(value),
                        SwitchLabel::Default => w.append("default"),
                    }
                    w.new_line();
                    cstyle::braced(w, &section.statements);
                    w.new_line();
                }
            }
        });
        self.append("}");
    }

    // No scoped disposal in scripts: the resource statement runs first,
    // then the body.
    fn visit_using(&mut self, node: &Using) {
        let mark = self.out.len();
        self.node(&node.resource);
        self.new_line();
        cstyle::statements(self, node.body.as_statements());
        self.out.trim_suffix_after(mark, "\n");
    }

    fn visit_unknown(&mut self, node: &Unknown) {
        self.append("<# ");
        self.append(&node.message.replace("#>", "# >"));
        self.append(" #>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn method(name: &str, parameters: Vec<Parameter>, body: Vec<Node>) -> Node {
        Node::method(MethodDeclaration::new(name, parameters, Block::new(body)))
    }

    #[test]
    fn test_function_with_params() {
        let tree = Node::block(vec![method(
            "Method",
            vec![
                Parameter::new(Some("string"), "name"),
                Parameter::new(Some("bool"), "yes"),
            ],
            vec![],
        )]);
        assert_eq!(
            PowerShellWriter::emit(&tree),
            "function Method\n{\n    param([string]$name, [bool]$yes)\n}\n"
        );
    }

    #[test]
    fn test_function_without_params() {
        let tree = method("Method", vec![], vec![]);
        assert_eq!(PowerShellWriter::emit(&tree), "function Method\n{\n}\n");
    }

    #[test]
    fn test_nested_block_runs_inline() {
        let tree = method(
            "M",
            vec![],
            vec![
                Node::block(vec![
                    Node::var_decl(None, "a", Some(Node::literal("1"))),
                    Node::var_decl(None, "b", Some(Node::literal("2"))),
                ]),
                Node::block(vec![]),
            ],
        );
        assert_eq!(
            PowerShellWriter::emit(&tree),
            "function M\n{\n    $a = 1\n    $b = 2\n}\n"
        );
    }

    #[test]
    fn test_namespace_and_class_flatten() {
        let tree = Node::block(vec![Node::namespace(
            "My.Namespace",
            vec![Node::class(
                "Test",
                vec![method("A", vec![], vec![]), method("B", vec![], vec![])],
            )],
        )]);
        assert_eq!(
            PowerShellWriter::emit(&tree),
            "function A\n{\n}\nfunction B\n{\n}\n"
        );
    }

    #[test]
    fn test_empty_namespace_renders_nothing() {
        let tree = Node::block(vec![Node::namespace("Empty", vec![])]);
        assert_eq!(PowerShellWriter::emit(&tree), "");
    }

    #[test]
    fn test_object_creation() {
        let tree = Node::object_creation(
            "MyType",
            vec![
                Argument::positional(Node::ident("a")),
                Argument::positional(Node::ident("b")),
            ],
        );
        assert_eq!(
            PowerShellWriter::emit(&tree),
            "(New-Object -TypeName MyType -ArgumentList $a, $b)\n"
        );

        let bare = Node::object_creation("MyType", vec![]);
        assert_eq!(PowerShellWriter::emit(&bare), "(New-Object -TypeName MyType)\n");
    }

    #[test]
    fn test_command_syntax() {
        let tree = Node::invocation(
            Node::ident("Add-Content"),
            vec![
                Argument::named("Path", Node::string("log.txt")),
                Argument::named("Value", Node::ident("line")),
                Argument::switch("Force"),
            ],
        );
        assert_eq!(
            PowerShellWriter::emit(&tree),
            "Add-Content -Path 'log.txt' -Value $line -Force\n"
        );
    }

    #[test]
    fn test_method_call_and_static_member() {
        let tree = Node::invocation(
            Node::member(Node::type_ref("Console"), "WriteLine"),
            vec![Argument::positional(Node::string("it's"))],
        );
        assert_eq!(
            PowerShellWriter::emit(&tree),
            "[Console]::WriteLine('it''s')\n"
        );
    }

    #[test]
    fn test_command_as_operand_is_parenthesized() {
        let tree = Node::member(Node::invocation(Node::ident("Get-Date"), vec![]), "Year");
        assert_eq!(PowerShellWriter::emit(&tree), "(Get-Date).Year\n");
    }

    #[test]
    fn test_declarations_and_literals() {
        let tree = Node::block(vec![
            Node::var_decl(Some("int"), "count", Some(Node::literal("1"))),
            Node::var_decl(None, "flag", Some(Node::literal("true"))),
            Node::var_decl(None, "empty", None),
        ]);
        assert_eq!(
            PowerShellWriter::emit(&tree),
            "[int]$count = 1\n$flag = $true\n$empty = $null\n"
        );
    }

    #[test]
    fn test_try_catch_finally() {
        let tree = Node::new(NodeKind::Try(Try {
            block: Block::new(vec![Node::invocation(Node::ident("Do-Work"), vec![])]),
            catches: vec![Catch {
                declaration: Some(CatchDeclaration {
                    type_name: "System.IO.IOException".into(),
                    identifier: Some("e".into()),
                }),
                block: Block::empty(),
            }],
            finally: Some(Finally {
                block: Block::empty(),
            }),
        }));
        assert_eq!(
            PowerShellWriter::emit(&tree),
            "try\n{\n    Do-Work\n}\ncatch [System.IO.IOException]\n{\n}\nfinally\n{\n}\n"
        );
    }

    #[test]
    fn test_switch_clauses() {
        let tree = Node::new(NodeKind::SwitchStatement(SwitchStatement {
            expression: Box::new(Node::ident("x")),
            sections: vec![
                SwitchSection {
                    labels: vec![SwitchLabel::Case(Node::literal("1"))],
                    statements: vec![Node::new(NodeKind::Break)],
                },
                SwitchSection {
                    labels: vec![SwitchLabel::Default],
                    statements: vec![],
                },
            ],
        }));
        assert_eq!(
            PowerShellWriter::emit(&tree),
            "switch ($x)\n{\n    1\n    {\n        break\n    }\n    default\n    {\n    }\n}\n"
        );
    }

    #[test]
    fn test_template_holes() {
        let tree = Node::block(vec![Node::template(vec![
            TemplatePart::Text("cost: $".into()),
            TemplatePart::Hole {
                expression: Node::ident("price"),
                format: None,
            },
            TemplatePart::Text(" for ".into()),
            TemplatePart::Hole {
                expression: Node::ident("name"),
                format: None,
            },
            TemplatePart::Text(": \"".into()),
            TemplatePart::Hole {
                expression: Node::member(Node::ident("a"), "Length"),
                format: None,
            },
            TemplatePart::Hole {
                expression: Node::ident("total"),
                format: Some(":N2".into()),
            },
        ])]);
        assert_eq!(
            PowerShellWriter::emit(&tree),
            "\"cost: `$$price for ${name}: `\"$($a.Length)$(\"{0:N2}\" -f $total)\"\n"
        );
    }

    #[test]
    fn test_not_and_unknown() {
        let tree = Node::block(vec![
            Node::new(NodeKind::PrefixUnaryExpression(UnaryExpression {
                operator: "!".into(),
                operand: Box::new(Node::ident("ok")),
            })),
            Node::unknown("goto label #>"),
        ]);
        assert_eq!(
            PowerShellWriter::emit(&tree),
            "-not $ok\n<# goto label # > #>\n"
        );
    }
}
