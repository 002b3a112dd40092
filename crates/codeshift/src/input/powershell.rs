//! Tree-sitter based PowerShell reader.

use super::syntax::{
    CommentSyntax, SourceText, child_of_kind, children_of_kind, empty_program, first_named,
    is_blank, named_children, parse,
};
use crate::ast::*;
use crate::intent::{IntentRecognizer, powershell::COMMAND_INTENTS};
use crate::traits::{ReadError, Reader};
use std::ops::Range;
use tree_sitter::{Node as SyntaxNode, Tree};

const COMMENTS: CommentSyntax = CommentSyntax {
    line: "#",
    block: ("<#", "#>"),
};

/// Static instance of the PowerShell reader for registry.
pub static POWERSHELL_READER: PowerShellReader = PowerShellReader::new();

/// PowerShell reader using tree-sitter.
pub struct PowerShellReader {
    operators: OperatorTable,
}

impl PowerShellReader {
    pub const fn new() -> Self {
        Self {
            operators: OperatorTable::powershell(),
        }
    }
}

impl Default for PowerShellReader {
    fn default() -> Self {
        Self::new()
    }
}

impl Reader for PowerShellReader {
    fn language(&self) -> &'static str {
        "powershell"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["ps", "ps1", "pwsh", "posh"]
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["ps1", "psm1", "psd1"]
    }

    fn read(&self, source: &str) -> Result<Node, ReadError> {
        if is_blank(source, &COMMENTS) {
            return Ok(empty_program(source));
        }
        let tree = parse(source, arborium_powershell::language().into())?;
        let ctx = ReadContext {
            src: SourceText::new(source, "powershell"),
            operators: &self.operators,
        };
        Ok(ctx.read_program(&tree))
    }

    fn intents(&self) -> Option<&dyn IntentRecognizer> {
        Some(&COMMAND_INTENTS)
    }
}

/// Parse PowerShell source into a tree.
pub fn read_powershell(source: &str) -> Result<Node, ReadError> {
    POWERSHELL_READER.read(source)
}

/// Binary expression rules; each also has an `_argument_expression` form
/// inside method call argument lists.
const BINARY_RULES: &[&str] = &[
    "logical",
    "bitwise",
    "comparison",
    "additive",
    "multiplicative",
    "format",
    "range",
];

fn is_binary_rule(kind: &str) -> bool {
    let stem = kind
        .strip_suffix("_argument_expression")
        .or_else(|| kind.strip_suffix("_expression"));
    stem.is_some_and(|stem| BINARY_RULES.contains(&stem))
}

/// `$name`, `${name}` -> `name`.
fn variable_name(text: &str) -> &str {
    let name = text.strip_prefix('$').unwrap_or(text);
    name.strip_prefix('{')
        .and_then(|n| n.strip_suffix('}'))
        .unwrap_or(name)
}

/// `[System.IO.File]` -> `System.IO.File`.
fn type_literal_name(text: &str) -> &str {
    let name = text.strip_prefix('[').unwrap_or(text);
    name.strip_suffix(']').unwrap_or(name).trim()
}

/// Contents of a single-quoted string, with `''` collapsed.
fn verbatim_value(text: &str) -> String {
    let inner = text.strip_prefix('\'').unwrap_or(text);
    let inner = inner.strip_suffix('\'').unwrap_or(inner);
    inner.replace("''", "'")
}

/// Byte range of a here-string's body: the lines between `@"`/`@'` and
/// `"@`/`'@`.
fn here_string_range(text: &str) -> Range<usize> {
    let mut start = text.len().min(2);
    let mut end = text.len().saturating_sub(2).max(start);
    let body = &text[start..end];
    if body.starts_with("\r\n") {
        start += 2;
    } else if body.starts_with('\n') {
        start += 1;
    }
    let body = &text[start..end];
    if body.ends_with("\r\n") {
        end -= 2;
    } else if body.ends_with('\n') {
        end -= 1;
    }
    start..end
}

fn here_string_body(text: &str) -> &str {
    &text[here_string_range(text)]
}

/// Decode backtick escapes and doubled quotes in the literal text of a
/// double-quoted string.
fn decode_expandable(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '`' => match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some('0') => out.push('\0'),
                Some('a') => out.push('\u{07}'),
                Some('b') => out.push('\u{08}'),
                Some('e') => out.push('\u{1B}'),
                Some('f') => out.push('\u{0C}'),
                Some('v') => out.push('\u{0B}'),
                Some(other) => out.push(other),
                None => out.push('`'),
            },
            '"' if chars.peek() == Some(&'"') => {
                chars.next();
                out.push('"');
            }
            _ => out.push(c),
        }
    }
    out
}

struct ReadContext<'a> {
    src: SourceText<'a>,
    operators: &'a OperatorTable,
}

impl<'a> ReadContext<'a> {
    fn text(&self, node: SyntaxNode) -> &'a str {
        self.src.text(node)
    }

    fn at(&self, node: SyntaxNode, kind: NodeKind) -> Node {
        Node::new(kind).with_span(self.src.span(node))
    }

    fn read_program(&self, tree: &Tree) -> Node {
        let root = tree.root_node();
        let statements = self.read_statements(root);
        self.at(root, NodeKind::Block(Block::new(statements)))
    }

    /// Statements under `node`, flattening nested statement lists.
    fn read_statements(&self, node: SyntaxNode) -> Vec<Node> {
        let mut statements = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "statement_list" | "script_block_body" => {
                    statements.extend(self.read_statements(child))
                }
                "empty_statement" => {}
                _ => statements.push(self.read_statement(child)),
            }
        }
        statements
    }

    fn read_block(&self, node: Option<SyntaxNode>) -> Block {
        node.map(|block| Block::new(self.read_statements(block)))
            .unwrap_or_default()
    }

    fn read_body(&self, node: SyntaxNode) -> Box<Node> {
        let block = child_of_kind(node, "statement_block");
        let body = match block {
            Some(block) => self.at(block, NodeKind::Block(self.read_block(Some(block)))),
            None => Node::block(Vec::new()),
        };
        Box::new(body)
    }

    fn read_statement(&self, node: SyntaxNode) -> Node {
        match node.kind() {
            "function_statement" => self.read_function(node),
            "class_statement" => self.read_class(node),
            "if_statement" => self.read_if(node),
            "while_statement" => self.read_while(node),
            "for_statement" => self.read_for(node),
            "foreach_statement" => self.read_foreach(node),
            "try_statement" => self.read_try(node),
            "flow_control_statement" => self.read_flow_control(node),
            "switch_statement" => self.read_switch(node),
            "labeled_statement" => match named_children(node)
                .into_iter()
                .find(|c| c.kind() != "label")
            {
                Some(inner) => self.read_statement(inner),
                None => self.src.unsupported(node),
            },
            "statement_block" => self.at(node, NodeKind::Block(self.read_block(Some(node)))),
            "param_block" => self.src.unsupported(node),
            _ => self.read_expr(node),
        }
    }

    fn read_function(&self, node: SyntaxNode) -> Node {
        let name = child_of_kind(node, "function_name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let script_block = child_of_kind(node, "script_block");

        let parameter_list = child_of_kind(node, "function_parameter_declaration")
            .or_else(|| script_block.and_then(|sb| child_of_kind(sb, "param_block")))
            .and_then(|decl| child_of_kind(decl, "parameter_list"));
        let parameters = parameter_list
            .map(|list| {
                children_of_kind(list, "script_parameter")
                    .into_iter()
                    .map(|p| self.read_script_parameter(p))
                    .collect()
            })
            .unwrap_or_default();

        let body = self.read_block(script_block.and_then(|sb| child_of_kind(sb, "script_block_body")));
        self.at(
            node,
            NodeKind::MethodDeclaration(MethodDeclaration::new(name, parameters, body)),
        )
    }

    /// `[Type]$name`; other attributes such as `[Parameter()]` are dropped.
    fn read_script_parameter(&self, node: SyntaxNode) -> Parameter {
        let name = child_of_kind(node, "variable")
            .map(|v| variable_name(self.text(v)).to_string())
            .unwrap_or_default();
        let type_name = child_of_kind(node, "attribute_list")
            .into_iter()
            .flat_map(|list| children_of_kind(list, "attribute"))
            .chain(children_of_kind(node, "attribute"))
            .find_map(|attr| child_of_kind(attr, "type_literal"))
            .or_else(|| child_of_kind(node, "type_literal"))
            .map(|ty| type_literal_name(self.text(ty)).to_string());
        Parameter {
            type_name,
            name,
            modifiers: Vec::new(),
        }
    }

    /// `static`/`hidden` keywords written before `child`.
    fn member_modifiers(&self, node: SyntaxNode, child: SyntaxNode) -> Vec<String> {
        self.src
            .before(node, child)
            .split_whitespace()
            .filter(|word| {
                word.eq_ignore_ascii_case("static") || word.eq_ignore_ascii_case("hidden")
            })
            .map(str::to_ascii_lowercase)
            .collect()
    }

    fn read_class(&self, node: SyntaxNode) -> Node {
        let name = child_of_kind(node, "simple_name")
            .map(|n| self.text(n).to_string())
            .unwrap_or_default();
        let members = named_children(node)
            .into_iter()
            .filter_map(|member| match member.kind() {
                "class_property_definition" => Some(self.read_property(member)),
                "class_method_definition" => Some(self.read_class_method(member)),
                "simple_name" => None,
                _ => Some(self.src.unsupported(member)),
            })
            .collect();
        self.at(node, NodeKind::ClassDeclaration(ClassDeclaration { name, members }))
    }

    fn read_property(&self, node: SyntaxNode) -> Node {
        let children = named_children(node);
        let Some(variable) = children.iter().position(|c| c.kind() == "variable") else {
            return self.src.unsupported(node);
        };
        let type_name = children[..variable]
            .iter()
            .rev()
            .find(|c| c.kind() == "type_literal")
            .map(|ty| type_literal_name(self.text(*ty)).to_string());
        let initializer = children[variable + 1..]
            .first()
            .map(|init| Box::new(self.read_expr(*init)));
        self.at(
            node,
            NodeKind::VariableDeclaration(VariableDeclaration {
                type_name,
                variables: vec![VariableDeclarator {
                    name: variable_name(self.text(children[variable])).to_string(),
                    initializer,
                }],
            }),
        )
    }

    fn read_class_method(&self, node: SyntaxNode) -> Node {
        let Some(name_node) = child_of_kind(node, "simple_name") else {
            return self.src.unsupported(node);
        };
        let return_type = named_children(node)
            .into_iter()
            .take_while(|c| *c != name_node)
            .find(|c| c.kind() == "type_literal")
            .map(|ty| type_literal_name(self.text(ty)).to_string());
        let parameters = child_of_kind(node, "class_method_parameter_list")
            .map(|list| {
                children_of_kind(list, "class_method_parameter")
                    .into_iter()
                    .map(|p| Parameter {
                        type_name: child_of_kind(p, "type_literal")
                            .map(|ty| type_literal_name(self.text(ty)).to_string()),
                        name: child_of_kind(p, "variable")
                            .map(|v| variable_name(self.text(v)).to_string())
                            .unwrap_or_default(),
                        modifiers: Vec::new(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        let body = self.read_block(
            child_of_kind(node, "script_block").and_then(|sb| child_of_kind(sb, "script_block_body")),
        );
        self.at(
            node,
            NodeKind::MethodDeclaration(MethodDeclaration {
                name: self.text(name_node).to_string(),
                parameters,
                body,
                modifiers: self.member_modifiers(node, name_node),
                attributes: Vec::new(),
                return_type,
            }),
        )
    }

    fn read_condition(&self, node: SyntaxNode) -> Box<Node> {
        let condition = node
            .child_by_field_name("condition")
            .or_else(|| child_of_kind(node, "pipeline"))
            .or_else(|| child_of_kind(node, "while_condition"))
            .map(|c| self.read_expr(c))
            .unwrap_or_else(|| self.src.unsupported(node));
        Box::new(condition)
    }

    /// `if`/`elseif`/`else` becomes a chain of nested if statements.
    fn read_if(&self, node: SyntaxNode) -> Node {
        let mut else_body = child_of_kind(node, "else_clause").map(|clause| self.read_body(clause));

        let elseifs = child_of_kind(node, "elseif_clauses")
            .map(|list| children_of_kind(list, "elseif_clause"))
            .unwrap_or_default();
        for clause in elseifs.into_iter().rev() {
            let nested = self.at(
                clause,
                NodeKind::IfStatement(IfStatement {
                    condition: self.read_condition(clause),
                    body: self.read_body(clause),
                    else_clause: else_body.take().map(|body| ElseClause { body }),
                }),
            );
            else_body = Some(Box::new(nested));
        }

        self.at(
            node,
            NodeKind::IfStatement(IfStatement {
                condition: self.read_condition(node),
                body: self.read_body(node),
                else_clause: else_body.map(|body| ElseClause { body }),
            }),
        )
    }

    fn read_while(&self, node: SyntaxNode) -> Node {
        self.at(
            node,
            NodeKind::While(While {
                condition: self.read_condition(node),
                body: self.read_body(node),
            }),
        )
    }

    fn read_for(&self, node: SyntaxNode) -> Node {
        let section = |kind: &str| {
            child_of_kind(node, kind)
                .map(|s| {
                    named_children(s)
                        .into_iter()
                        .map(|e| self.read_expr(e))
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        };
        let initializers = section("for_initializer");
        let condition = section("for_condition").into_iter().next().map(Box::new);
        let incrementors = section("for_iterator");
        self.at(
            node,
            NodeKind::ForStatement(ForStatement {
                initializers,
                condition,
                incrementors,
                body: self.read_body(node),
            }),
        )
    }

    fn read_foreach(&self, node: SyntaxNode) -> Node {
        let variable = child_of_kind(node, "variable")
            .map(|v| variable_name(self.text(v)).to_string())
            .unwrap_or_default();
        let collection = child_of_kind(node, "pipeline")
            .map(|c| self.read_expr(c))
            .unwrap_or_else(|| self.src.unsupported(node));
        self.at(
            node,
            NodeKind::ForEachStatement(ForEachStatement {
                variable,
                collection: Box::new(collection),
                body: self.read_body(node),
            }),
        )
    }

    fn read_try(&self, node: SyntaxNode) -> Node {
        let block = self.read_block(child_of_kind(node, "statement_block"));
        let catches = child_of_kind(node, "catch_clauses")
            .map(|list| children_of_kind(list, "catch_clause"))
            .unwrap_or_default()
            .into_iter()
            .map(|clause| Catch {
                declaration: child_of_kind(clause, "catch_type_list")
                    .and_then(|types| child_of_kind(types, "type_literal"))
                    .map(|ty| CatchDeclaration {
                        type_name: type_literal_name(self.text(ty)).to_string(),
                        identifier: None,
                    }),
                block: self.read_block(child_of_kind(clause, "statement_block")),
            })
            .collect();
        let finally = child_of_kind(node, "finally_clause").map(|clause| Finally {
            block: self.read_block(child_of_kind(clause, "statement_block")),
        });
        self.at(
            node,
            NodeKind::Try(Try {
                block,
                catches,
                finally,
            }),
        )
    }

    fn read_flow_control(&self, node: SyntaxNode) -> Node {
        let keyword = self
            .text(node)
            .split_whitespace()
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        let value = child_of_kind(node, "pipeline").map(|v| Box::new(self.read_expr(v)));
        let kind = match keyword.as_str() {
            "return" => NodeKind::ReturnStatement(ReturnStatement { expression: value }),
            "throw" => NodeKind::Throw(Throw { expression: value }),
            "break" => NodeKind::Break,
            "continue" => NodeKind::Continue,
            _ => return self.src.unsupported(node),
        };
        self.at(node, kind)
    }

    /// Each clause becomes its own section with one label.
    fn read_switch(&self, node: SyntaxNode) -> Node {
        if let Some(parameters) = child_of_kind(node, "switch_parameters") {
            tracing::debug!(parameters = self.text(parameters), "switch parameters ignored");
        }
        let expression = child_of_kind(node, "switch_condition")
            .and_then(first_named)
            .map(|c| self.read_expr(c))
            .unwrap_or_else(|| self.src.unsupported(node));

        let sections = child_of_kind(node, "switch_body")
            .and_then(|body| child_of_kind(body, "switch_clauses"))
            .map(|clauses| children_of_kind(clauses, "switch_clause"))
            .unwrap_or_default()
            .into_iter()
            .map(|clause| {
                let label = match child_of_kind(clause, "switch_clause_condition") {
                    Some(condition) if self.text(condition).eq_ignore_ascii_case("default") => {
                        SwitchLabel::Default
                    }
                    Some(condition) => SwitchLabel::Case(match first_named(condition) {
                        Some(value) => self.read_expr(value),
                        None => self.at(
                            condition,
                            NodeKind::StringConstant(StringConstant {
                                value: self.text(condition).to_string(),
                            }),
                        ),
                    }),
                    None => SwitchLabel::Default,
                };
                SwitchSection {
                    labels: vec![label],
                    statements: self.read_block(child_of_kind(clause, "statement_block")).statements,
                }
            })
            .collect();

        self.at(
            node,
            NodeKind::SwitchStatement(SwitchStatement {
                expression: Box::new(expression),
                sections,
            }),
        )
    }

    /// `a | Cmd -X y | Other` pipes each stage in as `-InputObject`.
    fn read_pipeline(&self, node: SyntaxNode) -> Node {
        let stages: Vec<_> = named_children(node)
            .into_iter()
            .filter(|c| !matches!(c.kind(), "redirections" | "redirection"))
            .collect();
        let Some((first, rest)) = stages.split_first() else {
            return self.src.unsupported(node);
        };
        let mut current = self.read_expr(*first);
        for stage in rest {
            if stage.kind() != "command" {
                return self.src.unsupported(node);
            }
            let mut next = self.read_command(*stage);
            if let NodeKind::Invocation(call) = &mut next.kind {
                call.arguments
                    .arguments
                    .push(Argument::named("InputObject", current));
            }
            current = next;
        }
        current
    }

    /// `Name -Param value positional -Switch`.
    fn read_command(&self, node: SyntaxNode) -> Node {
        let callee = match child_of_kind(node, "command_name") {
            Some(name) => self.at(
                name,
                NodeKind::IdentifierName(IdentifierName {
                    name: self.text(name).to_string(),
                }),
            ),
            None => match child_of_kind(node, "command_name_expr").and_then(first_named) {
                Some(expr) => self.read_expr(expr),
                None => return self.src.unsupported(node),
            },
        };

        let mut arguments = Vec::new();
        let mut pending: Option<String> = None;
        let elements = child_of_kind(node, "command_elements")
            .map(named_children)
            .unwrap_or_default();
        for element in elements {
            match element.kind() {
                "command_argument_sep" => {}
                "redirection" | "stop_parsing" => {
                    tracing::debug!(element = self.text(element), "command element ignored");
                }
                "command_parameter" => {
                    let name = self.text(element).trim_start_matches('-').trim_end_matches(':');
                    if let Some(previous) = pending.replace(name.to_string()) {
                        arguments.push(Argument::switch(previous));
                    }
                }
                _ => {
                    let value = self.read_command_argument(element);
                    arguments.push(match pending.take() {
                        Some(name) => Argument::named(name, value),
                        None => Argument::positional(value),
                    });
                }
            }
        }
        if let Some(name) = pending {
            arguments.push(Argument::switch(name));
        }

        self.at(
            node,
            NodeKind::Invocation(Invocation {
                expression: Box::new(callee),
                arguments: ArgumentList::new(arguments),
            }),
        )
    }

    fn read_command_argument(&self, node: SyntaxNode) -> Node {
        match node.kind() {
            "generic_token" | "command_token" => self.at(
                node,
                NodeKind::StringConstant(StringConstant {
                    value: self.text(node).to_string(),
                }),
            ),
            _ => self.read_expr(node),
        }
    }

    fn read_assignment(&self, node: SyntaxNode) -> Node {
        let operands: Vec<_> = named_children(node)
            .into_iter()
            .filter(|c| c.kind() != "assignement_operator" && c.kind() != "assignment_operator")
            .collect();
        let [left_node, right_node] = operands[..] else {
            return self.src.unsupported(node);
        };
        let left = self.read_expr(left_node);
        let right = self.read_expr(right_node);
        let operator = self.src.between(left_node, right_node);

        let right = match operator.strip_suffix('=') {
            Some("") | None => right,
            Some(op) => self.at(
                node,
                NodeKind::BinaryExpression(BinaryExpression {
                    left: Box::new(left.clone()),
                    operator: self.operators.lookup(op),
                    right: Box::new(right),
                }),
            ),
        };
        self.at(
            node,
            NodeKind::Assignment(Assignment {
                left: Box::new(left),
                right: Box::new(right),
            }),
        )
    }

    fn read_binary(&self, node: SyntaxNode) -> Option<Node> {
        let operands: Vec<_> = named_children(node)
            .into_iter()
            .filter(|c| !matches!(c.kind(), "comparison_operator" | "format_operator"))
            .collect();
        let [left, right] = operands[..] else {
            return None;
        };
        let token = self.src.between(left, right);
        let operator = self.operators.lookup(token);
        if operator == BinaryOperator::Unknown {
            tracing::debug!(token, "unmapped PowerShell operator");
        }
        Some(self.at(
            node,
            NodeKind::BinaryExpression(BinaryExpression {
                left: Box::new(self.read_expr(left)),
                operator,
                right: Box::new(self.read_expr(right)),
            }),
        ))
    }

    fn read_unary(&self, node: SyntaxNode) -> Node {
        let Some(operand) = first_named(node) else {
            return self.src.unsupported(node);
        };
        let token = self.src.before(node, operand);
        if token == "," {
            return self.at(
                node,
                NodeKind::ArrayCreation(ArrayCreation {
                    element_type: None,
                    elements: vec![self.read_expr(operand)],
                }),
            );
        }
        let operator = if token.eq_ignore_ascii_case("-not") {
            "!".to_string()
        } else {
            token.to_ascii_lowercase()
        };
        self.at(
            node,
            NodeKind::PrefixUnaryExpression(UnaryExpression {
                operator,
                operand: Box::new(self.read_expr(operand)),
            }),
        )
    }

    fn read_arguments(&self, node: SyntaxNode) -> ArgumentList {
        let list = child_of_kind(node, "argument_expression_list").unwrap_or(node);
        ArgumentList::positional(
            named_children(list)
                .into_iter()
                .map(|arg| self.read_expr(arg))
                .collect(),
        )
    }

    fn member_name(&self, node: SyntaxNode) -> String {
        let text = self.text(node);
        match node.kind() {
            "variable" => variable_name(text).to_string(),
            _ => text.to_string(),
        }
    }

    /// A double-quoted string; it stays a plain string unless it
    /// interpolates a variable or subexpression.
    fn read_expandable_string(&self, node: SyntaxNode) -> Node {
        let text = self.text(node);
        let body = if node.kind() == "expandable_here_string_literal" {
            here_string_range(text)
        } else {
            text.len().min(1)..text.len().saturating_sub(1).max(text.len().min(1))
        };

        let base = node.start_byte();
        let mut parts = Vec::new();
        let mut cursor = body.start;
        for hole in named_children(node) {
            let (start, end) = (hole.start_byte() - base, hole.end_byte() - base);
            if start < cursor || end > body.end {
                continue;
            }
            parts.push(TemplatePart::Text(decode_expandable(&text[cursor..start])));
            let expression = match self.read_expr(hole) {
                Node {
                    kind: NodeKind::ParenthesizedExpression(inner),
                    ..
                } if hole.kind() == "sub_expression" => *inner.expression,
                other => other,
            };
            parts.push(TemplatePart::Hole {
                expression,
                format: None,
            });
            cursor = end;
        }
        parts.push(TemplatePart::Text(decode_expandable(&text[cursor..body.end])));

        let template = TemplateStringConstant::new(parts);
        let kind = match &template.parts[..] {
            [] => NodeKind::StringConstant(StringConstant {
                value: String::new(),
            }),
            [TemplatePart::Text(value)] => NodeKind::StringConstant(StringConstant {
                value: value.clone(),
            }),
            _ => NodeKind::TemplateStringConstant(template),
        };
        self.at(node, kind)
    }

    fn read_expr(&self, node: SyntaxNode) -> Node {
        match node.kind() {
            "pipeline" | "pipeline_chain" => self.read_pipeline(node),
            "command" => self.read_command(node),
            "assignment_expression" => self.read_assignment(node),

            "variable" => {
                let name = variable_name(self.text(node));
                let kind = match name.to_ascii_lowercase().as_str() {
                    literal @ ("true" | "false" | "null") => NodeKind::Literal(Literal {
                        token: literal.to_string(),
                    }),
                    _ => NodeKind::IdentifierName(IdentifierName {
                        name: name.to_string(),
                    }),
                };
                self.at(node, kind)
            }
            "type_literal" => self.at(
                node,
                NodeKind::TypeReference(TypeReference {
                    name: type_literal_name(self.text(node)).to_string(),
                }),
            ),
            "integer_literal" | "real_literal" => self.at(
                node,
                NodeKind::Literal(Literal {
                    token: self.text(node).to_string(),
                }),
            ),
            "verbatim_string_characters" => self.at(
                node,
                NodeKind::StringConstant(StringConstant {
                    value: verbatim_value(self.text(node)),
                }),
            ),
            "verbatim_here_string_characters" => self.at(
                node,
                NodeKind::StringConstant(StringConstant {
                    value: here_string_body(self.text(node)).to_string(),
                }),
            ),
            "expandable_string_literal" | "expandable_here_string_literal" => {
                self.read_expandable_string(node)
            }
            "generic_token" => self.read_command_argument(node),

            "cast_expression" => {
                let children = named_children(node);
                match children[..] {
                    [ty, value] if ty.kind() == "type_literal" => self.at(
                        node,
                        NodeKind::Cast(Cast {
                            type_name: type_literal_name(self.text(ty)).to_string(),
                            expression: Box::new(self.read_expr(value)),
                        }),
                    ),
                    _ => self.src.unsupported(node),
                }
            }
            "member_access" => {
                let children = named_children(node);
                match children[..] {
                    [target, member] => self.at(
                        node,
                        NodeKind::MemberAccess(MemberAccess {
                            expression: Box::new(self.read_expr(target)),
                            member: self.member_name(member),
                        }),
                    ),
                    _ => self.src.unsupported(node),
                }
            }
            "invokation_expression" | "invocation_expression" => {
                let children = named_children(node);
                match children[..] {
                    [target, member, arguments] => {
                        let callee = Node::member(self.read_expr(target), self.member_name(member))
                            .with_span(Span::new(node.start_byte(), member.end_byte()));
                        self.at(
                            node,
                            NodeKind::Invocation(Invocation {
                                expression: Box::new(callee),
                                arguments: self.read_arguments(arguments),
                            }),
                        )
                    }
                    _ => self.src.unsupported(node),
                }
            }
            "element_access" => {
                let children = named_children(node);
                match children[..] {
                    [target, index] => self.at(
                        node,
                        NodeKind::ElementAccess(ElementAccess {
                            expression: Box::new(self.read_expr(target)),
                            arguments: BracketedArgumentList(ArgumentList::positional(vec![
                                self.read_expr(index),
                            ])),
                        }),
                    ),
                    _ => self.src.unsupported(node),
                }
            }
            "array_literal_expression" => {
                let elements = named_children(node);
                match elements[..] {
                    [single] => self.read_expr(single),
                    _ => self.at(
                        node,
                        NodeKind::ArrayCreation(ArrayCreation {
                            element_type: None,
                            elements: elements.into_iter().map(|e| self.read_expr(e)).collect(),
                        }),
                    ),
                }
            }
            // `@(1, 2)` holds one array literal statement; `@(a; b)` several.
            "array_expression" => {
                let mut elements = self.read_statements(node);
                if let [only] = &mut elements[..]
                    && let NodeKind::ArrayCreation(inner) = &mut only.kind
                {
                    elements = std::mem::take(&mut inner.elements);
                }
                self.at(
                    node,
                    NodeKind::ArrayCreation(ArrayCreation {
                        element_type: None,
                        elements,
                    }),
                )
            }
            "parenthesized_expression" | "sub_expression" => {
                let mut inner = self.read_statements(node);
                if inner.len() != 1 {
                    return self.src.unsupported(node);
                }
                let expression = inner.remove(0);
                self.at(
                    node,
                    NodeKind::ParenthesizedExpression(ParenthesizedExpression {
                        expression: Box::new(expression),
                    }),
                )
            }
            "pre_increment_expression" | "pre_decrement_expression" => match first_named(node) {
                Some(operand) => self.at(
                    node,
                    NodeKind::PrefixUnaryExpression(UnaryExpression {
                        operator: self.src.before(node, operand).to_string(),
                        operand: Box::new(self.read_expr(operand)),
                    }),
                ),
                None => self.src.unsupported(node),
            },
            "post_increment_expression" | "post_decrement_expression" => match first_named(node) {
                Some(operand) => self.at(
                    node,
                    NodeKind::PostfixUnaryExpression(UnaryExpression {
                        operator: self.src.after(node, operand).to_string(),
                        operand: Box::new(self.read_expr(operand)),
                    }),
                ),
                None => self.src.unsupported(node),
            },
            "expression_with_unary_operator" => self.read_unary(node),
            "script_block_expression" | "hash_literal_expression" => self.src.unsupported(node),

            kind => {
                if is_binary_rule(kind)
                    && let Some(binary) = self.read_binary(node)
                {
                    return binary;
                }
                // Single-child wrappers such as unary_expression and string_literal.
                match named_children(node)[..] {
                    [only] => self.read_expr(only),
                    _ => self.src.unsupported(node),
                }
            }
        }
    }
}
