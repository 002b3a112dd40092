//! Tree-sitter based C# reader.

use super::syntax::{
    CommentSyntax, SourceText, child_of_kind, children_of_kind, empty_program, first_named,
    first_token, is_blank, last_token, named_children, parse,
};
use crate::ast::*;
use crate::intent::{IntentRecognizer, csharp::STATIC_CALL_INTENTS};
use crate::traits::{ReadError, Reader};
use tree_sitter::{Node as SyntaxNode, Tree};

const COMMENTS: CommentSyntax = CommentSyntax {
    line: "//",
    block: ("/*", "*/"),
};

/// Static instance of the C# reader for registry.
pub static CSHARP_READER: CSharpReader = CSharpReader::new();

/// C# reader using tree-sitter.
pub struct CSharpReader {
    operators: OperatorTable,
}

impl CSharpReader {
    pub const fn new() -> Self {
        Self::with_operators(OperatorTable::csharp())
    }

    pub const fn with_operators(operators: OperatorTable) -> Self {
        Self { operators }
    }
}

impl Default for CSharpReader {
    fn default() -> Self {
        Self::new()
    }
}

impl Reader for CSharpReader {
    fn language(&self) -> &'static str {
        "csharp"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["cs", "c#", "c-sharp"]
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["cs", "csx"]
    }

    fn read(&self, source: &str) -> Result<Node, ReadError> {
        if is_blank(source, &COMMENTS) {
            return Ok(empty_program(source));
        }
        let tree = parse(source, arborium_c_sharp::language().into())?;
        let ctx = ReadContext::new(source, &self.operators);
        Ok(ctx.read_program(&tree))
    }

    fn intents(&self) -> Option<&dyn IntentRecognizer> {
        Some(&STATIC_CALL_INTENTS)
    }
}

/// Parse C# source into a tree.
pub fn read_csharp(source: &str) -> Result<Node, ReadError> {
    CSHARP_READER.read(source)
}

/// Decode backslash escapes of a regular C# string or char literal.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('0') => out.push('\0'),
            Some('a') => out.push('\u{07}'),
            Some('b') => out.push('\u{08}'),
            Some('f') => out.push('\u{0C}'),
            Some('v') => out.push('\u{0B}'),
            Some(escaped @ ('\\' | '"' | '\'')) => out.push(escaped),
            Some(prefix @ ('u' | 'x')) => {
                let mut hex = String::new();
                while hex.len() < 4 {
                    match chars.peek() {
                        Some(h) if h.is_ascii_hexdigit() => {
                            hex.push(*h);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push('\\');
                        out.push(prefix);
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

fn strip_quotes<'s>(text: &'s str, quote: &str) -> &'s str {
    let inner = text.strip_prefix(quote).unwrap_or(text);
    inner.strip_suffix(quote).unwrap_or(inner)
}

struct ReadContext<'a> {
    src: SourceText<'a>,
    operators: &'a OperatorTable,
}

impl<'a> ReadContext<'a> {
    fn new(source: &'a str, operators: &'a OperatorTable) -> Self {
        Self {
            src: SourceText::new(source, "csharp"),
            operators,
        }
    }

    fn text(&self, node: SyntaxNode) -> &'a str {
        self.src.text(node)
    }

    fn at(&self, node: SyntaxNode, kind: NodeKind) -> Node {
        Node::new(kind).with_span(self.src.span(node))
    }

    fn field_text(&self, node: SyntaxNode, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|n| self.text(n).to_string())
    }

    fn read_program(&self, tree: &Tree) -> Node {
        let root = tree.root_node();
        let statements = self.read_members(root);
        self.at(root, NodeKind::Block(Block::new(statements)))
    }

    fn read_members(&self, node: SyntaxNode) -> Vec<Node> {
        named_children(node)
            .into_iter()
            .filter_map(|child| self.read_member(child))
            .collect()
    }

    /// Top-level and type-body members. Directives yield nothing.
    fn read_member(&self, node: SyntaxNode) -> Option<Node> {
        match node.kind() {
            "using_directive" | "extern_alias_directive" | "attribute_list" | "empty_statement" => {
                None
            }
            "namespace_declaration" | "file_scoped_namespace_declaration" => {
                Some(self.read_namespace(node))
            }
            "class_declaration"
            | "struct_declaration"
            | "record_declaration"
            | "record_struct_declaration"
            | "interface_declaration" => Some(self.read_class(node)),
            "method_declaration" | "constructor_declaration" | "local_function_statement" => {
                Some(self.read_method(node))
            }
            "field_declaration" => Some(match child_of_kind(node, "variable_declaration") {
                Some(decl) => self.read_variable_declaration(decl),
                None => self.src.unsupported(node),
            }),
            "global_statement" => first_named(node).and_then(|stmt| self.read_statement(stmt)),
            "declaration_list" => Some(self.at(
                node,
                NodeKind::Block(Block::new(self.read_members(node))),
            )),
            _ => self.read_statement(node),
        }
    }

    fn read_namespace(&self, node: SyntaxNode) -> Node {
        let name = self.field_text(node, "name").unwrap_or_default();
        let name_node = node.child_by_field_name("name");
        let mut members = Vec::new();
        for child in named_children(node) {
            if Some(child) == name_node {
                continue;
            }
            if child.kind() == "declaration_list" {
                members.extend(self.read_members(child));
            } else if let Some(member) = self.read_member(child) {
                members.push(member);
            }
        }
        self.at(node, NodeKind::Namespace(Namespace { name, members }))
    }

    fn read_class(&self, node: SyntaxNode) -> Node {
        let name = self.field_text(node, "name").unwrap_or_default();
        let members = node
            .child_by_field_name("body")
            .or_else(|| child_of_kind(node, "declaration_list"))
            .map(|body| self.read_members(body))
            .unwrap_or_default();
        self.at(node, NodeKind::ClassDeclaration(ClassDeclaration { name, members }))
    }

    fn read_method(&self, node: SyntaxNode) -> Node {
        let name = self.field_text(node, "name").unwrap_or_default();
        let return_type = match node.kind() {
            "constructor_declaration" => None,
            _ => self
                .field_text(node, "returns")
                .or_else(|| self.field_text(node, "type")),
        };
        let parameters = node
            .child_by_field_name("parameters")
            .or_else(|| child_of_kind(node, "parameter_list"))
            .map(|list| {
                children_of_kind(list, "parameter")
                    .into_iter()
                    .map(|p| self.read_parameter(p))
                    .collect()
            })
            .unwrap_or_default();
        let modifiers = children_of_kind(node, "modifier")
            .into_iter()
            .map(|m| self.text(m).to_string())
            .collect();
        let attributes = children_of_kind(node, "attribute_list")
            .into_iter()
            .flat_map(|list| children_of_kind(list, "attribute"))
            .map(|attr| self.read_attribute(attr))
            .collect();

        let returns_value = return_type.as_deref().is_some_and(|t| t != "void");
        let body = match node.child_by_field_name("body") {
            Some(body) if body.kind() == "arrow_expression_clause" => {
                let expression = first_named(body).map(|e| self.read_expr(e));
                let statement = match expression {
                    Some(expression) if returns_value => self.at(
                        body,
                        NodeKind::ReturnStatement(ReturnStatement {
                            expression: Some(Box::new(expression)),
                        }),
                    ),
                    Some(expression) => expression,
                    None => self.src.unsupported(body),
                };
                Block::new(vec![statement])
            }
            Some(body) => self.read_block(body),
            None => Block::empty(),
        };

        self.at(
            node,
            NodeKind::MethodDeclaration(MethodDeclaration {
                name,
                parameters,
                body,
                modifiers,
                attributes,
                return_type,
            }),
        )
    }

    fn read_parameter(&self, node: SyntaxNode) -> Parameter {
        let name = self
            .field_text(node, "name")
            .or_else(|| child_of_kind(node, "identifier").map(|n| self.text(n).to_string()))
            .unwrap_or_default();
        let type_name = self.field_text(node, "type");

        let mut modifiers = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            let text = self.text(child);
            let is_modifier = matches!(child.kind(), "parameter_modifier" | "modifier")
                || (!child.is_named()
                    && matches!(text, "ref" | "out" | "in" | "params" | "this" | "scoped"));
            if is_modifier {
                modifiers.push(text.to_string());
            }
        }

        Parameter {
            type_name,
            name,
            modifiers,
        }
    }

    fn read_attribute(&self, node: SyntaxNode) -> Attribute {
        let name = self.field_text(node, "name").unwrap_or_default();
        let arguments = child_of_kind(node, "attribute_argument_list")
            .map(|list| {
                let arguments = children_of_kind(list, "attribute_argument")
                    .into_iter()
                    .map(|arg| self.read_argument(arg))
                    .collect();
                ArgumentList::new(arguments)
            })
            .unwrap_or_default();
        Attribute { name, arguments }
    }

    fn read_block(&self, node: SyntaxNode) -> Block {
        if node.kind() != "block" {
            return Block::new(self.read_statement(node).into_iter().collect());
        }
        Block::new(
            named_children(node)
                .into_iter()
                .filter_map(|child| self.read_statement(child))
                .collect(),
        )
    }

    fn read_body(&self, node: Option<SyntaxNode>) -> Box<Node> {
        let body = match node {
            Some(node) if node.kind() == "block" => {
                self.at(node, NodeKind::Block(self.read_block(node)))
            }
            Some(node) => self
                .read_statement(node)
                .unwrap_or_else(|| Node::block(Vec::new())),
            None => Node::block(Vec::new()),
        };
        Box::new(body)
    }

    fn read_statement(&self, node: SyntaxNode) -> Option<Node> {
        let statement = match node.kind() {
            "empty_statement" | "using_directive" => return None,
            "block" => self.at(node, NodeKind::Block(self.read_block(node))),
            "expression_statement" => match first_named(node) {
                Some(expression) => self.read_expr(expression),
                None => return None,
            },
            "local_declaration_statement" => match child_of_kind(node, "variable_declaration") {
                Some(decl) => self.read_variable_declaration(decl),
                None => self.src.unsupported(node),
            },
            "variable_declaration" => self.read_variable_declaration(node),
            "local_function_statement" | "method_declaration" => self.read_method(node),
            "class_declaration" => self.read_class(node),
            "if_statement" => self.read_if(node),
            "while_statement" => self.at(
                node,
                NodeKind::While(While {
                    condition: Box::new(self.read_field_expr(node, "condition")),
                    body: self.read_body(node.child_by_field_name("body")),
                }),
            ),
            "for_statement" => self.read_for(node),
            "foreach_statement" => self.read_foreach(node),
            "try_statement" => self.read_try(node),
            "return_statement" => self.at(
                node,
                NodeKind::ReturnStatement(ReturnStatement {
                    expression: first_named(node).map(|e| Box::new(self.read_expr(e))),
                }),
            ),
            "throw_statement" => self.at(
                node,
                NodeKind::Throw(Throw {
                    expression: first_named(node).map(|e| Box::new(self.read_expr(e))),
                }),
            ),
            "break_statement" => self.at(node, NodeKind::Break),
            "continue_statement" => self.at(node, NodeKind::Continue),
            "switch_statement" => self.read_switch(node),
            "using_statement" => self.read_using(node),
            _ => self.read_expr(node),
        };
        Some(statement)
    }

    fn read_variable_declaration(&self, node: SyntaxNode) -> Node {
        let type_name = self
            .field_text(node, "type")
            .filter(|t| t != "var");
        let variables = children_of_kind(node, "variable_declarator")
            .into_iter()
            .map(|d| self.read_declarator(d))
            .collect();
        self.at(
            node,
            NodeKind::VariableDeclaration(VariableDeclaration {
                type_name,
                variables,
            }),
        )
    }

    fn read_declarator(&self, node: SyntaxNode) -> VariableDeclarator {
        let name = self
            .field_text(node, "name")
            .or_else(|| child_of_kind(node, "identifier").map(|n| self.text(n).to_string()))
            .unwrap_or_default();

        let initializer = match child_of_kind(node, "equals_value_clause") {
            Some(clause) => first_named(clause),
            None => {
                // Newer grammars inline `= value` into the declarator.
                let mut cursor = node.walk();
                let children: Vec<_> = node.children(&mut cursor).collect();
                children
                    .iter()
                    .position(|c| !c.is_named() && self.text(*c) == "=")
                    .and_then(|eq| children[eq + 1..].iter().find(|c| c.is_named()).copied())
            }
        };

        VariableDeclarator {
            name,
            initializer: initializer.map(|init| Box::new(self.read_expr(init))),
        }
    }

    fn read_if(&self, node: SyntaxNode) -> Node {
        let else_clause = node.child_by_field_name("alternative").map(|alt| {
            let body = match alt.kind() {
                "else_clause" => first_named(alt),
                _ => Some(alt),
            };
            ElseClause {
                body: self.read_body(body),
            }
        });
        self.at(
            node,
            NodeKind::IfStatement(IfStatement {
                condition: Box::new(self.read_field_expr(node, "condition")),
                body: self.read_body(node.child_by_field_name("consequence")),
                else_clause,
            }),
        )
    }

    /// `for (init; condition; update) body`, split on the top-level `;`
    /// tokens so field naming differences between grammar versions do not
    /// matter.
    fn read_for(&self, node: SyntaxNode) -> Node {
        let body = node.child_by_field_name("body");
        let mut sections: [Vec<SyntaxNode>; 3] = Default::default();
        let mut section = 0;
        let mut inside = false;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if !child.is_named() {
                match self.text(child) {
                    "(" if !inside => inside = true,
                    ";" if inside => section = (section + 1).min(2),
                    ")" if inside && section == 2 => inside = false,
                    _ => {}
                }
                continue;
            }
            if inside && Some(child) != body && child.kind() != "comment" {
                sections[section].push(child);
            }
        }

        let [initializers, condition, incrementors] = sections;
        let initializers = initializers
            .into_iter()
            .map(|n| match n.kind() {
                "variable_declaration" => self.read_variable_declaration(n),
                _ => self.read_expr(n),
            })
            .collect();
        let condition = condition.first().map(|c| Box::new(self.read_expr(*c)));
        let incrementors = incrementors
            .into_iter()
            .map(|n| self.read_expr(n))
            .collect();

        self.at(
            node,
            NodeKind::ForStatement(ForStatement {
                initializers,
                condition,
                incrementors,
                body: self.read_body(body),
            }),
        )
    }

    fn read_foreach(&self, node: SyntaxNode) -> Node {
        let variable = self
            .field_text(node, "left")
            .or_else(|| self.field_text(node, "name"))
            .unwrap_or_default();
        let collection = node
            .child_by_field_name("right")
            .or_else(|| node.child_by_field_name("expression"))
            .map(|c| self.read_expr(c))
            .unwrap_or_else(|| self.src.unsupported(node));
        self.at(
            node,
            NodeKind::ForEachStatement(ForEachStatement {
                variable,
                collection: Box::new(collection),
                body: self.read_body(node.child_by_field_name("body")),
            }),
        )
    }

    fn read_try(&self, node: SyntaxNode) -> Node {
        let block = node
            .child_by_field_name("body")
            .or_else(|| child_of_kind(node, "block"))
            .map(|b| self.read_block(b))
            .unwrap_or_default();

        let catches = children_of_kind(node, "catch_clause")
            .into_iter()
            .map(|clause| {
                let declaration = child_of_kind(clause, "catch_declaration").map(|decl| {
                    CatchDeclaration {
                        type_name: self.field_text(decl, "type").unwrap_or_default(),
                        identifier: self.field_text(decl, "name"),
                    }
                });
                let block = clause
                    .child_by_field_name("body")
                    .or_else(|| child_of_kind(clause, "block"))
                    .map(|b| self.read_block(b))
                    .unwrap_or_default();
                Catch { declaration, block }
            })
            .collect();

        let finally = child_of_kind(node, "finally_clause").map(|clause| Finally {
            block: child_of_kind(clause, "block")
                .map(|b| self.read_block(b))
                .unwrap_or_default(),
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

    fn read_switch(&self, node: SyntaxNode) -> Node {
        let body = node
            .child_by_field_name("body")
            .or_else(|| child_of_kind(node, "switch_body"));
        let expression = node
            .child_by_field_name("value")
            .or_else(|| named_children(node).into_iter().find(|c| Some(*c) != body))
            .map(|v| self.read_expr(v))
            .unwrap_or_else(|| self.src.unsupported(node));

        // Each grammar section carries one label; stacked labels arrive as
        // sections with no statements and join the next section.
        let mut sections = Vec::new();
        let mut labels = Vec::new();
        for syntax in body.map(|b| children_of_kind(b, "switch_section")).unwrap_or_default() {
            let section = self.read_switch_section(syntax);
            labels.extend(section.labels);
            if !section.statements.is_empty() {
                sections.push(SwitchSection {
                    labels: std::mem::take(&mut labels),
                    statements: section.statements,
                });
            }
        }
        if !labels.is_empty() {
            sections.push(SwitchSection {
                labels,
                statements: Vec::new(),
            });
        }

        self.at(
            node,
            NodeKind::SwitchStatement(SwitchStatement {
                expression: Box::new(expression),
                sections,
            }),
        )
    }

    fn read_switch_section(&self, node: SyntaxNode) -> SwitchSection {
        let mut labels = Vec::new();
        let mut statements = Vec::new();
        let mut expect_label = false;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "case" if !child.is_named() => expect_label = true,
                "default" if !child.is_named() => labels.push(SwitchLabel::Default),
                "case_switch_label" | "case_pattern_switch_label" => {
                    if let Some(value) = first_named(child) {
                        labels.push(SwitchLabel::Case(self.read_pattern(value)));
                    }
                }
                "default_switch_label" => labels.push(SwitchLabel::Default),
                "comment" | "when_clause" => {}
                _ if child.is_named() && expect_label => {
                    labels.push(SwitchLabel::Case(self.read_pattern(child)));
                    expect_label = false;
                }
                _ if child.is_named() => statements.extend(self.read_statement(child)),
                _ => {}
            }
        }

        SwitchSection { labels, statements }
    }

    fn read_pattern(&self, node: SyntaxNode) -> Node {
        match node.kind() {
            "constant_pattern" => first_named(node)
                .map(|value| self.read_expr(value))
                .unwrap_or_else(|| self.src.unsupported(node)),
            _ => self.read_expr(node),
        }
    }

    fn read_using(&self, node: SyntaxNode) -> Node {
        let body = node.child_by_field_name("body");
        let resource = named_children(node)
            .into_iter()
            .find(|c| Some(*c) != body)
            .map(|r| match r.kind() {
                "variable_declaration" => self.read_variable_declaration(r),
                _ => self.read_expr(r),
            })
            .unwrap_or_else(|| self.src.unsupported(node));
        self.at(
            node,
            NodeKind::Using(Using {
                resource: Box::new(resource),
                body: self.read_body(body),
            }),
        )
    }

    fn read_field_expr(&self, node: SyntaxNode, field: &str) -> Node {
        match node.child_by_field_name(field) {
            Some(child) => self.read_expr(child),
            None => self.src.unsupported(node),
        }
    }

    fn read_expr(&self, node: SyntaxNode) -> Node {
        match node.kind() {
            "identifier" => self.at(
                node,
                NodeKind::IdentifierName(IdentifierName {
                    name: self.text(node).to_string(),
                }),
            ),
            "this_expression" | "this" | "base_expression" | "base" => self.at(
                node,
                NodeKind::IdentifierName(IdentifierName {
                    name: self.text(node).to_string(),
                }),
            ),
            "predefined_type" | "qualified_name" | "generic_name" | "nullable_type"
            | "array_type" => self.at(
                node,
                NodeKind::TypeReference(TypeReference {
                    name: self.text(node).to_string(),
                }),
            ),

            "integer_literal" | "real_literal" | "boolean_literal" | "null_literal"
            | "character_literal" => self.at(
                node,
                NodeKind::Literal(Literal {
                    token: self.text(node).to_string(),
                }),
            ),
            "string_literal" => {
                let text = self.text(node);
                let text = text.strip_suffix("u8").unwrap_or(text);
                self.at(
                    node,
                    NodeKind::StringConstant(StringConstant {
                        value: unescape(strip_quotes(text, "\"")),
                    }),
                )
            }
            "verbatim_string_literal" => {
                let text = self.text(node).strip_prefix('@').unwrap_or_default();
                self.at(
                    node,
                    NodeKind::StringConstant(StringConstant {
                        value: strip_quotes(text, "\"").replace("\"\"", "\""),
                    }),
                )
            }
            "raw_string_literal" => self.at(
                node,
                NodeKind::StringConstant(StringConstant {
                    value: strip_quotes(self.text(node), "\"\"\"").to_string(),
                }),
            ),
            "interpolated_string_expression" => self.read_interpolated_string(node),

            "binary_expression" => self.read_binary(node),
            "assignment_expression" => self.read_assignment(node),
            "invocation_expression" => {
                let arguments = node
                    .child_by_field_name("arguments")
                    .map(|list| self.read_arguments(list))
                    .unwrap_or_default();
                self.at(
                    node,
                    NodeKind::Invocation(Invocation {
                        expression: Box::new(self.read_field_expr(node, "function")),
                        arguments,
                    }),
                )
            }
            "member_access_expression" => self.at(
                node,
                NodeKind::MemberAccess(MemberAccess {
                    expression: Box::new(self.read_field_expr(node, "expression")),
                    member: self.field_text(node, "name").unwrap_or_default(),
                }),
            ),
            "element_access_expression" => {
                let arguments = node
                    .child_by_field_name("subscript")
                    .or_else(|| child_of_kind(node, "bracketed_argument_list"))
                    .map(|list| self.read_arguments(list))
                    .unwrap_or_default();
                self.at(
                    node,
                    NodeKind::ElementAccess(ElementAccess {
                        expression: Box::new(self.read_field_expr(node, "expression")),
                        arguments: BracketedArgumentList(arguments),
                    }),
                )
            }
            "object_creation_expression" => {
                let arguments = node
                    .child_by_field_name("arguments")
                    .map(|list| self.read_arguments(list))
                    .unwrap_or_default();
                self.at(
                    node,
                    NodeKind::ObjectCreation(ObjectCreation {
                        type_name: self.field_text(node, "type").unwrap_or_default(),
                        arguments,
                    }),
                )
            }
            "array_creation_expression" => {
                let element_type = node.child_by_field_name("type").map(|array_type| {
                    array_type
                        .child_by_field_name("type")
                        .map(|element| self.text(element).to_string())
                        .unwrap_or_else(|| self.text(array_type).trim_end_matches("[]").to_string())
                });
                self.read_array(node, element_type)
            }
            "implicit_array_creation_expression" | "initializer_expression" => {
                self.read_array(node, None)
            }
            "cast_expression" => self.at(
                node,
                NodeKind::Cast(Cast {
                    type_name: self.field_text(node, "type").unwrap_or_default(),
                    expression: Box::new(self.read_field_expr(node, "value")),
                }),
            ),
            "parenthesized_expression" => match first_named(node) {
                Some(inner) => self.at(
                    node,
                    NodeKind::ParenthesizedExpression(ParenthesizedExpression {
                        expression: Box::new(self.read_expr(inner)),
                    }),
                ),
                None => self.src.unsupported(node),
            },
            "prefix_unary_expression" => match first_named(node) {
                Some(operand) => self.at(
                    node,
                    NodeKind::PrefixUnaryExpression(UnaryExpression {
                        operator: first_token(node, &self.src).unwrap_or_default().to_string(),
                        operand: Box::new(self.read_expr(operand)),
                    }),
                ),
                None => self.src.unsupported(node),
            },
            "postfix_unary_expression" => match first_named(node) {
                Some(operand) => self.at(
                    node,
                    NodeKind::PostfixUnaryExpression(UnaryExpression {
                        operator: last_token(node, &self.src).unwrap_or_default().to_string(),
                        operand: Box::new(self.read_expr(operand)),
                    }),
                ),
                None => self.src.unsupported(node),
            },
            // Blocking on the task is the closest synchronous equivalent.
            "await_expression" => match first_named(node) {
                Some(task) => self.at(
                    node,
                    NodeKind::MemberAccess(MemberAccess {
                        expression: Box::new(self.read_expr(task)),
                        member: "Result".into(),
                    }),
                ),
                None => self.src.unsupported(node),
            },
            "throw_expression" => self.at(
                node,
                NodeKind::Throw(Throw {
                    expression: first_named(node).map(|e| Box::new(self.read_expr(e))),
                }),
            ),
            _ => self.src.unsupported(node),
        }
    }

    fn read_binary(&self, node: SyntaxNode) -> Node {
        let token = node
            .child_by_field_name("operator")
            .map(|op| self.text(op))
            .or_else(|| first_token(node, &self.src))
            .unwrap_or_default();
        let operator = self.operators.lookup(token);
        if operator == BinaryOperator::Unknown {
            tracing::debug!(token, "unmapped C# operator");
        }
        self.at(
            node,
            NodeKind::BinaryExpression(BinaryExpression {
                left: Box::new(self.read_field_expr(node, "left")),
                operator,
                right: Box::new(self.read_field_expr(node, "right")),
            }),
        )
    }

    /// `a = b`; compound forms such as `a += b` become `a = a + b`.
    fn read_assignment(&self, node: SyntaxNode) -> Node {
        let token = node
            .child_by_field_name("operator")
            .map(|op| self.text(op))
            .or_else(|| child_of_kind(node, "assignment_operator").map(|op| self.text(op)))
            .or_else(|| first_token(node, &self.src))
            .unwrap_or("=");
        let left = self.read_field_expr(node, "left");
        let right = self.read_field_expr(node, "right");

        let right = match token.strip_suffix('=') {
            Some("") | None => right,
            Some(op) => {
                let operator = self.operators.lookup(op);
                self.at(
                    node,
                    NodeKind::BinaryExpression(BinaryExpression {
                        left: Box::new(left.clone()),
                        operator,
                        right: Box::new(right),
                    }),
                )
            }
        };

        self.at(
            node,
            NodeKind::Assignment(Assignment {
                left: Box::new(left),
                right: Box::new(right),
            }),
        )
    }

    fn read_array(&self, node: SyntaxNode, element_type: Option<String>) -> Node {
        let initializer = match node.kind() {
            "initializer_expression" => Some(node),
            _ => node
                .child_by_field_name("initializer")
                .or_else(|| child_of_kind(node, "initializer_expression")),
        };
        let elements = initializer
            .map(|init| {
                named_children(init)
                    .into_iter()
                    .map(|e| self.read_expr(e))
                    .collect()
            })
            .unwrap_or_default();
        self.at(
            node,
            NodeKind::ArrayCreation(ArrayCreation {
                element_type,
                elements,
            }),
        )
    }

    fn read_interpolated_string(&self, node: SyntaxNode) -> Node {
        let text = self.text(node);
        let prefix = text.find('"').map(|i| &text[..i]).unwrap_or_default();
        let verbatim = prefix.contains('@');
        let raw = text[prefix.len()..].starts_with("\"\"\"");

        let mut parts = Vec::new();
        for child in named_children(node) {
            match child.kind() {
                "string_content" => {
                    let mut content = self.text(child).to_string();
                    if !raw {
                        content = content.replace("{{", "{").replace("}}", "}");
                    }
                    if verbatim {
                        content = content.replace("\"\"", "\"");
                    }
                    parts.push(TemplatePart::Text(content));
                }
                "escape_sequence" => parts.push(TemplatePart::Text(unescape(self.text(child)))),
                "interpolation" => parts.push(self.read_interpolation(child)),
                _ => {}
            }
        }
        self.at(
            node,
            NodeKind::TemplateStringConstant(TemplateStringConstant::new(parts)),
        )
    }

    fn read_interpolation(&self, node: SyntaxNode) -> TemplatePart {
        let mut expression = None;
        let mut format = String::new();
        for child in named_children(node) {
            match child.kind() {
                "interpolation_brace" => {}
                "interpolation_alignment_clause" | "interpolation_format_clause" => {
                    format.push_str(self.text(child));
                }
                _ if expression.is_none() => expression = Some(self.read_expr(child)),
                _ => {}
            }
        }
        TemplatePart::Hole {
            expression: expression.unwrap_or_else(|| self.src.unsupported(node)),
            format: (!format.is_empty()).then_some(format),
        }
    }

    fn read_arguments(&self, node: SyntaxNode) -> ArgumentList {
        ArgumentList::new(
            named_children(node)
                .into_iter()
                .filter(|arg| matches!(arg.kind(), "argument" | "attribute_argument"))
                .map(|arg| self.read_argument(arg))
                .collect(),
        )
    }

    fn read_argument(&self, node: SyntaxNode) -> Argument {
        let children = named_children(node);
        // `argument` labels through a field; `attribute_argument` has a
        // bare identifier followed by `:` or `=`.
        let label = node.child_by_field_name("name").or_else(|| {
            children.first().copied().filter(|first| {
                first.kind() == "identifier"
                    && first
                        .next_sibling()
                        .is_some_and(|t| !t.is_named() && matches!(t.kind(), ":" | "="))
            })
        });
        let value = children
            .iter()
            .rev()
            .find(|c| Some(**c) != label)
            .map(|v| Box::new(self.read_expr(*v)));
        Argument {
            name: label.map(|id| self.text(id).to_string()),
            value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statements(source: &str) -> Vec<Node> {
        match read_csharp(source).expect("parse failed").kind {
            NodeKind::Block(block) => block.statements,
            other => panic!("expected Block, got {other:?}"),
        }
    }

    fn initializer(stmt: &Node) -> &Node {
        let NodeKind::VariableDeclaration(decl) = &stmt.kind else {
            panic!("expected VariableDeclaration, got {stmt:?}");
        };
        decl.variables[0].initializer.as_deref().expect("initializer")
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r#"a\tb\n\"q\"\\"#), "a\tb\n\"q\"\\");
        assert_eq!(unescape(r"\u0041\x42"), "AB");
        assert_eq!(unescape(r"\q"), "\\q");
    }

    #[test]
    fn test_local_function() {
        let stmts = statements("void Method(string name, bool yes) { }");
        assert_eq!(stmts.len(), 1);
        let NodeKind::MethodDeclaration(method) = &stmts[0].kind else {
            panic!("expected MethodDeclaration");
        };
        assert_eq!(method.name, "Method");
        assert_eq!(method.return_type.as_deref(), Some("void"));
        assert_eq!(
            method.parameters,
            vec![
                Parameter::new(Some("string"), "name"),
                Parameter::new(Some("bool"), "yes"),
            ]
        );
        assert!(method.body.statements.is_empty());
    }

    #[test]
    fn test_namespace_class_method() {
        let stmts = statements("namespace My.Namespace { class Test { public void Method() { } } }");
        let NodeKind::Namespace(ns) = &stmts[0].kind else {
            panic!("expected Namespace");
        };
        assert_eq!(ns.name, "My.Namespace");
        let NodeKind::ClassDeclaration(class) = &ns.members[0].kind else {
            panic!("expected ClassDeclaration");
        };
        assert_eq!(class.name, "Test");
        let NodeKind::MethodDeclaration(method) = &class.members[0].kind else {
            panic!("expected MethodDeclaration");
        };
        assert_eq!(method.modifiers, vec!["public".to_string()]);
    }

    #[test]
    fn test_object_creation() {
        let stmts = statements("void Method() { new MyType(a, b); }");
        let NodeKind::MethodDeclaration(method) = &stmts[0].kind else {
            panic!("expected MethodDeclaration");
        };
        assert_eq!(
            method.body.statements,
            vec![Node::object_creation(
                "MyType",
                vec![
                    Argument::positional(Node::ident("a")),
                    Argument::positional(Node::ident("b")),
                ],
            )]
        );
    }

    #[test]
    fn test_var_declaration() {
        let stmts = statements("var x = 1; int y;");
        assert_eq!(stmts[0], Node::var_decl(None, "x", Some(Node::literal("1"))));
        assert_eq!(stmts[1], Node::var_decl(Some("int"), "y", None));
    }

    #[test]
    fn test_compound_assignment_desugars() {
        let stmts = statements("x += 2;");
        assert_eq!(
            stmts[0],
            Node::assign(
                Node::ident("x"),
                Node::binary(Node::ident("x"), BinaryOperator::Plus, Node::literal("2")),
            )
        );
    }

    #[test]
    fn test_binary_operators() {
        let stmts = statements("var r = a == b && c != d;");
        assert_eq!(
            initializer(&stmts[0]),
            &Node::binary(
                Node::binary(Node::ident("a"), BinaryOperator::Equal, Node::ident("b")),
                BinaryOperator::And,
                Node::binary(Node::ident("c"), BinaryOperator::NotEqual, Node::ident("d")),
            )
        );
    }

    #[test]
    fn test_unmapped_operator_is_unknown() {
        let stmts = statements("var r = a * b;");
        let NodeKind::BinaryExpression(binary) = &initializer(&stmts[0]).kind else {
            panic!("expected BinaryExpression");
        };
        assert_eq!(binary.operator, BinaryOperator::Unknown);
    }

    #[test]
    fn test_strings() {
        let stmts = statements(r#"a = "x\ty"; b = @"c:\dir"; c = $"hi {name}";"#);
        let values: Vec<_> = stmts
            .iter()
            .map(|s| match &s.kind {
                NodeKind::Assignment(a) => (*a.right).clone(),
                other => panic!("expected Assignment, got {other:?}"),
            })
            .collect();
        assert_eq!(values[0], Node::string("x\ty"));
        assert_eq!(values[1], Node::string(r"c:\dir"));
        assert_eq!(
            values[2],
            Node::template(vec![
                TemplatePart::Text("hi ".into()),
                TemplatePart::Hole {
                    expression: Node::ident("name"),
                    format: None,
                },
            ])
        );
    }

    #[test]
    fn test_interpolation_escapes_and_format() {
        let stmts = statements(r#"var s = $"{{a}}\t{x,5:N2}";"#);
        assert_eq!(
            initializer(&stmts[0]),
            &Node::template(vec![
                TemplatePart::Text("{a}\t".into()),
                TemplatePart::Hole {
                    expression: Node::ident("x"),
                    format: Some(",5:N2".into()),
                },
            ])
        );
    }

    #[test]
    fn test_else_if_chain() {
        let stmts = statements("if (a) { } else if (b) { } else { }");
        let NodeKind::IfStatement(outer) = &stmts[0].kind else {
            panic!("expected IfStatement");
        };
        let else_clause = outer.else_clause.as_ref().expect("else clause");
        assert!(else_clause.is_else_if());
    }

    #[test]
    fn test_await_becomes_result() {
        let stmts = statements("var r = await client.GetAsync(url);");
        let NodeKind::VariableDeclaration(decl) = &stmts[0].kind else {
            panic!("expected VariableDeclaration");
        };
        let init = decl.variables[0].initializer.as_deref().expect("initializer");
        let NodeKind::MemberAccess(access) = &init.kind else {
            panic!("expected MemberAccess");
        };
        assert_eq!(access.member, "Result");
    }

    #[test]
    fn test_for_loop() {
        let stmts = statements("for (int i = 0; i < 10; i++) { }");
        let NodeKind::ForStatement(for_stmt) = &stmts[0].kind else {
            panic!("expected ForStatement");
        };
        assert_eq!(for_stmt.initializers.len(), 1);
        assert!(for_stmt.condition.is_some());
        assert_eq!(for_stmt.incrementors.len(), 1);
    }

    #[test]
    fn test_try_catch() {
        let stmts = statements("try { } catch (IOException e) { } finally { }");
        let NodeKind::Try(try_stmt) = &stmts[0].kind else {
            panic!("expected Try");
        };
        assert_eq!(
            try_stmt.catches[0].declaration,
            Some(CatchDeclaration {
                type_name: "IOException".into(),
                identifier: Some("e".into()),
            })
        );
        assert!(try_stmt.finally.is_some());
    }

    #[test]
    fn test_switch_sections() {
        let stmts = statements("switch (x) { case 1: case 2: Foo(); break; default: break; }");
        let NodeKind::SwitchStatement(switch) = &stmts[0].kind else {
            panic!("expected SwitchStatement");
        };
        assert_eq!(switch.sections.len(), 2);
        assert_eq!(
            switch.sections[0].labels,
            vec![
                SwitchLabel::Case(Node::literal("1")),
                SwitchLabel::Case(Node::literal("2")),
            ]
        );
        assert_eq!(
            switch.sections[0].statements,
            vec![
                Node::invocation(Node::ident("Foo"), vec![]),
                Node::new(NodeKind::Break),
            ]
        );
        assert_eq!(switch.sections[1].labels, vec![SwitchLabel::Default]);
        assert_eq!(switch.sections[1].statements, vec![Node::new(NodeKind::Break)]);
    }

    #[test]
    fn test_named_argument() {
        let stmts = statements("File.WriteAllText(path: p, contents: c);");
        let NodeKind::Invocation(call) = &stmts[0].kind else {
            panic!("expected Invocation");
        };
        assert_eq!(call.arguments.arguments[0].name.as_deref(), Some("path"));
        assert_eq!(call.arguments.arguments[1].name.as_deref(), Some("contents"));
        assert_eq!(
            call.arguments.arguments[1].value.as_deref(),
            Some(&Node::ident("c"))
        );
    }

    #[test]
    fn test_spans_point_at_source() {
        let source = "x = 1;";
        let tree = read_csharp(source).unwrap();
        let NodeKind::Block(block) = &tree.kind else {
            panic!("expected Block");
        };
        let span = block.statements[0].span.expect("span");
        assert_eq!(span.text(source), Some("x = 1"));
    }

    #[test]
    fn test_blank_source() {
        assert!(statements("").is_empty());
        assert!(statements("// c\n/* block */").is_empty());
    }

    #[test]
    fn test_syntax_error() {
        let err = read_csharp("void M( { ").unwrap_err();
        let ReadError::Parse { diagnostics } = err else {
            panic!("expected Parse error");
        };
        assert!(!diagnostics.is_empty());
        assert!(diagnostics.iter().all(|d| d.line == 1));
    }

    #[test]
    fn test_unsupported_statement() {
        let stmts = statements("var f = x => x;");
        let NodeKind::VariableDeclaration(decl) = &stmts[0].kind else {
            panic!("expected VariableDeclaration");
        };
        let init = decl.variables[0].initializer.as_deref().expect("initializer");
        assert!(matches!(init.kind, NodeKind::Unknown(_)));
    }
}
