//! C# writer.

use super::cstyle::{self, CStyle};
use super::emitter::{Emitter, Render, WriteOptions};
use crate::ast::*;
use crate::intent::{Resynthesizer, csharp::CSHARP_RESYNTHESIZER};
use crate::traits::Writer;

/// Static instance of the C# writer for registry.
pub static CSHARP_WRITER: CSharpWriterImpl = CSharpWriterImpl;

/// C# writer implementing the Writer trait.
pub struct CSharpWriterImpl;

impl Writer for CSharpWriterImpl {
    fn language(&self) -> &'static str {
        "csharp"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["cs", "c#", "c-sharp"]
    }

    fn extension(&self) -> &'static str {
        "cs"
    }

    fn write_with(&self, root: &Node, options: &WriteOptions) -> String {
        CSharpWriter::emit_with(root, options)
    }

    fn resynthesizer(&self) -> Option<&dyn Resynthesizer> {
        Some(&CSHARP_RESYNTHESIZER)
    }
}

/// Renders a tree as C# source.
pub struct CSharpWriter {
    out: Emitter,
}

impl CSharpWriter {
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

    fn declaration_header(&mut self, keyword: &str, name: &str) {
        self.append(keyword);
        self.append(" ");
        self.append(name);
        self.new_line();
    }

    fn attribute(&mut self, attribute: &Attribute) {
        self.append("[");
        self.append(&attribute.name);
        if !attribute.arguments.is_empty() {
            cstyle::argument_list(self, &attribute.arguments);
        }
        self.append("]");
        self.new_line();
    }

    fn parameter(&mut self, parameter: &Parameter) {
        for modifier in &parameter.modifiers {
            self.append(modifier);
            self.append(" ");
        }
        self.append(parameter.type_name.as_deref().unwrap_or("object"));
        self.append(" ");
        self.append(&parameter.name);
    }

    fn declarator(&mut self, declarator: &VariableDeclarator) {
        self.append(&declarator.name);
        if let Some(init) = &declarator.initializer {
            self.append(" = ");
            self.node(init);
        }
    }
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            '\0' => escaped.push_str("\\0"),
            c => escaped.push(c),
        }
    }
    escaped
}

impl Render for CSharpWriter {
    fn out(&mut self) -> &mut Emitter {
        &mut self.out
    }
}

impl CStyle for CSharpWriter {
    fn operators(&self) -> OperatorSpelling {
        OperatorSpelling::csharp()
    }

    fn else_if_keyword(&self) -> &'static str {
        "else if"
    }

    fn terminator(&self) -> &'static str {
        ";"
    }

    fn catch_declaration(&mut self, declaration: &CatchDeclaration) {
        self.append(" (");
        self.append(&declaration.type_name);
        if let Some(identifier) = &declaration.identifier {
            self.append(" ");
            self.append(identifier);
        }
        self.append(")");
    }

    fn operand(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Assignment(_) => {
                self.append("(");
                self.node(node);
                self.append(")");
            }
            _ => self.node(node),
        }
    }

    fn argument(&mut self, argument: &Argument) {
        if let Some(name) = &argument.name {
            self.append(name);
            self.append(": ");
        }
        match &argument.value {
            Some(value) => self.node(value),
            None => self.append("true"),
        }
    }
}

impl Visitor for CSharpWriter {
    fn visit_block(&mut self, node: &Block) {
        cstyle::braced(self, &node.statements);
    }

    fn visit_namespace(&mut self, node: &Namespace) {
        self.declaration_header("namespace", &node.name);
        cstyle::braced(self, &node.members);
    }

    fn visit_class_declaration(&mut self, node: &ClassDeclaration) {
        self.declaration_header("class", &node.name);
        cstyle::braced(self, &node.members);
    }

    fn visit_method_declaration(&mut self, node: &MethodDeclaration) {
        for attribute in &node.attributes {
            self.attribute(attribute);
        }
        for modifier in &node.modifiers {
            self.append(modifier);
            self.append(" ");
        }
        self.append(node.return_type.as_deref().unwrap_or("void"));
        self.append(" ");
        self.append(&node.name);
        self.append("(");
        self.separated(&node.parameters, ", ", |w, p| w.parameter(p));
        self.append(")");
        self.new_line();
        cstyle::braced(self, &node.body.statements);
    }

    fn visit_variable_declaration(&mut self, node: &VariableDeclaration) {
        let inferred = node.variables.iter().all(|v| v.initializer.is_some());
        let type_name = match &node.type_name {
            Some(type_name) => type_name.as_str(),
            None if inferred => "var",
            None => "object",
        };
        self.append(type_name);
        self.append(" ");
        self.separated(&node.variables, ", ", |w, d| w.declarator(d));
    }

    fn visit_assignment(&mut self, node: &Assignment) {
        cstyle::assignment(self, node);
    }

    fn visit_binary_expression(&mut self, node: &BinaryExpression) {
        cstyle::binary(self, node);
    }

    fn visit_invocation(&mut self, node: &Invocation) {
        cstyle::call(self, node);
    }

    fn visit_member_access(&mut self, node: &MemberAccess) {
        cstyle::member_access(self, node);
    }

    fn visit_element_access(&mut self, node: &ElementAccess) {
        cstyle::element_access(self, node);
    }

    fn visit_object_creation(&mut self, node: &ObjectCreation) {
        self.append("new ");
        self.append(&node.type_name);
        cstyle::argument_list(self, &node.arguments);
    }

    fn visit_array_creation(&mut self, node: &ArrayCreation) {
        match &node.element_type {
            Some(element_type) => {
                self.append("new ");
                self.append(element_type);
                self.append("[] ");
            }
            None => self.append("new[] "),
        }
        if node.elements.is_empty() {
            self.append("{ }");
            return;
        }
        self.append("{ ");
        self.separated(&node.elements, ", ", |w, e| w.node(e));
        self.append(" }");
    }

    fn visit_if_statement(&mut self, node: &IfStatement) {
        cstyle::if_statement(self, node);
    }

    fn visit_for_statement(&mut self, node: &ForStatement) {
        cstyle::for_loop(self, node);
    }

    fn visit_for_each_statement(&mut self, node: &ForEachStatement) {
        self.append("foreach (var ");
        self.append(&node.variable);
        self.append(" in ");
        self.node(&node.collection);
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
        self.append("(");
        self.append(&node.type_name);
        self.append(")");
        match &node.expression.kind {
            NodeKind::BinaryExpression(_) | NodeKind::Assignment(_) => {
                self.append("(");
                self.node(&node.expression);
                self.append(")");
            }
            _ => self.node(&node.expression),
        }
    }

    fn visit_literal(&mut self, node: &Literal) {
        self.append(&node.token);
    }

    fn visit_string_constant(&mut self, node: &StringConstant) {
        self.append("\"");
        self.append(&escape_string(&node.value));
        self.append("\"");
    }

    fn visit_template_string_constant(&mut self, node: &TemplateStringConstant) {
        self.append("$\"");
        for part in &node.parts {
            match part {
                TemplatePart::Text(text) => {
                    self.append(&escape_string(text).replace('{', "{{").replace('}', "}}"));
                }
                TemplatePart::Hole { expression, format } => {
                    self.append("{");
                    self.node(expression);
                    if let Some(format) = format {
                        self.append(format);
                    }
                    self.append("}");
                }
            }
        }
        self.append("\"");
    }

    fn visit_identifier_name(&mut self, node: &IdentifierName) {
        self.append(&node.name);
    }

    fn visit_type_reference(&mut self, node: &TypeReference) {
        self.append(&node.name);
    }

    fn visit_parenthesized_expression(&mut self, node: &ParenthesizedExpression) {
        cstyle::parenthesized(self, node);
    }

    fn visit_prefix_unary_expression(&mut self, node: &UnaryExpression) {
        self.append(&node.operator);
        self.operand(&node.operand);
    }

    fn visit_postfix_unary_expression(&mut self, node: &UnaryExpression) {
        cstyle::postfix(self, node);
    }

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
                        SwitchLabel::Case(value) => {
                            w.append("case ");
                            w.node(value);
                            w.append(":");
                        }
                        SwitchLabel::Default => w.append("default:"),
                    }
                    w.new_line();
                }
                w.indented(|w| cstyle::statements(w, &section.statements));
            }
        });
        self.append("}");
    }

    fn visit_using(&mut self, node: &Using) {
        self.append("using (");
        self.node(&node.resource);
        self.append(")");
        cstyle::body(self, &node.body);
    }

    fn visit_unknown(&mut self, node: &Unknown) {
        self.append("/* ");
        self.append(&node.message.replace("*/", "* /"));
        self.append(" */");
    }
}
