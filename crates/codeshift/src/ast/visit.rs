//! Double dispatch over node kinds.

use super::*;

/// One method per node kind. There are no default bodies: an implementor
/// that forgets a kind does not compile.
pub trait Visitor {
    fn visit_block(&mut self, node: &Block);
    fn visit_namespace(&mut self, node: &Namespace);
    fn visit_class_declaration(&mut self, node: &ClassDeclaration);
    fn visit_method_declaration(&mut self, node: &MethodDeclaration);
    fn visit_variable_declaration(&mut self, node: &VariableDeclaration);
    fn visit_assignment(&mut self, node: &Assignment);
    fn visit_binary_expression(&mut self, node: &BinaryExpression);
    fn visit_invocation(&mut self, node: &Invocation);
    fn visit_member_access(&mut self, node: &MemberAccess);
    fn visit_element_access(&mut self, node: &ElementAccess);
    fn visit_object_creation(&mut self, node: &ObjectCreation);
    fn visit_array_creation(&mut self, node: &ArrayCreation);
    fn visit_if_statement(&mut self, node: &IfStatement);
    fn visit_for_statement(&mut self, node: &ForStatement);
    fn visit_for_each_statement(&mut self, node: &ForEachStatement);
    fn visit_while(&mut self, node: &While);
    fn visit_try(&mut self, node: &Try);
    fn visit_break(&mut self);
    fn visit_continue(&mut self);
    fn visit_return_statement(&mut self, node: &ReturnStatement);
    fn visit_throw(&mut self, node: &Throw);
    fn visit_cast(&mut self, node: &Cast);
    fn visit_literal(&mut self, node: &Literal);
    fn visit_string_constant(&mut self, node: &StringConstant);
    fn visit_template_string_constant(&mut self, node: &TemplateStringConstant);
    fn visit_identifier_name(&mut self, node: &IdentifierName);
    fn visit_type_reference(&mut self, node: &TypeReference);
    fn visit_parenthesized_expression(&mut self, node: &ParenthesizedExpression);
    fn visit_prefix_unary_expression(&mut self, node: &UnaryExpression);
    fn visit_postfix_unary_expression(&mut self, node: &UnaryExpression);
    fn visit_switch_statement(&mut self, node: &SwitchStatement);
    fn visit_using(&mut self, node: &Using);
    fn visit_unknown(&mut self, node: &Unknown);
}

impl Node {
    /// Dispatch to the visitor method for this node's kind.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) {
        match &self.kind {
            NodeKind::Block(n) => visitor.visit_block(n),
            NodeKind::Namespace(n) => visitor.visit_namespace(n),
            NodeKind::ClassDeclaration(n) => visitor.visit_class_declaration(n),
            NodeKind::MethodDeclaration(n) => visitor.visit_method_declaration(n),
            NodeKind::VariableDeclaration(n) => visitor.visit_variable_declaration(n),
            NodeKind::Assignment(n) => visitor.visit_assignment(n),
            NodeKind::BinaryExpression(n) => visitor.visit_binary_expression(n),
            NodeKind::Invocation(n) => visitor.visit_invocation(n),
            NodeKind::MemberAccess(n) => visitor.visit_member_access(n),
            NodeKind::ElementAccess(n) => visitor.visit_element_access(n),
            NodeKind::ObjectCreation(n) => visitor.visit_object_creation(n),
            NodeKind::ArrayCreation(n) => visitor.visit_array_creation(n),
            NodeKind::IfStatement(n) => visitor.visit_if_statement(n),
            NodeKind::ForStatement(n) => visitor.visit_for_statement(n),
            NodeKind::ForEachStatement(n) => visitor.visit_for_each_statement(n),
            NodeKind::While(n) => visitor.visit_while(n),
            NodeKind::Try(n) => visitor.visit_try(n),
            NodeKind::Break => visitor.visit_break(),
            NodeKind::Continue => visitor.visit_continue(),
            NodeKind::ReturnStatement(n) => visitor.visit_return_statement(n),
            NodeKind::Throw(n) => visitor.visit_throw(n),
            NodeKind::Cast(n) => visitor.visit_cast(n),
            NodeKind::Literal(n) => visitor.visit_literal(n),
            NodeKind::StringConstant(n) => visitor.visit_string_constant(n),
            NodeKind::TemplateStringConstant(n) => visitor.visit_template_string_constant(n),
            NodeKind::IdentifierName(n) => visitor.visit_identifier_name(n),
            NodeKind::TypeReference(n) => visitor.visit_type_reference(n),
            NodeKind::ParenthesizedExpression(n) => visitor.visit_parenthesized_expression(n),
            NodeKind::PrefixUnaryExpression(n) => visitor.visit_prefix_unary_expression(n),
            NodeKind::PostfixUnaryExpression(n) => visitor.visit_postfix_unary_expression(n),
            NodeKind::SwitchStatement(n) => visitor.visit_switch_statement(n),
            NodeKind::Using(n) => visitor.visit_using(n),
            NodeKind::Unknown(n) => visitor.visit_unknown(n),
        }
    }
}
