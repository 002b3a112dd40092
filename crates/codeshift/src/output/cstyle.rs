//! Rendering rules shared by C-family targets.
//!
//! Writers call these from their `Visitor` methods and override only what
//! differs through the [`CStyle`] hooks. Braces go on their own line:
//!
//! ```text
//! if (condition)
//! {
//!     statement
//! }
//! ```

use super::emitter::Render;
use crate::ast::*;

/// Emitted in place of an operator the target cannot spell.
pub const UNKNOWN_OPERATOR: &str = "<?>";

/// Per-target hooks for the shared rules.
pub trait CStyle: Render {
    fn operators(&self) -> OperatorSpelling;

    /// Keyword that continues an if-chain (`else if`, `elseif`).
    fn else_if_keyword(&self) -> &'static str;

    /// Appended after simple statements.
    fn terminator(&self) -> &'static str {
        ""
    }

    /// Text after `catch`, e.g. ` (IOException e)`.
    fn catch_declaration(&mut self, declaration: &CatchDeclaration);

    /// An operand of a binary, member, or cast expression.
    fn operand(&mut self, node: &Node) {
        self.node(node);
    }

    /// One argument of a parenthesized call.
    fn argument(&mut self, argument: &Argument) {
        match &argument.value {
            Some(value) => self.node(value),
            None => {
                if let Some(name) = &argument.name {
                    self.append(name);
                }
            }
        }
    }
}

/// Each statement on its own line. Statements that render to nothing take
/// no line.
pub fn statements<W: CStyle>(w: &mut W, statements: &[Node]) {
    for statement in statements {
        let mark = w.out().len();
        w.node(statement);
        if w.out().len() == mark {
            continue;
        }
        if !statement.is_compound() {
            let terminator = w.terminator();
            w.append(terminator);
        }
        w.new_line();
    }
}

/// `{`, the statements one level deeper, `}`.
pub fn braced<W: CStyle>(w: &mut W, body: &[Node]) {
    w.append("{");
    w.indented(|w| {
        w.new_line();
        statements(w, body);
    });
    w.append("}");
}

/// A braced body on the line after its header.
pub fn body<W: CStyle>(w: &mut W, body: &Node) {
    w.new_line();
    braced(w, body.as_statements());
}

pub fn if_statement<W: CStyle>(w: &mut W, node: &IfStatement) {
    conditional(w, "if", node);
}

fn conditional<W: CStyle>(w: &mut W, keyword: &str, node: &IfStatement) {
    w.append(keyword);
    w.append(" (");
    w.node(&node.condition);
    w.append(")");
    body(w, &node.body);

    let Some(else_clause) = &node.else_clause else {
        return;
    };
    w.new_line();
    match &else_clause.body.kind {
        NodeKind::IfStatement(nested) => {
            let keyword = w.else_if_keyword();
            conditional(w, keyword, nested);
        }
        _ => {
            w.append("else");
            body(w, &else_clause.body);
        }
    }
}

pub fn while_loop<W: CStyle>(w: &mut W, node: &While) {
    w.append("while (");
    w.node(&node.condition);
    w.append(")");
    body(w, &node.body);
}

pub fn for_loop<W: CStyle>(w: &mut W, node: &ForStatement) {
    w.append("for (");
    w.separated(&node.initializers, ", ", |w, n| w.node(n));
    w.append("; ");
    if let Some(condition) = &node.condition {
        w.node(condition);
    }
    w.append("; ");
    w.separated(&node.incrementors, ", ", |w, n| w.node(n));
    w.append(")");
    body(w, &node.body);
}

pub fn try_statement<W: CStyle>(w: &mut W, node: &Try) {
    w.append("try");
    w.new_line();
    braced(w, &node.block.statements);
    for catch in &node.catches {
        w.new_line();
        w.append("catch");
        if let Some(declaration) = &catch.declaration {
            w.catch_declaration(declaration);
        }
        w.new_line();
        braced(w, &catch.block.statements);
    }
    if let Some(finally) = &node.finally {
        w.new_line();
        w.append("finally");
        w.new_line();
        braced(w, &finally.block.statements);
    }
}

pub fn binary<W: CStyle>(w: &mut W, node: &BinaryExpression) {
    let spelled = w.operators().spell(node.operator).unwrap_or_else(|| {
        tracing::warn!(operator = ?node.operator, "operator has no spelling in target language");
        UNKNOWN_OPERATOR
    });
    w.operand(&node.left);
    w.append(" ");
    w.append(spelled);
    w.append(" ");
    w.operand(&node.right);
}

pub fn assignment<W: CStyle>(w: &mut W, node: &Assignment) {
    w.node(&node.left);
    w.append(" = ");
    w.node(&node.right);
}

/// `callee(a, b)`; `callee()` when there are no arguments.
pub fn call<W: CStyle>(w: &mut W, node: &Invocation) {
    w.operand(&node.expression);
    argument_list(w, &node.arguments);
}

pub fn argument_list<W: CStyle>(w: &mut W, list: &ArgumentList) {
    w.append("(");
    w.separated(&list.arguments, ", ", |w, a| w.argument(a));
    w.append(")");
}

pub fn member_access<W: CStyle>(w: &mut W, node: &MemberAccess) {
    w.operand(&node.expression);
    w.append(".");
    w.append(&node.member);
}

pub fn element_access<W: CStyle>(w: &mut W, node: &ElementAccess) {
    w.operand(&node.expression);
    w.append("[");
    w.separated(&node.arguments.0.arguments, ", ", |w, a| w.argument(a));
    w.append("]");
}

pub fn parenthesized<W: CStyle>(w: &mut W, node: &ParenthesizedExpression) {
    w.append("(");
    w.node(&node.expression);
    w.append(")");
}

/// `keyword` alone or followed by its operand (`return x`, `throw`).
pub fn keyword_statement<W: CStyle>(w: &mut W, keyword: &str, operand: Option<&Node>) {
    w.append(keyword);
    if let Some(operand) = operand {
        w.append(" ");
        w.node(operand);
    }
}

pub fn postfix<W: CStyle>(w: &mut W, node: &UnaryExpression) {
    w.operand(&node.operand);
    w.append(&node.operator);
}

#[cfg(all(test, feature = "write-csharp", feature = "write-powershell"))]
mod tests {
    use super::*;
    use crate::output::{CSharpWriter, PowerShellWriter};

    fn chain() -> Node {
        Node::block(vec![Node::if_stmt(
            Node::binary(Node::ident("x"), BinaryOperator::Equal, Node::literal("1")),
            Node::block(vec![Node::new(NodeKind::Break)]),
            Some(Node::if_stmt(
                Node::binary(Node::ident("x"), BinaryOperator::Equal, Node::literal("2")),
                Node::block(vec![Node::new(NodeKind::Continue)]),
                Some(Node::block(vec![])),
            )),
        )])
    }

    #[test]
    fn test_else_if_collapses() {
        assert_eq!(
            PowerShellWriter::emit(&chain()),
            "if ($x -eq 1)\n{\n    break\n}\nelseif ($x -eq 2)\n{\n    continue\n}\nelse\n{\n}\n"
        );
        assert_eq!(
            CSharpWriter::emit(&chain()),
            "if (x == 1)\n{\n    break;\n}\nelse if (x == 2)\n{\n    continue;\n}\nelse\n{\n}\n"
        );
    }

    #[test]
    fn test_argument_separators() {
        let call = |n: usize| {
            Node::invocation(
                Node::member(Node::ident("o"), "M"),
                (0..n).map(|i| Argument::positional(Node::literal(i.to_string()))).collect(),
            )
        };
        assert_eq!(CSharpWriter::emit(&call(0)), "o.M();\n");
        assert_eq!(CSharpWriter::emit(&call(1)), "o.M(0);\n");
        assert_eq!(CSharpWriter::emit(&call(3)), "o.M(0, 1, 2);\n");
    }

    #[test]
    fn test_unknown_operator_placeholder() {
        let tree = Node::binary(Node::ident("a"), BinaryOperator::Unknown, Node::ident("b"));
        assert_eq!(CSharpWriter::emit(&tree), "a <?> b;\n");
        assert_eq!(PowerShellWriter::emit(&tree), "$a <?> $b\n");
    }

    #[test]
    fn test_nested_indentation() {
        let tree = Node::block(vec![Node::new(NodeKind::While(While {
            condition: Box::new(Node::literal("true")),
            body: Box::new(Node::block(vec![Node::if_stmt(
                Node::ident("done"),
                Node::new(NodeKind::Break),
                None,
            )])),
        }))]);
        assert_eq!(
            CSharpWriter::emit(&tree),
            "while (true)\n{\n    if (done)\n    {\n        break;\n    }\n}\n"
        );
    }

    #[test]
    fn test_empty_for_clauses() {
        let tree = Node::new(NodeKind::ForStatement(ForStatement {
            initializers: vec![],
            condition: None,
            incrementors: vec![],
            body: Box::new(Node::block(vec![])),
        }));
        assert_eq!(CSharpWriter::emit(&tree), "for (; ; )\n{\n}\n");
    }
}
