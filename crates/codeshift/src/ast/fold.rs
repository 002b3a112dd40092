//! By-value child rewriting.

use super::*;

type MapFn<'f> = dyn FnMut(Node) -> Node + 'f;

fn map_box(node: Box<Node>, f: &mut MapFn<'_>) -> Box<Node> {
    Box::new(f(*node))
}

fn map_opt(node: Option<Box<Node>>, f: &mut MapFn<'_>) -> Option<Box<Node>> {
    node.map(|n| map_box(n, f))
}

fn map_vec(nodes: Vec<Node>, f: &mut MapFn<'_>) -> Vec<Node> {
    nodes.into_iter().map(|n| f(n)).collect()
}

fn map_block(block: Block, f: &mut MapFn<'_>) -> Block {
    Block::new(map_vec(block.statements, f))
}

fn map_arguments(list: ArgumentList, f: &mut MapFn<'_>) -> ArgumentList {
    ArgumentList::new(
        list.arguments
            .into_iter()
            .map(|arg| Argument {
                name: arg.name,
                value: map_opt(arg.value, f),
            })
            .collect(),
    )
}

impl Node {
    /// Rebuild this node with `f` applied to each direct child node.
    ///
    /// Only nodes are mapped; names, operators, and other scalar parts are
    /// carried over unchanged, as is this node's span. Recursion is up to
    /// `f`.
    pub fn map_children(self, f: &mut MapFn<'_>) -> Node {
        let span = self.span;
        let kind = match self.kind {
            NodeKind::Block(b) => NodeKind::Block(map_block(b, f)),
            NodeKind::Namespace(n) => NodeKind::Namespace(Namespace {
                name: n.name,
                members: map_vec(n.members, f),
            }),
            NodeKind::ClassDeclaration(c) => NodeKind::ClassDeclaration(ClassDeclaration {
                name: c.name,
                members: map_vec(c.members, f),
            }),
            NodeKind::MethodDeclaration(m) => NodeKind::MethodDeclaration(MethodDeclaration {
                body: map_block(m.body, f),
                ..m
            }),
            NodeKind::VariableDeclaration(v) => NodeKind::VariableDeclaration(VariableDeclaration {
                type_name: v.type_name,
                variables: v
                    .variables
                    .into_iter()
                    .map(|d| VariableDeclarator {
                        name: d.name,
                        initializer: map_opt(d.initializer, f),
                    })
                    .collect(),
            }),
            NodeKind::Assignment(a) => NodeKind::Assignment(Assignment {
                left: map_box(a.left, f),
                right: map_box(a.right, f),
            }),
            NodeKind::BinaryExpression(b) => NodeKind::BinaryExpression(BinaryExpression {
                left: map_box(b.left, f),
                operator: b.operator,
                right: map_box(b.right, f),
            }),
            NodeKind::Invocation(i) => NodeKind::Invocation(Invocation {
                expression: map_box(i.expression, f),
                arguments: map_arguments(i.arguments, f),
            }),
            NodeKind::MemberAccess(m) => NodeKind::MemberAccess(MemberAccess {
                expression: map_box(m.expression, f),
                member: m.member,
            }),
            NodeKind::ElementAccess(e) => NodeKind::ElementAccess(ElementAccess {
                expression: map_box(e.expression, f),
                arguments: BracketedArgumentList(map_arguments(e.arguments.0, f)),
            }),
            NodeKind::ObjectCreation(o) => NodeKind::ObjectCreation(ObjectCreation {
                type_name: o.type_name,
                arguments: map_arguments(o.arguments, f),
            }),
            NodeKind::ArrayCreation(a) => NodeKind::ArrayCreation(ArrayCreation {
                element_type: a.element_type,
                elements: map_vec(a.elements, f),
            }),
            NodeKind::IfStatement(i) => NodeKind::IfStatement(IfStatement {
                condition: map_box(i.condition, f),
                body: map_box(i.body, f),
                else_clause: i.else_clause.map(|e| ElseClause {
                    body: map_box(e.body, f),
                }),
            }),
            NodeKind::ForStatement(s) => NodeKind::ForStatement(ForStatement {
                initializers: map_vec(s.initializers, f),
                condition: map_opt(s.condition, f),
                incrementors: map_vec(s.incrementors, f),
                body: map_box(s.body, f),
            }),
            NodeKind::ForEachStatement(s) => NodeKind::ForEachStatement(ForEachStatement {
                variable: s.variable,
                collection: map_box(s.collection, f),
                body: map_box(s.body, f),
            }),
            NodeKind::While(w) => NodeKind::While(While {
                condition: map_box(w.condition, f),
                body: map_box(w.body, f),
            }),
            NodeKind::Try(t) => NodeKind::Try(Try {
                block: map_block(t.block, f),
                catches: t
                    .catches
                    .into_iter()
                    .map(|c| Catch {
                        declaration: c.declaration,
                        block: map_block(c.block, f),
                    })
                    .collect(),
                finally: t.finally.map(|fin| Finally {
                    block: map_block(fin.block, f),
                }),
            }),
            NodeKind::ReturnStatement(r) => NodeKind::ReturnStatement(ReturnStatement {
                expression: map_opt(r.expression, f),
            }),
            NodeKind::Throw(t) => NodeKind::Throw(Throw {
                expression: map_opt(t.expression, f),
            }),
            NodeKind::Cast(c) => NodeKind::Cast(Cast {
                type_name: c.type_name,
                expression: map_box(c.expression, f),
            }),
            NodeKind::ParenthesizedExpression(p) => {
                NodeKind::ParenthesizedExpression(ParenthesizedExpression {
                    expression: map_box(p.expression, f),
                })
            }
            NodeKind::PrefixUnaryExpression(u) => NodeKind::PrefixUnaryExpression(UnaryExpression {
                operator: u.operator,
                operand: map_box(u.operand, f),
            }),
            NodeKind::PostfixUnaryExpression(u) => {
                NodeKind::PostfixUnaryExpression(UnaryExpression {
                    operator: u.operator,
                    operand: map_box(u.operand, f),
                })
            }
            NodeKind::SwitchStatement(s) => NodeKind::SwitchStatement(SwitchStatement {
                expression: map_box(s.expression, f),
                sections: s
                    .sections
                    .into_iter()
                    .map(|section| SwitchSection {
                        labels: section
                            .labels
                            .into_iter()
                            .map(|label| match label {
                                SwitchLabel::Case(value) => SwitchLabel::Case(f(value)),
                                SwitchLabel::Default => SwitchLabel::Default,
                            })
                            .collect(),
                        statements: map_vec(section.statements, f),
                    })
                    .collect(),
            }),
            NodeKind::Using(u) => NodeKind::Using(Using {
                resource: map_box(u.resource, f),
                body: map_box(u.body, f),
            }),
            NodeKind::TemplateStringConstant(t) => NodeKind::TemplateStringConstant(TemplateStringConstant {
                parts: t
                    .parts
                    .into_iter()
                    .map(|part| match part {
                        TemplatePart::Hole { expression, format } => TemplatePart::Hole {
                            expression: f(expression),
                            format,
                        },
                        text => text,
                    })
                    .collect(),
            }),
            leaf @ (NodeKind::Break
            | NodeKind::Continue
            | NodeKind::Literal(_)
            | NodeKind::StringConstant(_)
            | NodeKind::IdentifierName(_)
            | NodeKind::TypeReference(_)
            | NodeKind::Unknown(_)) => leaf,
        };
        Node { kind, span }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rename(node: Node) -> Node {
        match node.kind {
            NodeKind::IdentifierName(id) if id.name == "a" => Node::ident("b"),
            _ => node.map_children(&mut rename),
        }
    }

    #[test]
    fn test_map_reaches_nested_children() {
        let tree = Node::block(vec![Node::if_stmt(
            Node::binary(Node::ident("a"), BinaryOperator::Equal, Node::literal("1")),
            Node::block(vec![Node::invocation(
                Node::ident("Write-Host"),
                vec![Argument::named("Object", Node::ident("a"))],
            )]),
            None,
        )]);

        let expected = Node::block(vec![Node::if_stmt(
            Node::binary(Node::ident("b"), BinaryOperator::Equal, Node::literal("1")),
            Node::block(vec![Node::invocation(
                Node::ident("Write-Host"),
                vec![Argument::named("Object", Node::ident("b"))],
            )]),
            None,
        )]);

        assert_eq!(rename(tree), expected);
    }

    #[test]
    fn test_map_keeps_span_and_leaves() {
        let node = Node::literal("1").with_span(Span::new(3, 4));
        let mapped = node.clone().map_children(&mut |_| Node::literal("2"));
        assert_eq!(mapped, node);
        assert_eq!(mapped.span, Some(Span::new(3, 4)));
    }
}
