//! Language-neutral syntax tree.
//!
//! Every reader produces a [`Node`] tree and every writer consumes one. The
//! set of node kinds is closed: [`Node::accept`] matches exhaustively, and
//! writers implement the whole [`Visitor`] trait, so a new kind cannot be
//! added without teaching every writer about it.
//!
//! Nodes own their children. The tree is built bottom-up by the readers and
//! never mutated afterwards; rewrites (see [`Node::map_children`]) consume
//! the old tree and build a new one.

mod fold;
mod operators;
mod visit;

pub use operators::{BinaryOperator, OperatorSpelling, OperatorTable};
pub use visit::Visitor;

use serde::{Deserialize, Serialize};

/// Byte range of the source-language construct a node was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// The original text this span covers, if it lies within `source`.
    pub fn text<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start..self.end)
    }
}

/// A syntax tree node.
///
/// Equality is structural: `span` is a diagnostic back-reference into the
/// source text and is ignored by `==`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl From<NodeKind> for Node {
    fn from(kind: NodeKind) -> Self {
        Node::new(kind)
    }
}

/// The closed set of node variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Block(Block),
    Namespace(Namespace),
    ClassDeclaration(ClassDeclaration),
    MethodDeclaration(MethodDeclaration),
    VariableDeclaration(VariableDeclaration),
    Assignment(Assignment),
    BinaryExpression(BinaryExpression),
    Invocation(Invocation),
    MemberAccess(MemberAccess),
    ElementAccess(ElementAccess),
    ObjectCreation(ObjectCreation),
    ArrayCreation(ArrayCreation),
    IfStatement(IfStatement),
    ForStatement(ForStatement),
    ForEachStatement(ForEachStatement),
    While(While),
    Try(Try),
    Break,
    Continue,
    ReturnStatement(ReturnStatement),
    Throw(Throw),
    Cast(Cast),
    Literal(Literal),
    StringConstant(StringConstant),
    TemplateStringConstant(TemplateStringConstant),
    IdentifierName(IdentifierName),
    TypeReference(TypeReference),
    ParenthesizedExpression(ParenthesizedExpression),
    PrefixUnaryExpression(UnaryExpression),
    PostfixUnaryExpression(UnaryExpression),
    SwitchStatement(SwitchStatement),
    Using(Using),
    Unknown(Unknown),
}

/// Sequence of statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Node>,
}

impl Block {
    pub fn new(statements: Vec<Node>) -> Self {
        Self { statements }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    pub members: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDeclaration {
    pub name: String,
    pub members: Vec<Node>,
}

/// A method, function, constructor, or local function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDeclaration {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub body: Block,
    pub modifiers: Vec<String>,
    pub attributes: Vec<Attribute>,
    /// Declared return type; `None` when the source has no notion of one.
    pub return_type: Option<String>,
}

impl MethodDeclaration {
    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>, body: Block) -> Self {
        Self {
            name: name.into(),
            parameters,
            body,
            modifiers: Vec::new(),
            attributes: Vec::new(),
            return_type: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub type_name: Option<String>,
    pub name: String,
    pub modifiers: Vec<String>,
}

impl Parameter {
    pub fn new(type_name: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.map(str::to_string),
            name: name.into(),
            modifiers: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub arguments: ArgumentList,
}

/// One or more variables introduced together.
///
/// `type_name` is `None` for inferred declarations (`var` in C#, plain
/// assignment in PowerShell).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    pub type_name: Option<String>,
    pub variables: Vec<VariableDeclarator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclarator {
    pub name: String,
    pub initializer: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub left: Box<Node>,
    pub right: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpression {
    pub left: Box<Node>,
    pub operator: BinaryOperator,
    pub right: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invocation {
    pub expression: Box<Node>,
    pub arguments: ArgumentList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberAccess {
    pub expression: Box<Node>,
    pub member: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementAccess {
    pub expression: Box<Node>,
    pub arguments: BracketedArgumentList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectCreation {
    pub type_name: String,
    pub arguments: ArgumentList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayCreation {
    pub element_type: Option<String>,
    pub elements: Vec<Node>,
}

/// A single call-site argument.
///
/// `name` is set for named arguments (`-Path x`, `path: x`). `value` is
/// `None` only for switch parameters such as `-Append`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Argument {
    pub name: Option<String>,
    pub value: Option<Box<Node>>,
}

impl Argument {
    pub fn positional(value: Node) -> Self {
        Self {
            name: None,
            value: Some(Box::new(value)),
        }
    }

    pub fn named(name: impl Into<String>, value: Node) -> Self {
        Self {
            name: Some(name.into()),
            value: Some(Box::new(value)),
        }
    }

    pub fn switch(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            value: None,
        }
    }
}

/// Parenthesized call arguments, in call-site order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArgumentList {
    pub arguments: Vec<Argument>,
}

impl ArgumentList {
    pub fn new(arguments: Vec<Argument>) -> Self {
        Self { arguments }
    }

    pub fn positional(values: Vec<Node>) -> Self {
        Self::new(values.into_iter().map(Argument::positional).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.arguments.len()
    }
}

/// Indexer arguments (`items[1]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BracketedArgumentList(pub ArgumentList);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub condition: Box<Node>,
    pub body: Box<Node>,
    pub else_clause: Option<ElseClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElseClause {
    pub body: Box<Node>,
}

impl ElseClause {
    /// True when the else body is exactly one `if`, i.e. an `else if` chain.
    pub fn is_else_if(&self) -> bool {
        matches!(self.body.kind, NodeKind::IfStatement(_))
    }
}

/// C-style `for (init; condition; increment)`. A declaration in the
/// initializer slot is just a `VariableDeclaration` initializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStatement {
    pub initializers: Vec<Node>,
    pub condition: Option<Box<Node>>,
    pub incrementors: Vec<Node>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForEachStatement {
    pub variable: String,
    pub collection: Box<Node>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct While {
    pub condition: Box<Node>,
    pub body: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Try {
    pub block: Block,
    pub catches: Vec<Catch>,
    pub finally: Option<Finally>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catch {
    pub declaration: Option<CatchDeclaration>,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchDeclaration {
    pub type_name: String,
    pub identifier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finally {
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnStatement {
    pub expression: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Throw {
    pub expression: Option<Box<Node>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cast {
    pub type_name: String,
    pub expression: Box<Node>,
}

/// Numeric, boolean, null, or character token, kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Literal {
    pub token: String,
}

/// A plain string; `value` is the decoded string contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StringConstant {
    pub value: String,
}

/// An interpolated string as alternating literal text and holes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateStringConstant {
    pub parts: Vec<TemplatePart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TemplatePart {
    /// Decoded literal text.
    Text(String),
    /// An interpolated expression. `format` is a .NET composite format
    /// suffix such as `,8:N2`, without the braces.
    Hole { expression: Node, format: Option<String> },
}

impl TemplateStringConstant {
    /// Build from parts, merging adjacent and dropping empty text.
    pub fn new(parts: impl IntoIterator<Item = TemplatePart>) -> Self {
        let mut merged: Vec<TemplatePart> = Vec::new();
        for part in parts {
            if let TemplatePart::Text(text) = &part {
                if text.is_empty() {
                    continue;
                }
                if let Some(TemplatePart::Text(last)) = merged.last_mut() {
                    last.push_str(text);
                    continue;
                }
            }
            merged.push(part);
        }
        Self { parts: merged }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierName {
    pub name: String,
}

/// A type used in expression position (`[DateTime]::Now`, `File.Exists`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeReference {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParenthesizedExpression {
    pub expression: Box<Node>,
}

/// Prefix or postfix unary operation. Logical negation is normalized to
/// `!` by every reader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpression {
    pub operator: String,
    pub operand: Box<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchStatement {
    pub expression: Box<Node>,
    pub sections: Vec<SwitchSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchSection {
    pub labels: Vec<SwitchLabel>,
    pub statements: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SwitchLabel {
    Case(Node),
    Default,
}

/// `using (resource) body`: the resource is a declaration or expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Using {
    pub resource: Box<Node>,
    pub body: Box<Node>,
}

/// Source construct with no mapping; carries a description of what was
/// skipped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unknown {
    pub message: String,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, span: None }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn block(statements: Vec<Node>) -> Self {
        Self::new(NodeKind::Block(Block::new(statements)))
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(NodeKind::IdentifierName(IdentifierName { name: name.into() }))
    }

    pub fn type_ref(name: impl Into<String>) -> Self {
        Self::new(NodeKind::TypeReference(TypeReference { name: name.into() }))
    }

    pub fn literal(token: impl Into<String>) -> Self {
        Self::new(NodeKind::Literal(Literal {
            token: token.into(),
        }))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::new(NodeKind::StringConstant(StringConstant {
            value: value.into(),
        }))
    }

    pub fn template(parts: Vec<TemplatePart>) -> Self {
        Self::new(NodeKind::TemplateStringConstant(TemplateStringConstant::new(parts)))
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(NodeKind::Unknown(Unknown {
            message: message.into(),
        }))
    }

    pub fn member(expression: Node, member: impl Into<String>) -> Self {
        Self::new(NodeKind::MemberAccess(MemberAccess {
            expression: Box::new(expression),
            member: member.into(),
        }))
    }

    pub fn invocation(expression: Node, arguments: Vec<Argument>) -> Self {
        Self::new(NodeKind::Invocation(Invocation {
            expression: Box::new(expression),
            arguments: ArgumentList::new(arguments),
        }))
    }

    pub fn object_creation(type_name: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self::new(NodeKind::ObjectCreation(ObjectCreation {
            type_name: type_name.into(),
            arguments: ArgumentList::new(arguments),
        }))
    }

    pub fn binary(left: Node, operator: BinaryOperator, right: Node) -> Self {
        Self::new(NodeKind::BinaryExpression(BinaryExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }))
    }

    pub fn assign(left: Node, right: Node) -> Self {
        Self::new(NodeKind::Assignment(Assignment {
            left: Box::new(left),
            right: Box::new(right),
        }))
    }

    pub fn if_stmt(condition: Node, body: Node, else_body: Option<Node>) -> Self {
        Self::new(NodeKind::IfStatement(IfStatement {
            condition: Box::new(condition),
            body: Box::new(body),
            else_clause: else_body.map(|body| ElseClause {
                body: Box::new(body),
            }),
        }))
    }

    pub fn method(declaration: MethodDeclaration) -> Self {
        Self::new(NodeKind::MethodDeclaration(declaration))
    }

    pub fn class(name: impl Into<String>, members: Vec<Node>) -> Self {
        Self::new(NodeKind::ClassDeclaration(ClassDeclaration {
            name: name.into(),
            members,
        }))
    }

    pub fn namespace(name: impl Into<String>, members: Vec<Node>) -> Self {
        Self::new(NodeKind::Namespace(Namespace {
            name: name.into(),
            members,
        }))
    }

    pub fn var_decl(type_name: Option<&str>, name: impl Into<String>, init: Option<Node>) -> Self {
        Self::new(NodeKind::VariableDeclaration(VariableDeclaration {
            type_name: type_name.map(str::to_string),
            variables: vec![VariableDeclarator {
                name: name.into(),
                initializer: init.map(Box::new),
            }],
        }))
    }

    /// Statements that own a braced body and therefore never take a
    /// statement terminator.
    pub fn is_compound(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Block(_)
                | NodeKind::Namespace(_)
                | NodeKind::ClassDeclaration(_)
                | NodeKind::MethodDeclaration(_)
                | NodeKind::IfStatement(_)
                | NodeKind::ForStatement(_)
                | NodeKind::ForEachStatement(_)
                | NodeKind::While(_)
                | NodeKind::Try(_)
                | NodeKind::SwitchStatement(_)
                | NodeKind::Using(_)
                | NodeKind::Unknown(_)
        )
    }

    /// Statements of a block body, or the node itself as a one-statement
    /// body.
    pub fn as_statements(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Block(block) => &block.statements,
            _ => std::slice::from_ref(self),
        }
    }

    /// Short variant name, used in diagnostics and trace output.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Block(_) => "Block",
            NodeKind::Namespace(_) => "Namespace",
            NodeKind::ClassDeclaration(_) => "ClassDeclaration",
            NodeKind::MethodDeclaration(_) => "MethodDeclaration",
            NodeKind::VariableDeclaration(_) => "VariableDeclaration",
            NodeKind::Assignment(_) => "Assignment",
            NodeKind::BinaryExpression(_) => "BinaryExpression",
            NodeKind::Invocation(_) => "Invocation",
            NodeKind::MemberAccess(_) => "MemberAccess",
            NodeKind::ElementAccess(_) => "ElementAccess",
            NodeKind::ObjectCreation(_) => "ObjectCreation",
            NodeKind::ArrayCreation(_) => "ArrayCreation",
            NodeKind::IfStatement(_) => "IfStatement",
            NodeKind::ForStatement(_) => "ForStatement",
            NodeKind::ForEachStatement(_) => "ForEachStatement",
            NodeKind::While(_) => "While",
            NodeKind::Try(_) => "Try",
            NodeKind::Break => "Break",
            NodeKind::Continue => "Continue",
            NodeKind::ReturnStatement(_) => "ReturnStatement",
            NodeKind::Throw(_) => "Throw",
            NodeKind::Cast(_) => "Cast",
            NodeKind::Literal(_) => "Literal",
            NodeKind::StringConstant(_) => "StringConstant",
            NodeKind::TemplateStringConstant(_) => "TemplateStringConstant",
            NodeKind::IdentifierName(_) => "IdentifierName",
            NodeKind::TypeReference(_) => "TypeReference",
            NodeKind::ParenthesizedExpression(_) => "ParenthesizedExpression",
            NodeKind::PrefixUnaryExpression(_) => "PrefixUnaryExpression",
            NodeKind::PostfixUnaryExpression(_) => "PostfixUnaryExpression",
            NodeKind::SwitchStatement(_) => "SwitchStatement",
            NodeKind::Using(_) => "Using",
            NodeKind::Unknown(_) => "Unknown",
        }
    }
}
