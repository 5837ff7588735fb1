//! Syntax tree node types.
//!
//! These are plain owned data structures a host parser (or a serialized
//! fixture) produces; the analyzer never builds them from source text
//! itself. Every node type derives serde so compilation units can cross
//! a process boundary as JSON.
//!
//! Node identity: hosts stamp each declaration, declarator, assignment,
//! and expression with a [`NodeId`] unique within the unit. Units loaded
//! from fixtures that omit ids call [`CompilationUnit::assign_ids`] once
//! before analysis.

use crate::syntax::kind::SyntaxKind;
use crate::syntax::span::Span;
use serde::{Deserialize, Serialize};

/// Host-assigned identity of a syntax node, unique within one unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct NodeId(pub u32);

/// Whether a declared type has value or reference semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Value,
    Reference,
}

/// A named type introduced by the unit, with its declared kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub name: String,
    pub kind: TypeKind,
}

/// A user-defined conversion between two type names.
///
/// The semantic model classifies these as existing but user-defined,
/// which disqualifies initializers that rely on them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionDeclaration {
    pub from: String,
    pub to: String,
}

/// One parsed source file: declared types, user conversions, functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationUnit {
    /// Display name of the source (file name, URI, ...).
    pub source_name: String,
    /// Named types the unit declares.
    #[serde(default)]
    pub types: Vec<TypeDeclaration>,
    /// User-defined conversions the unit declares.
    #[serde(default)]
    pub conversions: Vec<ConversionDeclaration>,
    /// Function bodies to analyze.
    pub functions: Vec<Function>,
}

/// A function with an executable body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    /// Declared return type; `None` for functions returning nothing.
    #[serde(default)]
    pub return_type: Option<TypeSyntax>,
    pub body: Block,
    #[serde(default)]
    pub span: Span,
}

/// A braced sequence of statements.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Block {
    pub statements: Vec<Statement>,
    #[serde(default)]
    pub span: Span,
}

impl Block {
    /// Visits every statement in this block and all nested blocks, in
    /// source order. The callback sees a nested statement right after the
    /// statement that contains it.
    pub fn for_each_statement<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a Statement),
    {
        for statement in &self.statements {
            f(statement);
            match statement {
                Statement::If(stmt) => {
                    stmt.then_branch.for_each_statement(f);
                    if let Some(else_branch) = &stmt.else_branch {
                        else_branch.for_each_statement(f);
                    }
                }
                Statement::While(stmt) => stmt.body.for_each_statement(f),
                Statement::Block(block) => block.for_each_statement(f),
                Statement::Local(_) | Statement::Assign(_) | Statement::Expr(_) => {}
            }
        }
    }
}

/// A single statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Statement {
    Local(LocalDeclaration),
    Assign(Assignment),
    Expr(Expression),
    If(IfStatement),
    While(WhileStatement),
    Block(Block),
}

impl Statement {
    /// Reports the registration kind of this statement.
    pub fn kind(&self) -> SyntaxKind {
        match self {
            Statement::Local(_) => SyntaxKind::LocalDeclaration,
            Statement::Assign(_) => SyntaxKind::Assignment,
            Statement::Expr(_) => SyntaxKind::ExpressionStatement,
            Statement::If(_) => SyntaxKind::If,
            Statement::While(_) => SyntaxKind::While,
            Statement::Block(_) => SyntaxKind::Block,
        }
    }

    /// The source range of this statement.
    pub fn span(&self) -> Span {
        match self {
            Statement::Local(decl) => decl.span,
            Statement::Assign(assign) => assign.span,
            Statement::Expr(expr) => expr.span,
            Statement::If(stmt) => stmt.span,
            Statement::While(stmt) => stmt.span,
            Statement::Block(block) => block.span,
        }
    }
}

/// A local declaration: `const? Type name1 = e1, name2 = e2, ...;`
///
/// All declarators share the single declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalDeclaration {
    #[serde(default)]
    pub id: NodeId,
    /// Whether the declaration already carries the const modifier.
    #[serde(default)]
    pub is_const: bool,
    pub declared_type: TypeSyntax,
    /// Declared variables, in source order. Well-formed units have at
    /// least one.
    pub variables: Vec<VariableDeclarator>,
    #[serde(default)]
    pub span: Span,
}

/// One declared variable inside a [`LocalDeclaration`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclarator {
    #[serde(default)]
    pub id: NodeId,
    pub name: String,
    #[serde(default)]
    pub initializer: Option<Expression>,
    #[serde(default)]
    pub span: Span,
}

/// An assignment to a named variable: `name = value;`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(default)]
    pub id: NodeId,
    pub target: String,
    pub value: Expression,
    #[serde(default)]
    pub span: Span,
}

/// An `if` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStatement {
    pub condition: Expression,
    pub then_branch: Block,
    #[serde(default)]
    pub else_branch: Option<Block>,
    #[serde(default)]
    pub span: Span,
}

/// A `while` loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhileStatement {
    pub condition: Expression,
    pub body: Block,
    #[serde(default)]
    pub span: Span,
}

/// A type as written in source, before resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSyntax {
    pub name: String,
    #[serde(default)]
    pub span: Span,
}

impl TypeSyntax {
    /// Creates a type reference with no source span.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            span: Span::default(),
        }
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    #[serde(default)]
    pub id: NodeId,
    pub kind: ExpressionKind,
    #[serde(default)]
    pub span: Span,
}

impl Expression {
    /// Wraps an expression kind with no id or span.
    pub fn new(kind: ExpressionKind) -> Self {
        Self {
            id: NodeId::default(),
            kind,
            span: Span::default(),
        }
    }

    /// A literal expression.
    pub fn literal(literal: Literal) -> Self {
        Self::new(ExpressionKind::Literal(literal))
    }

    /// A variable reference.
    pub fn ident(name: &str) -> Self {
        Self::new(ExpressionKind::Identifier(name.to_string()))
    }

    /// A unary operation.
    pub fn unary(op: UnaryOp, operand: Expression) -> Self {
        Self::new(ExpressionKind::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    /// A binary operation.
    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Self::new(ExpressionKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// A call to a named function.
    pub fn call(callee: &str, arguments: Vec<Expression>) -> Self {
        Self::new(ExpressionKind::Call {
            callee: callee.to_string(),
            arguments,
        })
    }
}

/// The shape of an expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionKind {
    Literal(Literal),
    Identifier(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Call {
        callee: String,
        arguments: Vec<Expression>,
    },
}

/// A literal token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Null,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompilationUnit {
    /// Walks the whole tree and stamps every declaration, declarator,
    /// assignment, and expression with a fresh sequential id.
    ///
    /// Hosts that deserialize units without explicit ids must call this
    /// once before analysis so node identity is unique within the unit.
    pub fn assign_ids(&mut self) {
        let mut next = 0u32;
        for function in &mut self.functions {
            assign_block(&mut function.body, &mut next);
        }
    }
}

fn assign_block(block: &mut Block, next: &mut u32) {
    for statement in &mut block.statements {
        assign_statement(statement, next);
    }
}

fn assign_statement(statement: &mut Statement, next: &mut u32) {
    match statement {
        Statement::Local(decl) => {
            decl.id = fresh(next);
            for declarator in &mut decl.variables {
                declarator.id = fresh(next);
                if let Some(initializer) = &mut declarator.initializer {
                    assign_expression(initializer, next);
                }
            }
        }
        Statement::Assign(assign) => {
            assign.id = fresh(next);
            assign_expression(&mut assign.value, next);
        }
        Statement::Expr(expr) => assign_expression(expr, next),
        Statement::If(stmt) => {
            assign_expression(&mut stmt.condition, next);
            assign_block(&mut stmt.then_branch, next);
            if let Some(else_branch) = &mut stmt.else_branch {
                assign_block(else_branch, next);
            }
        }
        Statement::While(stmt) => {
            assign_expression(&mut stmt.condition, next);
            assign_block(&mut stmt.body, next);
        }
        Statement::Block(block) => assign_block(block, next),
    }
}

fn assign_expression(expr: &mut Expression, next: &mut u32) {
    expr.id = fresh(next);
    match &mut expr.kind {
        ExpressionKind::Unary { operand, .. } => assign_expression(operand, next),
        ExpressionKind::Binary { left, right, .. } => {
            assign_expression(left, next);
            assign_expression(right, next);
        }
        ExpressionKind::Call { arguments, .. } => {
            for argument in arguments {
                assign_expression(argument, next);
            }
        }
        ExpressionKind::Literal(_) | ExpressionKind::Identifier(_) => {}
    }
}

fn fresh(next: &mut u32) -> NodeId {
    let id = NodeId(*next);
    *next += 1;
    id
}
