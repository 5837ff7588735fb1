//! Syntax tree for the analyzed language.
//!
//! The analyzer consumes already-parsed trees; this module defines the
//! node types hosts hand over, the statement kinds rules register
//! interest in, and source spans for reporting.

mod kind;
mod node;
mod span;

pub use kind::SyntaxKind;
pub use node::{
    Assignment, BinaryOp, Block, CompilationUnit, ConversionDeclaration, Expression,
    ExpressionKind, Function, IfStatement, Literal, LocalDeclaration, NodeId, Statement,
    TypeDeclaration, TypeKind, TypeSyntax, UnaryOp, VariableDeclarator, WhileStatement,
};
pub use span::{Position, Span};
