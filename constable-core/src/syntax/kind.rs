//! Statement node kinds used for rule registration.
//!
//! Rules declare up front which statement kinds they want to see; the
//! driver only routes matching nodes to them. This keeps dispatch a flat
//! table lookup instead of a per-rule tree walk.

use serde::{Deserialize, Serialize};

/// The kind of a statement node, as rules register interest in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxKind {
    /// A local variable declaration, possibly with several declarators.
    LocalDeclaration,
    /// An assignment to an existing variable.
    Assignment,
    /// An expression evaluated for its effects.
    ExpressionStatement,
    /// An `if` statement with optional else branch.
    If,
    /// A `while` loop.
    While,
    /// A braced block of statements.
    Block,
}
