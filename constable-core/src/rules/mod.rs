//! Rule abstractions: descriptors, contexts, and the rule trait.
//!
//! A rule is a pure function from a syntax node plus a semantic facade
//! to at most one finding. Rules declare the statement kinds they want
//! up front; the driver never hands them anything else. Registration,
//! enablement, and severity overrides live in [`registry`].

pub mod make_const;
pub mod registry;

pub use make_const::MakeConstRule;
pub use registry::RuleRegistry;

use crate::cancel::CancellationToken;
use crate::error::ConstableResult;
use crate::findings::{Finding, Severity};
use crate::semantics::SemanticModel;
use crate::syntax::{
    Assignment, Block, Expression, IfStatement, LocalDeclaration, Statement, SyntaxKind,
    WhileStatement,
};
use serde::Serialize;

/// Static metadata describing a rule.
#[derive(Debug, Clone, Serialize)]
pub struct RuleDescriptor {
    /// Stable identifier, never reused (e.g. `CST001`).
    pub id: &'static str,
    /// Short kebab-case name (e.g. `make-const`).
    pub name: &'static str,
    /// One-line description for rule listings.
    pub description: &'static str,
    /// Default-locale message template. `{name}` is the identifier slot;
    /// hosts that localize substitute their own template.
    pub message_template: &'static str,
    /// Severity used when no override is configured.
    pub default_severity: Severity,
}

impl RuleDescriptor {
    /// Renders the message template for one identifier.
    pub fn message(&self, name: &str) -> String {
        self.message_template.replace("{name}", name)
    }
}

/// Borrowed view of one statement, shaped by its [`SyntaxKind`].
///
/// Rules receive exactly the variants matching the kinds they declared
/// in [`SyntaxRule::interests`].
#[derive(Debug, Clone, Copy)]
pub enum SyntaxNodeRef<'a> {
    LocalDeclaration(&'a LocalDeclaration),
    Assignment(&'a Assignment),
    ExpressionStatement(&'a Expression),
    If(&'a IfStatement),
    While(&'a WhileStatement),
    Block(&'a Block),
}

impl<'a> SyntaxNodeRef<'a> {
    /// Builds the view for a statement; mirrors [`Statement::kind`].
    pub fn from_statement(statement: &'a Statement) -> Self {
        match statement {
            Statement::Local(decl) => SyntaxNodeRef::LocalDeclaration(decl),
            Statement::Assign(assign) => SyntaxNodeRef::Assignment(assign),
            Statement::Expr(expr) => SyntaxNodeRef::ExpressionStatement(expr),
            Statement::If(stmt) => SyntaxNodeRef::If(stmt),
            Statement::While(stmt) => SyntaxNodeRef::While(stmt),
            Statement::Block(block) => SyntaxNodeRef::Block(block),
        }
    }
}

/// Everything a rule may consult while checking one node.
///
/// Contexts are cheap borrowed bundles built per evaluation; rules keep
/// no state of their own between calls.
pub struct RuleContext<'a> {
    /// Semantic facade answering type, constant, and flow queries.
    pub semantics: &'a dyn SemanticModel,
    /// Host cancellation signal, checked before every semantic query.
    pub cancel: &'a CancellationToken,
    /// Name of the enclosing function.
    pub function: &'a str,
    /// Effective severity for findings from this rule.
    pub severity: Severity,
}

/// A syntax-driven analysis rule.
///
/// Implementations are stateless and side-effect free; `Send + Sync` so
/// the driver can evaluate distinct nodes on worker threads. `Ok(None)`
/// means "does not qualify" and is silent; the only error path a rule
/// should produce is forwarded cancellation.
pub trait SyntaxRule: Send + Sync {
    /// Static metadata for this rule.
    fn descriptor(&self) -> &'static RuleDescriptor;

    /// Statement kinds this rule wants to see.
    fn interests(&self) -> &'static [SyntaxKind];

    /// Checks one node; at most one finding per node.
    fn check(
        &self,
        node: SyntaxNodeRef<'_>,
        ctx: &RuleContext<'_>,
    ) -> ConstableResult<Option<Finding>>;
}
