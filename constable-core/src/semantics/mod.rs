//! Semantic facade between rules and the host's type system.
//!
//! Rules never talk to a compiler frontend directly. They see one narrow
//! trait, [`SemanticModel`], answering exactly the questions the rules
//! ask: type resolution, conversion classification, constant evaluation,
//! write-set flow analysis, and declarator-to-symbol resolution.
//!
//! Keeping the surface this small has two payoffs:
//! - Hosts with a real frontend implement five methods and nothing else.
//! - Tests script the answers with a fake instead of standing up a
//!   compiler (see the fakes in the rule test modules).
//!
//! # Example
//!
//! ```ignore
//! struct FrontendModel { /* handles into the host compiler */ }
//!
//! impl SemanticModel for FrontendModel {
//!     fn resolve_type(&self, ty: &TypeSyntax) -> SemanticType {
//!         self.binder.lookup(&ty.name).into()
//!     }
//!     // ...
//! }
//! ```

mod types;

pub use types::{
    BuiltinType, ConstantValue, Conversion, DataFlowRegion, SemanticType, SymbolId,
};

use crate::syntax::{Expression, LocalDeclaration, TypeSyntax, VariableDeclarator};

/// Read-only semantic queries over one compilation unit.
///
/// All methods are pure reads: answering a query never mutates host
/// state, so distinct evaluations may run concurrently over one model.
/// `Send + Sync` is part of the contract for that reason.
///
/// "Don't know" answers are values, not errors: an unresolvable type is
/// [`SemanticType::Unresolved`], a non-constant expression is `None`, an
/// impossible conversion is [`Conversion::none`]. Rules treat all of
/// them as disqualifying, never as faults.
pub trait SemanticModel: Send + Sync {
    /// Resolves a type as written in source to its semantic type.
    fn resolve_type(&self, ty: &TypeSyntax) -> SemanticType;

    /// Classifies the conversion from an expression to a target type.
    fn classify_conversion(&self, expr: &Expression, target: &SemanticType) -> Conversion;

    /// The compile-time value of an expression, if it has one.
    fn constant_value(&self, expr: &Expression) -> Option<ConstantValue>;

    /// Write-set analysis of the declaration's enclosing executable
    /// region (its containing function body).
    fn analyze_declaration_flow(&self, decl: &LocalDeclaration) -> DataFlowRegion;

    /// The symbol a declarator introduces, if the model can resolve it.
    fn declared_symbol(&self, declarator: &VariableDeclarator) -> Option<SymbolId>;
}
