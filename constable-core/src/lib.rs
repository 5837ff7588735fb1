//! constable-core: NASA-grade const-candidate analysis library
//!
//! This library provides modular components for analyzing function-local
//! declarations and flagging variables that are never reassigned and
//! could be declared constant.
//!
//! # Features
//!
//! - **Const-candidate detection**: Flag locals whose initializers are
//!   compile-time constants and that are never written again
//! - **Multi-variable declarations**: All-or-nothing qualification, one
//!   finding per declaration
//! - **Syntax-driven rules**: Rules register the statement kinds they
//!   want and never see anything else
//! - **Narrow semantic facade**: Hosts adapt their own binder behind one
//!   small trait instead of exposing a type system
//! - **Reference semantic model**: Self-contained semantics for units
//!   described in JSON, no frontend required
//! - **Parallel driver**: Statement checks fan out across Rayon workers
//!   while reports stay in source order
//! - **Cooperative cancellation**: Hosts abort long runs between
//!   semantic queries
//! - **Config overrides**: Disable rules or override severities from
//!   constable.toml
//!
//! # Quick Start
//!
//! Use the [`prelude`] module for convenient imports:
//!
//! ```rust,ignore
//! use constable_core::prelude::*;
//!
//! let mut unit: CompilationUnit = serde_json::from_str(&source_json)?;
//! unit.assign_ids();
//!
//! let model = UnitModel::build(&unit);
//! let analyzer = Analyzer::new();
//! let report = analyzer.analyze_unit(&unit, &model, &CancellationToken::new())?;
//!
//! for finding in &report.findings {
//!     println!("{}: {}", finding.severity, finding.message);
//! }
//! ```
//!
//! # Module Organization
//!
//! - [`syntax`]: Statement and expression trees with stable node ids
//! - [`semantics`]: The facade rules query for types, constants, and flow
//! - [`rules`]: The rule trait, descriptors, and the registry
//! - [`driver`]: Parallel dispatch of rules over compilation units
//! - [`model`]: Reference semantic model built from a unit
//! - [`cancel`]: Cooperative cancellation token
//! - [`error`]: Typed error handling
//!
//! # Cargo Features
//!
//! - `model` (default): Enable the reference semantic model

// Core modules (always available)
pub mod cancel;
pub mod config;
pub mod driver;
pub mod error;
pub mod findings;
pub mod logging;
pub mod prelude;
pub mod report;
pub mod rules;
pub mod semantics;
pub mod syntax;

// Feature-gated modules
#[cfg(feature = "model")]
pub mod model;

// ============================================================================
// Explicit Re-exports (avoiding glob imports for clear API surface)
// ============================================================================

// Error types
pub use error::{ConstableError, ConstableResult, IoResultExt};

// Syntax model
pub use syntax::{
    Assignment, BinaryOp, Block, CompilationUnit, ConversionDeclaration, Expression,
    ExpressionKind, Function, IfStatement, Literal, LocalDeclaration, NodeId, Position, Span,
    Statement, SyntaxKind, TypeDeclaration, TypeKind, TypeSyntax, UnaryOp, VariableDeclarator,
    WhileStatement,
};

// Semantic facade
pub use semantics::{
    BuiltinType, ConstantValue, Conversion, DataFlowRegion, SemanticModel, SemanticType, SymbolId,
};

// Findings
pub use findings::{Finding, Severity};

// Rules and registration
pub use rules::make_const::{MakeConstRule, MAKE_CONST};
pub use rules::{RuleContext, RuleDescriptor, RuleRegistry, SyntaxNodeRef, SyntaxRule};

// Analysis driver
pub use driver::{AnalysisReport, Analyzer};

// Cancellation
pub use cancel::CancellationToken;

// Configuration
pub use config::{load_config, ConstableConfig, OutputConfig, RulesConfig};

// Logging
pub use logging::{init_structured_logging, log_error, log_info, log_warn};

// Reporting
pub use report::{print_json, print_plain};

// Feature-gated re-exports
#[cfg(feature = "model")]
pub use model::UnitModel;
