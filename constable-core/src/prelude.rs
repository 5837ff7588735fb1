//! Prelude module for convenient imports.
//!
//! Import commonly used types with a single line:
//!
//! ```rust,ignore
//! use constable_core::prelude::*;
//! ```
//!
//! This provides the most commonly needed types for const-candidate
//! analysis without polluting the namespace with rarely-used items.

// Core analysis types
pub use crate::error::{ConstableError, ConstableResult};
pub use crate::findings::{Finding, Severity};

// Syntax model
pub use crate::syntax::{
    Block, CompilationUnit, Expression, Function, LocalDeclaration, Statement, SyntaxKind,
};

// Semantic facade
pub use crate::semantics::{SemanticModel, SemanticType};

// Rules and registration
pub use crate::rules::{RuleDescriptor, RuleRegistry, SyntaxRule};

// Driving an analysis
pub use crate::cancel::CancellationToken;
pub use crate::driver::{AnalysisReport, Analyzer};

// Configuration
pub use crate::config::{load_config, ConstableConfig};

// Reference semantic model
#[cfg(feature = "model")]
pub use crate::model::UnitModel;
