//! Value types returned by semantic queries.

use crate::syntax::TypeKind;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Built-in types of the analyzed language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuiltinType {
    Bool,
    Char,
    Int,
    Long,
    Float,
    Double,
    String,
    Object,
}

impl BuiltinType {
    /// The source-level spelling of this type.
    pub fn name(self) -> &'static str {
        match self {
            BuiltinType::Bool => "bool",
            BuiltinType::Char => "char",
            BuiltinType::Int => "int",
            BuiltinType::Long => "long",
            BuiltinType::Float => "float",
            BuiltinType::Double => "double",
            BuiltinType::String => "string",
            BuiltinType::Object => "object",
        }
    }

    /// Builtins with reference semantics.
    pub fn is_reference(self) -> bool {
        matches!(self, BuiltinType::String | BuiltinType::Object)
    }

    /// Builtins that participate in numeric widening.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            BuiltinType::Int | BuiltinType::Long | BuiltinType::Float | BuiltinType::Double
        )
    }
}

impl fmt::Display for BuiltinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved type as the semantic model reports it.
///
/// `Unresolved` is not an error: a model that cannot resolve a type
/// syntax answers `Unresolved`, and downstream conversion queries then
/// naturally report that no conversion exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Builtin(BuiltinType),
    Named { name: String, kind: TypeKind },
    Unresolved,
}

impl SemanticType {
    /// Whether values of this type are references.
    ///
    /// `Unresolved` reports `false`; an unresolved type never reaches the
    /// reference-specific checks because its conversions already failed.
    pub fn is_reference_type(&self) -> bool {
        match self {
            SemanticType::Builtin(builtin) => builtin.is_reference(),
            SemanticType::Named { kind, .. } => *kind == TypeKind::Reference,
            SemanticType::Unresolved => false,
        }
    }

    /// True only for the built-in `string` type.
    pub fn is_builtin_string(&self) -> bool {
        matches!(self, SemanticType::Builtin(BuiltinType::String))
    }
}

/// A compile-time constant value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstantValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
    Null,
}

impl ConstantValue {
    /// Whether this is a string constant.
    pub fn is_string(&self) -> bool {
        matches!(self, ConstantValue::Str(_))
    }

    /// Whether this is the null constant.
    pub fn is_null(&self) -> bool {
        matches!(self, ConstantValue::Null)
    }
}

/// Classification of a conversion from an expression to a target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    /// Whether any conversion exists at all.
    pub exists: bool,
    /// Whether the conversion runs user-defined code.
    pub is_user_defined: bool,
}

impl Conversion {
    /// No conversion exists.
    pub fn none() -> Self {
        Self {
            exists: false,
            is_user_defined: false,
        }
    }

    /// A built-in conversion (identity, widening, reference).
    pub fn implicit() -> Self {
        Self {
            exists: true,
            is_user_defined: false,
        }
    }

    /// A conversion through a user-defined operator.
    pub fn user_defined() -> Self {
        Self {
            exists: true,
            is_user_defined: true,
        }
    }
}

/// Opaque identity of a declared variable symbol.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct SymbolId(pub u32);

/// Write-set summary for a declaration's enclosing executable region.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFlowRegion {
    /// Symbols written anywhere in the region other than at their own
    /// declaration initializer.
    pub written_outside: HashSet<SymbolId>,
}

impl DataFlowRegion {
    /// Whether the region writes this symbol outside its declaration.
    pub fn is_written_outside(&self, symbol: SymbolId) -> bool {
        self.written_outside.contains(&symbol)
    }
}
