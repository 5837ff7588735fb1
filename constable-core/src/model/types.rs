//! Type table and conversion classification for the reference model.

use crate::logging::log_warn;
use crate::semantics::{BuiltinType, Conversion, SemanticType};
use crate::syntax::CompilationUnit;
use std::collections::{HashMap, HashSet};

const BUILTINS: &[BuiltinType] = &[
    BuiltinType::Bool,
    BuiltinType::Char,
    BuiltinType::Int,
    BuiltinType::Long,
    BuiltinType::Float,
    BuiltinType::Double,
    BuiltinType::String,
    BuiltinType::Object,
];

/// Builds the name-to-type table: builtins first, then unit-declared
/// named types. A unit type shadowing a builtin is ignored.
pub(crate) fn build_type_table(unit: &CompilationUnit) -> HashMap<String, SemanticType> {
    let mut table: HashMap<String, SemanticType> = BUILTINS
        .iter()
        .map(|builtin| (builtin.name().to_string(), SemanticType::Builtin(*builtin)))
        .collect();

    for declared in &unit.types {
        if table.contains_key(&declared.name) {
            log_warn(&format!(
                "unit declares type '{}' shadowing a builtin; ignored",
                declared.name
            ));
            continue;
        }
        table.insert(
            declared.name.clone(),
            SemanticType::Named {
                name: declared.name.clone(),
                kind: declared.kind,
            },
        );
    }

    table
}

/// Collects the unit's user-defined conversions as (from, to) name pairs.
pub(crate) fn build_conversion_table(unit: &CompilationUnit) -> HashSet<(String, String)> {
    unit.conversions
        .iter()
        .map(|conversion| (conversion.from.clone(), conversion.to.clone()))
        .collect()
}

/// Classifies the conversion between two resolved types.
///
/// Order matters: built-in conversions win over user-defined ones, and
/// either side being unresolved means no conversion at all.
pub(crate) fn conversion_between(
    source: &SemanticType,
    target: &SemanticType,
    user: &HashSet<(String, String)>,
) -> Conversion {
    if matches!(source, SemanticType::Unresolved) || matches!(target, SemanticType::Unresolved) {
        return Conversion::none();
    }
    if source == target {
        return Conversion::implicit();
    }
    if let (SemanticType::Builtin(from), SemanticType::Builtin(to)) = (source, target) {
        if widens(*from, *to) {
            return Conversion::implicit();
        }
    }
    // Everything boxes or upcasts to object.
    if matches!(target, SemanticType::Builtin(BuiltinType::Object)) {
        return Conversion::implicit();
    }
    if let (Some(from), Some(to)) = (type_name(source), type_name(target)) {
        if user.contains(&(from.to_string(), to.to_string())) {
            return Conversion::user_defined();
        }
    }
    Conversion::none()
}

/// Implicit numeric widenings, plus char into the numeric types.
fn widens(from: BuiltinType, to: BuiltinType) -> bool {
    use BuiltinType::*;
    matches!(
        (from, to),
        (Int, Long)
            | (Int, Float)
            | (Int, Double)
            | (Long, Float)
            | (Long, Double)
            | (Float, Double)
            | (Char, Int)
            | (Char, Long)
            | (Char, Float)
            | (Char, Double)
    )
}

fn type_name(ty: &SemanticType) -> Option<&str> {
    match ty {
        SemanticType::Builtin(builtin) => Some(builtin.name()),
        SemanticType::Named { name, .. } => Some(name),
        SemanticType::Unresolved => None,
    }
}

/// Resolves a named type through the table; unknown names are
/// [`SemanticType::Unresolved`].
pub(crate) fn lookup(table: &HashMap<String, SemanticType>, name: &str) -> SemanticType {
    table.get(name).cloned().unwrap_or(SemanticType::Unresolved)
}

/// Result type for binary arithmetic over two operand types: numeric
/// unification, or `None` when the operation is not numeric.
pub(crate) fn unify_numeric(left: &SemanticType, right: &SemanticType) -> Option<SemanticType> {
    let (SemanticType::Builtin(l), SemanticType::Builtin(r)) = (left, right) else {
        return None;
    };
    if !l.is_numeric() || !r.is_numeric() {
        return None;
    }
    let rank = |builtin: BuiltinType| match builtin {
        BuiltinType::Int => 0,
        BuiltinType::Long => 1,
        BuiltinType::Float => 2,
        BuiltinType::Double => 3,
        _ => 0,
    };
    let wider = if rank(*l) >= rank(*r) { *l } else { *r };
    Some(SemanticType::Builtin(wider))
}
