//! Reference semantic model built from a [`CompilationUnit`].
//!
//! Hosts with a real frontend implement [`SemanticModel`] on top of
//! their own binder and never touch this module. Everything else gets a
//! self-contained model that:
//!
//! - resolves built-in type names and the unit's declared types
//! - classifies identity, widening, reference, and user-defined
//!   conversions
//! - folds constant expressions, including references to earlier
//!   `const` locals
//! - computes per-function write sets for the flow queries
//!
//! The model is conservative by construction: every question it cannot
//! answer precisely is answered in the direction that suppresses a
//! finding.

mod const_eval;
mod flow;
mod types;

use crate::semantics::{
    BuiltinType, ConstantValue, Conversion, DataFlowRegion, SemanticModel, SemanticType, SymbolId,
};
use crate::syntax::{
    BinaryOp, CompilationUnit, Expression, ExpressionKind, Literal, LocalDeclaration, TypeSyntax,
    UnaryOp, VariableDeclarator,
};
use flow::FlowTables;
use std::collections::{HashMap, HashSet};

/// Semantic model answering queries from unit-local information only.
///
/// Build one per [`CompilationUnit`] after [`CompilationUnit::assign_ids`]
/// has stamped node identities; queries key off those ids.
#[derive(Debug)]
pub struct UnitModel {
    types: HashMap<String, SemanticType>,
    user_conversions: HashSet<(String, String)>,
    return_types: HashMap<String, SemanticType>,
    flow: FlowTables,
}

impl UnitModel {
    /// Builds the type table, conversion table, and flow tables for the
    /// unit.
    pub fn build(unit: &CompilationUnit) -> Self {
        let type_table = types::build_type_table(unit);
        let user_conversions = types::build_conversion_table(unit);
        let return_types = unit
            .functions
            .iter()
            .filter_map(|function| {
                function
                    .return_type
                    .as_ref()
                    .map(|ty| (function.name.clone(), types::lookup(&type_table, &ty.name)))
            })
            .collect();
        let flow = flow::collect(unit, &type_table);
        Self {
            types: type_table,
            user_conversions,
            return_types,
            flow,
        }
    }

    /// Types an expression bottom-up. Anything outside the model's
    /// reach is `Unresolved`, which downstream queries treat as "no".
    fn expr_type(&self, expr: &Expression) -> SemanticType {
        match &expr.kind {
            ExpressionKind::Literal(literal) => match literal {
                Literal::Int(_) => SemanticType::Builtin(BuiltinType::Int),
                Literal::Float(_) => SemanticType::Builtin(BuiltinType::Double),
                Literal::Bool(_) => SemanticType::Builtin(BuiltinType::Bool),
                Literal::Str(_) => SemanticType::Builtin(BuiltinType::String),
                // Null has no type of its own; conversion handling
                // special-cases it.
                Literal::Null => SemanticType::Unresolved,
            },
            ExpressionKind::Identifier(name) => self
                .flow
                .expr_function
                .get(&expr.id)
                .and_then(|&index| self.flow.functions[index].local_types.get(name))
                .cloned()
                .unwrap_or(SemanticType::Unresolved),
            ExpressionKind::Call { callee, .. } => self
                .return_types
                .get(callee)
                .cloned()
                .unwrap_or(SemanticType::Unresolved),
            ExpressionKind::Unary { op, operand } => match op {
                UnaryOp::Neg => {
                    let operand_type = self.expr_type(operand);
                    match &operand_type {
                        SemanticType::Builtin(builtin) if builtin.is_numeric() => operand_type,
                        _ => SemanticType::Unresolved,
                    }
                }
                UnaryOp::Not => SemanticType::Builtin(BuiltinType::Bool),
            },
            ExpressionKind::Binary { op, left, right } => match op {
                BinaryOp::Add => {
                    let left_type = self.expr_type(left);
                    let right_type = self.expr_type(right);
                    if left_type.is_builtin_string() && right_type.is_builtin_string() {
                        SemanticType::Builtin(BuiltinType::String)
                    } else {
                        types::unify_numeric(&left_type, &right_type)
                            .unwrap_or(SemanticType::Unresolved)
                    }
                }
                BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => {
                    types::unify_numeric(&self.expr_type(left), &self.expr_type(right))
                        .unwrap_or(SemanticType::Unresolved)
                }
                BinaryOp::And
                | BinaryOp::Or
                | BinaryOp::Eq
                | BinaryOp::Ne
                | BinaryOp::Lt
                | BinaryOp::Le
                | BinaryOp::Gt
                | BinaryOp::Ge => SemanticType::Builtin(BuiltinType::Bool),
            },
        }
    }
}

impl SemanticModel for UnitModel {
    fn resolve_type(&self, ty: &TypeSyntax) -> SemanticType {
        types::lookup(&self.types, &ty.name)
    }

    fn classify_conversion(&self, expr: &Expression, target: &SemanticType) -> Conversion {
        if matches!(target, SemanticType::Unresolved) {
            return Conversion::none();
        }
        // The null literal converts to any reference target and to
        // nothing else; it is typed before the general path would be.
        if matches!(&expr.kind, ExpressionKind::Literal(Literal::Null)) {
            return if target.is_reference_type() {
                Conversion::implicit()
            } else {
                Conversion::none()
            };
        }
        types::conversion_between(&self.expr_type(expr), target, &self.user_conversions)
    }

    fn constant_value(&self, expr: &Expression) -> Option<ConstantValue> {
        let empty = HashMap::new();
        let consts = self
            .flow
            .expr_function
            .get(&expr.id)
            .map(|&index| &self.flow.functions[index].const_values)
            .unwrap_or(&empty);
        const_eval::fold(expr, consts)
    }

    fn analyze_declaration_flow(&self, decl: &LocalDeclaration) -> DataFlowRegion {
        let Some(&index) = self.flow.decl_function.get(&decl.id) else {
            return DataFlowRegion::default();
        };
        let function = &self.flow.functions[index];
        let own: HashSet<SymbolId> = decl
            .variables
            .iter()
            .filter_map(|declarator| self.flow.declarator_symbols.get(&declarator.id).copied())
            .collect();
        // Assignments count wherever they appear; initializer writes
        // count except at the queried declaration itself.
        let mut written_outside = function.assigned.clone();
        written_outside.extend(function.initializer_written.difference(&own).copied());
        DataFlowRegion { written_outside }
    }

    fn declared_symbol(&self, declarator: &VariableDeclarator) -> Option<SymbolId> {
        self.flow.declarator_symbols.get(&declarator.id).copied()
    }
}
