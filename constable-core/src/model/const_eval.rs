//! Compile-time constant folding.
//!
//! Folding is total and conservative: anything the folder cannot prove
//! constant is `None`, including integer overflow and division by zero.
//! A wrong `Some` here would fabricate findings; a wrong `None` only
//! hides one.

use crate::semantics::ConstantValue;
use crate::syntax::{BinaryOp, Expression, ExpressionKind, Literal, UnaryOp};
use std::collections::HashMap;

/// Folds an expression to its constant value, if it has one.
///
/// `consts` maps names of const locals (whose own initializers folded)
/// to their values; identifiers outside that map never fold. Calls
/// never fold regardless of their callee.
pub(crate) fn fold(
    expr: &Expression,
    consts: &HashMap<String, ConstantValue>,
) -> Option<ConstantValue> {
    match &expr.kind {
        ExpressionKind::Literal(literal) => Some(fold_literal(literal)),
        ExpressionKind::Identifier(name) => consts.get(name).cloned(),
        ExpressionKind::Unary { op, operand } => {
            let value = fold(operand, consts)?;
            fold_unary(*op, value)
        }
        ExpressionKind::Binary { op, left, right } => {
            let left = fold(left, consts)?;
            let right = fold(right, consts)?;
            fold_binary(*op, left, right)
        }
        ExpressionKind::Call { .. } => None,
    }
}

fn fold_literal(literal: &Literal) -> ConstantValue {
    match literal {
        Literal::Int(value) => ConstantValue::Int(*value),
        Literal::Float(value) => ConstantValue::Float(*value),
        Literal::Bool(value) => ConstantValue::Bool(*value),
        Literal::Str(value) => ConstantValue::Str(value.clone()),
        Literal::Null => ConstantValue::Null,
    }
}

fn fold_unary(op: UnaryOp, value: ConstantValue) -> Option<ConstantValue> {
    match (op, value) {
        (UnaryOp::Neg, ConstantValue::Int(v)) => v.checked_neg().map(ConstantValue::Int),
        (UnaryOp::Neg, ConstantValue::Float(v)) => Some(ConstantValue::Float(-v)),
        (UnaryOp::Not, ConstantValue::Bool(v)) => Some(ConstantValue::Bool(!v)),
        _ => None,
    }
}

fn fold_binary(op: BinaryOp, left: ConstantValue, right: ConstantValue) -> Option<ConstantValue> {
    use ConstantValue::*;
    match (op, left, right) {
        // Integer arithmetic, checked: overflow and division by zero
        // are not constants.
        (BinaryOp::Add, Int(l), Int(r)) => l.checked_add(r).map(Int),
        (BinaryOp::Sub, Int(l), Int(r)) => l.checked_sub(r).map(Int),
        (BinaryOp::Mul, Int(l), Int(r)) => l.checked_mul(r).map(Int),
        (BinaryOp::Div, Int(l), Int(r)) => l.checked_div(r).map(Int),
        (BinaryOp::Rem, Int(l), Int(r)) => l.checked_rem(r).map(Int),

        // Float arithmetic; mixed operands promote to float.
        (op, Float(l), Float(r)) if is_arithmetic(op) => Some(Float(apply_float(op, l, r))),
        (op, Int(l), Float(r)) if is_arithmetic(op) => Some(Float(apply_float(op, l as f64, r))),
        (op, Float(l), Int(r)) if is_arithmetic(op) => Some(Float(apply_float(op, l, r as f64))),

        // String concatenation; anything else with strings stays
        // runtime-only.
        (BinaryOp::Add, Str(l), Str(r)) => Some(Str(l + &r)),

        // Boolean logic.
        (BinaryOp::And, Bool(l), Bool(r)) => Some(Bool(l && r)),
        (BinaryOp::Or, Bool(l), Bool(r)) => Some(Bool(l || r)),

        // Comparisons.
        (op, Int(l), Int(r)) if is_comparison(op) => Some(Bool(compare_ord(op, &l, &r))),
        (op, Float(l), Float(r)) if is_comparison(op) => Some(Bool(compare_float(op, l, r))),
        (op, Int(l), Float(r)) if is_comparison(op) => Some(Bool(compare_float(op, l as f64, r))),
        (op, Float(l), Int(r)) if is_comparison(op) => Some(Bool(compare_float(op, l, r as f64))),
        (BinaryOp::Eq, Str(l), Str(r)) => Some(Bool(l == r)),
        (BinaryOp::Ne, Str(l), Str(r)) => Some(Bool(l != r)),
        (BinaryOp::Eq, Bool(l), Bool(r)) => Some(Bool(l == r)),
        (BinaryOp::Ne, Bool(l), Bool(r)) => Some(Bool(l != r)),
        (BinaryOp::Eq, Null, Null) => Some(Bool(true)),
        (BinaryOp::Ne, Null, Null) => Some(Bool(false)),

        _ => None,
    }
}

fn is_arithmetic(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem
    )
}

fn is_comparison(op: BinaryOp) -> bool {
    matches!(
        op,
        BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge
    )
}

fn apply_float(op: BinaryOp, l: f64, r: f64) -> f64 {
    match op {
        BinaryOp::Add => l + r,
        BinaryOp::Sub => l - r,
        BinaryOp::Mul => l * r,
        BinaryOp::Div => l / r,
        BinaryOp::Rem => l % r,
        _ => unreachable!("guarded by is_arithmetic"),
    }
}

fn compare_ord<T: PartialOrd + PartialEq>(op: BinaryOp, l: &T, r: &T) -> bool {
    match op {
        BinaryOp::Eq => l == r,
        BinaryOp::Ne => l != r,
        BinaryOp::Lt => l < r,
        BinaryOp::Le => l <= r,
        BinaryOp::Gt => l > r,
        BinaryOp::Ge => l >= r,
        _ => unreachable!("guarded by is_comparison"),
    }
}

fn compare_float(op: BinaryOp, l: f64, r: f64) -> bool {
    compare_ord(op, &l, &r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Expression;

    fn no_consts() -> HashMap<String, ConstantValue> {
        HashMap::new()
    }

    #[test]
    fn test_literals_fold() {
        let consts = no_consts();
        assert_eq!(
            fold(&Expression::literal(Literal::Int(42)), &consts),
            Some(ConstantValue::Int(42))
        );
        assert_eq!(
            fold(&Expression::literal(Literal::Null), &consts),
            Some(ConstantValue::Null)
        );
    }

    #[test]
    fn test_arithmetic_folds() {
        let consts = no_consts();
        let expr = Expression::binary(
            BinaryOp::Add,
            Expression::literal(Literal::Int(2)),
            Expression::binary(
                BinaryOp::Mul,
                Expression::literal(Literal::Int(3)),
                Expression::literal(Literal::Int(4)),
            ),
        );
        assert_eq!(fold(&expr, &consts), Some(ConstantValue::Int(14)));
    }

    #[test]
    fn test_overflow_is_not_constant() {
        let consts = no_consts();
        let expr = Expression::binary(
            BinaryOp::Add,
            Expression::literal(Literal::Int(i64::MAX)),
            Expression::literal(Literal::Int(1)),
        );
        assert_eq!(fold(&expr, &consts), None);
    }

    #[test]
    fn test_division_by_zero_is_not_constant() {
        let consts = no_consts();
        let expr = Expression::binary(
            BinaryOp::Div,
            Expression::literal(Literal::Int(1)),
            Expression::literal(Literal::Int(0)),
        );
        assert_eq!(fold(&expr, &consts), None);
    }

    #[test]
    fn test_negating_min_is_not_constant() {
        let consts = no_consts();
        let expr = Expression::unary(UnaryOp::Neg, Expression::literal(Literal::Int(i64::MIN)));
        assert_eq!(fold(&expr, &consts), None);
    }

    #[test]
    fn test_string_concat_folds() {
        let consts = no_consts();
        let expr = Expression::binary(
            BinaryOp::Add,
            Expression::literal(Literal::Str("he".to_string())),
            Expression::literal(Literal::Str("llo".to_string())),
        );
        assert_eq!(
            fold(&expr, &consts),
            Some(ConstantValue::Str("hello".to_string()))
        );
    }

    #[test]
    fn test_string_plus_int_does_not_fold() {
        let consts = no_consts();
        let expr = Expression::binary(
            BinaryOp::Add,
            Expression::literal(Literal::Str("n = ".to_string())),
            Expression::literal(Literal::Int(1)),
        );
        assert_eq!(fold(&expr, &consts), None);
    }

    #[test]
    fn test_known_const_identifier_folds() {
        let mut consts = no_consts();
        consts.insert("base".to_string(), ConstantValue::Int(2));
        let expr = Expression::binary(
            BinaryOp::Mul,
            Expression::ident("base"),
            Expression::literal(Literal::Int(3)),
        );
        assert_eq!(fold(&expr, &consts), Some(ConstantValue::Int(6)));
    }

    #[test]
    fn test_unknown_identifier_does_not_fold() {
        let consts = no_consts();
        assert_eq!(fold(&Expression::ident("x"), &consts), None);
    }

    #[test]
    fn test_call_never_folds() {
        let consts = no_consts();
        let expr = Expression::call("now", Vec::new());
        assert_eq!(fold(&expr, &consts), None);
    }

    #[test]
    fn test_comparisons_fold_to_bool() {
        let consts = no_consts();
        let expr = Expression::binary(
            BinaryOp::Lt,
            Expression::literal(Literal::Int(1)),
            Expression::literal(Literal::Int(2)),
        );
        assert_eq!(fold(&expr, &consts), Some(ConstantValue::Bool(true)));
    }

    #[test]
    fn test_logic_folds() {
        let consts = no_consts();
        let expr = Expression::binary(
            BinaryOp::And,
            Expression::literal(Literal::Bool(true)),
            Expression::unary(UnaryOp::Not, Expression::literal(Literal::Bool(true))),
        );
        assert_eq!(fold(&expr, &consts), Some(ConstantValue::Bool(false)));
    }
}
