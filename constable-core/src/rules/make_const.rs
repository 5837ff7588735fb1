//! Flags local declarations whose variables could be declared constant.
//!
//! A declaration qualifies when every one of its variables has a
//! compile-time constant initializer the declared type can absorb
//! without running user code, and no variable is written again anywhere
//! in the enclosing function. Qualification is all-or-nothing: one
//! failing variable clears the whole declaration, and a declaration
//! yields at most one finding.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. already const
//! 2. initializer present
//! 3. conversion to the declared type exists and is not user-defined
//! 4. initializer has a compile-time value
//! 5. string constants demand the built-in string type; other
//!    reference-typed declarations admit only the null constant
//! 6. no variable is written outside its own declaration
//!
//! The reference-type special cases are deliberate conservatism carried
//! over from how constant reference values actually behave: only string
//! and null have constant representations, so everything else would be
//! a false suggestion.

use crate::error::ConstableResult;
use crate::findings::{Finding, Severity};
use crate::rules::{RuleContext, RuleDescriptor, SyntaxNodeRef, SyntaxRule};
use crate::syntax::{LocalDeclaration, SyntaxKind};

/// Metadata for [`MakeConstRule`].
pub static MAKE_CONST: RuleDescriptor = RuleDescriptor {
    id: "CST001",
    name: "make-const",
    description: "local variable is never reassigned and could be declared constant",
    message_template: "variable '{name}' can be declared constant",
    default_severity: Severity::Warning,
};

/// Detects local declarations that could be declared constant.
pub struct MakeConstRule;

impl SyntaxRule for MakeConstRule {
    fn descriptor(&self) -> &'static RuleDescriptor {
        &MAKE_CONST
    }

    fn interests(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::LocalDeclaration]
    }

    fn check(
        &self,
        node: SyntaxNodeRef<'_>,
        ctx: &RuleContext<'_>,
    ) -> ConstableResult<Option<Finding>> {
        match node {
            SyntaxNodeRef::LocalDeclaration(decl) => evaluate(decl, ctx),
            _ => Ok(None),
        }
    }
}

/// Decides whether one declaration qualifies.
///
/// Pure with respect to its inputs: the same declaration and model give
/// the same answer every time. The cancellation token is checked before
/// each semantic query; a tripped token aborts with an error rather
/// than a silent non-finding.
pub fn evaluate(
    decl: &LocalDeclaration,
    ctx: &RuleContext<'_>,
) -> ConstableResult<Option<Finding>> {
    // Already const: nothing to suggest.
    if decl.is_const {
        return Ok(None);
    }

    ctx.cancel.ensure_active()?;
    let declared = ctx.semantics.resolve_type(&decl.declared_type);

    for variable in &decl.variables {
        // A variable without an initializer can never become a constant.
        let Some(initializer) = &variable.initializer else {
            return Ok(None);
        };

        ctx.cancel.ensure_active()?;
        let conversion = ctx.semantics.classify_conversion(initializer, &declared);
        if !conversion.exists || conversion.is_user_defined {
            return Ok(None);
        }

        ctx.cancel.ensure_active()?;
        let Some(value) = ctx.semantics.constant_value(initializer) else {
            return Ok(None);
        };

        // String constants require exactly the built-in string type; any
        // other reference-typed declaration admits only the null constant.
        if value.is_string() {
            if !declared.is_builtin_string() {
                return Ok(None);
            }
        } else if declared.is_reference_type() && !value.is_null() {
            return Ok(None);
        }
    }

    ctx.cancel.ensure_active()?;
    let flow = ctx.semantics.analyze_declaration_flow(decl);

    for variable in &decl.variables {
        ctx.cancel.ensure_active()?;
        // A symbol the model cannot resolve cannot be proven write-free.
        let Some(symbol) = ctx.semantics.declared_symbol(variable) else {
            return Ok(None);
        };
        if flow.is_written_outside(symbol) {
            return Ok(None);
        }
    }

    // The finding names the first variable; well-formed declarations
    // always have one.
    let Some(first) = decl.variables.first() else {
        return Ok(None);
    };

    Ok(Some(Finding {
        rule_id: MAKE_CONST.id.to_string(),
        rule_name: MAKE_CONST.name.to_string(),
        severity: ctx.severity,
        message: MAKE_CONST.message(&first.name),
        identifier: first.name.clone(),
        function: ctx.function.to_string(),
        span: decl.span,
    }))
}
