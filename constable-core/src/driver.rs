//! Analysis driver: runs registered rules over compilation units.
//!
//! The driver owns everything between "here is a unit" and "here are
//! the findings":
//! - gathers statements in source order (nested blocks included)
//! - checks them in parallel using Rayon
//! - keeps findings in source order regardless of worker interleaving
//! - abandons the whole unit on cancellation or a rule error
//!
//! Rules never see the driver; they get one statement and a
//! [`RuleContext`] per check.

use crate::cancel::CancellationToken;
use crate::error::ConstableResult;
use crate::findings::Finding;
use crate::logging::log_info;
use crate::rules::{RuleContext, RuleRegistry, SyntaxNodeRef};
use crate::semantics::SemanticModel;
use crate::syntax::{CompilationUnit, Statement, SyntaxKind};
use rayon::prelude::*;
use serde::Serialize;

/// Outcome of analyzing one compilation unit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Display name of the analyzed source.
    pub source: String,
    /// Statements the driver visited, nested ones included.
    pub statements_visited: usize,
    /// Local declarations offered to rules.
    pub declarations_checked: usize,
    /// Findings in source order.
    pub findings: Vec<Finding>,
}

impl AnalysisReport {
    /// Whether any rule reported anything.
    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }

    /// Number of findings in the report.
    pub fn finding_count(&self) -> usize {
        self.findings.len()
    }
}

/// Dispatches every enabled rule over the statements of a unit.
pub struct Analyzer {
    registry: RuleRegistry,
}

impl Analyzer {
    /// An analyzer carrying the built-in rule set.
    pub fn new() -> Self {
        Self {
            registry: RuleRegistry::with_default_rules(),
        }
    }

    /// An analyzer over a caller-assembled registry.
    pub fn with_registry(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    /// The registry driving this analyzer.
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Analyzes one unit against a host semantic model.
    ///
    /// Checks run in parallel but the report lists findings in source
    /// order. The same unit and model always produce the same report.
    pub fn analyze_unit(
        &self,
        unit: &CompilationUnit,
        semantics: &dyn SemanticModel,
        cancel: &CancellationToken,
    ) -> ConstableResult<AnalysisReport> {
        // 1. Gather work items in source order. The indexed collect
        //    below preserves this order no matter how workers interleave.
        let mut work: Vec<(&str, &Statement)> = Vec::new();
        for function in &unit.functions {
            function.body.for_each_statement(&mut |statement| {
                work.push((function.name.as_str(), statement));
            });
        }
        let declarations = work
            .iter()
            .filter(|(_, statement)| statement.kind() == SyntaxKind::LocalDeclaration)
            .count();

        // 2. Check statements in parallel using Rayon.
        let nested: Vec<Vec<Finding>> = work
            .par_iter()
            .map(|&(function, statement)| {
                self.check_statement(function, statement, semantics, cancel)
            })
            .collect::<ConstableResult<_>>()?;

        let findings: Vec<Finding> = nested.into_iter().flatten().collect();
        log_info(&format!(
            "analyzed {}: {} statement(s), {} finding(s)",
            unit.source_name,
            work.len(),
            findings.len()
        ));

        Ok(AnalysisReport {
            source: unit.source_name.clone(),
            statements_visited: work.len(),
            declarations_checked: declarations,
            findings,
        })
    }

    fn check_statement(
        &self,
        function: &str,
        statement: &Statement,
        semantics: &dyn SemanticModel,
        cancel: &CancellationToken,
    ) -> ConstableResult<Vec<Finding>> {
        cancel.ensure_active()?;
        let node = SyntaxNodeRef::from_statement(statement);
        let mut findings = Vec::new();
        for rule in self.registry.rules_for(statement.kind()) {
            let ctx = RuleContext {
                semantics,
                cancel,
                function,
                severity: self.registry.effective_severity(rule.descriptor()),
            };
            if let Some(finding) = rule.check(node, &ctx)? {
                findings.push(finding);
            }
        }
        Ok(findings)
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}
