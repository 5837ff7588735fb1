//! Rule registration and node-kind dispatch.
//!
//! The registry owns all rules and maintains an index from statement
//! kind to the rules that registered interest in it. Dispatch is a flat
//! table lookup; a rule that never asked for a kind never sees it.

use std::collections::{HashMap, HashSet};

use crate::config::ConstableConfig;
use crate::error::ConstableResult;
use crate::findings::Severity;
use crate::logging::log_warn;
use crate::rules::{MakeConstRule, RuleDescriptor, SyntaxRule};
use crate::syntax::SyntaxKind;

/// Owns registered rules, enablement state, and severity overrides.
pub struct RuleRegistry {
    rules: Vec<Box<dyn SyntaxRule>>,
    /// kind -> indices into `rules`, in registration order.
    by_kind: HashMap<SyntaxKind, Vec<usize>>,
    /// Disabled rule ids or names.
    disabled: HashSet<String>,
    /// Severity overrides keyed by rule id or name.
    severity_overrides: HashMap<String, Severity>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            by_kind: HashMap::new(),
            disabled: HashSet::new(),
            severity_overrides: HashMap::new(),
        }
    }

    /// Creates a registry with every built-in rule registered.
    pub fn with_default_rules() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(MakeConstRule));
        registry
    }

    /// Registers a rule and indexes its node-kind interests.
    pub fn register(&mut self, rule: Box<dyn SyntaxRule>) {
        let index = self.rules.len();
        for kind in rule.interests() {
            self.by_kind.entry(*kind).or_default().push(index);
        }
        self.rules.push(rule);
    }

    /// Disables a rule by id or name.
    pub fn disable(&mut self, rule: &str) {
        self.disabled.insert(rule.to_string());
    }

    /// Overrides the registration-time severity for a rule id or name.
    pub fn set_severity(&mut self, rule: &str, severity: Severity) {
        self.severity_overrides.insert(rule.to_string(), severity);
    }

    /// Applies `[rules]` configuration: disables and severity overrides.
    ///
    /// Unknown rule ids are logged and skipped; an unknown severity
    /// string is an error because silently keeping the default would
    /// mask a typo in the config.
    pub fn apply_config(&mut self, config: &ConstableConfig) -> ConstableResult<()> {
        let Some(rules) = &config.rules else {
            return Ok(());
        };
        if let Some(disabled) = &rules.disabled {
            for rule in disabled {
                if !self.is_known(rule) {
                    log_warn(&format!("config disables unknown rule '{}'", rule));
                    continue;
                }
                self.disable(rule);
            }
        }
        if let Some(overrides) = &rules.severity {
            for (rule, level) in overrides {
                if !self.is_known(rule) {
                    log_warn(&format!("config sets severity for unknown rule '{}'", rule));
                    continue;
                }
                let severity = level.parse()?;
                self.set_severity(rule, severity);
            }
        }
        Ok(())
    }

    fn is_known(&self, rule: &str) -> bool {
        self.rules.iter().any(|r| {
            let descriptor = r.descriptor();
            descriptor.id == rule || descriptor.name == rule
        })
    }

    /// Whether a rule is enabled (neither its id nor name is disabled).
    pub fn is_enabled(&self, descriptor: &RuleDescriptor) -> bool {
        !self.disabled.contains(descriptor.id) && !self.disabled.contains(descriptor.name)
    }

    /// Effective severity: override if configured, else the default.
    pub fn effective_severity(&self, descriptor: &RuleDescriptor) -> Severity {
        self.severity_overrides
            .get(descriptor.id)
            .or_else(|| self.severity_overrides.get(descriptor.name))
            .copied()
            .unwrap_or(descriptor.default_severity)
    }

    /// Enabled rules registered for a node kind, in registration order.
    pub fn rules_for(&self, kind: SyntaxKind) -> Vec<&dyn SyntaxRule> {
        self.by_kind
            .get(&kind)
            .map(|indices| {
                indices
                    .iter()
                    .map(|&index| self.rules[index].as_ref())
                    .filter(|rule| self.is_enabled(rule.descriptor()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Descriptors of all registered rules, in registration order.
    pub fn descriptors(&self) -> Vec<&'static RuleDescriptor> {
        self.rules.iter().map(|rule| rule.descriptor()).collect()
    }

    /// Number of registered rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_default_rules()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::error::ConstableResult;
    use crate::findings::Finding;
    use crate::rules::{RuleContext, SyntaxNodeRef};
    use std::collections::HashMap;

    static QUIET_RULE: RuleDescriptor = RuleDescriptor {
        id: "TST000",
        name: "quiet",
        description: "never fires",
        message_template: "{name}",
        default_severity: Severity::Info,
    };

    struct QuietRule;

    impl SyntaxRule for QuietRule {
        fn descriptor(&self) -> &'static RuleDescriptor {
            &QUIET_RULE
        }

        fn interests(&self) -> &'static [SyntaxKind] {
            &[SyntaxKind::Assignment]
        }

        fn check(
            &self,
            _node: SyntaxNodeRef<'_>,
            _ctx: &RuleContext<'_>,
        ) -> ConstableResult<Option<Finding>> {
            Ok(None)
        }
    }

    #[test]
    fn test_default_registry_has_make_const() {
        let registry = RuleRegistry::with_default_rules();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.descriptors()[0].id, "CST001");
        assert_eq!(registry.rules_for(SyntaxKind::LocalDeclaration).len(), 1);
    }

    #[test]
    fn test_dispatch_respects_interests() {
        let mut registry = RuleRegistry::new();
        registry.register(Box::new(QuietRule));
        assert_eq!(registry.rules_for(SyntaxKind::Assignment).len(), 1);
        assert!(registry.rules_for(SyntaxKind::LocalDeclaration).is_empty());
        assert!(registry.rules_for(SyntaxKind::While).is_empty());
    }

    #[test]
    fn test_disable_by_id_and_name() {
        let mut registry = RuleRegistry::with_default_rules();
        registry.disable("CST001");
        assert!(registry.rules_for(SyntaxKind::LocalDeclaration).is_empty());

        let mut registry = RuleRegistry::with_default_rules();
        registry.disable("make-const");
        assert!(registry.rules_for(SyntaxKind::LocalDeclaration).is_empty());
    }

    #[test]
    fn test_severity_override() {
        let mut registry = RuleRegistry::with_default_rules();
        let descriptor = registry.descriptors()[0];
        assert_eq!(registry.effective_severity(descriptor), Severity::Warning);

        registry.set_severity("CST001", Severity::Info);
        assert_eq!(registry.effective_severity(descriptor), Severity::Info);
    }

    #[test]
    fn test_apply_config_overrides_and_disables() {
        let mut severity = HashMap::new();
        severity.insert("make-const".to_string(), "info".to_string());
        let config = ConstableConfig {
            rules: Some(RulesConfig {
                disabled: Some(vec!["no-such-rule".to_string()]),
                severity: Some(severity),
            }),
            output: None,
        };

        let mut registry = RuleRegistry::with_default_rules();
        registry.apply_config(&config).unwrap();

        let descriptor = registry.descriptors()[0];
        assert!(registry.is_enabled(descriptor));
        assert_eq!(registry.effective_severity(descriptor), Severity::Info);
    }

    #[test]
    fn test_apply_config_rejects_bad_severity() {
        let mut severity = HashMap::new();
        severity.insert("CST001".to_string(), "loud".to_string());
        let config = ConstableConfig {
            rules: Some(RulesConfig {
                disabled: None,
                severity: Some(severity),
            }),
            output: None,
        };

        let mut registry = RuleRegistry::with_default_rules();
        assert!(registry.apply_config(&config).is_err());
    }
}
