//! Findings and severities emitted by rules.

use crate::error::ConstableError;
use crate::syntax::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a reported finding.
///
/// Fixed per rule at registration time; hosts may override it through
/// configuration but rules never decide severity per finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => f.write_str("info"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

impl FromStr for Severity {
    type Err = ConstableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warning),
            other => Err(ConstableError::invalid_argument(format!(
                "unknown severity '{}' (expected 'info' or 'warning')",
                other
            ))),
        }
    }
}

/// A single diagnostic produced by a rule.
///
/// The message is already rendered in the default locale; hosts that
/// localize keep the template parameters (`identifier`) and re-render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Stable rule identifier (e.g. `CST001`).
    pub rule_id: String,
    /// Short rule name (e.g. `make-const`).
    pub rule_name: String,
    pub severity: Severity,
    /// Rendered default-locale message.
    pub message: String,
    /// Representative identifier the message refers to.
    pub identifier: String,
    /// Name of the enclosing function.
    pub function: String,
    /// Source range of the flagged declaration.
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parses() {
        assert_eq!("info".parse::<Severity>().unwrap(), Severity::Info);
        assert_eq!("warning".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("warn".parse::<Severity>().unwrap(), Severity::Warning);
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_display_roundtrip() {
        for severity in [Severity::Info, Severity::Warning] {
            assert_eq!(severity.to_string().parse::<Severity>().unwrap(), severity);
        }
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Severity::Warning).unwrap(),
            "\"warning\""
        );
    }
}
