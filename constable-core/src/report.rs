//! Output formatting - plaintext and JSON.

use crate::driver::AnalysisReport;

/// Prints one report in plain text format.
pub fn print_plain(report: &AnalysisReport) {
    if report.findings.is_empty() {
        println!("{}: no findings.", report.source);
        return;
    }
    println!("{}: {} finding(s):", report.source, report.finding_count());
    for finding in &report.findings {
        println!(
            "{}[{}]: {}",
            finding.severity, finding.rule_id, finding.message
        );
        println!(
            "  --> {}:{} (in {})",
            report.source, finding.span, finding.function
        );
    }
}

/// Prints one report in JSON format.
///
/// Falls back to a minimal summary if serialization fails (should never
/// happen with these types, but NASA-grade means handling all cases).
pub fn print_json(report: &AnalysisReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            // Fallback: output in a simpler format
            eprintln!("[WARN] JSON serialization failed: {}", e);
            println!(
                "{{\"source\": {:?}, \"findings\": {}}}",
                report.source,
                report.finding_count()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::findings::{Finding, Severity};
    use crate::syntax::Span;

    fn sample_report() -> AnalysisReport {
        AnalysisReport {
            source: "sample.json".to_string(),
            statements_visited: 3,
            declarations_checked: 1,
            findings: vec![Finding {
                rule_id: "CST001".to_string(),
                rule_name: "make-const".to_string(),
                severity: Severity::Warning,
                message: "variable 'x' can be declared constant".to_string(),
                identifier: "x".to_string(),
                function: "main".to_string(),
                span: Span::on_line(3, 5, 20),
            }],
        }
    }

    #[test]
    fn test_report_serializes_to_json() {
        let value = serde_json::to_value(sample_report()).unwrap();
        assert_eq!(value["source"], "sample.json");
        assert_eq!(value["findings"][0]["rule_id"], "CST001");
        assert_eq!(value["findings"][0]["severity"], "warning");
    }
}
