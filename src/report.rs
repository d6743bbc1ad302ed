//! The human-readable diagnostics stream: section headers, `Error:`/`Fixing:` lines, and the
//! summary table. A check pass only *produces* diagnostics; this module is the only place that
//! prints.

/// Something a check pass found wrong, rendered on demand into the two lines the report needs.
pub trait Diagnostic {
    /// The `Error: ...` line describing the finding.
    fn error_line(&self) -> String;
    /// The `Fixing: ...` line describing the repair applied for this finding.
    fn fix_line(&self) -> String;
}

/// The findings accumulated by one check pass during one run.
#[derive(Default)]
pub struct Findings {
    errors: Vec<String>,
    fixes: Vec<String>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic. If `repaired` is true, also records its fix line.
    pub fn record<D: Diagnostic>(&mut self, diagnostic: &D, repaired: bool) {
        self.errors.push(diagnostic.error_line());
        if repaired {
            self.fixes.push(diagnostic.fix_line());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The outcome of running one named pass once.
pub struct PassResult {
    pub name: &'static str,
    /// Whether the pass found zero inconsistencies *before* any repair it performed.
    pub valid: bool,
    pub findings: Findings,
}

/// Prints a `=== <name> ===` section header followed by this pass's `Error:`/`Fixing:` lines.
pub fn print_section(result: &PassResult) {
    println!("=== {} ===", result.name);
    for line in &result.findings.errors {
        println!("Error: {line}");
    }
    for line in &result.findings.fixes {
        println!("Fixing: {line}");
    }
    if result.findings.is_empty() {
        println!("No errors found.");
    }
    println!();
}

/// Prints the summary table: one `Valid`/`Errors found` (or, post-fix, `Valid`/`Errors remain`)
/// line per pass, followed by the overall verdict. Returns whether every pass was valid.
pub fn print_summary(results: &[PassResult], post_fix: bool) -> bool {
    println!("=== Summary ===");
    let mut all_valid = true;
    for result in results {
        let status = if result.valid {
            "Valid"
        } else if post_fix {
            "Errors remain"
        } else {
            "Errors found"
        };
        all_valid &= result.valid;
        println!("{}: {status}", result.name);
    }
    println!();
    if all_valid {
        println!("CONSISTENT");
    } else {
        println!("ERRORS DETECTED");
    }
    all_valid
}

#[cfg(test)]
mod test {
    use super::*;

    struct Dummy;

    impl Diagnostic for Dummy {
        fn error_line(&self) -> String {
            "dummy error".to_string()
        }

        fn fix_line(&self) -> String {
            "dummy fix".to_string()
        }
    }

    #[test]
    fn findings_record_errors_and_fixes() {
        let mut findings = Findings::new();
        assert!(findings.is_empty());
        findings.record(&Dummy, true);
        assert!(!findings.is_empty());
        assert_eq!(findings.errors, vec!["dummy error".to_string()]);
        assert_eq!(findings.fixes, vec!["dummy fix".to_string()]);
    }

    #[test]
    fn record_without_repair_skips_fix_line() {
        let mut findings = Findings::new();
        findings.record(&Dummy, false);
        assert_eq!(findings.fixes.len(), 0);
        assert_eq!(findings.errors.len(), 1);
    }

    #[test]
    fn summary_reports_consistent_when_all_valid() {
        let results = vec![PassResult {
            name: "Test",
            valid: true,
            findings: Findings::new(),
        }];
        assert!(print_summary(&results, false));
    }

    #[test]
    fn summary_reports_inconsistent_when_any_invalid() {
        let mut findings = Findings::new();
        findings.record(&Dummy, false);
        let results = vec![PassResult {
            name: "Test",
            valid: false,
            findings,
        }];
        assert!(!print_summary(&results, false));
    }
}
