//! Console reporter — human-readable output with color codes.

use super::{group_by_category, Reporter};
use crate::catalog::Catalog;
use crate::gate::{Decision, Verdict};
use crate::types::Severity;

/// Console reporter for human-readable terminal output.
pub struct ConsoleReporter {
    pub use_color: bool,
    pub show_suggestions: bool,
}

impl ConsoleReporter {
    pub fn new(use_color: bool, show_suggestions: bool) -> Self {
        Self {
            use_color,
            show_suggestions,
        }
    }

    fn severity_prefix(&self, severity: &Severity) -> &'static str {
        match severity {
            Severity::Critical => "critical",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }

    fn color_start(&self, severity: &Severity) -> &'static str {
        if !self.use_color {
            return "";
        }
        match severity {
            Severity::Critical => "\x1b[31;1m", // bold red
            Severity::Error => "\x1b[31m",      // red
            Severity::Warning => "\x1b[33m",    // yellow
            Severity::Info => "\x1b[36m",       // cyan
        }
    }

    fn color_end(&self) -> &'static str {
        if self.use_color {
            "\x1b[0m"
        } else {
            ""
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl Reporter for ConsoleReporter {
    fn name(&self) -> &'static str {
        "console"
    }

    fn generate(&self, path: &str, verdict: &Verdict, catalog: &Catalog) -> String {
        let mut output = String::new();

        if verdict.findings.is_empty() {
            output.push_str(&format!("✓ gatecheck: no findings for {path}\n"));
            return output;
        }

        for (category_id, findings) in group_by_category(verdict, catalog) {
            let category = catalog.category(&category_id);
            let banner = category
                .map(|c| c.banner.as_str())
                .unwrap_or(category_id.as_str());
            output.push_str(&format!("{banner} in {path}:\n"));

            for finding in &findings {
                let prefix = self.severity_prefix(&finding.severity);
                let cs = self.color_start(&finding.severity);
                let ce = self.color_end();
                match finding.line {
                    Some(line) => output.push_str(&format!(
                        "  {cs}{prefix}{ce}: Line {line}: {}\n",
                        finding.message
                    )),
                    None => {
                        output.push_str(&format!("  {cs}{prefix}{ce}: {}\n", finding.message))
                    }
                }
                if self.show_suggestions {
                    if let Some(ref suggestion) = finding.suggestion {
                        output.push_str(&format!("    → {suggestion}\n"));
                    }
                }
            }

            // Remediation notes for categories that forced the rejection.
            if verdict.decision == Decision::Block {
                if let Some(category) = category {
                    let blocking = findings.iter().any(|f| match category.block {
                        crate::catalog::BlockPolicy::AtOrAbove(t) => f.severity >= t,
                        crate::catalog::BlockPolicy::Never => false,
                    });
                    if blocking && !category.notes.is_empty() {
                        output.push('\n');
                        for note in &category.notes {
                            output.push_str(&format!("  • {note}\n"));
                        }
                    }
                }
            }

            output.push('\n');
        }

        let total = verdict.findings.len();
        match verdict.decision {
            Decision::Pass => {
                output.push_str(&format!("Result: PASS ✓ ({total} informational)\n"))
            }
            Decision::Warn => output.push_str(&format!(
                "Result: PASS WITH WARNINGS ⚠ ({total} findings)\n"
            )),
            Decision::Block => output.push_str(&format!("Result: BLOCKED ✗ ({total} findings)\n")),
        }

        output
    }
}
