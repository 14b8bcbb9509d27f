//! Gate decision — maps surviving findings onto the verdict protocol.
//!
//! Per invocation the machine is a single forward pass:
//! parsed envelope → (irrelevant → pass) | scanned → suppressed →
//! aggregated → decided. Terminal outcomes are Pass, Warn, and Block; an
//! engine fault is a separate channel and never expressed as a verdict.

use serde::Serialize;

use crate::catalog::{BlockPolicy, Catalog};
use crate::types::{Finding, Severity};

/// Final decision for one proposed change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Pass,
    Warn,
    Block,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Decision::Pass => "pass",
            Decision::Warn => "warn",
            Decision::Block => "block",
        })
    }
}

/// The signal handed back to the hosting agent.
///
/// `Reject` tells the caller the change must not be applied as-is; the
/// caller is expected to remediate and resubmit. Engine faults use a
/// different exit code entirely (1) so telemetry can never confuse a
/// broken gate with a policy rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitSignal {
    Allow,
    AllowWithReport,
    Reject,
}

impl ExitSignal {
    /// Process exit code for the hook protocol. Exit 2 feeds the report
    /// back into the agent's edit loop; exit 0 lets the change through.
    pub fn code(&self) -> i32 {
        match self {
            ExitSignal::Allow | ExitSignal::AllowWithReport => 0,
            ExitSignal::Reject => 2,
        }
    }
}

/// Exit code reserved for faults in the gate itself.
pub const FAULT_EXIT_CODE: i32 = 1;

/// The verdict for one change request. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct Verdict {
    pub decision: Decision,
    pub exit: ExitSignal,
    pub findings: Vec<Finding>,
}

impl Verdict {
    /// The implicit pass used for irrelevant or non-mutating requests.
    pub fn pass() -> Self {
        Self {
            decision: Decision::Pass,
            exit: ExitSignal::Allow,
            findings: Vec::new(),
        }
    }

    pub fn max_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }
}

/// Arbitrate the final decision over all findings.
///
/// Each finding contributes the strongest outcome its own category allows:
/// Block when it meets the category's blocking threshold, otherwise Warn
/// at warning-or-above, otherwise nothing. The overall decision is the
/// maximum contribution, so adding a finding can only escalate.
pub fn decide(findings: Vec<Finding>, catalog: &Catalog) -> Verdict {
    let mut decision = Decision::Pass;

    for finding in &findings {
        let block = catalog
            .category(&finding.category)
            .map(|c| c.block)
            .unwrap_or(BlockPolicy::Never);

        let contribution = match block {
            BlockPolicy::AtOrAbove(threshold) if finding.severity >= threshold => Decision::Block,
            _ if finding.severity >= Severity::Warning => Decision::Warn,
            _ => Decision::Pass,
        };
        decision = decision.max(contribution);
    }

    let exit = match decision {
        Decision::Pass => ExitSignal::Allow,
        Decision::Warn => ExitSignal::AllowWithReport,
        Decision::Block => ExitSignal::Reject,
    };

    Verdict {
        decision,
        exit,
        findings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PathPolicy, Relevance, RuleCategory};

    fn catalog() -> Catalog {
        Catalog {
            path_policy: PathPolicy::default(),
            categories: vec![
                RuleCategory::new("blocking", "B", Relevance::Always)
                    .with_block(BlockPolicy::AtOrAbove(Severity::Error)),
                RuleCategory::new("advisory", "A", Relevance::Always),
                RuleCategory::new("critical-only", "C", Relevance::Always)
                    .with_block(BlockPolicy::AtOrAbove(Severity::Critical)),
            ],
        }
    }

    fn finding(category: &str, severity: Severity) -> Finding {
        Finding {
            category: category.to_string(),
            rule: "r".to_string(),
            severity,
            message: "m".to_string(),
            line: None,
            excerpt: None,
            suggestion: None,
        }
    }

    #[test]
    fn no_findings_is_pass_allow() {
        let verdict = decide(Vec::new(), &catalog());
        assert_eq!(verdict.decision, Decision::Pass);
        assert_eq!(verdict.exit.code(), 0);
    }

    #[test]
    fn info_only_findings_still_pass() {
        let verdict = decide(vec![finding("advisory", Severity::Info)], &catalog());
        assert_eq!(verdict.decision, Decision::Pass);
        assert_eq!(verdict.exit, ExitSignal::Allow);
    }

    #[test]
    fn threshold_met_blocks_with_exit_2() {
        let verdict = decide(vec![finding("blocking", Severity::Error)], &catalog());
        assert_eq!(verdict.decision, Decision::Block);
        assert_eq!(verdict.exit.code(), 2);
    }

    #[test]
    fn advisory_category_never_blocks() {
        let verdict = decide(vec![finding("advisory", Severity::Critical)], &catalog());
        assert_eq!(verdict.decision, Decision::Warn);
        assert_eq!(verdict.exit.code(), 0);
    }

    #[test]
    fn critical_only_category_warns_on_error() {
        let verdict = decide(vec![finding("critical-only", Severity::Error)], &catalog());
        assert_eq!(verdict.decision, Decision::Warn);
        let verdict = decide(vec![finding("critical-only", Severity::Critical)], &catalog());
        assert_eq!(verdict.decision, Decision::Block);
    }

    #[test]
    fn adding_findings_never_lowers_the_decision() {
        let base = decide(vec![finding("blocking", Severity::Error)], &catalog());
        let more = decide(
            vec![
                finding("blocking", Severity::Error),
                finding("advisory", Severity::Info),
            ],
            &catalog(),
        );
        assert!(more.decision >= base.decision);
    }
}
