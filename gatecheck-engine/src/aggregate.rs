//! Severity aggregator — folds surviving matches into findings.
//!
//! Dedup is category-scoped and order-sensitive: matches arrive in document
//! order and "first occurrence wins" for report-once categories. Message
//! templates are interpolated with the truncated matched text so a report
//! never echoes a whole credential.

use rustc_hash::FxHashSet;

use gatecheck_core::config::EngineConfig;

use crate::catalog::{DedupeMode, Rule, RuleCategory};
use crate::matcher::{Match, RequireHit};
use crate::types::Finding;

/// Longest excerpt kept from a matched value.
const EXCERPT_MAX: usize = 50;

/// Assemble the findings for one category from its surviving matches and
/// require-rule hits.
pub fn aggregate(
    category: &RuleCategory,
    surviving: &[Match],
    require_hits: &[RequireHit],
    config: &EngineConfig,
) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut reported_rules = FxHashSet::default();

    for m in surviving {
        if category.dedupe == DedupeMode::FirstPerRule && !reported_rules.insert(m.rule_index) {
            continue;
        }
        let Rule::Pattern(rule) = &category.rules[m.rule_index] else {
            continue;
        };
        let excerpt = truncate(&m.text);
        findings.push(Finding {
            category: category.id.clone(),
            rule: rule.id.clone(),
            severity: rule.severity,
            message: rule.message.replace("{value}", &excerpt),
            line: Some(m.line),
            excerpt: Some(excerpt),
            suggestion: rule.suggestion.as_ref().and_then(|s| s.resolve(&m.text)),
        });
    }

    for hit in require_hits {
        let Rule::Require(rule) = &category.rules[hit.rule_index] else {
            continue;
        };
        findings.push(Finding {
            category: category.id.clone(),
            rule: rule.id.clone(),
            severity: rule.severity,
            message: rule.message.clone(),
            line: hit.line,
            excerpt: None,
            suggestion: rule.suggestion.as_ref().and_then(|s| s.resolve("")),
        });
    }

    let cap = category
        .report_cap
        .unwrap_or_else(|| config.effective_max_findings_per_category());
    findings.truncate(cap);
    findings
}

/// Char-safe truncation of a matched value for reporting.
fn truncate(text: &str) -> String {
    if text.chars().count() <= EXCERPT_MAX {
        text.to_string()
    } else {
        let head: String = text.chars().take(EXCERPT_MAX - 3).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PatternRule, Relevance, RequireRule, RuleCategory};
    use crate::types::Severity;
    use regex::Regex;

    fn category_with(dedupe: DedupeMode) -> RuleCategory {
        RuleCategory::new("t", "T", Relevance::Always)
            .with_dedupe(dedupe)
            .with_rules(vec![Rule::Pattern(PatternRule::new(
                "r1",
                Severity::Warning,
                "found {value}",
                vec![Regex::new(r"x").unwrap()],
            ))])
    }

    fn hit(rule_index: usize, offset: usize, line: u32, text: &str) -> Match {
        Match {
            rule_index,
            pattern_index: 0,
            offset,
            end: offset + text.len(),
            line,
            text: text.to_string(),
        }
    }

    #[test]
    fn first_per_rule_keeps_earliest_match() {
        let category = category_with(DedupeMode::FirstPerRule);
        let matches = vec![hit(0, 0, 1, "x"), hit(0, 10, 3, "x")];
        let findings = aggregate(&category, &matches, &[], &Default::default());
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, Some(1));
    }

    #[test]
    fn per_match_keeps_all_up_to_cap() {
        let category = category_with(DedupeMode::PerMatch).with_report_cap(2);
        let matches = vec![hit(0, 0, 1, "x"), hit(0, 5, 2, "x"), hit(0, 9, 3, "x")];
        let findings = aggregate(&category, &matches, &[], &Default::default());
        assert_eq!(findings.len(), 2);
    }

    #[test]
    fn message_interpolates_truncated_value() {
        let category = category_with(DedupeMode::PerMatch);
        let long = "x".repeat(80);
        let matches = vec![hit(0, 0, 1, &long)];
        let findings = aggregate(&category, &matches, &[], &Default::default());
        assert!(findings[0].message.ends_with("..."));
        assert_eq!(findings[0].excerpt.as_ref().unwrap().chars().count(), 50);
    }

    #[test]
    fn require_hits_become_findings_with_optional_line() {
        let category = RuleCategory::new("t", "T", Relevance::Always).with_rules(vec![
            Rule::Require(
                RequireRule::new("need", Severity::Error, "marker missing")
                    .with_suggestion("add the marker"),
            ),
        ]);
        let findings = aggregate(
            &category,
            &[],
            &[RequireHit { rule_index: 0, line: None }],
            &Default::default(),
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, None);
        assert_eq!(findings[0].suggestion.as_deref(), Some("add the marker"));
    }
}
