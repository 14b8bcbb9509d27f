//! Matcher — applies catalog patterns against the full proposed content.
//!
//! Patterns run over the whole text, never line-by-line, so multiline rules
//! see everything. Line numbers are attributed against the original content
//! via a precomputed newline index. Overlapping matches from different
//! patterns are all retained; category-scoped dedup happens later in the
//! aggregator, not here.

use gatecheck_core::config::EngineConfig;

use crate::catalog::{Rule, RuleCategory};

/// Sorted byte offsets of every newline in the content, for O(log n) line
/// attribution per match.
#[derive(Debug)]
pub struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    pub fn new(content: &str) -> Self {
        let newlines = content
            .bytes()
            .enumerate()
            .filter_map(|(i, b)| (b == b'\n').then_some(i))
            .collect();
        Self { newlines }
    }

    /// 1-based line for a byte offset: the count of newlines strictly
    /// before the offset, plus one.
    pub fn line_at(&self, offset: usize) -> u32 {
        self.newlines.partition_point(|&n| n < offset) as u32 + 1
    }
}

/// A raw pattern hit, positioned in the original content. Created here,
/// consumed by the suppression filter, then discarded.
#[derive(Debug, Clone)]
pub struct Match {
    pub rule_index: usize,
    pub pattern_index: usize,
    pub offset: usize,
    pub end: usize,
    pub line: u32,
    pub text: String,
}

/// A require-rule violation: the trigger was present (or the rule is
/// unconditional) and no expected marker appeared anywhere in the content.
#[derive(Debug, Clone)]
pub struct RequireHit {
    pub rule_index: usize,
    pub line: Option<u32>,
}

/// Run every pattern rule of a category against the content.
///
/// Per-pattern match volume is capped so pathological inputs stay bounded;
/// the cap applies after the rule's accept predicate so sparse numeric
/// rules still surface their real hits.
pub fn scan_patterns(
    content: &str,
    index: &LineIndex,
    category: &RuleCategory,
    config: &EngineConfig,
) -> Vec<Match> {
    let default_cap = config.effective_max_matches_per_pattern();
    let mut matches = Vec::new();

    for (rule_index, rule) in category.rules.iter().enumerate() {
        let Rule::Pattern(rule) = rule else { continue };

        if !rule.when.is_empty() && !rule.when.iter().any(|w| w.is_match(content)) {
            continue;
        }

        let cap = rule.max_matches.unwrap_or(default_cap);
        for (pattern_index, pattern) in rule.patterns.iter().enumerate() {
            let accepted = pattern
                .find_iter(content)
                .filter(|m| rule.accept.map_or(true, |accept| accept(m.as_str())))
                .take(cap);
            for m in accepted {
                matches.push(Match {
                    rule_index,
                    pattern_index,
                    offset: m.start(),
                    end: m.end(),
                    line: index.line_at(m.start()),
                    text: m.as_str().to_string(),
                });
            }
        }
    }

    // Document order; ties keep catalog order for deterministic dedup.
    matches.sort_by_key(|m| (m.offset, m.rule_index, m.pattern_index));
    matches
}

/// Evaluate every require rule of a category.
pub fn eval_requires(
    content: &str,
    path: &str,
    index: &LineIndex,
    category: &RuleCategory,
) -> Vec<RequireHit> {
    let path_lower = path.to_lowercase();
    let mut hits = Vec::new();

    for (rule_index, rule) in category.rules.iter().enumerate() {
        let Rule::Require(rule) = rule else { continue };

        if !rule.when_path.is_empty()
            && !rule.when_path.iter().any(|p| path_lower.contains(p.as_str()))
        {
            continue;
        }
        if !rule.when.is_empty() && !rule.when.iter().any(|w| w.is_match(content)) {
            continue;
        }

        let line = if rule.trigger.is_empty() {
            None
        } else {
            let earliest = rule
                .trigger
                .iter()
                .filter_map(|t| t.find(content))
                .map(|m| m.start())
                .min();
            match earliest {
                Some(offset) => Some(index.line_at(offset)),
                None => continue,
            }
        };

        if rule.expect.iter().any(|e| e.is_match(content)) {
            continue;
        }

        hits.push(RequireHit { rule_index, line });
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{PatternRule, Relevance, RequireRule, RuleCategory};
    use crate::types::Severity;
    use regex::Regex;

    fn pattern_category(rule: PatternRule) -> RuleCategory {
        RuleCategory::new("test", "TEST", Relevance::Always).with_rules(vec![Rule::Pattern(rule)])
    }

    #[test]
    fn line_index_counts_newlines_before_offset() {
        let content = "a\nb\nc";
        let index = LineIndex::new(content);
        assert_eq!(index.line_at(0), 1);
        assert_eq!(index.line_at(2), 2);
        assert_eq!(index.line_at(4), 3);
    }

    #[test]
    fn scan_attributes_lines_and_text() {
        let content = "fine\nsecret = \"abcdefgh\"\n";
        let index = LineIndex::new(content);
        let rule = PatternRule::new(
            "r",
            Severity::Error,
            "found {value}",
            vec![Regex::new(r#"secret = "\w+""#).unwrap()],
        );
        let matches = scan_patterns(content, &index, &pattern_category(rule), &Default::default());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].line, 2);
        assert_eq!(matches[0].text, "secret = \"abcdefgh\"");
    }

    #[test]
    fn per_pattern_cap_bounds_match_volume() {
        let content = "x=1\n".repeat(50);
        let index = LineIndex::new(&content);
        let rule = PatternRule::new(
            "r",
            Severity::Info,
            "m",
            vec![Regex::new(r"x=1").unwrap()],
        );
        let matches = scan_patterns(&content, &index, &pattern_category(rule), &Default::default());
        assert_eq!(matches.len(), 3);
    }

    #[test]
    fn when_gate_disables_rule_for_unrelated_content() {
        let content = "const x = 1;";
        let index = LineIndex::new(content);
        let rule = PatternRule::new(
            "r",
            Severity::Info,
            "m",
            vec![Regex::new(r"x").unwrap()],
        )
        .with_when(vec![Regex::new(r"payment").unwrap()]);
        let matches = scan_patterns(content, &index, &pattern_category(rule), &Default::default());
        assert!(matches.is_empty());
    }

    #[test]
    fn accept_predicate_filters_before_cap() {
        let content = "n=1 n=2 n=3 n=4 n=42";
        let index = LineIndex::new(content);
        fn only_42(text: &str) -> bool {
            text.contains("42")
        }
        let rule = PatternRule::new(
            "r",
            Severity::Info,
            "m",
            vec![Regex::new(r"n=\d+").unwrap()],
        )
        .with_accept(only_42);
        let matches = scan_patterns(content, &index, &pattern_category(rule), &Default::default());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text, "n=42");
    }

    #[test]
    fn require_fires_on_missing_expectation() {
        let content = "fetch('/api/data')";
        let index = LineIndex::new(content);
        let rule = RequireRule::new("loading", Severity::Error, "no loading state")
            .with_trigger(vec![Regex::new(r"fetch\(").unwrap()])
            .with_expect(vec![Regex::new(r"(?i)isLoading").unwrap()]);
        let category = RuleCategory::new("t", "T", Relevance::Always)
            .with_rules(vec![Rule::Require(rule)]);
        let hits = eval_requires(content, "src/a.tsx", &index, &category);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].line, Some(1));
    }

    #[test]
    fn require_is_satisfied_by_expected_marker() {
        let content = "const isLoading = true;\nfetch('/api/data')";
        let index = LineIndex::new(content);
        let rule = RequireRule::new("loading", Severity::Error, "no loading state")
            .with_trigger(vec![Regex::new(r"fetch\(").unwrap()])
            .with_expect(vec![Regex::new(r"(?i)isLoading").unwrap()]);
        let category = RuleCategory::new("t", "T", Relevance::Always)
            .with_rules(vec![Rule::Require(rule)]);
        assert!(eval_requires(content, "src/a.tsx", &index, &category).is_empty());
    }

    #[test]
    fn require_when_path_gates_by_path_substring() {
        let content = "whatever";
        let index = LineIndex::new(content);
        let rule = RequireRule::new("ph", Severity::Warning, "missing")
            .with_when_path(&["ContactForm"])
            .with_expect(vec![Regex::new(r"privacy").unwrap()]);
        let category = RuleCategory::new("t", "T", Relevance::Always)
            .with_rules(vec![Rule::Require(rule)]);
        assert_eq!(
            eval_requires(content, "src/forms/contactform.tsx", &index, &category).len(),
            1
        );
        assert!(eval_requires(content, "src/other.tsx", &index, &category).is_empty());
    }
}
