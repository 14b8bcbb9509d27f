//! Suppression filter — discards raw matches that are known-safe or
//! contextually mitigated.
//!
//! Two independent mechanisms, in order:
//! 1. Literal exception check (cheap, exact): exception tokens or patterns
//!    found on the match's own line discard the match.
//! 2. Contextual compliance check: a bounded window around the match is
//!    scanned case-insensitively for the category's mitigating keywords;
//!    nearby compliance language is taken as evidence the concern was
//!    already handled.
//!
//! Suppression is a pure filter over matches found in the ORIGINAL
//! content. The content is never rewritten and offsets never move, so line
//! attribution of the surviving matches stays exact.

use aho_corasick::AhoCorasick;

use gatecheck_core::config::EngineConfig;

use crate::catalog::{PatternRule, Rule, RuleCategory};
use crate::matcher::Match;

/// Filter the raw matches of one category, returning the survivors.
pub fn filter(
    matches: Vec<Match>,
    content: &str,
    category: &RuleCategory,
    config: &EngineConfig,
) -> Vec<Match> {
    matches
        .into_iter()
        .filter(|m| {
            let Rule::Pattern(rule) = &category.rules[m.rule_index] else {
                return true;
            };
            !suppressed(m, content, category, rule, config)
        })
        .collect()
}

fn suppressed(
    m: &Match,
    content: &str,
    category: &RuleCategory,
    rule: &PatternRule,
    config: &EngineConfig,
) -> bool {
    let line = line_of(content, m.offset, m.end);

    // 1. Literal exceptions, category-wide then rule-specific.
    if contains_any_ci(line, &category.exceptions) || contains_any_ci(line, &rule.exceptions) {
        return true;
    }
    if category
        .exception_patterns
        .iter()
        .chain(rule.exception_patterns.iter())
        .any(|p| p.is_match(line))
    {
        return true;
    }

    let radius = rule
        .context_radius
        .or(category.context_radius)
        .unwrap_or_else(|| config.effective_context_radius());
    let window = window_around(content, m.offset, m.end, radius);

    // Some rules only count when their subject matter is actually nearby
    // (e.g. a duration literal next to course language).
    if !rule.requires_context.is_empty() && !keyword_scan(window, &rule.requires_context) {
        return true;
    }

    // 2. Contextual compliance check.
    let mitigators = if rule.mitigators.is_empty() {
        &category.mitigators
    } else {
        &rule.mitigators
    };
    if !mitigators.is_empty() && keyword_scan(window, mitigators) {
        return true;
    }

    false
}

/// The full line containing the match.
fn line_of<'a>(content: &'a str, offset: usize, end: usize) -> &'a str {
    let start = content[..offset].rfind('\n').map_or(0, |i| i + 1);
    let stop = content[end.min(content.len())..]
        .find('\n')
        .map_or(content.len(), |i| end + i);
    &content[start..stop]
}

/// Bounded window around the match, clamped to char boundaries.
fn window_around(content: &str, offset: usize, end: usize, radius: usize) -> &str {
    let start = floor_boundary(content, offset.saturating_sub(radius));
    let stop = ceil_boundary(content, (end + radius).min(content.len()));
    &content[start..stop]
}

fn floor_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

fn ceil_boundary(s: &str, mut i: usize) -> usize {
    i = i.min(s.len());
    while !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

fn contains_any_ci(haystack: &str, tokens: &[String]) -> bool {
    if tokens.is_empty() {
        return false;
    }
    let lower = haystack.to_lowercase();
    tokens.iter().any(|t| lower.contains(&t.to_lowercase()))
}

/// Multi-keyword case-insensitive scan over the (possibly large) window.
fn keyword_scan(window: &str, keywords: &[String]) -> bool {
    let ac = AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(keywords)
        .expect("keyword automaton from catalog literals");
    ac.is_match(window)
}
