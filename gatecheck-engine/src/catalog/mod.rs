//! Rule catalog — the immutable, process-wide table of compliance rules.
//!
//! Categories are data: a new compliance domain is a new catalog entry,
//! never a new code path. Every category carries the same uniform shape —
//! relevance predicate, rules, mitigating keywords, blocking threshold,
//! fault policy — and the engine treats them identically.

pub mod builtin;
pub mod custom;

use regex::{Regex, RegexBuilder};

use gatecheck_core::config::EngineConfig;
use gatecheck_core::errors::CatalogError;

use crate::types::Severity;

/// Decides whether a category applies to a target path at all. Requests
/// failing relevance never reach the matcher; most files are irrelevant to
/// most categories and must incur zero scanning cost.
#[derive(Debug, Clone)]
pub enum Relevance {
    Always,
    /// Any of these substrings appears in the path (extension-style, e.g.
    /// `.tsx`).
    ExtensionAny(Vec<String>),
    /// Any of these substrings appears in the path, compared
    /// case-insensitively.
    PathContainsAny(Vec<String>),
}

impl Relevance {
    /// Paths are compared case-insensitively; catalog entries are stored
    /// lowercase.
    pub fn applies_to(&self, path: &str) -> bool {
        match self {
            Relevance::Always => true,
            Relevance::ExtensionAny(exts) => {
                let lower = path.to_lowercase();
                exts.iter().any(|e| lower.contains(e.as_str()))
            }
            Relevance::PathContainsAny(parts) => {
                let lower = path.to_lowercase();
                parts.iter().any(|p| lower.contains(p.as_str()))
            }
        }
    }
}

/// When a category escalates a finding into a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockPolicy {
    /// Advisory-only category; findings never reject the change.
    Never,
    /// Findings at or above this severity reject the change.
    AtOrAbove(Severity),
}

/// What to do when evaluating a category faults. Deliberately asymmetric
/// per category: advisory domains fail open, secret/path domains fail
/// closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultPolicy {
    FailOpen,
    FailClosed,
}

/// How surviving matches collapse into findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupeMode {
    /// At most one finding per rule; first occurrence in document order
    /// wins.
    FirstPerRule,
    /// One finding per surviving match, bounded by the per-pattern and
    /// per-category caps.
    PerMatch,
}

/// Remediation text attached to a finding.
#[derive(Debug, Clone)]
pub enum SuggestionSource {
    Text(String),
    /// Computed from the matched value (e.g. hex color → nearest design
    /// token). Must be a pure function; determinism of the verdict depends
    /// on it.
    Computed(fn(&str) -> Option<String>),
}

impl SuggestionSource {
    pub fn resolve(&self, matched: &str) -> Option<String> {
        match self {
            SuggestionSource::Text(t) => Some(t.clone()),
            SuggestionSource::Computed(f) => f(matched),
        }
    }
}

/// A rule that flags occurrences of a pattern.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub id: String,
    pub severity: Severity,
    /// Message template; `{value}` interpolates the truncated matched text.
    pub message: String,
    /// Gate patterns: when non-empty, the rule only runs if one of these
    /// matches somewhere in the content.
    pub when: Vec<Regex>,
    pub patterns: Vec<Regex>,
    /// Post-match predicate over the matched text (e.g. numeric range
    /// checks the pattern language cannot express). Must be pure.
    pub accept: Option<fn(&str) -> bool>,
    /// Literal tokens that unconditionally suppress a match when found on
    /// the match's line (case-insensitive).
    pub exceptions: Vec<String>,
    /// Patterns that suppress a match when they match the match's line.
    pub exception_patterns: Vec<Regex>,
    /// Mitigating keywords scanned in the context window; overrides the
    /// category-level list when non-empty.
    pub mitigators: Vec<String>,
    /// Keywords that must appear in the context window for a match to
    /// count at all (e.g. course words near a duration literal).
    pub requires_context: Vec<String>,
    /// Context radius override for this rule.
    pub context_radius: Option<usize>,
    /// Per-pattern match cap override.
    pub max_matches: Option<usize>,
    pub suggestion: Option<SuggestionSource>,
}

impl PatternRule {
    pub fn new(id: &str, severity: Severity, message: &str, patterns: Vec<Regex>) -> Self {
        Self {
            id: id.to_string(),
            severity,
            message: message.to_string(),
            when: Vec::new(),
            patterns,
            accept: None,
            exceptions: Vec::new(),
            exception_patterns: Vec::new(),
            mitigators: Vec::new(),
            requires_context: Vec::new(),
            context_radius: None,
            max_matches: None,
            suggestion: None,
        }
    }

    pub fn with_when(mut self, when: Vec<Regex>) -> Self {
        self.when = when;
        self
    }

    pub fn with_accept(mut self, accept: fn(&str) -> bool) -> Self {
        self.accept = Some(accept);
        self
    }

    pub fn with_exceptions(mut self, tokens: &[&str]) -> Self {
        self.exceptions = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_exception_patterns(mut self, patterns: Vec<Regex>) -> Self {
        self.exception_patterns = patterns;
        self
    }

    pub fn with_mitigators(mut self, keywords: &[&str]) -> Self {
        self.mitigators = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_requires_context(mut self, keywords: &[&str]) -> Self {
        self.requires_context = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_context_radius(mut self, radius: usize) -> Self {
        self.context_radius = Some(radius);
        self
    }

    pub fn with_max_matches(mut self, cap: usize) -> Self {
        self.max_matches = Some(cap);
        self
    }

    pub fn with_suggestion(mut self, text: &str) -> Self {
        self.suggestion = Some(SuggestionSource::Text(text.to_string()));
        self
    }

    pub fn with_computed_suggestion(mut self, f: fn(&str) -> Option<String>) -> Self {
        self.suggestion = Some(SuggestionSource::Computed(f));
        self
    }
}

/// A rule that flags the *absence* of an expected marker: when the gate and
/// trigger patterns match but none of the expected patterns appear anywhere
/// in the content, one finding fires at the first trigger location.
///
/// Absence-of-marker is a whole-content question, so it gets its own rule
/// kind instead of lookaround patterns the linear-time regex engine
/// deliberately rejects.
#[derive(Debug, Clone)]
pub struct RequireRule {
    pub id: String,
    pub severity: Severity,
    pub message: String,
    /// Path substrings (case-insensitive) gating this rule; empty = any
    /// path the category is relevant for.
    pub when_path: Vec<String>,
    /// Content gate; empty = unconditional.
    pub when: Vec<Regex>,
    /// Presence patterns; empty = unconditionally triggered.
    pub trigger: Vec<Regex>,
    /// Expected markers; a match of any of these anywhere satisfies the
    /// rule.
    pub expect: Vec<Regex>,
    pub suggestion: Option<SuggestionSource>,
}

impl RequireRule {
    pub fn new(id: &str, severity: Severity, message: &str) -> Self {
        Self {
            id: id.to_string(),
            severity,
            message: message.to_string(),
            when_path: Vec::new(),
            when: Vec::new(),
            trigger: Vec::new(),
            expect: Vec::new(),
            suggestion: None,
        }
    }

    pub fn with_when_path(mut self, parts: &[&str]) -> Self {
        self.when_path = parts.iter().map(|p| p.to_lowercase()).collect();
        self
    }

    pub fn with_when(mut self, when: Vec<Regex>) -> Self {
        self.when = when;
        self
    }

    pub fn with_trigger(mut self, trigger: Vec<Regex>) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_expect(mut self, expect: Vec<Regex>) -> Self {
        self.expect = expect;
        self
    }

    pub fn with_suggestion(mut self, text: &str) -> Self {
        self.suggestion = Some(SuggestionSource::Text(text.to_string()));
        self
    }
}

/// Closed set of rule kinds. New domains add catalog entries, not engine
/// code.
#[derive(Debug, Clone)]
pub enum Rule {
    Pattern(PatternRule),
    Require(RequireRule),
}

impl Rule {
    pub fn id(&self) -> &str {
        match self {
            Rule::Pattern(r) => &r.id,
            Rule::Require(r) => &r.id,
        }
    }
}

/// A named group of rules sharing a domain and a severity/threshold policy.
#[derive(Debug, Clone)]
pub struct RuleCategory {
    pub id: String,
    /// Report heading, e.g. "PAYMENT SECURITY".
    pub banner: String,
    pub relevance: Relevance,
    /// Path substrings that exempt a file from this category entirely
    /// (test files, generated assets, ...).
    pub skip_paths: Vec<String>,
    /// Category-wide mitigating keywords for the contextual compliance
    /// check.
    pub mitigators: Vec<String>,
    /// Category-wide literal exception tokens.
    pub exceptions: Vec<String>,
    /// Category-wide exception patterns.
    pub exception_patterns: Vec<Regex>,
    pub context_radius: Option<usize>,
    pub dedupe: DedupeMode,
    /// Cap on findings kept for this category; falls back to the engine
    /// default.
    pub report_cap: Option<usize>,
    pub block: BlockPolicy,
    pub fault: FaultPolicy,
    /// Closing remediation notes printed when this category rejects a
    /// change.
    pub notes: Vec<String>,
    pub rules: Vec<Rule>,
}

impl RuleCategory {
    pub fn new(id: &str, banner: &str, relevance: Relevance) -> Self {
        Self {
            id: id.to_string(),
            banner: banner.to_string(),
            relevance,
            skip_paths: Vec::new(),
            mitigators: Vec::new(),
            exceptions: Vec::new(),
            exception_patterns: Vec::new(),
            context_radius: None,
            dedupe: DedupeMode::FirstPerRule,
            report_cap: None,
            block: BlockPolicy::Never,
            fault: FaultPolicy::FailOpen,
            notes: Vec::new(),
            rules: Vec::new(),
        }
    }

    pub fn with_skip_paths(mut self, parts: &[&str]) -> Self {
        self.skip_paths = parts.iter().map(|p| p.to_lowercase()).collect();
        self
    }

    pub fn with_mitigators(mut self, keywords: &[&str]) -> Self {
        self.mitigators = keywords.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn with_exceptions(mut self, tokens: &[&str]) -> Self {
        self.exceptions = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn with_exception_patterns(mut self, patterns: Vec<Regex>) -> Self {
        self.exception_patterns = patterns;
        self
    }

    pub fn with_context_radius(mut self, radius: usize) -> Self {
        self.context_radius = Some(radius);
        self
    }

    pub fn with_dedupe(mut self, mode: DedupeMode) -> Self {
        self.dedupe = mode;
        self
    }

    pub fn with_report_cap(mut self, cap: usize) -> Self {
        self.report_cap = Some(cap);
        self
    }

    pub fn with_block(mut self, policy: BlockPolicy) -> Self {
        self.block = policy;
        self
    }

    pub fn with_fault(mut self, policy: FaultPolicy) -> Self {
        self.fault = policy;
        self
    }

    pub fn with_notes(mut self, notes: &[&str]) -> Self {
        self.notes = notes.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    /// Whether this category should scan the given path.
    pub fn applies_to(&self, path: &str) -> bool {
        if !self.relevance.applies_to(path) {
            return false;
        }
        let lower = path.to_lowercase();
        !self.skip_paths.iter().any(|p| lower.contains(p.as_str()))
    }
}

/// Path-level policy evaluated before any content scanning. A hit blocks
/// the change outright.
#[derive(Debug, Clone, Default)]
pub struct PathPolicy {
    /// Exact file names that may never be written.
    pub blocked_files: Vec<String>,
    /// Directory segments that may never be written into.
    pub blocked_dirs: Vec<String>,
    /// Reject `..` components.
    pub deny_traversal: bool,
}

impl PathPolicy {
    /// Returns the reason the path is denied, if any.
    pub fn deny_reason(&self, path: &str) -> Option<String> {
        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        if self.blocked_files.iter().any(|f| f == file_name) {
            return Some(format!("File '{file_name}' is in the blocked list"));
        }
        for dir in &self.blocked_dirs {
            if path.contains(dir.as_str()) {
                return Some(format!("Path contains blocked directory '{dir}'"));
            }
        }
        if self.deny_traversal && path.contains("..") {
            return Some("Path traversal detected".to_string());
        }
        None
    }
}

/// The immutable rule catalog: path policy plus all categories, in a fixed
/// evaluation order. Built once at process start; requests never mutate it.
/// A rules update is a whole-catalog rebuild, never an in-place edit.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub path_policy: PathPolicy,
    pub categories: Vec<RuleCategory>,
}

impl Catalog {
    /// Build the built-in catalog with the given engine limits.
    pub fn builtin(config: &EngineConfig) -> Result<Self, CatalogError> {
        let compiler = PatternCompiler::new(config.effective_regex_size_limit());
        let mut catalog = builtin::build(&compiler)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Look up a category by id.
    pub fn category(&self, id: &str) -> Option<&RuleCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Categories relevant to the given path, in catalog order.
    pub fn relevant<'a>(&'a self, path: &'a str) -> impl Iterator<Item = &'a RuleCategory> {
        self.categories.iter().filter(move |c| c.applies_to(path))
    }

    /// Reject duplicate category or rule ids; dedup and truncation are
    /// order-sensitive, so ids must be unambiguous.
    fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = rustc_hash::FxHashSet::default();
        for category in &self.categories {
            if !seen.insert(category.id.clone()) {
                return Err(CatalogError::DuplicateRule(category.id.clone()));
            }
            let mut rule_ids = rustc_hash::FxHashSet::default();
            for rule in &category.rules {
                if !rule_ids.insert(rule.id().to_string()) {
                    return Err(CatalogError::DuplicateRule(format!(
                        "{}/{}",
                        category.id,
                        rule.id()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Compiles rule patterns with a shared size limit. The `regex` crate's
/// linear-time engine plus this compile-time size cap are the defensive
/// bound against pathological patterns and content.
#[derive(Debug, Clone)]
pub struct PatternCompiler {
    size_limit: usize,
}

impl PatternCompiler {
    pub fn new(size_limit: usize) -> Self {
        Self { size_limit }
    }

    /// Compile one pattern with explicit flags.
    pub fn compile(
        &self,
        rule: &str,
        source: &str,
        case_insensitive: bool,
        multi_line: bool,
    ) -> Result<Regex, CatalogError> {
        RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .multi_line(multi_line)
            .size_limit(self.size_limit)
            .build()
            .map_err(|e| CatalogError::InvalidPattern {
                rule: rule.to_string(),
                message: e.to_string(),
            })
    }

    /// Case-insensitive, multiline set — the default posture of the
    /// catalog's rules.
    pub fn set(&self, rule: &str, sources: &[&str]) -> Result<Vec<Regex>, CatalogError> {
        sources
            .iter()
            .map(|s| self.compile(rule, s, true, true))
            .collect()
    }

    /// Case-sensitive set, for rules keyed on exact identifiers
    /// (`CardElement`, `zodResolver`, ...).
    pub fn set_exact(&self, rule: &str, sources: &[&str]) -> Result<Vec<Regex>, CatalogError> {
        sources
            .iter()
            .map(|s| self.compile(rule, s, false, true))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relevance_extension_matches_substring() {
        let rel = Relevance::ExtensionAny(vec![".tsx".into(), ".jsx".into()]);
        assert!(rel.applies_to("src/components/Form.tsx"));
        assert!(!rel.applies_to("src/server/api.py"));
    }

    #[test]
    fn relevance_path_contains_is_case_insensitive() {
        let rel = Relevance::PathContainsAny(vec!["certificate".into()]);
        assert!(rel.applies_to("src/Certificates/Template.tsx"));
        assert!(!rel.applies_to("src/booking/Form.tsx"));
    }

    #[test]
    fn skip_paths_exempt_test_files() {
        let cat = RuleCategory::new(
            "design",
            "DESIGN",
            Relevance::ExtensionAny(vec![".tsx".into()]),
        )
        .with_skip_paths(&[".test.", ".spec."]);
        assert!(cat.applies_to("src/Button.tsx"));
        assert!(!cat.applies_to("src/Button.test.tsx"));
    }

    #[test]
    fn path_policy_denies_blocked_and_traversal() {
        let policy = PathPolicy {
            blocked_files: vec![".env".into(), "id_rsa".into()],
            blocked_dirs: vec![".git/".into()],
            deny_traversal: true,
        };
        assert!(policy.deny_reason("project/.env").is_some());
        assert!(policy.deny_reason(".git/config").is_some());
        assert!(policy.deny_reason("src/../../etc/passwd").is_some());
        assert!(policy.deny_reason("src/app.ts").is_none());
        // `.env.local` is a distinct name, only exact names are blocked here
        assert!(policy.deny_reason("project/env").is_none());
    }

    #[test]
    fn compiler_rejects_invalid_pattern() {
        let compiler = PatternCompiler::new(1 << 20);
        let err = compiler.compile("bad-rule", "(unclosed", true, false);
        assert!(matches!(err, Err(CatalogError::InvalidPattern { .. })));
    }
}
