//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the matching and suppression engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Radius in bytes of the context window scanned for mitigating
    /// keywords around a match. Default: 400.
    pub context_radius: Option<usize>,
    /// Maximum matches reported per pattern. Default: 3.
    pub max_matches_per_pattern: Option<usize>,
    /// Maximum findings kept per category. Default: 5.
    pub max_findings_per_category: Option<usize>,
    /// Compiled-size limit for a single regex, in bytes. Default: 1 MiB.
    pub regex_size_limit: Option<usize>,
    /// Category ids to skip entirely.
    #[serde(default)]
    pub disabled_categories: Vec<String>,
    /// Optional TOML file with user-defined rules, resolved against the
    /// project root.
    pub custom_rules: Option<String>,
}

impl EngineConfig {
    /// Returns the effective context radius, defaulting to 400.
    pub fn effective_context_radius(&self) -> usize {
        self.context_radius.unwrap_or(400)
    }

    /// Returns the effective per-pattern match cap, defaulting to 3.
    pub fn effective_max_matches_per_pattern(&self) -> usize {
        self.max_matches_per_pattern.unwrap_or(3)
    }

    /// Returns the effective per-category finding cap, defaulting to 5.
    pub fn effective_max_findings_per_category(&self) -> usize {
        self.max_findings_per_category.unwrap_or(5)
    }

    /// Returns the effective regex size limit, defaulting to 1 MiB.
    pub fn effective_regex_size_limit(&self) -> usize {
        self.regex_size_limit.unwrap_or(1 << 20)
    }

    /// Whether the given category id has been disabled.
    pub fn is_disabled(&self, category_id: &str) -> bool {
        self.disabled_categories.iter().any(|c| c == category_id)
    }
}
