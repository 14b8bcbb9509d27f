//! Top-level Gatecheck configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{EngineConfig, ReportConfig, ReportFormat};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. CLI flags (applied via `apply_cli_overrides`)
/// 2. Environment variables (`GATECHECK_*`)
/// 3. Project config (`gatecheck.toml` in project root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GatecheckConfig {
    pub engine: EngineConfig,
    pub report: ReportConfig,
}

/// CLI override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub context_radius: Option<usize>,
    pub max_matches_per_pattern: Option<usize>,
    pub format: Option<ReportFormat>,
    pub no_color: bool,
    pub disabled_categories: Vec<String>,
    pub custom_rules: Option<String>,
}

impl GatecheckConfig {
    /// Load configuration with layered resolution.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 3: project config
        let project_config_path = root.join("gatecheck.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
            tracing::debug!(path = %project_config_path.display(), "merged project config");
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): CLI flags
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &GatecheckConfig) -> Result<(), ConfigError> {
        if let Some(radius) = config.engine.context_radius {
            if !(50..=5000).contains(&radius) {
                return Err(ConfigError::ValidationFailed {
                    field: "engine.context_radius".to_string(),
                    message: "must be between 50 and 5000".to_string(),
                });
            }
        }
        if let Some(cap) = config.engine.max_matches_per_pattern {
            if cap == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "engine.max_matches_per_pattern".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(cap) = config.engine.max_findings_per_category {
            if cap == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "engine.max_findings_per_category".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        if let Some(limit) = config.engine.regex_size_limit {
            if limit == 0 {
                return Err(ConfigError::ValidationFailed {
                    field: "engine.regex_size_limit".to_string(),
                    message: "must be greater than 0".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    fn merge_toml_file(config: &mut GatecheckConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: GatecheckConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`, where `other` values override `base`
    /// values only when `other` has a `Some` value.
    fn merge(base: &mut GatecheckConfig, other: &GatecheckConfig) {
        // Engine
        if other.engine.context_radius.is_some() {
            base.engine.context_radius = other.engine.context_radius;
        }
        if other.engine.max_matches_per_pattern.is_some() {
            base.engine.max_matches_per_pattern = other.engine.max_matches_per_pattern;
        }
        if other.engine.max_findings_per_category.is_some() {
            base.engine.max_findings_per_category = other.engine.max_findings_per_category;
        }
        if other.engine.regex_size_limit.is_some() {
            base.engine.regex_size_limit = other.engine.regex_size_limit;
        }
        if !other.engine.disabled_categories.is_empty() {
            base.engine.disabled_categories = other.engine.disabled_categories.clone();
        }
        if other.engine.custom_rules.is_some() {
            base.engine.custom_rules = other.engine.custom_rules.clone();
        }

        // Report
        if other.report.format.is_some() {
            base.report.format = other.report.format;
        }
        if other.report.color.is_some() {
            base.report.color = other.report.color;
        }
        if other.report.suggestions.is_some() {
            base.report.suggestions = other.report.suggestions;
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `GATECHECK_CONTEXT_RADIUS`, `GATECHECK_MAX_MATCHES`, etc.
    fn apply_env_overrides(config: &mut GatecheckConfig) {
        if let Ok(val) = std::env::var("GATECHECK_CONTEXT_RADIUS") {
            if let Ok(v) = val.parse::<usize>() {
                config.engine.context_radius = Some(v);
            }
        }
        if let Ok(val) = std::env::var("GATECHECK_MAX_MATCHES") {
            if let Ok(v) = val.parse::<usize>() {
                config.engine.max_matches_per_pattern = Some(v);
            }
        }
        if let Ok(val) = std::env::var("GATECHECK_MAX_FINDINGS") {
            if let Ok(v) = val.parse::<usize>() {
                config.engine.max_findings_per_category = Some(v);
            }
        }
        if let Ok(val) = std::env::var("GATECHECK_DISABLED_CATEGORIES") {
            config.engine.disabled_categories =
                val.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(val) = std::env::var("GATECHECK_CUSTOM_RULES") {
            config.engine.custom_rules = Some(val);
        }
        if let Ok(val) = std::env::var("GATECHECK_FORMAT") {
            match val.as_str() {
                "console" => config.report.format = Some(ReportFormat::Console),
                "json" => config.report.format = Some(ReportFormat::Json),
                _ => {}
            }
        }
        if std::env::var_os("NO_COLOR").is_some() {
            config.report.color = Some(false);
        }
    }

    /// Apply CLI overrides (highest priority).
    fn apply_cli_overrides(config: &mut GatecheckConfig, cli: &CliOverrides) {
        if let Some(v) = cli.context_radius {
            config.engine.context_radius = Some(v);
        }
        if let Some(v) = cli.max_matches_per_pattern {
            config.engine.max_matches_per_pattern = Some(v);
        }
        if let Some(v) = cli.format {
            config.report.format = Some(v);
        }
        if cli.no_color {
            config.report.color = Some(false);
        }
        if !cli.disabled_categories.is_empty() {
            config.engine.disabled_categories = cli.disabled_categories.clone();
        }
        if let Some(ref v) = cli.custom_rules {
            config.engine.custom_rules = Some(v.clone());
        }
    }
}
