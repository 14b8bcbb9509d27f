//! Declarative TOML rule definitions — project-specific rules without
//! recompiling the gate.
//!
//! Each definition compiles into a regular pattern rule and is appended to
//! an existing category (inheriting its thresholds and suppression
//! posture) or, when no category is named, to an advisory `custom`
//! category.

use serde::Deserialize;

use gatecheck_core::config::EngineConfig;
use gatecheck_core::errors::CatalogError;

use crate::catalog::{
    Catalog, DedupeMode, PatternCompiler, PatternRule, Relevance, Rule, RuleCategory,
};
use crate::types::Severity;

/// A TOML-defined rule.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlRuleDef {
    pub id: String,
    /// Target category id; omitted = the `custom` advisory category.
    pub category: Option<String>,
    pub pattern: String,
    pub severity: Severity,
    pub message: String,
    pub suggestion: Option<String>,
    #[serde(default = "default_true")]
    pub case_insensitive: bool,
    #[serde(default = "default_true")]
    pub multiline: bool,
    #[serde(default)]
    pub exceptions: Vec<String>,
    #[serde(default)]
    pub mitigators: Vec<String>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

fn default_true() -> bool {
    true
}

/// A collection of TOML rule definitions.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlRuleFile {
    #[serde(default)]
    pub rules: Vec<TomlRuleDef>,
}

/// Extend a catalog with rules from a TOML file.
pub fn extend_from_file(
    catalog: &mut Catalog,
    path: &std::path::Path,
    config: &EngineConfig,
) -> Result<(), CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::ReadFailed {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    extend_from_str(catalog, &content, config).map_err(|e| match e {
        CatalogError::ParseError { message, .. } => CatalogError::ParseError {
            path: path.display().to_string(),
            message,
        },
        other => other,
    })
}

/// Extend a catalog with rules from a TOML string.
pub fn extend_from_str(
    catalog: &mut Catalog,
    toml_str: &str,
    config: &EngineConfig,
) -> Result<(), CatalogError> {
    let file: TomlRuleFile = toml::from_str(toml_str).map_err(|e| CatalogError::ParseError {
        path: "<string>".to_string(),
        message: e.to_string(),
    })?;

    let compiler = PatternCompiler::new(config.effective_regex_size_limit());
    for def in file.rules {
        if def.enabled == Some(false) {
            continue;
        }
        let rule = compile(&compiler, &def)?;
        let target = def.category.as_deref().unwrap_or("custom");

        if catalog.category(target).is_none() {
            if def.category.is_some() {
                return Err(CatalogError::UnknownCategory {
                    rule: def.id.clone(),
                    category: target.to_string(),
                });
            }
            catalog.categories.push(custom_category());
        }

        let category = catalog
            .categories
            .iter_mut()
            .find(|c| c.id == target)
            .expect("target category present after insertion");
        if category.rules.iter().any(|r| r.id() == def.id) {
            return Err(CatalogError::DuplicateRule(format!("{target}/{}", def.id)));
        }
        category.rules.push(Rule::Pattern(rule));
    }
    Ok(())
}

fn compile(compiler: &PatternCompiler, def: &TomlRuleDef) -> Result<PatternRule, CatalogError> {
    let regex = compiler.compile(&def.id, &def.pattern, def.case_insensitive, def.multiline)?;
    let mut rule = PatternRule::new(&def.id, def.severity, &def.message, vec![regex]);
    rule.exceptions = def.exceptions.clone();
    rule.mitigators = def.mitigators.clone();
    if let Some(ref text) = def.suggestion {
        rule = rule.with_suggestion(text);
    }
    Ok(rule)
}

/// Advisory catch-all category for uncategorized user rules.
fn custom_category() -> RuleCategory {
    RuleCategory::new("custom", "🧩 PROJECT RULES", Relevance::Always)
        .with_dedupe(DedupeMode::PerMatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gatecheck_core::config::EngineConfig;

    fn empty_catalog() -> Catalog {
        Catalog {
            path_policy: Default::default(),
            categories: Vec::new(),
        }
    }

    #[test]
    fn rules_land_in_the_custom_category_by_default() {
        let mut catalog = empty_catalog();
        let toml = r#"
            [[rules]]
            id = "no-fixme"
            pattern = "FIXME"
            severity = "warning"
            message = "Unresolved FIXME: {value}"
        "#;
        extend_from_str(&mut catalog, toml, &EngineConfig::default()).unwrap();
        let category = catalog.category("custom").unwrap();
        assert_eq!(category.rules.len(), 1);
        assert_eq!(category.rules[0].id(), "no-fixme");
    }

    #[test]
    fn unknown_target_category_is_rejected() {
        let mut catalog = empty_catalog();
        let toml = r#"
            [[rules]]
            id = "r"
            category = "nonexistent"
            pattern = "x"
            severity = "info"
            message = "m"
        "#;
        let err = extend_from_str(&mut catalog, toml, &EngineConfig::default());
        assert!(matches!(err, Err(CatalogError::UnknownCategory { .. })));
    }

    #[test]
    fn invalid_regex_names_the_rule() {
        let mut catalog = empty_catalog();
        let toml = r#"
            [[rules]]
            id = "broken"
            pattern = "("
            severity = "info"
            message = "m"
        "#;
        match extend_from_str(&mut catalog, toml, &EngineConfig::default()) {
            Err(CatalogError::InvalidPattern { rule, .. }) => assert_eq!(rule, "broken"),
            other => panic!("expected InvalidPattern, got {other:?}"),
        }
    }

    #[test]
    fn disabled_rules_are_skipped() {
        let mut catalog = empty_catalog();
        let toml = r#"
            [[rules]]
            id = "off"
            pattern = "x"
            severity = "info"
            message = "m"
            enabled = false
        "#;
        extend_from_str(&mut catalog, toml, &EngineConfig::default()).unwrap();
        assert!(catalog.category("custom").is_none());
    }

    #[test]
    fn duplicate_rule_ids_are_rejected() {
        let mut catalog = empty_catalog();
        let toml = r#"
            [[rules]]
            id = "dup"
            pattern = "x"
            severity = "info"
            message = "m"

            [[rules]]
            id = "dup"
            pattern = "y"
            severity = "info"
            message = "m"
        "#;
        assert!(matches!(
            extend_from_str(&mut catalog, toml, &EngineConfig::default()),
            Err(CatalogError::DuplicateRule(_))
        ));
    }
}
