//! Catalog assembly: built-in table integrity, relevance routing, and
//! user-defined TOML rules.

use gatecheck_core::config::{EngineConfig, GatecheckConfig};
use gatecheck_engine::catalog::{custom, BlockPolicy, Catalog, FaultPolicy};
use gatecheck_engine::envelope::{ChangeRequest, OperationKind};
use gatecheck_engine::{Decision, GateRunner, Severity};

fn write_request(path: &str, content: &str) -> ChangeRequest {
    ChangeRequest {
        kind: OperationKind::Create,
        path: path.to_string(),
        fragments: vec![content.to_string()],
    }
}

#[test]
fn builtin_catalog_builds_with_default_limits() {
    let catalog = Catalog::builtin(&EngineConfig::default()).unwrap();
    for id in [
        "path-policy",
        "secrets",
        "payment",
        "privacy",
        "privacy-notice",
        "design",
        "forms",
        "pricing",
        "pricing-source",
        "certificate",
        "async-feedback",
    ] {
        assert!(catalog.category(id).is_some(), "missing category {id}");
    }
}

#[test]
fn category_and_rule_ids_are_unique() {
    let catalog = Catalog::builtin(&EngineConfig::default()).unwrap();
    let mut category_ids = std::collections::HashSet::new();
    for category in &catalog.categories {
        assert!(category_ids.insert(category.id.clone()));
        let mut rule_ids = std::collections::HashSet::new();
        for rule in &category.rules {
            assert!(
                rule_ids.insert(rule.id().to_string()),
                "duplicate rule {} in {}",
                rule.id(),
                category.id
            );
        }
    }
}

#[test]
fn blocking_thresholds_are_category_dependent() {
    let catalog = Catalog::builtin(&EngineConfig::default()).unwrap();
    assert_eq!(
        catalog.category("secrets").unwrap().block,
        BlockPolicy::AtOrAbove(Severity::Error)
    );
    assert_eq!(
        catalog.category("payment").unwrap().block,
        BlockPolicy::AtOrAbove(Severity::Critical)
    );
    for advisory in ["design", "forms", "pricing", "async-feedback", "privacy"] {
        assert_eq!(
            catalog.category(advisory).unwrap().block,
            BlockPolicy::Never,
            "{advisory} must never block"
        );
    }
}

#[test]
fn fault_policies_fail_closed_only_for_path_and_secret_domains() {
    let catalog = Catalog::builtin(&EngineConfig::default()).unwrap();
    assert_eq!(
        catalog.category("path-policy").unwrap().fault,
        FaultPolicy::FailClosed
    );
    assert_eq!(
        catalog.category("secrets").unwrap().fault,
        FaultPolicy::FailClosed
    );
    assert_eq!(
        catalog.category("design").unwrap().fault,
        FaultPolicy::FailOpen
    );
}

#[test]
fn relevance_routes_by_path() {
    let catalog = Catalog::builtin(&EngineConfig::default()).unwrap();
    let for_python: Vec<&str> = catalog
        .relevant("src/server/api.py")
        .map(|c| c.id.as_str())
        .collect();
    assert!(for_python.contains(&"secrets"));
    assert!(!for_python.contains(&"design"));
    assert!(!for_python.contains(&"forms"));

    let for_component: Vec<&str> = catalog
        .relevant("src/components/Button.tsx")
        .map(|c| c.id.as_str())
        .collect();
    assert!(for_component.contains(&"design"));
    assert!(for_component.contains(&"forms"));

    let for_test_file: Vec<&str> = catalog
        .relevant("src/components/Button.test.tsx")
        .map(|c| c.id.as_str())
        .collect();
    assert!(!for_test_file.contains(&"design"));
    assert!(!for_test_file.contains(&"forms"));
}

#[test]
fn custom_rules_file_extends_the_catalog() {
    let dir = tempfile::TempDir::new().unwrap();
    let rules_path = dir.path().join("project-rules.toml");
    std::fs::write(
        &rules_path,
        r#"
[[rules]]
id = "no-internal-hostnames"
pattern = "corp-internal\\.example"
severity = "warning"
message = "Internal hostname in client code: {value}"
suggestion = "Use the public gateway host"
"#,
    )
    .unwrap();

    let mut config = GatecheckConfig::default();
    config.engine.custom_rules = Some(rules_path.display().to_string());
    let runner = GateRunner::from_config(config).unwrap();

    let verdict = runner.evaluate(&write_request(
        "src/api.ts",
        "const host = 'corp-internal.example';",
    ));
    assert_eq!(verdict.decision, Decision::Warn);
    let finding = verdict
        .findings
        .iter()
        .find(|f| f.category == "custom")
        .expect("custom finding");
    assert_eq!(finding.rule, "no-internal-hostnames");
    assert_eq!(
        finding.suggestion.as_deref(),
        Some("Use the public gateway host")
    );
}

#[test]
fn custom_rules_can_target_builtin_categories() {
    let mut catalog = Catalog::builtin(&EngineConfig::default()).unwrap();
    custom::extend_from_str(
        &mut catalog,
        r#"
[[rules]]
id = "internal-token-format"
category = "secrets"
pattern = "tok_[a-z0-9]{30}"
severity = "critical"
message = "Internal token detected: {value}"
"#,
        &EngineConfig::default(),
    )
    .unwrap();

    let runner = GateRunner::with_catalog(catalog, GatecheckConfig::default());
    let verdict = runner.evaluate(&write_request(
        "src/api.ts",
        "const t = 'tok_abcdefghijklmnopqrstuvwxyz0123';",
    ));
    // Inherits the secrets blocking threshold.
    assert_eq!(verdict.decision, Decision::Block);
}

#[test]
fn broken_custom_rules_fail_catalog_construction() {
    let dir = tempfile::TempDir::new().unwrap();
    let rules_path = dir.path().join("broken.toml");
    std::fs::write(
        &rules_path,
        r#"
[[rules]]
id = "broken"
pattern = "("
severity = "info"
message = "m"
"#,
    )
    .unwrap();

    let mut config = GatecheckConfig::default();
    config.engine.custom_rules = Some(rules_path.display().to_string());
    assert!(GateRunner::from_config(config).is_err());
}

#[test]
fn disabled_categories_are_skipped() {
    let mut config = GatecheckConfig::default();
    config.engine.disabled_categories = vec!["design".to_string()];
    let runner = GateRunner::from_config(config).unwrap();
    let verdict = runner.evaluate(&write_request(
        "src/components/Button.tsx",
        "const style = { color: '#0EA5E9' };",
    ));
    assert!(verdict.findings.iter().all(|f| f.category != "design"));
}
