//! Tests for the Gatecheck configuration system.

use std::sync::Mutex;

use gatecheck_core::config::{CliOverrides, GatecheckConfig, ReportFormat};
use gatecheck_core::errors::ConfigError;

/// Global mutex to serialize tests that modify environment variables.
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn tempdir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}

/// Clear all GATECHECK_ env vars to prevent cross-test contamination.
fn clear_gatecheck_env_vars() {
    for key in [
        "GATECHECK_CONTEXT_RADIUS",
        "GATECHECK_MAX_MATCHES",
        "GATECHECK_MAX_FINDINGS",
        "GATECHECK_DISABLED_CATEGORIES",
        "GATECHECK_CUSTOM_RULES",
        "GATECHECK_FORMAT",
        "NO_COLOR",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn layered_resolution_cli_over_env_over_project() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_gatecheck_env_vars();

    let dir = tempdir();
    std::fs::write(
        dir.path().join("gatecheck.toml"),
        r#"
[engine]
context_radius = 250
max_matches_per_pattern = 2

[report]
format = "json"
"#,
    )
    .unwrap();

    std::env::set_var("GATECHECK_CONTEXT_RADIUS", "300");

    let cli = CliOverrides {
        max_matches_per_pattern: Some(5),
        ..Default::default()
    };
    let config = GatecheckConfig::load(dir.path(), Some(&cli)).unwrap();

    // CLI beats project for the match cap.
    assert_eq!(config.engine.max_matches_per_pattern, Some(5));
    // Env beats project for the radius.
    assert_eq!(config.engine.context_radius, Some(300));
    // Project value survives where nothing overrides it.
    assert_eq!(config.report.effective_format(), ReportFormat::Json);

    clear_gatecheck_env_vars();
}

#[test]
fn missing_project_file_falls_back_to_defaults() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_gatecheck_env_vars();

    let dir = tempdir();
    let config = GatecheckConfig::load(dir.path(), None).unwrap();

    assert_eq!(config.engine.effective_context_radius(), 400);
    assert_eq!(config.engine.effective_max_matches_per_pattern(), 3);
    assert_eq!(config.engine.effective_max_findings_per_category(), 5);
    assert_eq!(config.report.effective_format(), ReportFormat::Console);
    assert!(config.report.effective_color());
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let err = GatecheckConfig::from_toml("engine = nonsense").unwrap_err();
    assert!(matches!(err, ConfigError::ParseError { .. }));
}

#[test]
fn out_of_range_radius_fails_validation() {
    let err = GatecheckConfig::from_toml(
        r#"
[engine]
context_radius = 7
"#,
    )
    .unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => {
            assert_eq!(field, "engine.context_radius")
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn zero_match_cap_fails_validation() {
    let err = GatecheckConfig::from_toml(
        r#"
[engine]
max_matches_per_pattern = 0
"#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::ValidationFailed { .. }));
}

#[test]
fn disabled_categories_env_is_comma_separated() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_gatecheck_env_vars();

    let dir = tempdir();
    std::env::set_var("GATECHECK_DISABLED_CATEGORIES", "design, pricing");
    let config = GatecheckConfig::load(dir.path(), None).unwrap();
    assert!(config.engine.is_disabled("design"));
    assert!(config.engine.is_disabled("pricing"));
    assert!(!config.engine.is_disabled("secrets"));

    clear_gatecheck_env_vars();
}
