//! Async-operation feedback rules: loading states, error handling, and the
//! UI that surfaces them. Advisory only.

use gatecheck_core::errors::CatalogError;

use crate::catalog::{
    DedupeMode, PatternCompiler, Relevance, RequireRule, Rule, RuleCategory,
};
use crate::types::Severity;

const ASYNC_CONTEXT: &[&str] = &[
    r"fetch\s*\(",
    r"axios\.",
    r"\.get\s*\(",
    r"\.post\s*\(",
    r"\.put\s*\(",
    r"\.delete\s*\(",
    r"useQuery",
    r"useMutation",
    r"useSWR",
    r"useAsync",
    r"async\s+function",
    r"async\s*\(",
    r"async\s*=>",
    r"\.then\s*\(",
    r"Promise\.",
    r"await\s+",
];

const LOADING_MARKERS: &[&str] = &[r"isLoading", r"loading", r"isFetching", r"pending"];

const ERROR_MARKERS: &[&str] = &[
    r"catch\s*\(",
    r"\.catch\s*\(",
    r"error\s*[=:]",
    r"errorState",
    r"hasError",
    r"onError",
];

pub fn category(c: &PatternCompiler) -> Result<RuleCategory, CatalogError> {
    let async_ops = c.set("async-feedback/context", ASYNC_CONTEXT)?;
    let loading = c.set("async-feedback/loading-markers", LOADING_MARKERS)?;
    let errors = c.set("async-feedback/error-markers", ERROR_MARKERS)?;

    let rules = vec![
        Rule::Require(
            RequireRule::new(
                "missing-loading-state",
                Severity::Error,
                "Async operations found but no loading state management",
            )
            .with_when(async_ops.clone())
            .with_trigger(async_ops.clone())
            .with_expect(loading.clone()),
        ),
        Rule::Require(
            RequireRule::new(
                "missing-error-handling",
                Severity::Error,
                "Async operations without error handling",
            )
            .with_when(async_ops.clone())
            .with_trigger(async_ops.clone())
            .with_expect(errors.clone()),
        ),
        Rule::Require(
            RequireRule::new(
                "missing-loading-ui",
                Severity::Warning,
                "Loading state exists but no loading UI component",
            )
            .with_when(loading.clone())
            .with_trigger(loading.clone())
            .with_expect(c.set_exact(
                "async-feedback/loading-ui",
                &["Spinner", "Skeleton", "LoadingIndicator", "CircularProgress"],
            )?),
        ),
        Rule::Require(
            RequireRule::new(
                "missing-error-ui",
                Severity::Warning,
                "Error handling exists but no error UI component",
            )
            .with_when(errors.clone())
            .with_trigger(errors.clone())
            .with_expect(c.set_exact(
                "async-feedback/error-ui",
                &["ErrorBoundary", "ErrorMessage", r"Alert.*error"],
            )?),
        ),
        Rule::Require(
            RequireRule::new(
                "loading-state-not-reset",
                Severity::Warning,
                "Loading state might not be reset after operation",
            )
            .with_when(loading.clone())
            .with_trigger(loading.clone())
            .with_expect(c.set(
                "async-feedback/loading-reset",
                &[r"finally", r"setLoading\s*\(\s*false", r"loading\s*=\s*false"],
            )?),
        ),
    ];

    Ok(RuleCategory::new(
        "async-feedback",
        "⏳ LOADING STATE ISSUES",
        Relevance::ExtensionAny(vec![".tsx".to_string(), ".jsx".to_string()]),
    )
    .with_skip_paths(&[".test.", ".spec.", "mock", "__tests__"])
    .with_dedupe(DedupeMode::FirstPerRule)
    .with_rules(rules))
}
