//! JSON reporter — machine-readable report with a stable shape.

use serde_json::{json, Value};

use super::{group_by_category, Reporter};
use crate::catalog::Catalog;
use crate::gate::Verdict;

/// JSON reporter for downstream tooling.
pub struct JsonReporter;

impl JsonReporter {
    /// Compose the report object (pure, for testing/snapshot purposes).
    pub fn compose(path: &str, verdict: &Verdict, catalog: &Catalog) -> Value {
        let categories: Vec<Value> = group_by_category(verdict, catalog)
            .into_iter()
            .map(|(id, findings)| {
                json!({
                    "id": id,
                    "findings": findings
                        .iter()
                        .map(|f| serde_json::to_value(f).unwrap_or(Value::Null))
                        .collect::<Vec<_>>(),
                })
            })
            .collect();

        json!({
            "path": path,
            "decision": verdict.decision,
            "exit_code": verdict.exit.code(),
            "categories": categories,
        })
    }
}

impl Reporter for JsonReporter {
    fn name(&self) -> &'static str {
        "json"
    }

    fn generate(&self, path: &str, verdict: &Verdict, catalog: &Catalog) -> String {
        let value = Self::compose(path, verdict, catalog);
        serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{BlockPolicy, PathPolicy, Relevance, RuleCategory};
    use crate::gate::decide;
    use crate::types::{Finding, Severity};

    #[test]
    fn compose_shape_is_stable() {
        let catalog = Catalog {
            path_policy: PathPolicy::default(),
            categories: vec![RuleCategory::new("secrets", "S", Relevance::Always)
                .with_block(BlockPolicy::AtOrAbove(Severity::Error))],
        };
        let verdict = decide(
            vec![Finding {
                category: "secrets".to_string(),
                rule: "api-keys".to_string(),
                severity: Severity::Critical,
                message: "Potential API key detected".to_string(),
                line: Some(7),
                excerpt: Some("api_key = \"...\"".to_string()),
                suggestion: None,
            }],
            &catalog,
        );
        let out = JsonReporter::compose("src/config.ts", &verdict, &catalog);
        assert_eq!(out["decision"], "block");
        assert_eq!(out["exit_code"], 2);
        assert_eq!(out["categories"][0]["id"], "secrets");
        assert_eq!(out["categories"][0]["findings"][0]["line"], 7);
        assert_eq!(
            out["categories"][0]["findings"][0]["severity"],
            "critical"
        );
    }
}
