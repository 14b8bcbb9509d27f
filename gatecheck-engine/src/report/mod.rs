//! Report rendering — the stable diagnostic contract for callers.
//!
//! Findings are grouped by category, each entry carrying line number (when
//! available), message, and suggestion (when available). Rendering is pure
//! presentation; nothing here influences the verdict.

pub mod console;
pub mod json;

pub use console::ConsoleReporter;
pub use json::JsonReporter;

use crate::catalog::Catalog;
use crate::gate::Verdict;

/// A report renderer.
pub trait Reporter {
    fn name(&self) -> &'static str;
    fn generate(&self, path: &str, verdict: &Verdict, catalog: &Catalog) -> String;
}

/// Findings grouped by category id, preserving catalog order; categories
/// unknown to the catalog (shouldn't happen, but the report must not lose
/// data) trail in first-seen order.
pub(crate) fn group_by_category<'a>(
    verdict: &'a Verdict,
    catalog: &Catalog,
) -> Vec<(String, Vec<&'a crate::types::Finding>)> {
    let mut groups: Vec<(String, Vec<&crate::types::Finding>)> = Vec::new();
    let mut order: Vec<&str> = catalog.categories.iter().map(|c| c.id.as_str()).collect();
    for finding in &verdict.findings {
        if !order.contains(&finding.category.as_str()) {
            order.push(finding.category.as_str());
        }
    }
    for id in order {
        let entries: Vec<&crate::types::Finding> = verdict
            .findings
            .iter()
            .filter(|f| f.category == id)
            .collect();
        if !entries.is_empty() {
            groups.push((id.to_string(), entries));
        }
    }
    groups
}
