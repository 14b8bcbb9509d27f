//! Built-in rule categories.
//!
//! Everything in this module tree is data: patterns, severities,
//! thresholds, exception sets. The engine never branches on a specific
//! category; adding a compliance domain means adding an entry here.

pub mod async_feedback;
pub mod certificate;
pub mod design;
pub mod forms;
pub mod payment;
pub mod pricing;
pub mod privacy;
pub mod secrets;

use gatecheck_core::errors::CatalogError;

use super::{
    BlockPolicy, Catalog, FaultPolicy, PathPolicy, PatternCompiler, Relevance, RuleCategory,
};
use crate::types::Severity;

/// Assemble the full built-in catalog in its fixed evaluation order.
pub fn build(c: &PatternCompiler) -> Result<Catalog, CatalogError> {
    let mut categories = vec![path_policy_category()];
    categories.push(secrets::category(c)?);
    categories.push(payment::category(c)?);
    categories.extend(privacy::categories(c)?);
    categories.push(design::category(c)?);
    categories.push(forms::category(c)?);
    categories.extend(pricing::categories(c)?);
    categories.push(certificate::category(c)?);
    categories.push(async_feedback::category(c)?);

    Ok(Catalog {
        path_policy: path_policy(),
        categories,
    })
}

/// Files and directories the agent may never write, regardless of content.
fn path_policy() -> PathPolicy {
    PathPolicy {
        blocked_files: [
            ".env",
            ".env.local",
            ".env.production",
            ".env.development",
            "credentials.json",
            "serviceAccount.json",
            "firebase-admin.json",
            "key.pem",
            "cert.pem",
            "id_rsa",
            "id_ed25519",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        blocked_dirs: [
            ".git/",
            "node_modules/",
            "dist/",
            "build/",
            ".claude/secrets/",
            ".ssh/",
            "coverage/",
            ".next/",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect(),
        deny_traversal: true,
    }
}

/// Carrier category for path-policy findings; it has no content rules but
/// defines the blocking threshold and fail-closed fault posture.
fn path_policy_category() -> RuleCategory {
    RuleCategory::new("path-policy", "❌ SECURITY BLOCK", Relevance::Always)
        .with_block(BlockPolicy::AtOrAbove(Severity::Error))
        .with_fault(FaultPolicy::FailClosed)
}
