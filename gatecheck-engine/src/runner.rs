//! Gate runner — drives one change request through the full pipeline.
//!
//! The runner owns the immutable catalog and resolved configuration. Each
//! `evaluate` call is a stateless, synchronous pass; invocations are
//! independent and may run concurrently without coordination.

use std::panic::{catch_unwind, AssertUnwindSafe};

use gatecheck_core::config::GatecheckConfig;
use gatecheck_core::errors::{CatalogError, EnvelopeError, GateError, GatecheckErrorCode};

use crate::catalog::{custom, Catalog, FaultPolicy};
use crate::envelope::{self, ChangeRequest, HookEvent};
use crate::gate::{self, Verdict};
use crate::matcher::{self, LineIndex};
use crate::types::{Finding, Severity};
use crate::{aggregate, suppress};

pub struct GateRunner {
    catalog: Catalog,
    config: GatecheckConfig,
}

impl GateRunner {
    /// Build a runner over the built-in catalog, extended with any
    /// user-defined rules named in the configuration.
    pub fn from_config(config: GatecheckConfig) -> Result<Self, CatalogError> {
        let mut catalog = Catalog::builtin(&config.engine)?;
        if let Some(ref path) = config.engine.custom_rules {
            custom::extend_from_file(&mut catalog, std::path::Path::new(path), &config.engine)?;
        }
        Ok(Self { catalog, config })
    }

    /// Build a runner over an explicit catalog (tests, embedders).
    pub fn with_catalog(catalog: Catalog, config: GatecheckConfig) -> Self {
        Self { catalog, config }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Evaluate a raw hook event. Non-mutating tools pass implicitly;
    /// malformed envelopes are faults, never verdicts.
    pub fn evaluate_event(&self, event: &HookEvent) -> Result<Verdict, EnvelopeError> {
        match envelope::change_request(event)? {
            Some(request) => Ok(self.evaluate(&request)),
            None => Ok(Verdict::pass()),
        }
    }

    /// Evaluate one proposed change.
    pub fn evaluate(&self, request: &ChangeRequest) -> Verdict {
        // Path policy runs before any content scanning and short-circuits.
        if let Some(reason) = self.catalog.path_policy.deny_reason(&request.path) {
            let finding = Finding {
                category: "path-policy".to_string(),
                rule: "blocked-path".to_string(),
                severity: Severity::Critical,
                message: reason,
                line: None,
                excerpt: None,
                suggestion: None,
            };
            return gate::decide(vec![finding], &self.catalog);
        }

        let content = request.content();
        let index = LineIndex::new(&content);
        let mut findings = Vec::new();

        for category in self.catalog.relevant(&request.path) {
            if self.config.engine.is_disabled(&category.id) {
                continue;
            }

            // One faulty category must never abort the others.
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                let raw = matcher::scan_patterns(&content, &index, category, &self.config.engine);
                let raw_count = raw.len();
                let surviving = suppress::filter(raw, &content, category, &self.config.engine);
                let requires = matcher::eval_requires(&content, &request.path, &index, category);
                tracing::debug!(
                    category = %category.id,
                    matched = raw_count,
                    suppressed = raw_count - surviving.len(),
                    required = requires.len(),
                    "category evaluated"
                );
                aggregate::aggregate(category, &surviving, &requires, &self.config.engine)
            }));

            match outcome {
                Ok(category_findings) => findings.extend(category_findings),
                Err(panic) => {
                    let error = GateError::CategoryPanicked {
                        id: category.id.clone(),
                        message: panic_message(panic),
                    };
                    tracing::error!(code = error.error_code(), "{error}");
                    match category.fault {
                        FaultPolicy::FailOpen => {
                            tracing::warn!(category = %category.id, "failing open, category skipped");
                        }
                        FaultPolicy::FailClosed => {
                            findings.push(Finding {
                                category: category.id.clone(),
                                rule: "engine-fault".to_string(),
                                severity: Severity::Critical,
                                message: format!(
                                    "Evaluation of '{}' failed; blocking by policy",
                                    category.id
                                ),
                                line: None,
                                excerpt: None,
                                suggestion: None,
                            });
                        }
                    }
                }
            }
        }

        gate::decide(findings, &self.catalog)
    }
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
