//! Secret and credential exposure rules.

use gatecheck_core::errors::CatalogError;

use crate::catalog::{
    BlockPolicy, DedupeMode, FaultPolicy, PatternCompiler, PatternRule, Relevance, Rule,
    RuleCategory,
};
use crate::types::Severity;

pub fn category(c: &PatternCompiler) -> Result<RuleCategory, CatalogError> {
    let rules = vec![
        Rule::Pattern(PatternRule::new(
            "api-keys",
            Severity::Critical,
            "Potential API key detected: {value}",
            c.set(
                "secrets/api-keys",
                &[
                    r#"api[_-]?key\s*[:=]\s*["']?[a-zA-Z0-9]{20,}"#,
                    r#"apiKey\s*[:=]\s*["']?[a-zA-Z0-9]{20,}"#,
                    r#"X-API-Key["']?\s*[:=]\s*["']?[a-zA-Z0-9]{20,}"#,
                    r#"VITE_[A-Z_]*API_KEY\s*[:=]\s*["']?[a-zA-Z0-9]{20,}"#,
                ],
            )?,
        )),
        Rule::Pattern(PatternRule::new(
            "generic-secrets",
            Severity::Critical,
            "Potential secret detected: {value}",
            c.set(
                "secrets/generic-secrets",
                &[
                    r#"secret\s*[:=]\s*["']?[a-zA-Z0-9]{20,}"#,
                    r#"password\s*[:=]\s*["']?[^"'\s]{8,}"#,
                    r#"token\s*[:=]\s*["']?[a-zA-Z0-9]{20,}"#,
                    r#"jwt[_-]?secret\s*[:=]\s*["']?[a-zA-Z0-9]{20,}"#,
                    r#"refresh[_-]?token\s*[:=]\s*["']?[a-zA-Z0-9]{20,}"#,
                ],
            )?,
        )),
        Rule::Pattern(PatternRule::new(
            "private-keys",
            Severity::Critical,
            "Private key material detected: {value}",
            c.set(
                "secrets/private-keys",
                &[
                    r"-----BEGIN\s+(?:RSA\s+)?PRIVATE\s+KEY-----",
                    r"-----BEGIN\s+OPENSSH\s+PRIVATE\s+KEY-----",
                    r"-----BEGIN\s+EC\s+PRIVATE\s+KEY-----",
                    r"-----BEGIN\s+PGP\s+PRIVATE\s+KEY-----",
                ],
            )?,
        )),
        Rule::Pattern(PatternRule::new(
            "cloud-credentials",
            Severity::Critical,
            "Potential cloud credentials detected: {value}",
            c.set(
                "secrets/cloud-credentials",
                &[
                    r"aws_access_key_id\s*=\s*[A-Z0-9]{20}",
                    r"aws_secret_access_key\s*=\s*[a-zA-Z0-9/+=]{40}",
                    r"GOOGLE_APPLICATION_CREDENTIALS\s*[:=]",
                    r#"AZURE_[A-Z_]*_KEY\s*[:=]\s*["']?[a-zA-Z0-9]{20,}"#,
                ],
            )?,
        )),
        Rule::Pattern(PatternRule::new(
            "database-urls",
            Severity::Critical,
            "Database URL with inline credentials detected: {value}",
            c.set(
                "secrets/database-urls",
                &[
                    r"(?:mongodb|postgres|postgresql|mysql|redis)://[^:]+:[^@]+@[^/\s]+",
                    r#"DATABASE_URL\s*[:=]\s*["']?(?:mongodb|postgres|mysql)://[^"'\s]+"#,
                ],
            )?,
        )),
        Rule::Pattern(PatternRule::new(
            "email-credentials",
            Severity::Critical,
            "Potential email service credentials detected: {value}",
            c.set(
                "secrets/email-credentials",
                &[
                    r#"SENDGRID_API_KEY\s*[:=]\s*["']?[a-zA-Z0-9]{20,}"#,
                    r#"MAILGUN_API_KEY\s*[:=]\s*["']?[a-zA-Z0-9]{20,}"#,
                    r#"smtp[_-]?password\s*[:=]\s*["']?[^"'\s]{8,}"#,
                ],
            )?,
        )),
        Rule::Pattern(PatternRule::new(
            "stripe-live-keys",
            Severity::Critical,
            "Live Stripe key detected: {value}",
            c.set(
                "secrets/stripe-live-keys",
                &[
                    r"sk_live_[a-zA-Z0-9]{24,}",
                    r"rk_live_[a-zA-Z0-9]{24,}",
                    r#"STRIPE_SECRET_KEY\s*[:=]\s*["']?sk_[a-zA-Z0-9]{24,}"#,
                ],
            )?,
        )),
    ];

    Ok(
        RuleCategory::new("secrets", "⚠️  SECURITY WARNING", Relevance::Always)
            .with_exceptions(&["example.com", "localhost", "127.0.0.1"])
            .with_exception_patterns(c.set(
                "secrets/env-references",
                &[r"process\.env\.[A-Z_]+", r"import\.meta\.env\.[A-Z_]+"],
            )?)
            .with_dedupe(DedupeMode::PerMatch)
            .with_block(BlockPolicy::AtOrAbove(Severity::Error))
            .with_fault(FaultPolicy::FailClosed)
            .with_notes(&[
                "Review and remove sensitive data before proceeding",
                "Reference secrets through the environment, never inline",
            ])
            .with_rules(rules),
    )
}
