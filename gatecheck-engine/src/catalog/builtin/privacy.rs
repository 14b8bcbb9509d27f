//! Personal-data protection rules.
//!
//! Two tiers: files under data-handling paths get the full rule set with
//! contextual suppression; everything else gets a lightweight informational
//! notice when personal-data keywords appear.

use gatecheck_core::errors::CatalogError;

use crate::catalog::{
    DedupeMode, PatternCompiler, PatternRule, Relevance, RequireRule, Rule, RuleCategory,
};
use crate::types::Severity;

/// Paths whose files are expected to handle personal data. Stored
/// lowercase; relevance comparison is case-insensitive.
pub const CRITICAL_PATHS: &[&str] = &[
    "components/booking",
    "components/auth",
    "components/contact",
    "pages/contactpage",
    "admin/features/users",
    "services/api",
];

/// Nearby compliance language is taken as evidence the concern is handled.
const MITIGATORS: &[&str] = &[
    "consent",
    "gdpr",
    "privacy",
    "dataProtection",
    "lawfulBasis",
    "optIn",
    "agree",
    "terms",
];

pub fn categories(c: &PatternCompiler) -> Result<Vec<RuleCategory>, CatalogError> {
    Ok(vec![critical(c)?, notice(c)?])
}

fn critical(c: &PatternCompiler) -> Result<RuleCategory, CatalogError> {
    let rules = vec![
        Rule::Pattern(PatternRule::new(
            "personal-data-collection",
            Severity::Warning,
            "Personal data collection detected",
            c.set(
                "privacy/personal-data-collection",
                &[
                    r#"(name|email|phone|address|dob|dateOfBirth)\s*[:=]\s*["']?"#,
                    r#"(firstName|lastName|fullName|phoneNumber)\s*[:=]\s*["']?"#,
                    r"personal(Data|Info|Information)",
                    r"user(Data|Info|Profile)",
                ],
            )?,
        )),
        Rule::Pattern(PatternRule::new(
            "consent-missing",
            Severity::Warning,
            "Data collection without explicit consent check",
            c.set(
                "privacy/consent-missing",
                &[
                    r#"<input[^>]+type=["']?(email|tel|text)"#,
                    r"<form",
                    r"collectUserData\s*\(",
                ],
            )?,
        )),
        Rule::Pattern(PatternRule::new(
            "data-retention",
            Severity::Warning,
            "Personal data storage without retention policy",
            c.set(
                "privacy/data-retention",
                &[
                    r"localStorage\.setItem.*personal",
                    r"sessionStorage\.setItem.*user",
                    r"cookie.*=.*email",
                    r"document\.cookie.*=.*(name|phone|address)",
                ],
            )?,
        )),
        Rule::Pattern(PatternRule::new(
            "third-party-sharing",
            Severity::Warning,
            "Potential personal data sharing with third parties",
            c.set(
                "privacy/third-party-sharing",
                &[
                    r#"fetch\(["'][^"']*(analytics|tracking|facebook|google)[^"']*["'].*user"#,
                    r#"gtag\s*\(["']event.*email"#,
                    r#"fbq\s*\(["']track.*personal"#,
                ],
            )?,
        )),
        Rule::Pattern(PatternRule::new(
            "privacy-link-missing",
            Severity::Warning,
            "Form without privacy policy link",
            c.set(
                "privacy/privacy-link-missing",
                &[r"<form", r"newsletter", r"subscribe"],
            )?,
        )),
        Rule::Require(
            RequireRule::new(
                "delete-user-data",
                Severity::Warning,
                "User deletion without ensuring data removal",
            )
            .with_trigger(c.set("privacy/delete-user", &[r"deleteUser"])?)
            .with_expect(c.set("privacy/delete-personal-data", &[r"deletePersonalData"])?),
        ),
        Rule::Require(
            RequireRule::new(
                "remove-account-data",
                Severity::Warning,
                "Account removal without ensuring data removal",
            )
            .with_trigger(c.set("privacy/remove-account", &[r"removeAccount"])?)
            .with_expect(c.set("privacy/remove-all-data", &[r"removeAllData"])?),
        ),
        Rule::Require(
            RequireRule::new(
                "cancel-subscription-data",
                Severity::Warning,
                "Subscription cancellation without ensuring data removal",
            )
            .with_trigger(c.set("privacy/cancel-subscription", &[r"cancelSubscription"])?)
            .with_expect(c.set("privacy/delete-data", &[r"deleteData"])?),
        ),
        // Components that must carry specific consent affordances.
        required_element(c, "contact-privacy-checkbox", "ContactForm", r"privacy\s*policy\s*checkbox", "privacy policy checkbox")?,
        required_element(c, "contact-consent-text", "ContactForm", r"consent\s*text", "consent text")?,
        required_element(c, "booking-data-usage", "BookingForm", r"data\s*usage\s*explanation", "data usage explanation")?,
        required_element(c, "booking-consent-checkbox", "BookingForm", r"consent\s*checkbox", "consent checkbox")?,
        required_element(c, "newsletter-unsubscribe", "NewsletterSignup", r"unsubscribe\s*info", "unsubscribe info")?,
        required_element(c, "newsletter-privacy-link", "NewsletterSignup", r"privacy\s*link", "privacy link")?,
        required_element(c, "profile-data-export", "UserProfile", r"data\s*export\s*option", "data export option")?,
        required_element(c, "profile-deletion-option", "UserProfile", r"deletion\s*option", "deletion option")?,
    ];

    Ok(RuleCategory::new(
        "privacy",
        "⚠️  GDPR COMPLIANCE ISSUES",
        Relevance::PathContainsAny(CRITICAL_PATHS.iter().map(|p| p.to_string()).collect()),
    )
    .with_mitigators(MITIGATORS)
    .with_exceptions(&["example.com", "localhost", "127.0.0.1"])
    .with_context_radius(500)
    .with_dedupe(DedupeMode::FirstPerRule)
    .with_report_cap(5)
    .with_rules(rules))
}

fn required_element(
    c: &PatternCompiler,
    id: &str,
    component: &str,
    expect: &str,
    label: &str,
) -> Result<Rule, CatalogError> {
    Ok(Rule::Require(
        RequireRule::new(
            id,
            Severity::Warning,
            &format!("Missing required GDPR element: {label}"),
        )
        .with_when_path(&[component])
        .with_expect(c.set(&format!("privacy/{id}"), &[expect])?),
    ))
}

/// Lightweight tier for files outside the data-handling paths.
fn notice(c: &PatternCompiler) -> Result<RuleCategory, CatalogError> {
    let skip: Vec<&str> = CRITICAL_PATHS.to_vec();
    Ok(RuleCategory::new(
        "privacy-notice",
        "📋 GDPR NOTICE",
        Relevance::Always,
    )
    .with_skip_paths(&skip)
    .with_exceptions(&["example.com", "localhost", "127.0.0.1"])
    .with_dedupe(DedupeMode::FirstPerRule)
    .with_report_cap(1)
    .with_rules(vec![Rule::Pattern(
        PatternRule::new(
            "personal-data-keywords",
            Severity::Info,
            "Personal data handling detected — ensure proper consent and data protection measures are in place",
            c.set(
                "privacy-notice/personal-data-keywords",
                &[r"(email|phone|address|\bname\b|\bdob\b|creditCard|bankAccount|passport)"],
            )?,
        ),
    )]))
}
