//! Certificate template rules — HSE/Ofqual requirements for issued
//! first-aid certificates. Template defects block; the rest advise.

use gatecheck_core::errors::CatalogError;

use crate::catalog::{
    BlockPolicy, DedupeMode, PatternCompiler, PatternRule, Relevance, RequireRule, Rule,
    RuleCategory,
};
use crate::types::Severity;

const GENERATION_CONTEXT: &[&str] = &[
    r"generateCertificate",
    r"createCertificate",
    r"issueCertificate",
];

/// Placeholders every certificate template must carry.
const PLACEHOLDERS: &[&str] = &[
    "attendee_name",
    "course_title",
    "certificate_number",
    "issue_date",
    "expiry_date",
    "instructor_name",
    "provider_number",
];

pub fn category(c: &PatternCompiler) -> Result<RuleCategory, CatalogError> {
    let generation = c.set("certificate/generation", GENERATION_CONTEXT)?;

    let mut rules = Vec::new();
    for placeholder in PLACEHOLDERS {
        let expect_src = format!(r"\{{\{{\s*{placeholder}\s*\}}\}}");
        rules.push(Rule::Require(
            RequireRule::new(
                &format!("placeholder-{}", placeholder.replace('_', "-")),
                Severity::Error,
                &format!("Missing required placeholder: {{{{{placeholder}}}}}"),
            )
            .with_when_path(&["certificate", "template"])
            .with_expect(c.set(
                &format!("certificate/placeholder-{placeholder}"),
                &[expect_src.as_str()],
            )?),
        ));
    }

    rules.extend(vec![
        Rule::Require(
            RequireRule::new(
                "certificate-number-format",
                Severity::Warning,
                "Certificate number should follow format: RFT-YYYY-XXXXXX",
            )
            .with_when(generation.clone())
            .with_trigger(generation.clone())
            .with_expect(c.set(
                "certificate/number-format",
                &[r"RFT-\d{4}-\d{6}", r"uuid", r"random"],
            )?),
        ),
        Rule::Require(
            RequireRule::new(
                "missing-expiry",
                Severity::Error,
                "Certificate generation must include expiry date (3 years)",
            )
            .with_when(generation.clone())
            .with_trigger(generation.clone())
            .with_expect(c.set("certificate/expiry-mention", &[r"expir"])?),
        ),
        Rule::Pattern(
            PatternRule::new(
                "incorrect-expiry",
                Severity::Error,
                "First aid certificates must expire after exactly 3 years",
                c.set(
                    "certificate/expiry-arithmetic",
                    &[r"expir\w*\s*[^\n]*\+\s*\d+\s*years?"],
                )?,
            )
            .with_accept(not_three_years),
        ),
        regulatory(c, "regulatory-hse", &[r"HSE", r"health and safety executive"],
            "Health and Safety Executive approved")?,
        regulatory(c, "regulatory-ofqual", &[r"ofqual"], "Ofqual regulated qualification")?,
        regulatory(c, "regulatory-qcf", &[r"QCF", r"qualifications and credit framework"],
            "Qualifications and Credit Framework")?,
        Rule::Require(
            RequireRule::new(
                "security-features",
                Severity::Info,
                "Consider adding security features: QR code, watermark, or verification URL",
            )
            .with_when(c.set("certificate/document-context", &[r"pdf", r"document", r"template"])?)
            .with_trigger(c.set("certificate/document-context", &[r"pdf", r"document", r"template"])?)
            .with_expect(c.set(
                "certificate/security-features",
                &[r"watermark", r"qr_code", r"verification_url", r"tamper_proof"],
            )?),
        ),
        Rule::Require(
            RequireRule::new(
                "verification-checks",
                Severity::Warning,
                "Certificate validation should check attendee identity, course completion, instructor qualification, and expiry window",
            )
            .with_when(c.set(
                "certificate/validation-context",
                &[r"validateCertificate", r"verifyCertificate"],
            )?)
            .with_trigger(c.set(
                "certificate/validation-context",
                &[r"validateCertificate", r"verifyCertificate"],
            )?)
            .with_expect(c.set("certificate/expiry-check", &[r"within_?expiry"])?),
        ),
    ]);

    Ok(RuleCategory::new(
        "certificate",
        "📜 CERTIFICATE VALIDATION",
        Relevance::PathContainsAny(
            ["certificate", "cert", "qualification", "completion", "attendee", "graduate", "award"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        ),
    )
    .with_dedupe(DedupeMode::FirstPerRule)
    .with_report_cap(8)
    .with_block(BlockPolicy::AtOrAbove(Severity::Error))
    .with_notes(&[
        "Must include unique certificate number (RFT-YYYY-XXXXXX)",
        "Must show 3-year expiry date",
        "Must include HSE approval and Ofqual regulation text",
        "Must have instructor name and signature",
    ])
    .with_rules(rules))
}

fn regulatory(
    c: &PatternCompiler,
    id: &str,
    expect: &[&str],
    label: &str,
) -> Result<Rule, CatalogError> {
    Ok(Rule::Require(
        RequireRule::new(
            id,
            Severity::Warning,
            &format!("Missing regulatory text: {label}"),
        )
        .with_when_path(&["certificate"])
        .with_expect(c.set(&format!("certificate/{id}"), expect)?),
    ))
}

/// Accepts only expiry arithmetic whose year count is not 3.
fn not_three_years(text: &str) -> bool {
    let lower = text.to_lowercase();
    let Some(year_pos) = lower.find("year") else {
        return false;
    };
    let digits: String = lower[..year_pos]
        .chars()
        .rev()
        .skip_while(|c| c.is_whitespace())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    let value: Option<u32> = digits.chars().rev().collect::<String>().parse().ok();
    value.is_some_and(|v| v != 3)
}
