//! Business-data consistency rules: course pricing and durations.
//! Advisory only.

use gatecheck_core::errors::CatalogError;

use crate::catalog::{
    DedupeMode, PatternCompiler, PatternRule, Relevance, RequireRule, Rule, RuleCategory,
};
use crate::types::Severity;

/// The only course with a committed price today (EFAW, £75).
const KNOWN_PRICES: &[u32] = &[75];

/// Valid course durations in hours: 1, 2, or 3 training days.
const VALID_DURATIONS: &[u32] = &[6, 12, 18];

const PRICE_PATTERNS: &[&str] = &[
    r"£\d+(?:\.\d+)?",
    r#"price["']?\s*[:=]\s*\d+"#,
    r#"cost["']?\s*[:=]\s*\d+"#,
    r#"fee["']?\s*[:=]\s*\d+"#,
    r#"amount["']?\s*[:=]\s*\d+"#,
];

pub fn categories(c: &PatternCompiler) -> Result<Vec<RuleCategory>, CatalogError> {
    Ok(vec![consistency(c)?, hardcoded(c)?])
}

fn consistency(c: &PatternCompiler) -> Result<RuleCategory, CatalogError> {
    let rules = vec![
        Rule::Pattern(
            PatternRule::new(
                "invalid-duration",
                Severity::Error,
                "Invalid course duration: {value}",
                c.set(
                    "pricing/durations",
                    &[
                        r#"duration["']?\s*[:=]\s*["']?\d+"#,
                        r#"hours?["']?\s*[:=]\s*["']?\d+"#,
                        r#"days?["']?\s*[:=]\s*["']?\d+"#,
                        r"\d+\s*hours?",
                        r"\d+\s*days?",
                    ],
                )?,
            )
            .with_accept(invalid_duration)
            .with_requires_context(&["course", "training", "session", "class"])
            .with_context_radius(100)
            .with_suggestion("Valid durations: 6, 12, or 18 hours"),
        ),
        Rule::Pattern(
            PatternRule::new(
                "price-format",
                Severity::Warning,
                "Inconsistent price formatting: {value}",
                c.set("pricing/decimal-prices", &[r"£\d+\.\d+"])?,
            )
            .with_accept(not_two_decimals)
            .with_suggestion("Use consistent 2 decimal places: £75.00"),
        ),
        Rule::Require(
            RequireRule::new(
                "vat-clarity",
                Severity::Info,
                "Price display without VAT clarification",
            )
            .with_trigger(c.set(
                "pricing/price-mentions",
                &[r"price", r"cost", r"fee", r"amount"],
            )?)
            .with_expect(c.set(
                "pricing/vat-terms",
                &[r"vat", r"tax", r"inclusive", r"exclusive"],
            )?)
            .with_suggestion("Clarify if prices include VAT"),
        ),
        course_name(c, "course-name-efaw", &[r"emergency first aid", r"\befaw\b"],
            r"emergency first aid at work", "Emergency First Aid at Work")?,
        course_name(c, "course-name-faw", &[r"\bfaw\b", r"first aid work\b"],
            r"first aid at work", "First Aid at Work")?,
        course_name(c, "course-name-paediatric",
            &[r"paediatric", r"pediatric", r"child first aid", r"baby first aid"],
            r"paediatric first aid", "Paediatric First Aid")?,
    ];

    Ok(
        RuleCategory::new("pricing", "💰 PRICING & DURATION CHECK", Relevance::Always)
            .with_dedupe(DedupeMode::PerMatch)
            .with_rules(rules),
    )
}

fn course_name(
    c: &PatternCompiler,
    id: &str,
    variations: &[&str],
    full_pattern: &str,
    full_name: &str,
) -> Result<Rule, CatalogError> {
    Ok(Rule::Require(
        RequireRule::new(
            id,
            Severity::Info,
            &format!("Use full course name: {full_name}"),
        )
        .with_trigger(c.set(&format!("pricing/{id}"), variations)?)
        .with_expect(c.set(&format!("pricing/{id}-full"), &[full_pattern])?),
    ))
}

/// Hardcoded price literals belong in the pricing config, not in source.
/// Config-like paths are exempt.
fn hardcoded(c: &PatternCompiler) -> Result<RuleCategory, CatalogError> {
    let rules = vec![
        Rule::Pattern(
            PatternRule::new(
                "hardcoded-price",
                Severity::Warning,
                "Hardcoded price {value} — use config",
                c.set("pricing/hardcoded-price", PRICE_PATTERNS)?,
            )
            .with_accept(known_price)
            .with_suggestion("Import from config: COURSE_PRICES.EFAW"),
        ),
        Rule::Pattern(
            PatternRule::new(
                "unknown-price",
                Severity::Info,
                "Unknown price {value} not in the course price table",
                c.set("pricing/unknown-price", PRICE_PATTERNS)?,
            )
            .with_accept(unknown_price),
        ),
    ];

    Ok(RuleCategory::new(
        "pricing-source",
        "💰 HARDCODED PRICING",
        Relevance::Always,
    )
    .with_skip_paths(&["config", "constants", "settings", "prices", "courses"])
    .with_dedupe(DedupeMode::PerMatch)
    .with_rules(rules))
}

fn extract_number(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let digits: String = text[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().ok()
}

fn known_price(text: &str) -> bool {
    extract_number(text).is_some_and(|v| KNOWN_PRICES.iter().any(|p| v == f64::from(*p)))
}

fn unknown_price(text: &str) -> bool {
    extract_number(text).is_some_and(|v| v > 20.0 && !KNOWN_PRICES.iter().any(|p| v == f64::from(*p)))
}

/// Duration in hours; day counts convert at 6 training hours per day.
fn extract_duration_hours(text: &str) -> Option<u32> {
    let lower = text.to_lowercase();
    let value = extract_number(text)? as u32;
    if lower.contains("day") {
        Some(value * 6)
    } else {
        Some(value)
    }
}

fn invalid_duration(text: &str) -> bool {
    match extract_duration_hours(text) {
        Some(hours) if hours > 0 => !VALID_DURATIONS.contains(&hours),
        _ => false,
    }
}

fn not_two_decimals(text: &str) -> bool {
    match text.split('.').nth(1) {
        Some(decimals) => decimals.chars().filter(|c| c.is_ascii_digit()).count() != 2,
        None => false,
    }
}
