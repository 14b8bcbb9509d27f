//! Design-token drift rules — hardcoded colors, spacing, fonts, and
//! breakpoints instead of the design system's tokens. Advisory only.

use gatecheck_core::errors::CatalogError;

use crate::catalog::{DedupeMode, PatternCompiler, PatternRule, Relevance, Rule, RuleCategory};
use crate::types::Severity;

/// Design-system color tokens, uppercase hex.
const COLOR_TOKENS: &[(&str, &str)] = &[
    ("primary-500", "#0EA5E9"),
    ("primary-600", "#0284C7"),
    ("primary-700", "#0369A1"),
    ("secondary-500", "#10B981"),
    ("accent-500", "#F97316"),
    ("gray-50", "#F9FAFB"),
    ("gray-100", "#F3F4F6"),
    ("gray-200", "#E5E7EB"),
    ("gray-300", "#D1D5DB"),
    ("gray-400", "#9CA3AF"),
    ("gray-500", "#6B7280"),
    ("gray-600", "#4B5563"),
    ("gray-700", "#374151"),
    ("gray-800", "#1F2937"),
    ("gray-900", "#111827"),
];

/// Spacing scale: pixel value → Tailwind token.
const SPACING_TOKENS: &[(u32, &str)] = &[
    (4, "1"),
    (8, "2"),
    (12, "3"),
    (16, "4"),
    (20, "5"),
    (24, "6"),
    (32, "8"),
    (40, "10"),
    (48, "12"),
    (64, "16"),
];

pub fn category(c: &PatternCompiler) -> Result<RuleCategory, CatalogError> {
    let rules = vec![
        Rule::Pattern(
            PatternRule::new(
                "hardcoded-color",
                Severity::Warning,
                "Hardcoded color detected: {value}",
                c.set(
                    "design/hardcoded-color",
                    &[
                        r#"color:\s*["']?#[0-9a-fA-F]{3,6}"#,
                        r#"backgroundColor:\s*["']?#[0-9a-fA-F]{3,6}"#,
                        r#"borderColor:\s*["']?#[0-9a-fA-F]{3,6}"#,
                        r"rgb\(\s*\d+\s*,\s*\d+\s*,\s*\d+\s*\)",
                        r"rgba\(\s*\d+\s*,\s*\d+\s*,\s*\d+\s*,",
                        r"(?:text|bg|border)-\[#[0-9a-fA-F]{3,6}\]",
                        r"(?:text|bg|border)-\[rgb",
                    ],
                )?,
            )
            .with_exceptions(&["transparent", "currentColor", "inherit", "white", "black"])
            .with_computed_suggestion(suggest_color_token),
        ),
        Rule::Pattern(
            PatternRule::new(
                "hardcoded-spacing",
                Severity::Warning,
                "Hardcoded spacing detected: {value}",
                c.set(
                    "design/hardcoded-spacing",
                    &[
                        r#"(?:margin|padding|gap|space):\s*["']?\d+px"#,
                        r#"(?:width|height|minWidth|maxWidth|minHeight|maxHeight):\s*["']?\d+px"#,
                        r#"(?:top|right|bottom|left):\s*["']?\d+px"#,
                        r"(?:m|p|gap|space-[xy]?)-\[\d+px\]",
                        r"(?:w|h)-\[\d+px\]",
                    ],
                )?,
            )
            .with_accept(nonzero_pixels)
            .with_computed_suggestion(suggest_spacing_token),
        ),
        Rule::Pattern(
            PatternRule::new(
                "nonstandard-font",
                Severity::Warning,
                "Non-standard font detected: {value}",
                c.set(
                    "design/nonstandard-font",
                    &[
                        r#"fontFamily:\s*["'][^"']+["']"#,
                        r#"font-family:\s*["'][^"']+["']"#,
                        r#"font-\[["'][^"']+["']\]"#,
                    ],
                )?,
            )
            .with_exceptions(&["Outfit", "Inter"])
            .with_suggestion("Use font-heading (Outfit) or font-body (Inter)"),
        ),
        Rule::Pattern(
            PatternRule::new(
                "hardcoded-breakpoint",
                Severity::Warning,
                "Hardcoded breakpoint detected: {value}",
                c.set(
                    "design/hardcoded-breakpoint",
                    &[r"@media[^{]+\d+px", r"(?:max-w|min-w)-\[\d+px\]"],
                )?,
            )
            .with_when(c.set("design/media-query", &[r"@media"])?)
            .with_suggestion("Use Tailwind responsive prefixes: sm:, md:, lg:, xl:, 2xl:"),
        ),
        Rule::Pattern(
            PatternRule::new(
                "image-lazy-loading",
                Severity::Info,
                "Image missing lazy loading: {value}",
                c.set(
                    "design/image-lazy-loading",
                    &[r#"<img[^>]*src=["'][^"']*\.(?:jpe?g|png|webp)["'][^>]*"#],
                )?,
            )
            .with_exceptions(&["data:image", ".svg", "loading="])
            .with_suggestion("Add loading=\"lazy\" for better performance"),
        ),
    ];

    Ok(RuleCategory::new(
        "design",
        "🎨 DESIGN SYSTEM ISSUES",
        Relevance::ExtensionAny(vec![
            ".tsx".to_string(),
            ".jsx".to_string(),
            ".css".to_string(),
            ".scss".to_string(),
        ]),
    )
    .with_skip_paths(&[".test.", ".spec.", ".json", ".md"])
    .with_dedupe(DedupeMode::PerMatch)
    .with_report_cap(12)
    .with_rules(rules))
}

/// Map a matched color value to the nearest design token.
fn suggest_color_token(matched: &str) -> Option<String> {
    let hex = extract_hex(matched)?;
    for (token, value) in COLOR_TOKENS {
        if value.eq_ignore_ascii_case(&hex) {
            return Some(if matched.contains("bg-") || matched.contains("text-") {
                format!("Use Tailwind class: {token}")
            } else {
                format!("Use CSS variable: --color-{token}")
            });
        }
    }
    Some("Use design system colors: primary-*, secondary-*, accent-*, or gray-*".to_string())
}

/// `#` followed by 3–6 hex digits, normalized to uppercase.
fn extract_hex(text: &str) -> Option<String> {
    let start = text.find('#')?;
    let digits: String = text[start + 1..]
        .chars()
        .take_while(|c| c.is_ascii_hexdigit())
        .collect();
    if (3..=6).contains(&digits.len()) {
        Some(format!("#{}", digits.to_uppercase()))
    } else {
        None
    }
}

fn extract_pixels(text: &str) -> Option<u32> {
    let end = text.find("px")?;
    let digits: String = text[..end]
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.chars().rev().collect::<String>().parse().ok()
}

fn nonzero_pixels(text: &str) -> bool {
    extract_pixels(text).map_or(true, |px| px != 0)
}

/// Map a pixel value to the exact or nearest spacing token.
fn suggest_spacing_token(matched: &str) -> Option<String> {
    let px = extract_pixels(matched)?;
    if let Some((_, token)) = SPACING_TOKENS.iter().find(|(value, _)| *value == px) {
        return Some(format!(
            "Use Tailwind spacing: {token} (e.g., p-{token}, m-{token})"
        ));
    }
    let (closest_px, closest_token) = SPACING_TOKENS
        .iter()
        .min_by_key(|(value, _)| value.abs_diff(px))?;
    Some(format!(
        "Consider using spacing-{closest_token} ({closest_px}px) instead of {px}px"
    ))
}
