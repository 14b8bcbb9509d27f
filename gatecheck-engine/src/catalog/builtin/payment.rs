//! Payment-data handling rules (PCI DSS posture).
//!
//! The prohibited-data rules run on every file; the rest only fire when
//! the content actually handles payments.

use gatecheck_core::errors::CatalogError;

use crate::catalog::{
    BlockPolicy, DedupeMode, PatternCompiler, PatternRule, Relevance, RequireRule, Rule,
    RuleCategory,
};
use crate::types::Severity;

const PAYMENT_CONTEXT: &[&str] = &[
    r"payment.*form",
    r"checkout.*form",
    r"billing.*form",
    r"CardForm",
    r"PaymentForm",
    r"CheckoutForm",
    r"processPayment",
    r"handlePayment",
    r"submitPayment",
    r"createPaymentIntent",
    r"confirmPayment",
];

pub fn category(c: &PatternCompiler) -> Result<RuleCategory, CatalogError> {
    let context = c.set("payment/context", PAYMENT_CONTEXT)?;

    let rules = vec![
        // Prohibited data, relevant everywhere.
        Rule::Pattern(PatternRule::new(
            "card-numbers",
            Severity::Critical,
            "Potential card number detected: {value}",
            c.set(
                "payment/card-numbers",
                &[
                    r"\b\d{4}[\s-]?\d{4}[\s-]?\d{4}[\s-]?\d{4}\b",
                    r"\b\d{16}\b",
                    r"card[_-]?number.*\d{4,}",
                    r"credit[_-]?card.*\d{4,}",
                ],
            )?,
        )),
        Rule::Pattern(PatternRule::new(
            "cvv-codes",
            Severity::Critical,
            "Potential CVV code detected: {value}",
            c.set(
                "payment/cvv-codes",
                &[
                    r"\bcvv\s*[:=]\s*\d{3,4}\b",
                    r"\bcvc\s*[:=]\s*\d{3,4}\b",
                    r"\bsecurity[_-]?code\s*[:=]\s*\d{3,4}\b",
                    r"\b\d{3}\b.*cvv",
                    r"\b\d{3,4}\b.*security.*code",
                ],
            )?,
        )),
        Rule::Pattern(PatternRule::new(
            "card-data-storage",
            Severity::Critical,
            "Card data in client-side storage: {value}",
            c.set(
                "payment/card-data-storage",
                &[
                    r"localStorage.*card",
                    r"sessionStorage.*card",
                    r"cookie.*card",
                    r"localStorage.*cvv",
                    r"sessionStorage.*payment",
                ],
            )?,
        )),
        // Payment-context rules.
        Rule::Pattern(
            PatternRule::new(
                "direct-card-handling",
                Severity::Critical,
                "Direct card data handling detected — use payment provider tokens",
                c.set(
                    "payment/direct-card-handling",
                    &[
                        r#"<input[^>]*name=["']card[_-]?number"#,
                        r#"<input[^>]*name=["']cvv"#,
                        r#"<input[^>]*name=["']cvc"#,
                        r"cardNumber\s*[:=]",
                        r"cvv\s*[:=]",
                    ],
                )?,
            )
            .with_when(context.clone())
            .with_max_matches(1)
            .with_suggestion("Use Stripe Elements or similar tokenization"),
        ),
        Rule::Pattern(
            PatternRule::new(
                "insecure-protocol",
                Severity::Critical,
                "Non-HTTPS protocol in payment context",
                vec![c.compile("payment/insecure-protocol", r"(http://|ws://)", false, true)?],
            )
            .with_when(context.clone())
            .with_max_matches(1),
        ),
        Rule::Pattern(
            PatternRule::new(
                "payment-logging",
                Severity::Critical,
                "Potential payment data logging detected",
                c.set(
                    "payment/payment-logging",
                    &[
                        r"console\.log.*card",
                        r"console\.log.*payment",
                        r"console\.log.*cvv",
                        r"debug.*card",
                        r"logger.*payment.*details",
                    ],
                )?,
            )
            .with_when(context.clone())
            .with_max_matches(1)
            .with_suggestion("Never log payment details, even in development"),
        ),
        Rule::Pattern(
            PatternRule::new(
                "sensitive-error-data",
                Severity::Critical,
                "Error messages may contain sensitive payment data",
                c.set(
                    "payment/sensitive-error-data",
                    &[r"error.*card.*number", r"error.*cvv"],
                )?,
            )
            .with_when(context.clone())
            .with_max_matches(1),
        ),
        Rule::Require(
            RequireRule::new(
                "payment-provider",
                Severity::Critical,
                "Payment handling without recognized payment provider",
            )
            .with_when(context.clone())
            .with_trigger(context.clone())
            .with_expect(c.set(
                "payment/providers",
                &["stripe", "paypal", "square", "worldpay", "sagepay"],
            )?)
            .with_suggestion("Use Stripe, PayPal, or other PCI-compliant provider"),
        ),
        Rule::Require(
            RequireRule::new(
                "stripe-elements",
                Severity::Warning,
                "Stripe integration without secure Elements",
            )
            .with_when(c.set("payment/stripe", &["stripe"])?)
            .with_trigger(c.set("payment/stripe", &["stripe"])?)
            .with_expect(c.set_exact(
                "payment/secure-elements",
                &[
                    "CardElement",
                    "PaymentElement",
                    "loadStripe",
                    "StripeProvider",
                    "Elements",
                ],
            )?)
            .with_suggestion("Use Stripe Elements for card input"),
        ),
        Rule::Require(
            RequireRule::new(
                "client-side-validation",
                Severity::Warning,
                "Card validation appears to be client-side only",
            )
            .with_when(context.clone())
            .with_trigger(c.set(
                "payment/card-validation",
                &[r"(validate|check).*card.*number"],
            )?)
            .with_expect(c.set(
                "payment/server-validation",
                &[r"(server|backend|api).*validat"],
            )?)
            .with_suggestion("Always validate payments server-side"),
        ),
        Rule::Require(
            RequireRule::new(
                "payment-error-handling",
                Severity::Warning,
                "Payment processing without explicit error handling",
            )
            .with_when(context.clone())
            .with_trigger(context.clone())
            .with_expect(c.set(
                "payment/error-handling",
                &[r"catch.*payment", r"payment.*error"],
            )?),
        ),
        Rule::Require(
            RequireRule::new(
                "security-assurance",
                Severity::Info,
                "Payment form without security assurance to users",
            )
            .with_when(c.set("payment/mention", &["payment"])?)
            .with_trigger(c.set("payment/form-mention", &["form"])?)
            .with_expect(c.set("payment/security-terms", &[r"(ssl|tls|https|secure)"])?)
            .with_suggestion("Display security badges or SSL information"),
        ),
        Rule::Require(
            RequireRule::new(
                "pci-reference",
                Severity::Info,
                "Consider mentioning PCI DSS compliance",
            )
            .with_when(context.clone())
            .with_trigger(context.clone())
            .with_expect(c.set(
                "payment/pci-terms",
                &[r"(pci|pci-dss|payment.*card.*industry)"],
            )?),
        ),
        Rule::Require(
            RequireRule::new(
                "cancellation-option",
                Severity::Warning,
                "Recurring payments without clear cancellation option",
            )
            .with_when(context.clone())
            .with_trigger(c.set(
                "payment/recurring",
                &[r"(subscription|recurring|auto.*renew)"],
            )?)
            .with_expect(c.set(
                "payment/cancellation",
                &[r"(cancel|unsubscribe|stop.*payment)"],
            )?),
        ),
    ];

    Ok(
        RuleCategory::new("payment", "🔒 PAYMENT SECURITY", Relevance::Always)
            .with_dedupe(DedupeMode::PerMatch)
            .with_report_cap(8)
            .with_block(BlockPolicy::AtOrAbove(Severity::Critical))
            .with_notes(&[
                "NEVER store card numbers, CVV, or PIN",
                "Use tokenization (Stripe, PayPal, etc.)",
                "Always use HTTPS for payment pages",
                "Never log payment details",
                "Implement server-side validation",
            ])
            .with_rules(rules),
    )
}
