//! Form validation and accessibility consistency rules. Advisory only.

use gatecheck_core::errors::CatalogError;

use crate::catalog::{
    DedupeMode, PatternCompiler, PatternRule, Relevance, RequireRule, Rule, RuleCategory,
};
use crate::types::Severity;

const FORM_CONTEXT: &[&str] = &[
    r"<form",
    r"onSubmit",
    r"handleSubmit",
    r"FormProvider",
    r"useForm",
];

pub fn category(c: &PatternCompiler) -> Result<RuleCategory, CatalogError> {
    let forms = c.set("forms/context", FORM_CONTEXT)?;

    let rules = vec![
        Rule::Require(
            RequireRule::new(
                "validation-library",
                Severity::Warning,
                "Form found without validation library (react-hook-form + zod recommended)",
            )
            .with_when(forms.clone())
            .with_trigger(forms.clone())
            .with_expect(c.set_exact(
                "forms/validation-libraries",
                &[
                    "react-hook-form",
                    "useForm",
                    "register",
                    "formState",
                    "zodResolver",
                    "yupResolver",
                ],
            )?),
        ),
        Rule::Require(
            RequireRule::new(
                "error-display",
                Severity::Error,
                "Form without error message display",
            )
            .with_when(forms.clone())
            .with_trigger(forms.clone())
            .with_expect(c.set_exact(
                "forms/error-display",
                &[
                    r"error\s*\.",
                    r"errors\[",
                    r"formState\.errors",
                    r"helperText",
                    r"errorMessage",
                ],
            )?),
        ),
        Rule::Require(
            RequireRule::new(
                "email-validation-missing",
                Severity::Error,
                "Email fields must have email validation",
            )
            .with_when(forms.clone())
            .with_trigger(c.set(
                "forms/email-fields",
                &[r#"type=["']email"#, r#"name=["']email"#, r"email.*input"],
            )?)
            .with_expect(c.set(
                "forms/email-validation",
                &[
                    r"valid.*email",
                    r"email.*valid",
                    r"pattern.*email",
                    r"email.*pattern",
                    r"zodResolver",
                    r"\.email\(",
                ],
            )?),
        ),
        Rule::Require(
            RequireRule::new(
                "phone-validation-missing",
                Severity::Error,
                "Phone fields must have format validation",
            )
            .with_when(forms.clone())
            .with_trigger(c.set(
                "forms/phone-fields",
                &[r#"type=["']tel"#, r#"name=["']phone"#, r"phone.*input"],
            )?)
            .with_expect(c.set(
                "forms/phone-validation",
                &[r"pattern", r"phone.*valid", r"tel.*format"],
            )?),
        ),
        Rule::Require(
            RequireRule::new(
                "required-indicator",
                Severity::Warning,
                "Required fields without visual indicators (*)",
            )
            .with_when(forms.clone())
            .with_trigger(c.set("forms/required-fields", &[r"required", r"aria-required"])?)
            .with_expect(c.set("forms/required-markers", &[r"\*", r"mandatory"])?),
        ),
        Rule::Pattern(
            PatternRule::new(
                "input-label-missing",
                Severity::Warning,
                "Input missing label association",
                c.set("forms/input-tags", &[r"<input[^>]*>"])?,
            )
            .with_when(forms.clone())
            .with_exceptions(&["id=", "aria-label", "aria-labelledby"])
            .with_mitigators(&["<label"])
            .with_context_radius(200),
        ),
        Rule::Pattern(
            PatternRule::new(
                "input-error-association",
                Severity::Info,
                "Input missing error message association",
                c.set("forms/input-tags", &[r"<input[^>]*>"])?,
            )
            .with_when(forms.clone())
            .with_exceptions(&["aria-describedby", "aria-errormessage"]),
        ),
        Rule::Require(
            RequireRule::new(
                "submit-button-missing",
                Severity::Warning,
                "Form missing explicit submit button",
            )
            .with_when(forms.clone())
            .with_trigger(forms.clone())
            .with_expect(c.set_exact(
                "forms/submit-button",
                &[r#"type=["']submit"#, r#"<button[^>]*type=["']submit"#],
            )?),
        ),
        Rule::Require(
            RequireRule::new(
                "submission-loading",
                Severity::Warning,
                "Form submission without loading state",
            )
            .with_when(c.set_exact("forms/on-submit", &["onSubmit"])?)
            .with_trigger(c.set_exact("forms/on-submit", &["onSubmit"])?)
            .with_expect(c.set(
                "forms/submission-state",
                &[r"isSubmitting", r"submitting", r"loading.*submit"],
            )?),
        ),
        Rule::Require(
            RequireRule::new(
                "success-feedback",
                Severity::Info,
                "Form submission without success feedback",
            )
            .with_when(c.set_exact("forms/on-submit", &["onSubmit"])?)
            .with_trigger(c.set_exact("forms/on-submit", &["onSubmit"])?)
            .with_expect(c.set(
                "forms/success-feedback",
                &[r"success", r"toast", r"notification", r"redirect"],
            )?),
        ),
        Rule::Require(
            RequireRule::new(
                "validation-mode",
                Severity::Info,
                "useForm without mode configuration (consider mode: \"onBlur\")",
            )
            .with_when(c.set_exact("forms/use-form", &["useForm"])?)
            .with_trigger(c.set_exact("forms/use-form", &["useForm"])?)
            .with_expect(c.set_exact("forms/mode-config", &[r"mode:"])?),
        ),
    ];

    Ok(RuleCategory::new(
        "forms",
        "📋 FORM VALIDATION REVIEW",
        Relevance::ExtensionAny(vec![".tsx".to_string(), ".jsx".to_string()]),
    )
    .with_skip_paths(&[".test.", ".spec.", "__tests__"])
    .with_dedupe(DedupeMode::PerMatch)
    .with_report_cap(8)
    .with_rules(rules))
}
