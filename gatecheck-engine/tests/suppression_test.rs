//! Suppression semantics through the full pipeline, including the
//! corrected offset behavior: suppression filters matches found in the
//! original content instead of rewriting the content, so line numbers for
//! later matches never shift.

use gatecheck_core::config::GatecheckConfig;
use gatecheck_engine::envelope::{ChangeRequest, OperationKind};
use gatecheck_engine::{Decision, GateRunner};

fn runner() -> GateRunner {
    GateRunner::from_config(GatecheckConfig::default()).unwrap()
}

fn write_request(path: &str, content: &str) -> ChangeRequest {
    ChangeRequest {
        kind: OperationKind::Create,
        path: path.to_string(),
        fragments: vec![content.to_string()],
    }
}

#[test]
fn whitelisted_token_earlier_in_file_does_not_shift_line_numbers() {
    // A whitelist implementation that deletes `localhost` before rescanning
    // would still count the same newlines, but any offset-based reporting
    // would drift. The filter semantics must attribute the real secret to
    // line 3 of the original text.
    let content = "const HOST = 'localhost';\n\napiKey = 'abcdefghijklmnopqrstuv'";
    let verdict = runner().evaluate(&write_request("src/config.ts", content));
    assert_eq!(verdict.decision, Decision::Block);
    let finding = verdict
        .findings
        .iter()
        .find(|f| f.rule == "api-keys")
        .expect("api key finding");
    assert_eq!(finding.line, Some(3));
}

#[test]
fn exception_token_on_the_match_line_suppresses_only_that_line() {
    let content = "apiKey = 'abcdefghijklmnopqrstuv' // localhost fixture\n\
                   apiKey = 'vutsrqponmlkjihgfedcba'";
    let verdict = runner().evaluate(&write_request("src/config.ts", content));
    let lines: Vec<Option<u32>> = verdict
        .findings
        .iter()
        .filter(|f| f.rule == "api-keys")
        .map(|f| f.line)
        .collect();
    // Overlapping patterns may each report the surviving secret, but
    // nothing may surface from the excepted line 1.
    assert!(!lines.is_empty());
    assert!(lines.iter().all(|line| *line == Some(2)));
}

#[test]
fn env_reference_patterns_suppress_secret_matches() {
    let content = "const apiKey = 'aaaaaaaaaaaaaaaaaaaaaa'; // overridden by process.env.SERVICE_API_KEY";
    let verdict = runner().evaluate(&write_request("src/config.ts", content));
    assert!(
        verdict.findings.iter().all(|f| f.category != "secrets"),
        "{:?}",
        verdict.findings
    );
}

#[test]
fn suppression_never_unblocks_an_unrelated_secret() {
    let content = "const apiKey = process.env.SERVICE_API_KEY;\npassword = 'abcdefgh12'";
    let verdict = runner().evaluate(&write_request("src/config.ts", content));
    assert_eq!(verdict.decision, Decision::Block);
    let finding = verdict
        .findings
        .iter()
        .find(|f| f.rule == "generic-secrets")
        .expect("password finding survives");
    assert_eq!(finding.line, Some(2));
}
