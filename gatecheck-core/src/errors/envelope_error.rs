//! Hook envelope errors.

use super::error_code::{self, GatecheckErrorCode};

/// Errors raised while decoding the incoming tool-call envelope.
///
/// These are the only faults that abort a whole invocation; everything
/// downstream is isolated per category.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("Envelope is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("Envelope is missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("Empty input on stdin")]
    EmptyInput,
}

impl GatecheckErrorCode for EnvelopeError {
    fn error_code(&self) -> &'static str {
        error_code::ENVELOPE_ERROR
    }
}
