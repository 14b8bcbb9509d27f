//! Gate evaluation errors.

use super::error_code::{self, GatecheckErrorCode};

/// Faults inside the evaluation pipeline.
///
/// A failing category never aborts the other categories; the engine catches
/// the fault and applies that category's fail-open/fail-closed policy. The
/// variants here exist so the isolation point can log what actually broke.
#[derive(Debug, thiserror::Error)]
pub enum GateError {
    #[error("Category '{id}' failed to evaluate: {message}")]
    CategoryFailed { id: String, message: String },

    #[error("Category '{id}' panicked: {message}")]
    CategoryPanicked { id: String, message: String },
}

impl GatecheckErrorCode for GateError {
    fn error_code(&self) -> &'static str {
        error_code::GATE_ERROR
    }
}
