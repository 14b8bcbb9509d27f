//! Rule catalog errors.

use super::error_code::{self, GatecheckErrorCode};

/// Errors that can occur while assembling the rule catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Invalid pattern in rule '{rule}': {message}")]
    InvalidPattern { rule: String, message: String },

    #[error("Duplicate rule id '{0}'")]
    DuplicateRule(String),

    #[error("Rule '{rule}' targets unknown category '{category}'")]
    UnknownCategory { rule: String, category: String },

    #[error("Failed to read rule file {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("Failed to parse rule file {path}: {message}")]
    ParseError { path: String, message: String },
}

impl GatecheckErrorCode for CatalogError {
    fn error_code(&self) -> &'static str {
        error_code::CATALOG_ERROR
    }
}
