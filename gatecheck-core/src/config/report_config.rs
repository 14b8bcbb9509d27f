//! Report rendering configuration.

use serde::{Deserialize, Serialize};

/// Output format for the diagnostic report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Console,
    Json,
}

/// Configuration for report rendering.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ReportConfig {
    /// Output format. Default: console.
    pub format: Option<ReportFormat>,
    /// ANSI color in console output. Default: true.
    pub color: Option<bool>,
    /// Include remediation suggestions in the report. Default: true.
    pub suggestions: Option<bool>,
}

impl ReportConfig {
    pub fn effective_format(&self) -> ReportFormat {
        self.format.unwrap_or_default()
    }

    pub fn effective_color(&self) -> bool {
        self.color.unwrap_or(true)
    }

    pub fn effective_suggestions(&self) -> bool {
        self.suggestions.unwrap_or(true)
    }
}
