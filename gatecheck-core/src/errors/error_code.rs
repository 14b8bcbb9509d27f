//! Stable error codes for logs and telemetry.
//!
//! A content-policy rejection is not an error; these codes only describe
//! faults in the gate itself, so downstream tooling can tell the two apart.

pub const CONFIG_ERROR: &str = "GC-CONFIG";
pub const ENVELOPE_ERROR: &str = "GC-ENVELOPE";
pub const CATALOG_ERROR: &str = "GC-CATALOG";
pub const GATE_ERROR: &str = "GC-GATE";

/// Attaches a stable code to every subsystem error.
pub trait GatecheckErrorCode {
    fn error_code(&self) -> &'static str;
}
