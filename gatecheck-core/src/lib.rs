//! Core configuration and error types for Gatecheck.
//!
//! Gatecheck evaluates proposed file changes from a code-generation agent
//! against a catalog of compliance rules before the change is applied. This
//! crate holds the pieces shared by the engine and the hook binary:
//! configuration with layered resolution and the per-subsystem error enums.

pub mod config;
pub mod errors;
