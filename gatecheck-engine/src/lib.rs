//! Gatecheck evaluation engine.
//!
//! One invocation is a single synchronous pass over one proposed change:
//! the envelope adapter extracts the target path and content, the matcher
//! applies the relevant catalog categories against the full content, the
//! suppression filter discards known-safe and contextually mitigated
//! matches, the aggregator folds survivors into findings, and the gate
//! maps the surviving severities onto a pass/warn/block verdict.
//!
//! The catalog is immutable for the process lifetime; invocations share no
//! mutable state and may run on any thread.

pub mod aggregate;
pub mod catalog;
pub mod envelope;
pub mod gate;
pub mod matcher;
pub mod report;
pub mod runner;
pub mod suppress;
pub mod types;

pub use gate::{Decision, ExitSignal, Verdict};
pub use runner::GateRunner;
pub use types::{Finding, Severity};
