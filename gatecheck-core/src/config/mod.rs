//! Configuration system for Gatecheck.
//! TOML-based, layered resolution: CLI > env > project > defaults.

pub mod engine_config;
pub mod gatecheck_config;
pub mod report_config;

pub use engine_config::EngineConfig;
pub use gatecheck_config::{CliOverrides, GatecheckConfig};
pub use report_config::{ReportConfig, ReportFormat};
