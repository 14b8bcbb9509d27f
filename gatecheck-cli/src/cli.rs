//! CLI argument parsing via `clap`.

use clap::Parser;

use gatecheck_core::config::{CliOverrides, ReportFormat};

#[derive(Parser)]
#[command(
    name = "gatecheck",
    version,
    about = "Compliance gate for agent-proposed file changes",
    long_about = "Gatecheck reads a tool-call envelope on stdin, scans the proposed \
content against its rule catalog, and answers through the exit code: \
0 = allow (report on stdout for advisories), 2 = reject with a report on \
stderr, 1 = the gate itself faulted.\n\nConfiguration precedence: CLI > \
GATECHECK_* env > gatecheck.toml > defaults.",
    after_help = "Examples:\n  gatecheck < event.json\n  gatecheck --format json < event.json\n  gatecheck --disable design --disable pricing < event.json"
)]
pub struct Cli {
    /// Project root holding gatecheck.toml (default: current dir)
    #[arg(long)]
    pub root: Option<String>,

    /// Output format: console|json
    #[arg(long)]
    pub format: Option<String>,

    /// Disable ANSI colors in console output
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_color: bool,

    /// Disable a category by id (repeatable)
    #[arg(long = "disable", value_name = "CATEGORY")]
    pub disabled: Vec<String>,

    /// TOML file with additional project rules
    #[arg(long)]
    pub rules: Option<String>,

    /// Context window radius in bytes for mitigating-keyword scans
    #[arg(long)]
    pub context_radius: Option<usize>,

    /// Maximum matches reported per pattern
    #[arg(long)]
    pub max_matches: Option<usize>,
}

impl Cli {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            context_radius: self.context_radius,
            max_matches_per_pattern: self.max_matches,
            format: self.format.as_deref().and_then(|f| match f {
                "console" => Some(ReportFormat::Console),
                "json" => Some(ReportFormat::Json),
                _ => None,
            }),
            no_color: self.no_color,
            disabled_categories: self.disabled.clone(),
            custom_rules: self.rules.clone(),
        }
    }
}
