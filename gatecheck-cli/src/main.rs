//! Gatecheck hook binary entry point.
//!
//! Reads one tool-call envelope from stdin, evaluates it, prints the
//! report, and exits with the verdict's code. Faults in the gate itself
//! exit 1 and are never conflated with a policy rejection (exit 2).

mod cli;

use std::io::Read;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use gatecheck_core::config::{GatecheckConfig, ReportFormat};
use gatecheck_core::errors::GatecheckErrorCode;
use gatecheck_engine::gate::FAULT_EXIT_CODE;
use gatecheck_engine::report::{ConsoleReporter, JsonReporter, Reporter};
use gatecheck_engine::{envelope, ExitSignal, GateRunner};

fn main() {
    let args = cli::Cli::parse();

    // Diagnostics go to stderr via tracing; the report itself is written
    // directly so downstream tooling sees a stable stream.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("GATECHECK_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    std::process::exit(run(&args));
}

fn run(args: &cli::Cli) -> i32 {
    let root = args
        .root
        .clone()
        .map(std::path::PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| std::path::PathBuf::from("."));

    let config = match GatecheckConfig::load(&root, Some(&args.overrides())) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{e}");
            eprintln!("gatecheck: configuration error: {e}");
            return FAULT_EXIT_CODE;
        }
    };

    let runner = match GateRunner::from_config(config.clone()) {
        Ok(runner) => runner,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{e}");
            eprintln!("gatecheck: catalog error: {e}");
            return FAULT_EXIT_CODE;
        }
    };

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("gatecheck: failed to read stdin: {e}");
        return FAULT_EXIT_CODE;
    }

    let event = match envelope::parse_event(&input) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{e}");
            eprintln!("gatecheck: malformed envelope: {e}");
            return FAULT_EXIT_CODE;
        }
    };

    let verdict = match runner.evaluate_event(&event) {
        Ok(verdict) => verdict,
        Err(e) => {
            tracing::error!(code = e.error_code(), "{e}");
            eprintln!("gatecheck: malformed envelope: {e}");
            return FAULT_EXIT_CODE;
        }
    };

    let path = event.tool_input.file_path.as_str();
    let report = match config.report.effective_format() {
        ReportFormat::Console => ConsoleReporter::new(
            config.report.effective_color(),
            config.report.effective_suggestions(),
        )
        .generate(path, &verdict, runner.catalog()),
        ReportFormat::Json => JsonReporter.generate(path, &verdict, runner.catalog()),
    };

    // Rejections go to stderr so the hosting agent feeds the report back
    // into its edit loop; everything else is informational on stdout.
    match verdict.exit {
        ExitSignal::Reject => eprint!("{report}"),
        _ => print!("{report}"),
    }

    verdict.exit.code()
}
