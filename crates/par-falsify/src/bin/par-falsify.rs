//! Run the standard falsification panel and print the JSON report
//!
//! Usage: `par-falsify [config.json]`. Exits with status 1 when the engine
//! is miscalibrated. Log verbosity follows `RUST_LOG`.

use anyhow::Context;
use par_core::EngineConfig;
use par_falsify::{standard_fixtures, CalibrationVerdict, FalsificationHarness, FalsificationOracle};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    Registry::default()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<String>) -> anyhow::Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    EngineConfig::from_json(&json).with_context(|| format!("parsing {path}"))
}

fn main() -> anyhow::Result<ExitCode> {
    init_tracing();
    let config = load_config(std::env::args().nth(1))?;
    let oracle = FalsificationOracle::from_config(&config)?;
    let report = FalsificationHarness::new(oracle, standard_fixtures()).run_to_completion();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(if report.verdict == CalibrationVerdict::Miscalibrated {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
