use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sshprobe::cli::Cli;
use sshprobe::probe::Prober;
use sshprobe::report::OutputWriter;
use sshprobe::rules::{self, compile_rules};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the report on stdout stays machine-readable.
    let default_filter = if cli.verbose { "sshprobe=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let timeout_ms = cli.timeout.unwrap_or(5000);
    if timeout_ms == 0 {
        anyhow::bail!("timeout must be positive");
    }

    // An unreadable or invalid rule set is the one fatal startup error;
    // probing never starts with a partial rule set.
    let rules = compile_rules(rules::EMBEDDED_RULES)
        .context("failed to load embedded fingerprint rules")?;

    let prober = Prober::new(cli.host, cli.port, Duration::from_millis(timeout_ms));
    let report = prober.probe(&rules).await;

    let output_writer = OutputWriter::new(cli.output_format, cli.output_file)?;
    output_writer.write(&report)?;

    Ok(())
}
