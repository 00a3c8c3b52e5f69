//! minacl CLI entry point.

#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use minacl_cli::commands::cmd_solve;
use minacl_cli::config_handlers::handle_config_command;
use minacl_cli::{Cli, Command};
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Solve(args) => {
            let report = cmd_solve(&args)
                .await
                .with_context(|| format!("deriving minimal ACL into {}", args.output.display()))?;
            println!(
                "{} permit(s), {} deny rule(s) written to {}",
                report.acl.permit_count(),
                report.acl.deny_count(),
                args.output.display()
            );
        }
        Command::Config { action } => {
            handle_config_command(action).context("config command failed")?;
        }
    }
    Ok(())
}
