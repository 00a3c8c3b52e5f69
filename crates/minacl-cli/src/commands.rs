//! The `solve` command.

use crate::cli::SolveArgs;
use minacl_core::{Config, Result};
use minacl_pipeline::{Pipeline, RunReport, write_acl_path};

/// Resolves the effective configuration for a solve.
pub fn resolve_config(args: &SolveArgs) -> Result<Config> {
    let config = args.apply(Config::load(args.config.as_deref())?);
    config.validate()?;
    Ok(config)
}

/// Runs the pipeline and writes the output table.
///
/// The table is written even when the solve is not optimal (header only);
/// the status error is returned afterwards.
pub async fn cmd_solve(args: &SolveArgs) -> Result<RunReport> {
    let config = resolve_config(args)?;
    tracing::debug!(?config, "effective configuration");

    let pipeline = Pipeline::new(config)?;
    let report = pipeline.run_paths(&args.graph, &args.policy).await?;
    write_acl_path(&report.acl, &args.output)?;

    for warning in &report.warnings {
        tracing::warn!("{warning}");
    }
    let stats = &report.stats;
    tracing::info!(
        status = %report.status,
        requests = stats.requests,
        authorized = stats.authorized,
        unauthorized = stats.unauthorized,
        u1 = stats.u1,
        u2 = stats.u2,
        variables = stats.variables,
        constraints = stats.constraints,
        "run complete"
    );

    report.check_status()?;
    Ok(report)
}
