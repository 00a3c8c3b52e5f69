//! Command-line argument definitions.
//!
//! Every option can also come from a `MINACL_*` environment variable. A
//! flag wins over its variable, which wins over the TOML file, which wins
//! over the built-in defaults.

use clap::{Parser, Subcommand};
use minacl_core::{Config, ObjectiveStrategy};
use minacl_pipeline::DEFAULT_OUTPUT_FILE;
use std::path::PathBuf;

/// Default relationship graph file.
pub const DEFAULT_GRAPH_FILE: &str = "system_graph.csv";

/// Default policy file.
pub const DEFAULT_POLICY_FILE: &str = "rebac_policy.txt";

/// Default configuration file written by `config init`.
pub const DEFAULT_CONFIG_FILE: &str = "minacl.toml";

/// Derive a minimal permit/deny ACL from a ReBAC policy.
#[derive(Parser, Debug)]
#[command(name = "minacl", author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive the minimal ACL and write it as CSV.
    Solve(SolveArgs),

    /// Configuration file helpers.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments of `minacl solve`.
#[derive(Parser, Debug, Clone)]
pub struct SolveArgs {
    /// Relationship graph CSV (source,target,label with a header row).
    #[arg(long, env = "MINACL_GRAPH", default_value = DEFAULT_GRAPH_FILE)]
    pub graph: PathBuf,

    /// Policy file, one comma-separated label pattern per line.
    #[arg(long, env = "MINACL_POLICY", default_value = DEFAULT_POLICY_FILE)]
    pub policy: PathBuf,

    /// Output CSV.
    #[arg(short, long, env = "MINACL_OUTPUT", default_value = DEFAULT_OUTPUT_FILE)]
    pub output: PathBuf,

    /// TOML configuration file.
    #[arg(short, long, env = "MINACL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Longest path considered, in edges.
    #[arg(long, env = "MINACL_MAX_HOP_LENGTH")]
    pub max_hop_length: Option<usize>,

    /// Solver wall-clock limit, in seconds.
    #[arg(long, env = "MINACL_TIME_LIMIT")]
    pub time_limit: Option<u64>,

    /// Permit weight for the weighted objective.
    #[arg(long, env = "MINACL_PERMIT_WEIGHT")]
    pub permit_weight: Option<f64>,

    /// Objective formulation: lexicographic or weighted.
    #[arg(long, env = "MINACL_OBJECTIVE")]
    pub objective: Option<ObjectiveStrategy>,

    /// Follow only simple paths (no node revisits).
    #[arg(long, env = "MINACL_NO_REVISITS")]
    pub no_revisits: bool,

    /// Enumeration workers (1 = sequential).
    #[arg(long, env = "MINACL_WORKERS")]
    pub workers: Option<usize>,
}

impl SolveArgs {
    /// Applies the options that were given on top of `config`.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(max_hop_length) = self.max_hop_length {
            config.max_hop_length = max_hop_length;
        }
        if let Some(time_limit) = self.time_limit {
            config.solver_time_limit_secs = time_limit;
        }
        if let Some(permit_weight) = self.permit_weight {
            config.permit_weight = permit_weight;
        }
        if let Some(objective) = self.objective {
            config.objective = objective;
        }
        if self.no_revisits {
            config.allow_revisits = false;
        }
        if self.workers.is_some() {
            config.workers = self.workers;
        }
        config
    }
}

/// `minacl config` subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Write a configuration file holding the defaults.
    Init {
        /// Where to write it.
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        file: PathBuf,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration as TOML.
    Show {
        /// TOML configuration file.
        #[arg(short, long, env = "MINACL_CONFIG")]
        config: Option<PathBuf>,
    },
}
