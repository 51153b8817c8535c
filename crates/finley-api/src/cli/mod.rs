//! CLI command definitions for the `finley` binary.
//!
//! Uses clap derive macros for argument parsing. `serve` runs the HTTP
//! server; the other commands exercise the same services from a terminal.

pub mod budget;
pub mod chat;
pub mod config;
pub mod token;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Finley, your financial friend: chat proxy and budgeting backend.
#[derive(Parser)]
#[command(name = "finley", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config.toml (defaults to the platform config directory).
    #[arg(long, global = true, env = "FINLEY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server.
    Serve {
        /// Port to listen on (overrides config).
        #[arg(long)]
        port: Option<u16>,

        /// Host to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,
    },

    /// Send one message to the model and print the reply.
    Chat {
        /// The message to send.
        message: String,
    },

    /// Fetch a bearer token from the identity endpoint.
    Token,

    /// Budget math without touching the store.
    Budget {
        #[command(subcommand)]
        action: BudgetAction,
    },

    /// Print the effective configuration (secrets redacted).
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum BudgetAction {
    /// Split a monthly income into needs / wants / savings.
    Allocate {
        /// Monthly income.
        income: f64,

        #[arg(long, default_value_t = 50.0)]
        needs: f64,

        #[arg(long, default_value_t = 30.0)]
        wants: f64,

        #[arg(long, default_value_t = 20.0)]
        savings: f64,
    },

    /// Project a savings goal: weekly target and progress.
    Goal {
        /// Target amount.
        target: f64,

        /// Amount already saved.
        #[arg(long, default_value_t = 0.0)]
        current: f64,

        /// Deadline (YYYY-MM-DD).
        #[arg(long)]
        deadline: NaiveDate,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_budget_goal() {
        let cli = Cli::try_parse_from([
            "finley", "budget", "goal", "1000", "--current", "200", "--deadline", "2025-07-01",
        ])
        .unwrap();
        match cli.command {
            Commands::Budget {
                action: BudgetAction::Goal { target, current, deadline },
            } => {
                assert_eq!(target, 1000.0);
                assert_eq!(current, 200.0);
                assert_eq!(deadline, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
            }
            _ => panic!("expected budget goal"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["finley", "token", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }
}
