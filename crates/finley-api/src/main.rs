//! Finley CLI and HTTP server entry point.
//!
//! Binary name: `finley`
//!
//! Parses CLI arguments, sets up tracing, loads configuration and wires
//! services, then dispatches to a command or starts the HTTP server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use finley_observe::tracing_setup::{init_tracing, shutdown_tracing, verbosity_directives};
use finley_types::budget::BudgetAllocation;

use cli::{BudgetAction, Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need tracing or app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "finley", &mut std::io::stdout());
        return Ok(());
    }

    init_tracing(cli.otel, verbosity_directives(cli.verbose, cli.quiet))
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Budget { action } => match action {
            BudgetAction::Allocate {
                income,
                needs,
                wants,
                savings,
            } => {
                let allocation = BudgetAllocation {
                    monthly_income: income,
                    needs_pct: needs,
                    wants_pct: wants,
                    savings_pct: savings,
                };
                cli::budget::allocate(allocation, cli.json)?;
            }
            BudgetAction::Goal {
                target,
                current,
                deadline,
            } => {
                cli::budget::goal(target, current, deadline, cli.json)?;
            }
        },

        Commands::Config => {
            let state = AppState::init(cli.config.as_deref()).await?;
            cli::config::show_config(&state, cli.json)?;
        }

        Commands::Token => {
            let state = AppState::init(cli.config.as_deref()).await?;
            cli::token::token(&state, cli.json).await?;
        }

        Commands::Chat { message } => {
            let state = AppState::init(cli.config.as_deref()).await?;
            cli::chat::chat(&state, &message, cli.json).await?;
        }

        Commands::Serve { port, host } => {
            let state = AppState::init(cli.config.as_deref()).await?;
            let host = host.unwrap_or_else(|| state.config.server.host.clone());
            let port = port.unwrap_or(state.config.server.port);

            let addr = format!("{host}:{port}");
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!(%addr, "listening");

            if !cli.quiet {
                println!(
                    "  {} Finley backend listening on {}",
                    console::style("🚀").bold(),
                    console::style(format!("http://{addr}")).cyan()
                );
                println!("  {}", console::style("Press Ctrl+C to stop").dim());
            }

            let router = http::router::build_router(state);

            axum::serve(listener, router)
                .with_graceful_shutdown(shutdown_signal())
                .await?;

            if !cli.quiet {
                println!("\n  Server stopped.");
            }
        }

        Commands::Completions { .. } => unreachable!("handled in main"),
    }

    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
