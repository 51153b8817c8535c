//! One-shot chat command.

use anyhow::Result;
use console::style;

use finley_types::chat::ChatReply;

use crate::state::AppState;

/// Relay `message` with no history and print the reply.
///
/// Like `/chat`, this never fails on upstream errors; the fallback reply is
/// printed instead.
pub async fn chat(state: &AppState, message: &str, json: bool) -> Result<()> {
    if !state.relay.is_configured() && !json {
        eprintln!(
            "  {} inference is not fully configured ({})",
            style("!").yellow().bold(),
            style(state.config.inference.variant).dim()
        );
    }

    let reply = state.relay.relay(message, &[]).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&ChatReply { reply })?);
        return Ok(());
    }

    println!();
    println!("  {}", style("Finley").cyan().bold());
    for line in reply.lines() {
        println!("  {line}");
    }
    println!();
    Ok(())
}
