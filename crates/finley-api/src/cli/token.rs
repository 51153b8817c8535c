//! Token command: exchange the configured API key for a bearer token.

use anyhow::{Result, bail};
use console::style;
use secrecy::ExposeSecret;

use finley_types::chat::TokenResponse;

use crate::state::AppState;

/// Fetch (or reuse) a bearer token and print it with its remaining lifetime.
pub async fn token(state: &AppState, json: bool) -> Result<()> {
    let Some(api_key) = state.credentials.agent_api_key.as_ref() else {
        bail!("AGENT_API_KEY is not set");
    };

    let cached = state.tokens.get_cached_token(api_key).await?;
    let response = TokenResponse {
        access_token: cached.value.expose_secret().to_string(),
        expires_in: cached.expires_in_secs(state.tokens.now_ms()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} Token from {}",
        style("✓").green().bold(),
        style(&state.config.identity.url).dim()
    );
    println!("  Expires in: {}s", style(response.expires_in).bold());
    println!();
    println!("  {}", response.access_token);
    println!();
    Ok(())
}
