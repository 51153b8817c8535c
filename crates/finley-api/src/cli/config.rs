//! Config command: show the effective configuration.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use finley_infra::config::default_config_path;

use crate::state::AppState;

fn secret_state(set: bool) -> Cell {
    if set {
        Cell::new("[SET]").fg(Color::Green)
    } else {
        Cell::new("[UNSET]").fg(Color::Yellow)
    }
}

fn optional(value: &Option<String>) -> Cell {
    match value {
        Some(v) => Cell::new(v),
        None => Cell::new("-").fg(Color::DarkGrey),
    }
}

/// Print configuration after file and environment overrides are applied.
///
/// Secrets are shown only as set or unset.
pub fn show_config(state: &AppState, json: bool) -> Result<()> {
    let config = &state.config;
    let agent_key_set = state.credentials.agent_api_key.is_some();
    let anon_key_set = state.credentials.supabase_anon_key.is_some();

    if json {
        let mut value = serde_json::to_value(config.as_ref())?;
        value["secrets"] = serde_json::json!({
            "agent_api_key": agent_key_set,
            "supabase_anon_key": anon_key_set,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let source = default_config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "(no config directory)".to_string());
    println!();
    println!("  {} {}", style("Config").bold(), style(source).dim());
    println!();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Setting").fg(Color::White),
        Cell::new("Value").fg(Color::White),
    ]);

    let inference = &config.inference;
    table.add_row(vec![
        Cell::new("server"),
        Cell::new(format!("{}:{}", config.server.host, config.server.port)),
    ]);
    table.add_row(vec![Cell::new("identity.url"), Cell::new(&config.identity.url)]);
    table.add_row(vec![
        Cell::new("inference.variant"),
        Cell::new(inference.variant).fg(Color::Cyan),
    ]);
    table.add_row(vec![Cell::new("inference.base_url"), Cell::new(&inference.base_url)]);
    table.add_row(vec![Cell::new("inference.api_version"), Cell::new(&inference.api_version)]);
    table.add_row(vec![Cell::new("inference.project_id"), optional(&inference.project_id)]);
    table.add_row(vec![Cell::new("inference.model_id"), optional(&inference.model_id)]);
    table.add_row(vec![
        Cell::new("inference.deployment_id"),
        optional(&inference.deployment_id),
    ]);
    table.add_row(vec![Cell::new("store.url"), optional(&config.store.url)]);
    table.add_row(vec![Cell::new("AGENT_API_KEY"), secret_state(agent_key_set)]);
    table.add_row(vec![Cell::new("SUPABASE_ANON_KEY"), secret_state(anon_key_set)]);
    println!("{table}");

    let missing = inference.missing_identifiers();
    if !missing.is_empty() {
        println!();
        println!(
            "  {} {} needs: {}",
            style("!").yellow().bold(),
            inference.variant,
            missing.join(", ")
        );
    }
    println!();
    Ok(())
}
