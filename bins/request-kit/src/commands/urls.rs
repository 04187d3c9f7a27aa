//! Urls command - show the resolved base URLs

use super::OutputFormat;
use anyhow::Result;
use owo_colors::OwoColorize;
use request_kit::prelude::*;

/// Run urls command
pub fn run(proxy: bool, format: OutputFormat) -> Result<()> {
    let env = ServiceEnv::from_env();
    let resolved = get_service_base_url(&env, proxy || env.is_http_proxy());

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&resolved)?);
        return Ok(());
    }

    println!("  {:<12} {}", "Service".dimmed(), "Base URL".dimmed());
    println!("  {}", "─".repeat(48).dimmed());
    println!("  {:<12} {}", "default".bold(), display_url(&resolved.base_url));
    for (key, url) in &resolved.other_base_url {
        println!("  {:<12} {}", key, display_url(url));
    }

    Ok(())
}

fn display_url(url: &str) -> String {
    if url.is_empty() {
        "(not set)".yellow().to_string()
    } else {
        url.cyan().to_string()
    }
}
