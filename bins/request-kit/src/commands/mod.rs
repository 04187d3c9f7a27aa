//! CLI command implementations

pub mod call;
pub mod login;
pub mod urls;

use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use request_kit::prelude::*;
use serde::Serialize;

/// How results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Flat request for the primary service, or for the alternate `service`
pub fn service_request(env: &ServiceEnv, service: Option<&str>) -> Result<FlatRequest> {
    let request = match service {
        Some(key) => create_other_service_request(env, key)?,
        None => create_service_request(env)?,
    };
    Ok(request)
}

/// Run a call, cancelling every in-flight request on Ctrl-C
pub async fn with_interrupt<T, F>(request: &FlatRequest, call: F) -> FlatResponse<T>
where
    F: std::future::Future<Output = FlatResponse<T>>,
{
    tokio::pin!(call);
    tokio::select! {
        result = &mut call => result,
        Ok(()) = tokio::signal::ctrl_c() => {
            let cancelled = request.cancel_all_request();
            tracing::info!(cancelled, "Interrupted, cancelling in-flight requests");
            call.await
        }
    }
}

/// Print a flat result and fail if it carries an error
pub fn print_result<T: Serialize>(result: &FlatResponse<T>, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return match &result.error {
            Some(error) => bail!("{} ({})", error, error.code()),
            None => Ok(()),
        };
    }

    match (&result.data, &result.error) {
        (_, Some(error)) => {
            let mut detail = error.code().to_string();
            if let Some(status) = error.status() {
                detail.push_str(&format!(", HTTP {status}"));
            }
            if let Some(code) = error.backend_code() {
                detail.push_str(&format!(", backend code {code}"));
            }
            if let Some(message) = error.response().and_then(ServiceResponse::message) {
                eprintln!("  {} {}", "Message:".dimmed(), message);
            }
            bail!("{} ({})", error, detail);
        }
        (Some(data), None) => {
            println!("{}", serde_json::to_string_pretty(data)?);
            Ok(())
        }
        (None, None) => {
            println!("{}", "(no data)".dimmed());
            Ok(())
        }
    }
}
