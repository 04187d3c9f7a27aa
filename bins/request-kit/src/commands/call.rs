//! Get and post commands - issue a raw call and print the flat result

use super::{print_result, service_request, with_interrupt, OutputFormat};
use anyhow::{Context, Result};
use request_kit::prelude::*;
use serde_json::{Map, Value};

/// Run get command
pub async fn get(
    path: &str,
    params: &[String],
    service: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let env = ServiceEnv::from_env();
    let request = service_request(&env, service)?;

    let mut config = RequestConfig::get(path);
    if !params.is_empty() {
        config = config.with_params(&parse_params(params)?)?;
    }

    let timer = request_kit_telemetry::Timer::start("get");
    let result = with_interrupt(&request, request.request::<Value>(config)).await;
    timer.stop();

    print_result(&result, format)
}

/// Run post command
pub async fn post(path: &str, body: &str, service: Option<&str>, format: OutputFormat) -> Result<()> {
    let body: Value = serde_json::from_str(body).context("--body is not valid JSON")?;

    let env = ServiceEnv::from_env();
    let request = service_request(&env, service)?;
    let config = RequestConfig::post(path).with_data(body);

    let timer = request_kit_telemetry::Timer::start("post");
    let result = with_interrupt(&request, request.request::<Value>(config)).await;
    timer.stop();

    print_result(&result, format)
}

/// Parse `key=value` pairs into a query object
fn parse_params(params: &[String]) -> Result<Map<String, Value>> {
    params
        .iter()
        .map(|pair| {
            let (key, value) = pair
                .split_once('=')
                .with_context(|| format!("parameter '{pair}' is not KEY=VALUE"))?;
            Ok((key.to_string(), Value::String(value.to_string())))
        })
        .collect()
}
