//! request-kit CLI
//!
//! Issues calls against the configured backend and prints the flat
//! `{data, error}` result.

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use request_kit_telemetry::{LogFormat, TelemetryConfig};
use std::process::ExitCode;

mod commands;

use commands::{call, login, urls, OutputFormat};

/// Command-line client for {code, msg, data} backend services
#[derive(Parser)]
#[command(name = "request-kit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format (text, json)
    #[arg(short, long, global = true, value_enum, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the resolved base URLs
    Urls {
        /// Resolve proxy patterns regardless of environment
        #[arg(short, long)]
        proxy: bool,
    },

    /// Issue a GET request
    Get {
        /// Path relative to the base URL, or an absolute URL
        path: String,

        /// Query parameter as key=value (repeatable)
        #[arg(short, long = "param", value_name = "KEY=VALUE")]
        params: Vec<String>,

        /// Alternate service key
        #[arg(short, long)]
        service: Option<String>,
    },

    /// Issue a POST request with a JSON body
    Post {
        /// Path relative to the base URL, or an absolute URL
        path: String,

        /// JSON request body
        #[arg(short, long, default_value = "{}")]
        body: String,

        /// Alternate service key
        #[arg(short, long)]
        service: Option<String>,
    },

    /// Log in with a username and password
    Login {
        /// Account name
        #[arg(short, long)]
        user: String,

        /// Account password
        #[arg(short, long, env = "REQUEST_KIT_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose > 0 {
        let format = match cli.format {
            OutputFormat::Json => LogFormat::Json,
            OutputFormat::Text => LogFormat::Compact,
        };
        let config = TelemetryConfig::from_verbosity(cli.verbose).with_format(format);
        if let Err(e) = request_kit_telemetry::init_with_config(config) {
            eprintln!("{} {}", "Warning:".yellow().bold(), e);
        }
    }

    let result = match cli.command {
        Commands::Urls { proxy } => urls::run(proxy, cli.format),

        Commands::Get { path, params, service } => {
            call::get(&path, &params, service.as_deref(), cli.format).await
        }

        Commands::Post { path, body, service } => {
            call::post(&path, &body, service.as_deref(), cli.format).await
        }

        Commands::Login { user, password } => login::run(&user, &password, cli.format).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
