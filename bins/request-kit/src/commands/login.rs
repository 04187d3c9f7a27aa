//! Login command - authenticate against the primary service

use super::{print_result, with_interrupt, OutputFormat};
use anyhow::Result;
use owo_colors::OwoColorize;
use request_kit::endpoints::auth::LoginParams;
use request_kit::prelude::*;

/// Run login command
pub async fn run(user: &str, password: &str, format: OutputFormat) -> Result<()> {
    let env = ServiceEnv::from_env();
    let request = create_service_request(&env)?;
    let auth = AuthApi::new(request.clone());

    let params = LoginParams {
        user_name: user.to_string(),
        password: password.to_string(),
    };
    let result = with_interrupt(&request, auth.login(&params)).await;

    if format == OutputFormat::Text {
        if let Some(session) = &result.data {
            println!(
                "{} logged in as {} ({}: {})",
                "✓".green(),
                session.login_id.bold(),
                session.token_name,
                session.token_value
            );
            return Ok(());
        }
    }

    print_result(&result, format)
}
