//! Authorization check command.

use clap::Args;
use serde::Serialize;

use crate::output::{self, OutputFormat};
use smartcare_core::error::AppError;

use super::App;

/// Arguments for the check command
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Role ID
    pub role_id: String,
    /// Module (customers, employees, positions, permissions)
    pub module: String,
    /// Action (view, create, update, delete)
    pub action: String,
}

#[derive(Debug, Serialize)]
struct CheckResult<'a> {
    role_id: &'a str,
    module: &'a str,
    action: &'a str,
    allowed: bool,
}

/// Execute the check command. Unknown names and roles print as denied.
pub async fn execute(args: &CheckArgs, app: &App, format: OutputFormat) -> Result<(), AppError> {
    let allowed = app
        .enforcer
        .authorize_raw(Some(args.role_id.as_str()), &args.module, &args.action)
        .await;

    match format {
        OutputFormat::Json => output::print_json(&CheckResult {
            role_id: &args.role_id,
            module: &args.module,
            action: &args.action,
            allowed,
        }),
        OutputFormat::Table => {
            let verdict = if allowed { "ALLOWED" } else { "DENIED" };
            println!(
                "{verdict}: role {} {}:{}",
                args.role_id, args.module, args.action
            );
        }
    }
    Ok(())
}
