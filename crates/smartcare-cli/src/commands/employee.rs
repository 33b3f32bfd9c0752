//! Employee role binding CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use smartcare_core::error::AppError;
use smartcare_core::types::{EmployeeId, RoleId};
use smartcare_service::RequestContext;

use super::App;

/// Arguments for employee commands
#[derive(Debug, Args)]
pub struct EmployeeArgs {
    /// Employee subcommand
    #[command(subcommand)]
    pub command: EmployeeCommand,
}

/// Employee subcommands
#[derive(Debug, Subcommand)]
pub enum EmployeeCommand {
    /// Show an employee's role binding
    Show {
        /// Employee code
        id: String,
    },
    /// Bind a role to an employee
    Assign {
        /// Employee code
        id: String,
        /// Role ID, or `none` to unbind
        role: String,
    },
}

fn parse_role_arg(raw: &str) -> Result<Option<RoleId>, AppError> {
    if raw.trim().eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    raw.parse::<RoleId>()
        .map(Some)
        .map_err(|_| AppError::validation(format!("Invalid role id: '{raw}'")))
}

/// Execute employee commands
pub async fn execute(
    args: &EmployeeArgs,
    app: &App,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        EmployeeCommand::Show { id } => {
            let view = app.bindings.show(ctx, &EmployeeId::from(id.as_str())).await?;
            match format {
                OutputFormat::Json => output::print_json(&view),
                OutputFormat::Table => {
                    output::print_kv("Employee", &view.account.id);
                    output::print_kv("Email", &view.account.email);
                    output::print_kv(
                        "Status",
                        if view.account.status { "active" } else { "disabled" },
                    );
                    let role = match (&view.role, view.account.role_id) {
                        (Some(role), _) => format!("{} ({})", role.name, role.id),
                        (None, Some(dangling)) => format!("{dangling} (deleted)"),
                        (None, None) => "-".to_string(),
                    };
                    output::print_kv("Role", &role);
                    if let Some(role) = &view.role {
                        output::print_kv("Permissions", &role.permissions.summary());
                    }
                }
            }
        }
        EmployeeCommand::Assign { id, role } => {
            let role_id = parse_role_arg(role)?;
            app.bindings
                .assign(ctx, &EmployeeId::from(id.as_str()), role_id)
                .await?;
            match role_id {
                Some(role_id) => {
                    output::print_success(&format!("Employee {id} now acts with role {role_id}"))
                }
                None => output::print_warning(&format!("Employee {id} has no role")),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_arg() {
        assert_eq!(parse_role_arg("none").unwrap(), None);
        assert_eq!(parse_role_arg("7").unwrap(), Some(RoleId(7)));
        assert!(parse_role_arg("admin").is_err());
    }
}
