//! Role management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use smartcare_core::error::{AppError, ErrorKind};
use smartcare_core::result::AppResult;
use smartcare_core::types::RoleId;
use smartcare_entity::permission::{Action, Module, PermissionMatrix};
use smartcare_entity::role::Role;
use smartcare_service::{RequestContext, RoleRequest};

use super::App;

/// Arguments for role commands
#[derive(Debug, Args)]
pub struct RoleArgs {
    /// Role subcommand
    #[command(subcommand)]
    pub command: RoleCommand,
}

/// Role subcommands
#[derive(Debug, Subcommand)]
pub enum RoleCommand {
    /// List all roles
    List,
    /// Show one role and its permission matrix
    Show {
        /// Role ID
        id: RoleId,
    },
    /// Create a role
    Create {
        /// Role name
        name: String,
        /// Granted flag as `module:action` or `module:all` (repeatable)
        #[arg(short, long = "grant", value_name = "MODULE:ACTION")]
        grants: Vec<String>,
    },
    /// Replace a role's name and whole matrix
    Update {
        /// Role ID
        id: RoleId,
        /// New role name
        name: String,
        /// Granted flag as `module:action` or `module:all` (repeatable)
        #[arg(short, long = "grant", value_name = "MODULE:ACTION")]
        grants: Vec<String>,
        /// Fail if the stored revision differs
        #[arg(long)]
        revision: Option<i64>,
    },
    /// Delete a role
    Delete {
        /// Role ID
        id: RoleId,
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Role display row for table output
#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    /// Role ID
    id: RoleId,
    /// Name
    name: String,
    /// Modules with any granted flag
    details: String,
    /// Revision
    revision: i64,
    /// Last update
    updated_at: String,
}

impl From<&Role> for RoleRow {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id,
            name: role.name.clone(),
            details: role.permissions.summary(),
            revision: role.revision,
            updated_at: role.updated_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// One module of a matrix for table output
#[derive(Debug, Tabled)]
struct MatrixRow {
    module: &'static str,
    view: &'static str,
    create: &'static str,
    update: &'static str,
    delete: &'static str,
}

/// Parse `module:action` or `module:all` grants into a matrix.
pub fn parse_grants(grants: &[String]) -> Result<PermissionMatrix, AppError> {
    let mut matrix = PermissionMatrix::new();
    for grant in grants {
        let (module, action) = grant.split_once(':').ok_or_else(|| {
            AppError::validation(format!("Grant '{grant}' must look like module:action"))
        })?;
        let module: Module = module.trim().parse()?;
        let action = action.trim();
        if action == "all" {
            for action in Action::ALL {
                matrix = matrix.with(module, action, true);
            }
        } else {
            matrix = matrix.with(module, action.parse()?, true);
        }
    }
    Ok(matrix)
}

fn print_role(role: &Role, format: OutputFormat) {
    match format {
        OutputFormat::Json => output::print_json(role),
        OutputFormat::Table => {
            output::print_kv("ID", &role.id.to_string());
            output::print_kv("Name", &role.name);
            output::print_kv("Revision", &role.revision.to_string());
            output::print_kv("Updated", &role.updated_at.to_rfc3339());
            let rows: Vec<MatrixRow> = Module::ALL
                .iter()
                .map(|&module| {
                    let flags = role.permissions.flags(module);
                    MatrixRow {
                        module: module.label(),
                        view: output::mark(flags.view),
                        create: output::mark(flags.create),
                        update: output::mark(flags.update),
                        delete: output::mark(flags.delete),
                    }
                })
                .collect();
            output::print_table(&rows);
        }
    }
}

/// Execute role commands
pub async fn execute(
    args: &RoleArgs,
    app: &App,
    ctx: &RequestContext,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        RoleCommand::List => {
            let roles = app.roles.list(ctx).await?;
            match format {
                OutputFormat::Json => output::print_json(&roles),
                OutputFormat::Table => {
                    let rows: Vec<RoleRow> = roles.iter().map(RoleRow::from).collect();
                    output::print_table(&rows);
                }
            }
        }
        RoleCommand::Show { id } => {
            let role = app.roles.get(ctx, *id).await?;
            print_role(&role, format);
        }
        RoleCommand::Create { name, grants } => {
            let matrix = parse_grants(grants)?;
            let role = app
                .roles
                .create(ctx, RoleRequest::new(name.as_str(), &matrix))
                .await?;
            output::print_success(&format!("Role '{}' created with id {}", role.name, role.id));
            print_role(&role, format);
        }
        RoleCommand::Update {
            id,
            name,
            grants,
            revision,
        } => {
            let matrix = parse_grants(grants)?;
            let mut request = RoleRequest::new(name.as_str(), &matrix);
            request.revision = *revision;
            let role = app.roles.update(ctx, *id, request).await?;
            output::print_success(&format!(
                "Role {} replaced (revision {})",
                role.id, role.revision
            ));
            print_role(&role, format);
        }
        RoleCommand::Delete { id, yes } => {
            let label = delete_label(*id, app.roles.get(ctx, *id).await)?;

            if !yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Delete {label}? Employees bound to it will lose all permissions."
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {e}")))?;

                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            app.roles.delete(ctx, *id).await?;
            output::print_success(&format!("Deleted {label}"));
        }
    }

    Ok(())
}

/// Names the role in the delete prompt. Deleting needs only
/// `permissions:delete`, so an actor who may not view roles sees the id.
fn delete_label(id: RoleId, lookup: AppResult<Role>) -> AppResult<String> {
    match lookup {
        Ok(role) => Ok(format!("role '{}'", role.name)),
        Err(e) if e.kind == ErrorKind::Authorization => Ok(format!("role {id}")),
        Err(e) => Err(e),
    }
}
