//! CLI command definitions and dispatch.

pub mod check;
pub mod employee;
pub mod migrate;
pub mod role;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::output::OutputFormat;
use smartcare_auth::{JwtDecoder, PrincipalResolver, RbacEnforcer};
use smartcare_core::config::AppConfig;
use smartcare_core::error::AppError;
use smartcare_core::result::AppResult;
use smartcare_core::types::EmployeeId;
use smartcare_database::DatabasePool;
use smartcare_database::repositories::{
    EmployeeDirectory, PgEmployeeDirectory, PgRoleStore, RoleStore,
};
use smartcare_service::{EmployeeRoleService, RequestContext, RoleAdminService};

/// SmartCare: role and permission administration
#[derive(Debug, Parser)]
#[command(name = "smartcare", version, about, long_about = None)]
pub struct Cli {
    /// Path to the base configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay loaded next to the base file
    #[arg(short, long, env = "SMARTCARE_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Act as this employee instead of as operator
    #[arg(long = "as", value_name = "EMPLOYEE_ID", global = true)]
    pub acting_as: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Role management
    Role(role::RoleArgs),
    /// Check whether a role grants an action on a module
    Check(check::CheckArgs),
    /// Employee role binding
    Employee(employee::EmployeeArgs),
}

impl Cli {
    /// Load configuration from the base file, overlay, and environment.
    pub fn load_config(&self) -> AppResult<AppConfig> {
        AppConfig::load_with_base(&self.config, &self.env)
    }

    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let app = App::connect(&config).await?;

        let result = match &self.command {
            Commands::Migrate => migrate::execute(&app).await,
            Commands::Role(args) => {
                let ctx = app.request_context(self.acting_as.as_deref()).await;
                role::execute(args, &app, &ctx, self.format).await
            }
            Commands::Check(args) => check::execute(args, &app, self.format).await,
            Commands::Employee(args) => {
                let ctx = app.request_context(self.acting_as.as_deref()).await;
                employee::execute(args, &app, &ctx, self.format).await
            }
        };

        app.pool.close().await;
        result
    }
}

/// Stores and services wired over one database pool.
pub struct App {
    pub pool: DatabasePool,
    pub enforcer: RbacEnforcer,
    pub resolver: PrincipalResolver,
    pub roles: RoleAdminService,
    pub bindings: EmployeeRoleService,
}

impl App {
    /// Connect to the database and build the services.
    pub async fn connect(config: &AppConfig) -> AppResult<Self> {
        let pool = DatabasePool::connect(&config.database).await?;

        let role_store: Arc<dyn RoleStore> = Arc::new(PgRoleStore::new(pool.pool().clone()));
        let directory: Arc<dyn EmployeeDirectory> =
            Arc::new(PgEmployeeDirectory::new(pool.pool().clone()));

        let enforcer = RbacEnforcer::new(role_store.clone());
        let resolver = PrincipalResolver::new(JwtDecoder::new(&config.auth), directory.clone());
        let roles = RoleAdminService::new(
            role_store.clone(),
            directory.clone(),
            enforcer.clone(),
            config.rbac.clone(),
        );
        let bindings = EmployeeRoleService::new(directory, role_store, enforcer.clone());

        Ok(Self {
            pool,
            enforcer,
            resolver,
            roles,
            bindings,
        })
    }

    /// The operator, or the named employee acting with their bound role.
    pub async fn request_context(&self, acting_as: Option<&str>) -> RequestContext {
        let ctx = match acting_as {
            Some(id) => {
                let employee_id = EmployeeId::from(id);
                let role_id = self.resolver.resolve_employee(&employee_id).await;
                RequestContext::employee(employee_id, role_id)
            }
            None => RequestContext::operator(),
        };
        debug!(actor = ?ctx.actor(), "Acting principal resolved");
        ctx
    }
}
