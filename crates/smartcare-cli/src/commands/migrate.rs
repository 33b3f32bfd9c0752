//! Database migration command.

use crate::output;
use smartcare_core::error::AppError;

use super::App;

/// Apply all pending migrations
pub async fn execute(app: &App) -> Result<(), AppError> {
    println!("Running database migrations...");
    smartcare_database::migration::run_migrations(app.pool.pool()).await?;
    output::print_success("All migrations applied successfully.");
    Ok(())
}
