//! Database maintenance commands.

use anyhow::Result;

use crate::error::CliError;
use crate::output::print_success;

use super::CommandContext;

pub async fn migrate(ctx: CommandContext) -> Result<()> {
    let db = ctx.database().await?;
    db.run_migrations().await.map_err(CliError::from)?;
    print_success("Migrations applied.");
    Ok(())
}

pub async fn health(ctx: CommandContext) -> Result<()> {
    let db = ctx.database().await?;
    db.health_check().await.map_err(CliError::from)?;
    print_success("Database reachable.");
    Ok(())
}
