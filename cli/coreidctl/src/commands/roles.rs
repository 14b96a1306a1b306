//! Role code listing.

use anyhow::Result;
use coreid_id::RoleCode;
use serde::Serialize;
use tabled::Tabled;

use crate::output::print_output;

use super::CommandContext;

#[derive(Debug, Clone, Serialize, Tabled)]
struct RoleRow {
    #[tabled(rename = "Code")]
    code: &'static str,

    #[tabled(rename = "Role")]
    name: &'static str,
}

pub fn list_roles(ctx: CommandContext) -> Result<()> {
    let rows: Vec<RoleRow> = RoleCode::ALL
        .iter()
        .map(|role| RoleRow {
            code: role.code(),
            name: role.name(),
        })
        .collect();

    print_output(&rows, ctx.format);
    Ok(())
}
