//! Identifier issuance.

use anyhow::Result;
use clap::Args;
use coreid_id::{CoreId, LocationCode, RoleCode};
use coreid_issuer::{store::IdentifierStore, IdentifierIssuer};
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{print_output, print_success, OutputFormat};

use super::CommandContext;

/// Issue new identifiers.
#[derive(Debug, Args)]
pub struct IssueCommand {
    /// Role name (athlete, club, event-organizer, ...) or two digit code.
    #[arg(long)]
    role: String,

    /// Location hint, e.g. 3171 or 31.71. Omit for the 9999 sentinel.
    #[arg(long)]
    location: Option<String>,

    /// Also write the identifier into the registry.
    #[arg(long)]
    record: bool,

    /// Number of identifiers to issue.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=9999))]
    count: u32,
}

/// One issued identifier.
#[derive(Debug, Clone, Serialize, Tabled)]
struct IssuedRow {
    #[tabled(rename = "Identifier")]
    identifier: String,

    #[tabled(rename = "Role")]
    role: String,

    #[tabled(rename = "Location")]
    location: String,

    #[tabled(rename = "Sequence")]
    sequence: String,

    #[tabled(rename = "Recorded")]
    recorded: bool,
}

impl IssuedRow {
    fn new(id: &CoreId, recorded: bool) -> Self {
        Self {
            identifier: id.to_string(),
            role: id.role().to_string(),
            location: id.location().to_string(),
            sequence: id.sequence().to_string(),
            recorded,
        }
    }
}

impl IssueCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let issuer = ctx.issuer().await?;
        let rows = self.issue_rows(&issuer).await?;

        print_output(&rows, ctx.format);
        if ctx.format == OutputFormat::Table && !self.record {
            print_success("Issued; write the identifier onto the new record to claim it.");
        }
        Ok(())
    }

    async fn issue_rows<S: IdentifierStore>(
        &self,
        issuer: &IdentifierIssuer<S>,
    ) -> Result<Vec<IssuedRow>, CliError> {
        let role = RoleCode::from_name(&self.role);
        let location = LocationCode::from_hint(self.location.as_deref());

        let mut rows = Vec::with_capacity(self.count as usize);
        for _ in 0..self.count {
            let issued = if self.record {
                issuer.issue_and_record(role, &location).await
            } else {
                issuer.issue(role, &location).await
            };
            rows.push(IssuedRow::new(&issued?, self.record));
        }
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::render_output;
    use coreid_issuer::{store::MemoryIdentifierStore, IssuerConfig};

    #[tokio::test]
    async fn test_in_memory_issue_renders_parseable_json() {
        let cmd = IssueCommand {
            role: "athlete".to_string(),
            location: Some("3171".to_string()),
            record: true,
            count: 2,
        };
        let issuer = IdentifierIssuer::new(MemoryIdentifierStore::new(), IssuerConfig::default());

        let rows = cmd.issue_rows(&issuer).await.unwrap();
        let out = render_output(&rows, OutputFormat::Json);

        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["schemaVersion"], "coreid.cli.v1");
        assert_eq!(value["data"][0]["identifier"], "04.3171.0001");
        assert_eq!(value["data"][1]["identifier"], "04.3171.0002");
        assert_eq!(value["data"][1]["recorded"], true);
    }
}
