//! Identifier parsing.

use anyhow::Result;
use clap::Args;
use coreid_id::CoreId;
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::print_output;

use super::CommandContext;

/// Parse an identifier into its segments.
#[derive(Debug, Args)]
pub struct ParseCommand {
    /// Identifier to parse, e.g. 04.3171.0008.
    identifier: String,
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct ParsedRow {
    #[tabled(rename = "Identifier")]
    identifier: String,

    #[tabled(rename = "Role Code")]
    role_code: String,

    #[tabled(rename = "Role")]
    role: String,

    #[tabled(rename = "Location")]
    location: String,

    #[tabled(rename = "Sequence")]
    sequence: u16,
}

fn parse_row(input: &str) -> Result<ParsedRow, CliError> {
    let id = CoreId::try_parse(input).map_err(|reason| CliError::InvalidIdentifier {
        input: input.to_string(),
        reason,
    })?;

    Ok(ParsedRow {
        identifier: id.to_string(),
        role_code: id.role_digits().to_string(),
        role: id.role().to_string(),
        location: id.location().to_string(),
        sequence: id.sequence().value(),
    })
}

impl ParseCommand {
    pub fn run(self, ctx: CommandContext) -> Result<()> {
        let row = parse_row(&self.identifier)?;
        print_output(&[row], ctx.format);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_row() {
        let row = parse_row("08.3171.0042").unwrap();
        assert_eq!(row.role_code, "08");
        assert_eq!(row.role, "event-organizer");
        assert_eq!(row.location, "3171");
        assert_eq!(row.sequence, 42);
    }

    #[test]
    fn test_parse_row_rejects_malformed() {
        let err = parse_row("04.3171.abcd").unwrap_err();
        assert!(matches!(err, CliError::InvalidIdentifier { .. }));
        assert!(err.to_string().contains("04.3171.abcd"));
    }
}
