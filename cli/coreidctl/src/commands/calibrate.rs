//! Location calibration.

use anyhow::Result;
use clap::Args;
use coreid_id::{LocationCode, LocationDigits, RoleCode};
use coreid_issuer::calibrate::{calibrate, CalibrationPlan};
use serde::Serialize;
use tabled::Tabled;

use crate::error::CliError;
use crate::output::{print_info, print_output, print_single, print_success, print_warning, OutputFormat};

use super::CommandContext;

/// Rewrite the location segment of existing identifiers.
#[derive(Debug, Args)]
pub struct CalibrateCommand {
    /// Location segment to rewrite.
    #[arg(long, default_value = "0000")]
    from: LocationDigits,

    /// Target location hint. Omit for the 9999 sentinel.
    #[arg(long)]
    to: Option<String>,

    /// Only rewrite identifiers of this role.
    #[arg(long)]
    role: Option<String>,

    /// Show what would change without writing.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Tabled)]
struct MoveRow {
    #[tabled(rename = "From")]
    from: String,

    #[tabled(rename = "To")]
    to: String,
}

impl CalibrateCommand {
    fn plan(&self) -> CalibrationPlan {
        CalibrationPlan {
            from: self.from,
            to: LocationCode::from_hint(self.to.as_deref()),
            role: self.role.as_deref().map(RoleCode::from_name),
            dry_run: self.dry_run,
        }
    }

    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let plan = self.plan();
        let store = ctx.store().await?;
        let report = calibrate(store.as_ref(), &plan)
            .await
            .map_err(CliError::from)?;

        if ctx.format == OutputFormat::Json {
            print_single(&report, ctx.format);
            return Ok(());
        }

        let rows: Vec<MoveRow> = report
            .moves
            .iter()
            .map(|mv| MoveRow {
                from: mv.from.to_string(),
                to: mv.to.to_string(),
            })
            .collect();
        print_output(&rows, ctx.format);

        for identifier in &report.skipped_malformed {
            print_warning(&format!("Skipped malformed identifier {identifier}"));
        }

        for prefix in &report.counters_not_raised {
            print_warning(&format!(
                "Counter for {prefix} was not raised; the next issue will re-derive it."
            ));
        }

        if report.dry_run {
            print_info(&format!(
                "Dry run: {} identifier(s) would move from {} to {}.",
                report.moves.len(),
                report.from,
                report.to
            ));
        } else {
            print_success(&format!(
                "Rewrote {} identifier(s) from {} to {}.",
                report.rewritten, report.from, report.to
            ));
        }
        Ok(())
    }
}
