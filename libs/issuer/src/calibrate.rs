//! Bulk rewrite of the location segment of existing identifiers.
//!
//! Older registrations were written with the `0000` placeholder where the
//! location was unknown. Calibration moves such identifiers to another
//! location (normally the `9999` sentinel), keeping role code and sequence.

use std::collections::BTreeMap;

use coreid_id::{CoreId, LocationCode, LocationDigits, RoleCode};
use serde::Serialize;
use tracing::{info, warn};

use crate::issuer::IssueError;
use crate::store::IdentifierStore;

/// What to calibrate.
#[derive(Debug, Clone)]
pub struct CalibrationPlan {
    /// Location segment to rewrite.
    pub from: LocationDigits,

    /// Location to rewrite it to.
    pub to: LocationCode,

    /// Restrict to one role.
    pub role: Option<RoleCode>,

    /// Report without writing.
    pub dry_run: bool,
}

impl CalibrationPlan {
    /// The usual plan: placeholder `0000` to the `9999` sentinel, every role.
    pub fn placeholder_to_sentinel() -> Self {
        Self {
            from: LocationDigits::PLACEHOLDER,
            to: LocationCode::Unknown,
            role: None,
            dry_run: false,
        }
    }
}

/// A single identifier rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalibrationMove {
    pub from: CoreId,
    pub to: CoreId,
}

/// Outcome of a calibration run.
#[derive(Debug, Clone, Serialize)]
pub struct CalibrationReport {
    pub from: LocationDigits,
    pub to: LocationDigits,
    pub dry_run: bool,
    pub moves: Vec<CalibrationMove>,
    /// Rows at `from` that could not be parsed and were left alone.
    pub skipped_malformed: Vec<String>,
    /// Rows actually rewritten; zero on dry runs.
    pub rewritten: u64,
    /// Target prefixes whose counter could not be raised after the rewrite.
    /// Issuance still floors on the observed maximum for these.
    pub counters_not_raised: Vec<String>,
}

/// Run a calibration plan against `store`.
///
/// Refuses to run if any rewritten identifier already exists; in that case
/// nothing is written. After rewriting, each target prefix counter is raised
/// to the largest moved sequence. The rewrite is already committed by then, so
/// a failed raise is logged and listed in
/// [`CalibrationReport::counters_not_raised`] instead of failing the run.
pub async fn calibrate<S>(store: &S, plan: &CalibrationPlan) -> Result<CalibrationReport, IssueError>
where
    S: IdentifierStore + ?Sized,
{
    let to = plan.to.digits();
    let mut report = CalibrationReport {
        from: plan.from,
        to,
        dry_run: plan.dry_run,
        moves: Vec::new(),
        skipped_malformed: Vec::new(),
        rewritten: 0,
        counters_not_raised: Vec::new(),
    };

    if plan.from == to {
        info!(location = %to, "Source and target locations match, nothing to calibrate");
        return Ok(report);
    }

    let role = plan.role.map(|role| role.digits());
    let existing = store.list_by_location(&plan.from, role.as_ref()).await?;

    for identifier in existing {
        match CoreId::parse(&identifier) {
            Some(id) => report.moves.push(CalibrationMove {
                from: id,
                to: id.with_location(to),
            }),
            None => {
                warn!(%identifier, "Skipping malformed identifier");
                report.skipped_malformed.push(identifier);
            }
        }
    }

    let mut conflicts = Vec::new();
    for mv in &report.moves {
        let target = mv.to.to_string();
        if store.contains(&target).await? {
            conflicts.push(target);
        }
    }
    if !conflicts.is_empty() {
        warn!(count = conflicts.len(), "Calibration would overwrite existing identifiers");
        return Err(IssueError::CalibrationConflict { conflicts });
    }

    if plan.dry_run {
        info!(
            from = %plan.from,
            to = %to,
            candidates = report.moves.len(),
            "Dry run, no identifiers rewritten"
        );
        return Ok(report);
    }

    let moves: Vec<(CoreId, CoreId)> = report.moves.iter().map(|mv| (mv.from, mv.to)).collect();
    report.rewritten = store.relocate(&moves).await?;

    let mut highest: BTreeMap<String, u32> = BTreeMap::new();
    for mv in &report.moves {
        let entry = highest.entry(mv.to.prefix()).or_default();
        *entry = (*entry).max(u32::from(mv.to.sequence()));
    }
    for (prefix, sequence) in highest {
        if let Err(error) = store.raise_counter(&prefix, sequence).await {
            warn!(%prefix, sequence, %error, "Failed to raise counter after calibration");
            report.counters_not_raised.push(prefix);
        }
    }

    info!(
        from = %plan.from,
        to = %to,
        rewritten = report.rewritten,
        skipped = report.skipped_malformed.len(),
        "Calibration complete"
    );
    Ok(report)
}
