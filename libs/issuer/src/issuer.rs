//! CORE ID issuance.
//!
//! Issuing an identifier for a role and location:
//! 1. build the `RR.LLLL.` prefix
//! 2. look up the greatest identifier already stored under it
//! 3. reserve the next value from the prefix counter, floored at that maximum
//!
//! The counter makes concurrent issuance on one prefix safe. The registry's
//! unique key backs it up for callers that also persist through
//! [`IdentifierIssuer::issue_and_record`].

use coreid_id::{CoreId, LocationCode, RoleCode, Sequence};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::db::DbError;
use crate::store::IdentifierStore;

/// Message shown to end users when issuance fails.
pub const USER_FACING_FAILURE: &str = "could not create identifier";

/// Default number of attempts for [`IdentifierIssuer::issue_and_record`].
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Issuer tuning.
#[derive(Debug, Clone)]
pub struct IssuerConfig {
    /// How many identifiers `issue_and_record` may try before giving up.
    pub max_attempts: u32,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Issuance and calibration errors.
#[derive(Debug, Error)]
pub enum IssueError {
    /// The backing store failed; nothing was issued.
    #[error("identifier store error: {0}")]
    Store(#[from] DbError),

    /// The prefix has used up all four digit sequences.
    #[error("sequence space exhausted for prefix '{prefix}'")]
    SequenceExhausted { prefix: String },

    /// Every attempt collided with an identifier already in the registry.
    #[error("identifier {identifier} already taken after {attempts} attempts")]
    DuplicateSequence { identifier: String, attempts: u32 },

    /// Calibration would overwrite identifiers that already exist.
    #[error("calibration would collide with {} existing identifier(s): {}", .conflicts.len(), .conflicts.join(", "))]
    CalibrationConflict { conflicts: Vec<String> },
}

impl IssueError {
    /// Get the standardized reason code for this error.
    pub fn reason_code(&self) -> &'static str {
        match self {
            IssueError::Store(_) => "store_unavailable",
            IssueError::SequenceExhausted { .. } => "sequence_exhausted",
            IssueError::DuplicateSequence { .. } => "duplicate_sequence",
            IssueError::CalibrationConflict { .. } => "calibration_conflict",
        }
    }

    /// Generic text for end users attempting registration.
    pub fn user_message(&self) -> &'static str {
        match self {
            IssueError::CalibrationConflict { .. } => "could not calibrate identifiers",
            _ => USER_FACING_FAILURE,
        }
    }
}

/// Issues CORE IDs against an [`IdentifierStore`].
pub struct IdentifierIssuer<S> {
    store: S,
    config: IssuerConfig,
}

impl<S: IdentifierStore> IdentifierIssuer<S> {
    /// Create an issuer over `store`.
    pub fn new(store: S, config: IssuerConfig) -> Self {
        Self { store, config }
    }

    /// Get a reference to the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Issue the next identifier for `role` at `location`.
    ///
    /// The identifier is not persisted; the caller writes it onto the new
    /// record, or uses [`IdentifierIssuer::issue_and_record`].
    #[instrument(skip_all, fields(role = role.code(), location = %location))]
    pub async fn issue(&self, role: RoleCode, location: &LocationCode) -> Result<CoreId, IssueError> {
        let prefix = CoreId::prefix_for(role, location);
        let floor = self.observed_floor(&prefix).await?;
        let reserved = self.store.reserve_sequence(&prefix, floor).await?;

        let sequence = match Sequence::try_from(reserved) {
            Ok(sequence) if reserved > 0 => sequence,
            _ => {
                warn!(%prefix, reserved, "Sequence space exhausted");
                return Err(IssueError::SequenceExhausted { prefix });
            }
        };

        let id = CoreId::new(role, location, sequence);
        debug!(%prefix, identifier = %id, "Issued identifier");
        Ok(id)
    }

    /// Issue from raw registration input.
    ///
    /// Unrecognized role names issue under `99`; unusable location hints
    /// issue under the `9999` sentinel.
    pub async fn issue_from_hint(
        &self,
        role_name: &str,
        location_hint: Option<&str>,
    ) -> Result<CoreId, IssueError> {
        let role = RoleCode::from_name(role_name);
        let location = LocationCode::from_hint(location_hint);
        self.issue(role, &location).await
    }

    /// Issue an identifier and write it into the registry.
    ///
    /// A clash with an existing registry row is retried; each retry re-reads
    /// the stored maximum so the counter moves past the clash.
    pub async fn issue_and_record(
        &self,
        role: RoleCode,
        location: &LocationCode,
    ) -> Result<CoreId, IssueError> {
        let attempts = self.config.max_attempts.max(1);
        let mut last_clash = None;

        for attempt in 1..=attempts {
            let id = self.issue(role, location).await?;
            match self.store.record(&id).await {
                Ok(()) => {
                    info!(identifier = %id, attempt, "Recorded identifier");
                    return Ok(id);
                }
                Err(DbError::DuplicateIdentifier { identifier }) => {
                    warn!(%identifier, attempt, "Identifier already taken, retrying");
                    last_clash = Some(identifier);
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(IssueError::DuplicateSequence {
            identifier: last_clash.unwrap_or_default(),
            attempts,
        })
    }

    /// Parse an identifier. Pure; returns `None` on any mismatch.
    pub fn parse(identifier: &str) -> Option<CoreId> {
        CoreId::parse(identifier)
    }

    /// The sequence of the greatest stored identifier under `prefix`, or 0.
    async fn observed_floor(&self, prefix: &str) -> Result<u32, IssueError> {
        let Some(max) = self.store.find_max_starting_with(prefix).await? else {
            return Ok(0);
        };

        match max.strip_prefix(prefix).map(Sequence::parse) {
            Some(Ok(sequence)) => Ok(u32::from(sequence)),
            _ => {
                warn!(
                    %prefix,
                    identifier = %max,
                    "Malformed existing identifier, assuming no prior sequence"
                );
                Ok(0)
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
