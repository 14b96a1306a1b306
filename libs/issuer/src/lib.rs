//! CORE ID issuance.
//!
//! This crate issues `RR.LLLL.SSSS` identifiers for newly registered people
//! and organizations, backed by an [`store::IdentifierStore`]. Registration
//! flows call [`IdentifierIssuer::issue`] (or `issue_and_record`) and write the
//! result onto the new record; operators use [`calibrate::calibrate`] to move
//! legacy identifiers between locations.

pub mod calibrate;
pub mod config;
pub mod db;
pub mod issuer;
pub mod store;

pub use issuer::{IdentifierIssuer, IssueError, IssuerConfig};
