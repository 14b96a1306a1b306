//! # coreid-id
//!
//! CORE ID types, parsing, and location normalization.
//!
//! ## ID Format
//!
//! Every person and organization record carries a CORE ID of the form
//! `RR.LLLL.SSSS`:
//!
//! - `RR` is the two digit role code (`04` for athletes, `02` for clubs, ...)
//! - `LLLL` is the four digit province+city location code, or `9999` when the
//!   location is unknown
//! - `SSSS` is the zero-padded sequence, unique within its `RR.LLLL.` prefix
//!
//! Examples:
//! - `04.3171.0008`
//! - `02.9999.0001`
//!
//! Parsing is strict and total: [`CoreId::parse`] returns `None` for anything
//! that is not exactly `^\d{2}\.\d{4}\.\d{4}$`. Issuance (picking the next
//! sequence) lives in `coreid-issuer`; this crate does no I/O.

mod core_id;
mod error;
mod macros;
mod types;

pub use core_id::CoreId;
pub use error::IdError;
pub use types::*;
