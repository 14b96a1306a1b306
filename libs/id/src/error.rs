//! Error types for CORE ID parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing or validating CORE IDs and their segments.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input string is empty.
    #[error("ID cannot be empty")]
    Empty,

    /// A segment (or the whole identifier) has the wrong number of characters.
    #[error("invalid {segment} length: expected {expected} characters, got {actual}")]
    InvalidLength {
        segment: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A segment contains something other than ASCII digits.
    #[error("invalid {segment}: '{actual}' must contain only ASCII digits")]
    InvalidSegment {
        segment: &'static str,
        actual: String,
    },

    /// The identifier does not split into exactly three dot-separated segments.
    #[error("identifier must have three dot-separated segments, got '{actual}'")]
    MissingSeparator { actual: String },

    /// A numeric sequence does not fit in four digits.
    #[error("sequence {0} is outside 0..=9999")]
    SequenceOutOfRange(u32),
}

impl IdError {
    /// Returns true if this error indicates the input was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, IdError::Empty)
    }

    /// Returns true if this error is about the shape of a single segment.
    pub fn is_segment_error(&self) -> bool {
        matches!(
            self,
            IdError::InvalidLength { .. } | IdError::InvalidSegment { .. }
        )
    }
}
