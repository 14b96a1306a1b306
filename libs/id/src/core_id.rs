//! The `RR.LLLL.SSSS` identifier value.

use crate::{IdError, LocationCode, LocationDigits, RoleCode, RoleDigits, Sequence};

/// Total length of a well-formed identifier.
const CORE_ID_LEN: usize = 12;

/// A parsed CORE ID.
///
/// Field order makes the derived `Ord` agree with the lexicographic order of
/// the string form, which is what the store's "greatest identifier with this
/// prefix" lookup relies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoreId {
    role: RoleDigits,
    location: LocationDigits,
    sequence: Sequence,
}

impl CoreId {
    /// Builds an identifier from a role, a resolved location, and a sequence.
    #[must_use]
    pub fn new(role: RoleCode, location: &LocationCode, sequence: Sequence) -> Self {
        Self {
            role: role.digits(),
            location: location.digits(),
            sequence,
        }
    }

    /// Parses an identifier, returning `None` on any mismatch.
    ///
    /// Accepts exactly two digits, a dot, four digits, a dot, and four digits.
    /// Role codes outside the known enumeration still parse; use
    /// [`CoreId::role`] to map them.
    pub fn parse(s: &str) -> Option<Self> {
        Self::try_parse(s).ok()
    }

    /// Parses an identifier, reporting why it was rejected.
    pub fn try_parse(s: &str) -> Result<Self, IdError> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }

        if s.len() != CORE_ID_LEN {
            return Err(IdError::InvalidLength {
                segment: "identifier",
                expected: CORE_ID_LEN,
                actual: s.chars().count(),
            });
        }

        let mut segments = s.split('.');
        let (Some(role), Some(location), Some(sequence), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(IdError::MissingSeparator {
                actual: s.to_string(),
            });
        };

        Ok(Self {
            role: RoleDigits::parse(role)?,
            location: LocationDigits::parse(location)?,
            sequence: Sequence::parse(sequence)?,
        })
    }

    /// Returns the `RR.LLLL.` prefix that scopes sequences for a role and location.
    #[must_use]
    pub fn prefix_for(role: RoleCode, location: &LocationCode) -> String {
        format!("{}.{}.", role.code(), location.digits())
    }

    /// Returns this identifier's `RR.LLLL.` prefix.
    #[must_use]
    pub fn prefix(&self) -> String {
        format!("{}.{}.", self.role, self.location)
    }

    /// Returns the raw role segment.
    #[must_use]
    pub const fn role_digits(&self) -> RoleDigits {
        self.role
    }

    /// Returns the role, or [`RoleCode::Unknown`] for codes outside the enumeration.
    #[must_use]
    pub fn role(&self) -> RoleCode {
        RoleCode::from_code(self.role.as_str()).unwrap_or(RoleCode::Unknown)
    }

    /// Returns the raw location segment.
    #[must_use]
    pub const fn location(&self) -> LocationDigits {
        self.location
    }

    /// Returns the sequence.
    #[must_use]
    pub const fn sequence(&self) -> Sequence {
        self.sequence
    }

    /// Returns a copy with the location segment replaced.
    #[must_use]
    pub const fn with_location(&self, location: LocationDigits) -> Self {
        Self {
            role: self.role,
            location,
            sequence: self.sequence,
        }
    }
}

impl std::fmt::Display for CoreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.role, self.location, self.sequence)
    }
}

impl std::str::FromStr for CoreId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s)
    }
}

impl serde::Serialize for CoreId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for CoreId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::try_parse(&s).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================
