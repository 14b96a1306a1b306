//! Segment types for CORE IDs: role codes, location codes, and sequences.

use serde::{Deserialize, Serialize};

use crate::define_segment;
use crate::IdError;

// =============================================================================
// Digit Segments
// =============================================================================

define_segment!(RoleDigits, 2, "role code");
define_segment!(LocationDigits, 4, "location code");

impl LocationDigits {
    /// Sentinel location used when no real location is known.
    pub const SENTINEL: Self = Self(*b"9999");

    /// Legacy placeholder written before the sentinel existed.
    pub const PLACEHOLDER: Self = Self(*b"0000");
}

// =============================================================================
// Roles
// =============================================================================

/// Category of the entity an identifier belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleCode {
    Administrator,
    Federation,
    Club,
    School,
    Athlete,
    Parent,
    Coach,
    Judge,
    EventOrganizer,
    Supplier,
    Staff,
    Unknown,
}

impl RoleCode {
    /// Every role, in code order.
    pub const ALL: [RoleCode; 12] = [
        RoleCode::Administrator,
        RoleCode::Federation,
        RoleCode::Club,
        RoleCode::School,
        RoleCode::Athlete,
        RoleCode::Parent,
        RoleCode::Coach,
        RoleCode::Judge,
        RoleCode::EventOrganizer,
        RoleCode::Supplier,
        RoleCode::Staff,
        RoleCode::Unknown,
    ];

    /// Returns the two digit code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Administrator => "00",
            Self::Federation => "01",
            Self::Club => "02",
            Self::School => "03",
            Self::Athlete => "04",
            Self::Parent => "05",
            Self::Coach => "06",
            Self::Judge => "07",
            Self::EventOrganizer => "08",
            Self::Supplier => "09",
            Self::Staff => "10",
            Self::Unknown => "99",
        }
    }

    /// Returns the canonical kebab-case name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Federation => "federation",
            Self::Club => "club",
            Self::School => "school",
            Self::Athlete => "athlete",
            Self::Parent => "parent",
            Self::Coach => "coach",
            Self::Judge => "judge",
            Self::EventOrganizer => "event-organizer",
            Self::Supplier => "supplier",
            Self::Staff => "staff",
            Self::Unknown => "unknown",
        }
    }

    /// Returns the code as a typed segment.
    #[must_use]
    pub fn digits(&self) -> RoleDigits {
        let code = self.code().as_bytes();
        RoleDigits([code[0], code[1]])
    }

    /// Maps a two digit code back to its role.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.code() == code)
    }

    /// Resolves a role name as received from registration flows.
    ///
    /// Matching ignores case and treats `-`, `_` and spaces alike, so
    /// `ATHLETE`, `event_organizer` and `Event Organizer` all resolve. A bare
    /// two digit code is accepted too. Anything else is [`RoleCode::Unknown`].
    pub fn from_name(name: &str) -> Self {
        let trimmed = name.trim();
        if let Some(role) = Self::from_code(trimmed) {
            return role;
        }

        let normalized: String = trimmed
            .chars()
            .map(|c| match c {
                '_' | ' ' => '-',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        match normalized.as_str() {
            "admin" => Self::Administrator,
            "organizer" | "eo" => Self::EventOrganizer,
            other => Self::ALL
                .into_iter()
                .find(|role| role.name() == other)
                .unwrap_or(Self::Unknown),
        }
    }
}

impl std::fmt::Display for RoleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl From<RoleCode> for RoleDigits {
    fn from(role: RoleCode) -> Self {
        role.digits()
    }
}

// =============================================================================
// Locations
// =============================================================================

/// A location resolved once at the boundary.
///
/// Registration flows hand over free-form location hints; [`LocationCode::from_hint`]
/// turns them into either a concrete four digit code or [`LocationCode::Unknown`],
/// which renders as the `9999` sentinel. Serialized as its four digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "LocationDigits", from = "LocationDigits")]
pub enum LocationCode {
    Explicit(LocationDigits),
    Unknown,
}

impl LocationCode {
    /// Normalizes a location hint.
    ///
    /// - `None`, hints shorter than two characters, `"0000"` and `"9999"` are unknown
    /// - otherwise dots are stripped, the rest is right-padded with `0` and cut
    ///   to four characters (`"31"` → `3100`, `"31.71"` → `3171`)
    /// - a result that is not four digits is unknown; one that lands on `9999`
    ///   is the sentinel
    pub fn from_hint(hint: Option<&str>) -> Self {
        let Some(hint) = hint else {
            return Self::Unknown;
        };

        if hint.chars().count() < 2 || hint == "0000" || hint == "9999" {
            return Self::Unknown;
        }

        let mut code: String = hint.chars().filter(|c| *c != '.').take(4).collect();
        while code.chars().count() < 4 {
            code.push('0');
        }

        match LocationDigits::parse(&code) {
            Ok(digits) => Self::from(digits),
            Err(_) => Self::Unknown,
        }
    }

    /// Returns the four digits written into identifiers.
    #[must_use]
    pub fn digits(&self) -> LocationDigits {
        match self {
            Self::Explicit(digits) => *digits,
            Self::Unknown => LocationDigits::SENTINEL,
        }
    }

    /// Returns true if this is the unknown sentinel.
    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl From<LocationDigits> for LocationCode {
    fn from(digits: LocationDigits) -> Self {
        if digits == LocationDigits::SENTINEL {
            Self::Unknown
        } else {
            Self::Explicit(digits)
        }
    }
}

impl From<LocationCode> for LocationDigits {
    fn from(location: LocationCode) -> Self {
        location.digits()
    }
}

impl std::fmt::Display for LocationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.digits(), f)
    }
}

// =============================================================================
// Sequence Number
// =============================================================================

/// Zero-padded counter, unique within a `RR.LLLL.` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Sequence(u16);

impl Sequence {
    /// The first sequence issued for a fresh prefix.
    pub const FIRST: Self = Self(1);

    /// The largest sequence that fits in four digits.
    pub const MAX: Self = Self(9999);

    /// Creates a sequence, rejecting values wider than four digits.
    pub fn new(value: u32) -> Result<Self, IdError> {
        if value > u32::from(Self::MAX.0) {
            return Err(IdError::SequenceOutOfRange(value));
        }
        Ok(Self(value as u16))
    }

    /// Parses exactly four ASCII digits.
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }
        if s.len() != 4 {
            return Err(IdError::InvalidLength {
                segment: "sequence",
                expected: 4,
                actual: s.chars().count(),
            });
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IdError::InvalidSegment {
                segment: "sequence",
                actual: s.to_string(),
            });
        }
        let value = s
            .parse::<u16>()
            .map_err(|_| IdError::InvalidSegment {
                segment: "sequence",
                actual: s.to_string(),
            })?;
        Ok(Self(value))
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn value(&self) -> u16 {
        self.0
    }

    /// Returns the next sequence, or `None` once four digits are exhausted.
    #[must_use]
    pub fn next(&self) -> Option<Self> {
        Self::new(u32::from(self.0) + 1).ok()
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::FIRST
    }
}

impl std::fmt::Display for Sequence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

impl std::str::FromStr for Sequence {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<u32> for Sequence {
    type Error = IdError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Sequence> for u32 {
    fn from(seq: Sequence) -> Self {
        u32::from(seq.0)
    }
}

impl serde::Serialize for Sequence {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Sequence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u32::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("31"), "3100")]
    #[case(Some("3171"), "3171")]
    #[case(Some("0000"), "9999")]
    #[case(None, "9999")]
    #[case(Some("31.71"), "3171")]
    #[case(Some("317105"), "3171")]
    #[case(Some("3"), "9999")]
    #[case(Some(""), "9999")]
    #[case(Some("9999"), "9999")]
    #[case(Some("jk"), "9999")]
    #[case(Some("00"), "0000")]
    #[case(Some("99.99"), "9999")]
    #[case(Some("3.1.7"), "3170")]
    fn test_location_from_hint(#[case] hint: Option<&str>, #[case] expected: &str) {
        assert_eq!(LocationCode::from_hint(hint).to_string(), expected);
    }

    #[test]
    fn test_location_unknown_is_explicit_branch() {
        assert!(LocationCode::from_hint(None).is_unknown());
        assert!(!LocationCode::from_hint(Some("3171")).is_unknown());
        assert_eq!(
            LocationCode::from(LocationDigits::SENTINEL),
            LocationCode::Unknown
        );
    }

    #[test]
    fn test_location_serde_goes_through_digits() {
        let sentinel: LocationCode = serde_json::from_str("\"9999\"").unwrap();
        assert_eq!(sentinel, LocationCode::Unknown);

        let explicit = LocationCode::from_hint(Some("31.71"));
        let json = serde_json::to_string(&explicit).unwrap();
        assert_eq!(json, "\"3171\"");
        assert_eq!(serde_json::from_str::<LocationCode>(&json).unwrap(), explicit);

        assert!(serde_json::from_str::<LocationCode>("\"31x1\"").is_err());
    }

    #[rstest]
    #[case("athlete", RoleCode::Athlete)]
    #[case("ATHLETE", RoleCode::Athlete)]
    #[case("event-organizer", RoleCode::EventOrganizer)]
    #[case("EVENT_ORGANIZER", RoleCode::EventOrganizer)]
    #[case("Event Organizer", RoleCode::EventOrganizer)]
    #[case("admin", RoleCode::Administrator)]
    #[case("02", RoleCode::Club)]
    #[case("goalkeeper", RoleCode::Unknown)]
    #[case("", RoleCode::Unknown)]
    fn test_role_from_name(#[case] name: &str, #[case] expected: RoleCode) {
        assert_eq!(RoleCode::from_name(name), expected);
    }

    #[test]
    fn test_unknown_role_code() {
        assert_eq!(RoleCode::from_name("referee's cousin").code(), "99");
    }

    #[test]
    fn test_role_codes_are_distinct_and_ordered() {
        let codes: Vec<_> = RoleCode::ALL.iter().map(RoleCode::code).collect();
        let mut sorted = codes.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_role_from_code_roundtrip() {
        for role in RoleCode::ALL {
            assert_eq!(RoleCode::from_code(role.code()), Some(role));
            assert_eq!(role.digits().as_str(), role.code());
        }
        assert_eq!(RoleCode::from_code("42"), None);
    }

    #[test]
    fn test_sequence_bounds() {
        assert_eq!(Sequence::FIRST.to_string(), "0001");
        assert_eq!(Sequence::MAX.to_string(), "9999");
        assert_eq!(Sequence::MAX.next(), None);
        assert_eq!(Sequence::new(7).unwrap().next(), Some(Sequence::new(8).unwrap()));
        assert!(matches!(
            Sequence::new(10_000),
            Err(IdError::SequenceOutOfRange(10_000))
        ));
    }

    #[test]
    fn test_sequence_parse_rejects_non_digits() {
        assert!(Sequence::parse("abcd").is_err());
        assert!(Sequence::parse("+123").is_err());
        assert!(Sequence::parse("123").is_err());
        assert!(Sequence::parse("").unwrap_err().is_empty());
        assert_eq!(Sequence::parse("0042").unwrap().value(), 42);
    }

    #[test]
    fn test_segment_parse() {
        assert_eq!(LocationDigits::parse("3171").unwrap().as_str(), "3171");
        assert!(LocationDigits::parse("317").unwrap_err().is_segment_error());
        assert!(LocationDigits::parse("31a1").unwrap_err().is_segment_error());
        assert!(RoleDigits::parse("4").is_err());
    }

    #[test]
    fn test_segment_json() {
        let digits = LocationDigits::parse("3171").unwrap();
        assert_eq!(serde_json::to_string(&digits).unwrap(), "\"3171\"");
        let err = serde_json::from_str::<LocationDigits>("\"31x1\"");
        assert!(err.is_err());
    }
}
