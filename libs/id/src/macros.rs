//! Macros for defining fixed-width digit segments.

/// Macro to define a fixed-width, ASCII-digit segment of a CORE ID.
///
/// This generates a newtype wrapper around `[u8; WIDTH]` with:
/// - `WIDTH` and `LABEL` constants
/// - `parse()` that accepts exactly `WIDTH` ASCII digits
/// - `as_str()` borrowing the digits
/// - `Display` and `FromStr` implementations
/// - `Serialize` and `Deserialize` implementations (as strings)
/// - `Ord`, `Hash`, and other standard traits
///
/// Ordering of the newtype matches the lexicographic ordering of its string
/// form, since every value has the same width.
///
/// # Example
///
/// ```ignore
/// define_segment!(RoleDigits, 2, "role code");
/// define_segment!(LocationDigits, 4, "location code");
///
/// let location: LocationDigits = "3171".parse()?;
/// assert_eq!(location.as_str(), "3171");
/// ```
#[macro_export]
macro_rules! define_segment {
    ($name:ident, $width:literal, $label:literal) => {
        /// A fixed-width digit segment of a CORE ID.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name([u8; $width]);

        impl $name {
            /// Number of digits in this segment.
            pub const WIDTH: usize = $width;

            /// Human-readable segment name used in errors.
            pub const LABEL: &'static str = $label;

            /// Parses a segment from a string of exactly `WIDTH` ASCII digits.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                if s.is_empty() {
                    return Err($crate::IdError::Empty);
                }

                let bytes = s.as_bytes();
                if bytes.len() != $width {
                    return Err($crate::IdError::InvalidLength {
                        segment: Self::LABEL,
                        expected: $width,
                        actual: s.chars().count(),
                    });
                }

                if !bytes.iter().all(u8::is_ascii_digit) {
                    return Err($crate::IdError::InvalidSegment {
                        segment: Self::LABEL,
                        actual: s.to_string(),
                    });
                }

                let mut digits = [0u8; $width];
                digits.copy_from_slice(bytes);
                Ok(Self(digits))
            }

            /// Returns the digits as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                // Only ASCII digits are ever stored.
                std::str::from_utf8(&self.0).unwrap_or_default()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                Self::parse(&s).map_err(serde::de::Error::custom)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }
    };
}
