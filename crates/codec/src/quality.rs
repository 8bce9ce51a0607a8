//! Encoder quality on the 10-100 settings scale.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CodecError;

/// Validated quality value.
///
/// The settings surface exposes an integer between 10 and 100; whatever
/// fractional or rescaled value a concrete encoder expects is mapped inside
/// the codec binding. Lossless output formats ignore quality entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Quality(u8);

impl Quality {
    /// Lowest accepted quality.
    pub const MIN: u8 = 10;
    /// Highest accepted quality.
    pub const MAX: u8 = 100;

    /// Create a quality value, rejecting anything outside 10-100.
    pub fn new(value: u8) -> Result<Self, CodecError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CodecError::InvalidQuality(value))
        }
    }

    /// The raw 10-100 value.
    pub fn get(&self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(80)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for Quality {
    type Error = CodecError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quality> for u8 {
    fn from(quality: Quality) -> Self {
        quality.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_bounds() {
        assert!(Quality::new(10).is_ok());
        assert!(Quality::new(100).is_ok());
        assert!(Quality::new(9).is_err());
        assert!(Quality::new(101).is_err());
    }

    #[test]
    fn test_quality_default() {
        assert_eq!(Quality::default().get(), 80);
    }

    #[test]
    fn test_quality_serde_rejects_out_of_range() {
        let parsed: Result<Quality, _> = serde_json::from_str("5");
        assert!(parsed.is_err());
        let parsed: Quality = serde_json::from_str("95").unwrap();
        assert_eq!(parsed.get(), 95);
    }
}
