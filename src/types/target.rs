//! Monitored endpoint definitions.
//!
//! A [`Target`] is one point-of-sale host as delivered by the target source:
//! an IPv4 address plus the display metadata used in reports.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Segment assigned to targets whose source row has none.
pub const DEFAULT_SEGMENT: &str = "General";

/// Shortest accepted address (`"1.1.1.1"`).
const MIN_ADDRESS_LEN: usize = 7;

/// One monitored network endpoint.
///
/// Identity is the address; alias and segment are display-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Dotted-quad address string.
    pub address: String,
    /// Display name shown in reports.
    pub alias: String,
    /// Grouping label (zone, region, route).
    pub segment: String,
}

/// Error type for target validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("target address is empty")]
    EmptyAddress,
    #[error("target address too short: '{0}'")]
    AddressTooShort(String),
}

impl Target {
    /// Create a validated target.
    ///
    /// The address is trimmed. An empty alias falls back to the address and an
    /// empty segment falls back to [`DEFAULT_SEGMENT`].
    pub fn new(
        address: impl AsRef<str>,
        alias: impl AsRef<str>,
        segment: impl AsRef<str>,
    ) -> Result<Self, TargetError> {
        let address = address.as_ref().trim();
        if address.is_empty() {
            return Err(TargetError::EmptyAddress);
        }
        if address.len() < MIN_ADDRESS_LEN {
            return Err(TargetError::AddressTooShort(address.to_string()));
        }

        let alias = match alias.as_ref().trim() {
            "" => address.to_string(),
            a => a.to_string(),
        };
        let segment = match segment.as_ref().trim() {
            "" => DEFAULT_SEGMENT.to_string(),
            s => s.to_string(),
        };

        Ok(Self {
            address: address.to_string(),
            alias,
            segment,
        })
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.alias == self.address {
            write!(f, "{}", self.address)
        } else {
            write!(f, "{} ({})", self.alias, self.address)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_trims_address() {
        let target = Target::new("  10.1.1.1 ", "Shop", "Z1").unwrap();
        assert_eq!(target.address, "10.1.1.1");
    }

    #[test]
    fn test_target_defaults() {
        let target = Target::new("10.1.1.1", "", " ").unwrap();
        assert_eq!(target.alias, "10.1.1.1");
        assert_eq!(target.segment, DEFAULT_SEGMENT);
    }

    #[test]
    fn test_target_rejects_bad_addresses() {
        assert_eq!(Target::new("", "A", "Z"), Err(TargetError::EmptyAddress));
        assert!(matches!(
            Target::new("1.1.1", "A", "Z"),
            Err(TargetError::AddressTooShort(_))
        ));
    }

    #[test]
    fn test_target_display() {
        let named = Target::new("10.1.1.1", "Shop 4", "Z1").unwrap();
        assert_eq!(named.to_string(), "Shop 4 (10.1.1.1)");

        let bare = Target::new("10.1.1.1", "", "Z1").unwrap();
        assert_eq!(bare.to_string(), "10.1.1.1");
    }
}
