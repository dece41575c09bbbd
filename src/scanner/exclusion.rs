//! Address exclusion.
//!
//! Reserved, broadcast and loopback addresses (and any configured prefixes)
//! are never probed. They are reported as excluded rather than down.

use crate::config::MonitorSettings;
use std::collections::HashSet;

/// Decides whether an address is out of scope for probing.
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    addresses: HashSet<String>,
    prefixes: Vec<String>,
}

impl ExclusionFilter {
    /// Create a filter from explicit address and prefix lists.
    pub fn new<A, P>(addresses: A, prefixes: P) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        P: IntoIterator,
        P::Item: Into<String>,
    {
        Self {
            addresses: addresses.into_iter().map(Into::into).collect(),
            prefixes: prefixes
                .into_iter()
                .map(Into::into)
                .filter(|p: &String| !p.is_empty())
                .collect(),
        }
    }

    /// Build the filter configured in the settings.
    pub fn from_settings(settings: &MonitorSettings) -> Self {
        Self::new(
            settings.excluded_addresses.iter().cloned(),
            settings.excluded_prefixes.iter().cloned(),
        )
    }

    /// Check whether the address must be skipped.
    pub fn is_excluded(&self, address: &str) -> bool {
        self.addresses.contains(address) || self.prefixes.iter().any(|p| address.starts_with(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_reserved_addresses() {
        let filter = ExclusionFilter::from_settings(&MonitorSettings::default());
        assert!(filter.is_excluded("127.0.0.1"));
        assert!(filter.is_excluded("255.255.255.255"));
        assert!(filter.is_excluded("0.0.0.0"));
        assert!(filter.is_excluded("10.0.0.1"));
        assert!(!filter.is_excluded("10.0.0.10"));
    }

    #[test]
    fn test_prefix_match() {
        let filter = ExclusionFilter::new(Vec::<String>::new(), ["192.168.50."]);
        assert!(filter.is_excluded("192.168.50.7"));
        assert!(!filter.is_excluded("192.168.5.7"));
    }

    #[test]
    fn test_empty_prefix_ignored() {
        let filter = ExclusionFilter::new(Vec::<String>::new(), [""]);
        assert!(!filter.is_excluded("10.1.1.1"));
    }
}
