//! Strongly-typed identifiers used across the domain.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Numeric identifier of a catalog item.
///
/// On its own this is not an item's identity: two items are the same catalog
/// entry only when both id and name match.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u32);

impl ItemId {
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl From<u32> for ItemId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<ItemId> for u32 {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

impl FromStr for ItemId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s
            .trim()
            .parse::<u32>()
            .map_err(|e| DomainError::validation(format!("ItemId: {}", e)))?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        let id: ItemId = " 101 ".parse().unwrap();
        assert_eq!(id, ItemId::new(101));
        assert_eq!(id.to_string(), "101");
    }

    #[test]
    fn rejects_non_numeric_input() {
        let err = "abc".parse::<ItemId>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn serializes_as_a_bare_number() {
        let json = serde_json::to_string(&ItemId::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
