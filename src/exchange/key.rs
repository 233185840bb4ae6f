//! Group addressing.
//!
//! On the wire a group is identified by the composite string
//! `"{item_id}:{slot}:{block_id}"`. That format is a compatibility contract
//! with existing provider integrations, so it is kept exactly as is, but it
//! only ever exists at the payload boundary: incoming ids are parsed into a
//! [`GroupKey`] immediately and the string form never travels further into
//! the crate.

use std::fmt;
use std::str::FromStr;

use crate::content::{BlockId, ItemId};
use crate::error::TranslationsError;

/// Structured identity of one translation group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub item: ItemId,
    pub slot: String,
    pub block: BlockId,
}

impl GroupKey {
    /// Build a key, rejecting slot names that would make the wire form
    /// ambiguous
    pub fn new(
        item: ItemId,
        slot: impl Into<String>,
        block: BlockId,
    ) -> Result<Self, TranslationsError> {
        let slot = slot.into();
        if slot.contains(':') {
            return Err(TranslationsError::InvalidSlot(slot));
        }
        Ok(Self { item, slot, block })
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.item, self.slot, self.block)
    }
}

impl FromStr for GroupKey {
    type Err = TranslationsError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let malformed = || TranslationsError::MalformedGroupId(raw.to_owned());

        let parts: Vec<&str> = raw.split(':').collect();
        let [item, slot, block] = parts.as_slice() else {
            return Err(malformed());
        };

        Ok(Self {
            item: item.parse().map_err(|_| malformed())?,
            slot: (*slot).to_owned(),
            block: block.parse().map_err(|_| malformed())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_format() {
        let key = GroupKey::new(7, "content", 42).unwrap();
        assert_eq!(key.to_string(), "7:content:42");
    }

    #[test]
    fn test_parse_round_trip() {
        for slot in ["content", "footer_column_2", "x", ""] {
            let key = GroupKey::new(3, slot, 99).unwrap();
            let parsed: GroupKey = key.to_string().parse().unwrap();
            assert_eq!(parsed, key);
        }
    }

    #[test]
    fn test_slot_with_delimiter_rejected() {
        let err = GroupKey::new(1, "side:bar", 2).unwrap_err();
        assert!(matches!(err, TranslationsError::InvalidSlot(_)));
    }

    #[test]
    fn test_parse_rejects_wrong_arity() {
        for raw in ["1:content", "1:a:b:2", "", "nope"] {
            assert!(
                raw.parse::<GroupKey>().is_err(),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_non_numeric_components() {
        for raw in ["x:content:2", "1:content:y", "-1:content:2"] {
            assert!(matches!(
                raw.parse::<GroupKey>(),
                Err(TranslationsError::MalformedGroupId(_))
            ));
        }
    }

    #[test]
    fn test_bulk_keys_are_pairwise_distinct() {
        // Three items sharing two slot names, blocks with distinct ids
        let mut keys = Vec::new();
        let mut block = 0;
        for item in 1..=3 {
            for slot in ["content", "footer"] {
                block += 1;
                keys.push(GroupKey::new(item, slot, block).unwrap().to_string());
            }
        }
        let unique: std::collections::HashSet<&String> = keys.iter().collect();
        assert_eq!(unique.len(), keys.len());
    }
}
