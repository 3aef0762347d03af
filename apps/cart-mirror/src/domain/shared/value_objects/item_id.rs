//! Cart item identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier attached to a cart item.
///
/// Items arrive from collaborating UIs as loose records, so an id may be
/// either an integer (the store assigns a millisecond timestamp when the
/// caller omits one) or a caller-chosen string. Equality is exact with no
/// cross-type coercion: `Int(1)` and `Text("1")` are different ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    /// Numeric identifier.
    Int(i64),
    /// String identifier.
    Text(String),
}

impl ItemId {
    /// Default id for an item added without one: a Unix timestamp in
    /// milliseconds.
    #[must_use]
    pub const fn from_millis(millis: i64) -> Self {
        Self::Int(millis)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ItemId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_cross_type_coercion() {
        assert_ne!(ItemId::Int(1), ItemId::from("1"));
        assert_eq!(ItemId::Int(1), ItemId::from(1));
    }

    #[test]
    fn deserializes_numbers_and_strings() {
        let n: ItemId = serde_json::from_str("42").unwrap();
        assert_eq!(n, ItemId::Int(42));

        let s: ItemId = serde_json::from_str("\"sku-42\"").unwrap();
        assert_eq!(s, ItemId::from("sku-42"));
    }

    #[test]
    fn serializes_back_to_original_shape() {
        assert_eq!(serde_json::to_string(&ItemId::Int(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&ItemId::from("sku-7")).unwrap(),
            "\"sku-7\""
        );
    }

    #[test]
    fn display() {
        assert_eq!(ItemId::Int(9).to_string(), "9");
        assert_eq!(ItemId::from("a").to_string(), "a");
    }
}
