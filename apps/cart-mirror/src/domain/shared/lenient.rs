//! Lenient serde adapters for loosely-typed persisted fields.
//!
//! Persisted carts and orders originate from collaborating UIs that write
//! prices as strings or numbers and tokens as either. These adapters accept
//! both shapes on the way in and fall back to `None` instead of failing the
//! whole record.

use rust_decimal::Decimal;
use serde_json::Value;

use super::value_objects::{Money, Timestamp};

pub(crate) fn coerce_money(value: &Value) -> Option<Money> {
    match value {
        Value::Number(n) => Money::parse_lenient(&n.to_string()),
        Value::String(s) => Money::parse_lenient(s),
        _ => None,
    }
}

pub(crate) fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn coerce_quantity(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `Option<Money>` that tolerates numbers, numeric strings, and junk.
pub(crate) mod money_opt {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Money, Value, coerce_money};

    pub fn serialize<S: Serializer>(value: &Option<Money>, serializer: S) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Money>, D::Error> {
        Ok(Option::<Value>::deserialize(deserializer)?
            .as_ref()
            .and_then(coerce_money))
    }
}

/// `Option<Decimal>` with the same tolerance as [`money_opt`].
pub(crate) mod decimal_opt {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Decimal, Value, coerce_money};

    pub fn serialize<S: Serializer>(
        value: &Option<Decimal>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Decimal>, D::Error> {
        Ok(Option::<Value>::deserialize(deserializer)?
            .as_ref()
            .and_then(coerce_money)
            .map(|m| m.amount()))
    }
}

/// `Option<String>` that also accepts numbers, for token-like fields.
pub(crate) mod text_opt {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Value, coerce_text};

    pub fn serialize<S: Serializer>(
        value: &Option<String>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(Option::<Value>::deserialize(deserializer)?
            .as_ref()
            .and_then(coerce_text))
    }
}

/// `Option<u64>` quantity that tolerates numeric strings; anything that
/// is not a whole non-negative number reads as absent (and so counts
/// as 1).
pub(crate) mod quantity_opt {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Value, coerce_quantity};

    pub fn serialize<S: Serializer>(
        value: &Option<u64>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<u64>, D::Error> {
        Ok(Option::<Value>::deserialize(deserializer)?
            .as_ref()
            .and_then(coerce_quantity))
    }
}

/// `Option<Timestamp>` where an unparsable date reads as absent.
pub(crate) mod timestamp_opt {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Timestamp, Value};

    pub fn serialize<S: Serializer>(
        value: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        Ok(Option::<Value>::deserialize(deserializer)?
            .as_ref()
            .and_then(|v| match v {
                Value::String(s) => Timestamp::parse(s).ok(),
                _ => None,
            }))
    }
}
