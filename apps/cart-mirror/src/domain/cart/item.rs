//! Cart item record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::shared::lenient;
use crate::domain::shared::{ItemId, Money};

/// One line in a cart.
///
/// Collaborating UIs attach whatever fields they like; everything not
/// modeled here survives round-trips untouched in [`extra`](Self::extra).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Item identifier; assigned at insertion when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,

    /// Quantity; treated as 1 when absent. Stored values that are not a
    /// whole non-negative number read back as absent.
    #[serde(
        default,
        with = "lenient::quantity_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub qty: Option<u64>,

    /// Unit price. Stored values that do not parse as a number read back
    /// as absent.
    #[serde(
        default,
        with = "lenient::money_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Money>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Caller-supplied fields preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CartItem {
    /// Quantity with the absent-means-one rule applied.
    #[must_use]
    pub fn quantity(&self) -> u64 {
        self.qty.unwrap_or(1)
    }

    /// Price × quantity. An absent or unparsable price contributes zero.
    #[must_use]
    pub fn line_total(&self) -> Money {
        self.price.unwrap_or(Money::ZERO) * self.quantity()
    }
}
