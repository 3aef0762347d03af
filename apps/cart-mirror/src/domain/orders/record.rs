//! Order records, drafts, and receipts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::shared::lenient;
use crate::domain::shared::{Money, Timestamp};

/// One finalized order in the history.
///
/// The wire shape is camelCase JSON; the customer, payment, and amount
/// fields are all optional because collaborating UIs write whatever they
/// captured. Fields not modeled here survive in [`extra`](Self::extra).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Store-assigned order number. Reads as 0 when a foreign writer
    /// omitted it, which keeps the max+1 numbering rule safe.
    #[serde(default)]
    pub order_id: u64,

    /// When the order was placed; assigned by the store at insertion.
    /// Unparsable stored dates read back as absent.
    #[serde(
        default,
        with = "lenient::timestamp_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub order_date: Option<Timestamp>,

    /// Customer display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    /// Customer email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    /// Customer phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,

    /// How the order was paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    /// Payment processor transaction id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    /// Pickup/confirmation token; numbers are coerced to text.
    #[serde(
        default,
        with = "lenient::text_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub order_token: Option<String>,

    /// Grand total; unparsable stored amounts read back as absent.
    #[serde(
        default,
        with = "lenient::money_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_amount: Option<Money>,

    /// Customer rating, when one was left.
    #[serde(
        default,
        with = "lenient::decimal_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<Decimal>,

    /// Free-form order status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Caller-supplied fields preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl OrderRecord {
    /// Case-insensitive substring match against the searchable fields.
    /// `needle` must already be lower-cased.
    pub(crate) fn matches_query(&self, needle: &str) -> bool {
        field_contains(&self.customer_name, needle)
            || field_contains(&self.customer_email, needle)
            || field_contains(&self.customer_phone, needle)
            || self.order_id.to_string().contains(needle)
            || field_contains(&self.payment_method, needle)
            || field_contains(&self.transaction_id, needle)
            || field_contains(&self.order_token, needle)
    }
}

fn field_contains(field: &Option<String>, needle: &str) -> bool {
    field
        .as_deref()
        .is_some_and(|value| value.to_lowercase().contains(needle))
}

/// Caller-supplied order data, before the store assigns a number and date.
///
/// Mirrors [`OrderRecord`] minus the store-assigned fields. Stray
/// `orderId`/`orderDate` keys a caller sneaks into the extra map are
/// discarded at insertion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Customer display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    /// Customer email address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    /// Customer phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,

    /// How the order was paid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,

    /// Payment processor transaction id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    /// Pickup/confirmation token.
    #[serde(
        default,
        with = "lenient::text_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub order_token: Option<String>,

    /// Grand total.
    #[serde(
        default,
        with = "lenient::money_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_amount: Option<Money>,

    /// Customer rating.
    #[serde(
        default,
        with = "lenient::decimal_opt",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<Decimal>,

    /// Free-form order status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Additional caller fields carried into the record.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What the store assigned when an order entered the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    /// The assigned order number.
    pub order_id: u64,
    /// The assigned placement timestamp.
    pub order_date: Timestamp,
}
