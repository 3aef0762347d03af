//! Order-history aggregate.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::domain::shared::{Money, Timestamp};

use super::record::{OrderDraft, OrderReceipt, OrderRecord};

/// Errors from mutating the order history.
#[derive(Debug)]
pub enum PatchError {
    /// The shallow-merged record no longer parses as an order.
    InvalidRecord {
        /// The order the patch targeted.
        order_id: u64,
        /// The underlying decode failure.
        source: serde_json::Error,
    },
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRecord { order_id, source } => {
                write!(f, "patch for order {order_id} produced an invalid record: {source}")
            }
        }
    }
}

impl std::error::Error for PatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRecord { source, .. } => Some(source),
        }
    }
}

/// Aggregates over the whole order history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderStats {
    /// Number of orders on record.
    pub total_orders: u64,
    /// Sum of every order's total amount (absent amounts count as zero).
    pub total_revenue: Money,
    /// Revenue divided by order count; zero for an empty history.
    pub avg_order_value: Money,
    /// Mean rating across all orders, unrated orders counting as zero.
    pub avg_rating: Decimal,
    /// Orders placed on the given calendar day.
    pub today_orders: u64,
}

/// The persisted list of finalized orders.
///
/// Owns the numbering, merge, search, and aggregation rules. Order ids are
/// unique and monotonically increasing with insertion; deletions may leave
/// gaps, and max+1 numbering still yields a fresh id afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderHistory {
    records: Vec<OrderRecord>,
}

impl OrderHistory {
    /// Create an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Build a history from previously persisted records.
    #[must_use]
    pub fn from_records(records: Vec<OrderRecord>) -> Self {
        Self { records }
    }

    /// The records, oldest first.
    #[must_use]
    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    /// Consume the history, yielding its records.
    #[must_use]
    pub fn into_records(self) -> Vec<OrderRecord> {
        self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the history holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The next order number: 1 on an empty history, otherwise the
    /// largest existing number plus one.
    #[must_use]
    pub fn next_order_id(&self) -> u64 {
        self.records
            .iter()
            .map(|record| record.order_id)
            .max()
            .map_or(1, |max| max + 1)
    }

    /// Append a draft, assigning the next number and the placement time.
    ///
    /// Caller-supplied `orderId`/`orderDate` values, including stray
    /// copies in the draft's extra map, are discarded in favor of the
    /// assigned ones.
    pub fn append(&mut self, draft: OrderDraft, placed_at: Timestamp) -> OrderReceipt {
        let order_id = self.next_order_id();
        let mut extra = draft.extra;
        extra.remove("orderId");
        extra.remove("orderDate");

        self.records.push(OrderRecord {
            order_id,
            order_date: Some(placed_at),
            customer_name: draft.customer_name,
            customer_email: draft.customer_email,
            customer_phone: draft.customer_phone,
            payment_method: draft.payment_method,
            transaction_id: draft.transaction_id,
            order_token: draft.order_token,
            total_amount: draft.total_amount,
            rating: draft.rating,
            status: draft.status,
            extra,
        });

        OrderReceipt {
            order_id,
            order_date: placed_at,
        }
    }

    /// Shallow-merge `patch` over the record numbered `order_id`: patch
    /// fields overwrite, everything else is preserved, and the order
    /// number itself is not patchable.
    ///
    /// Returns the updated record, or `None` (history untouched) when no
    /// record matches.
    ///
    /// # Errors
    ///
    /// [`PatchError::InvalidRecord`] when the merged object no longer
    /// parses; the history is left unchanged in that case.
    pub fn apply_patch(
        &mut self,
        order_id: u64,
        patch: &Map<String, Value>,
    ) -> Result<Option<OrderRecord>, PatchError> {
        let Some(index) = self
            .records
            .iter()
            .position(|record| record.order_id == order_id)
        else {
            return Ok(None);
        };

        let current = serde_json::to_value(&self.records[index])
            .map_err(|source| PatchError::InvalidRecord { order_id, source })?;
        // A record always serializes to an object.
        let mut merged = match current {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in patch {
            if key == "orderId" {
                continue;
            }
            merged.insert(key.clone(), value.clone());
        }

        let updated: OrderRecord = serde_json::from_value(Value::Object(merged))
            .map_err(|source| PatchError::InvalidRecord { order_id, source })?;
        self.records[index] = updated.clone();
        Ok(Some(updated))
    }

    /// Remove every record numbered `order_id`.
    ///
    /// Returns the number of records removed.
    pub fn remove(&mut self, order_id: u64) -> usize {
        let before = self.records.len();
        self.records.retain(|record| record.order_id != order_id);
        before - self.records.len()
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Case-insensitive substring search across the customer, payment,
    /// token, and order-number fields. A blank query matches everything.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<OrderRecord> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.records.clone();
        }
        self.records
            .iter()
            .filter(|record| record.matches_query(&needle))
            .cloned()
            .collect()
    }

    /// Inclusive local-calendar-day range filter on the order date.
    ///
    /// Records without a parseable date are excluded; with neither bound
    /// given the full history is returned.
    #[must_use]
    pub fn filter_by_date(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Vec<OrderRecord> {
        if from.is_none() && to.is_none() {
            return self.records.clone();
        }
        self.records
            .iter()
            .filter(|record| {
                record.order_date.is_some_and(|date| {
                    let day = date.local_day();
                    from.map_or(true, |f| day >= f) && to.map_or(true, |t| day <= t)
                })
            })
            .cloned()
            .collect()
    }

    /// Aggregate stats; `today` is the local calendar day to count
    /// today's orders against. An empty history yields all zeros.
    #[must_use]
    pub fn stats(&self, today: NaiveDate) -> OrderStats {
        let total_orders = self.records.len() as u64;
        let total_revenue: Money = self
            .records
            .iter()
            .filter_map(|record| record.total_amount)
            .sum();
        let rating_sum: Decimal = self
            .records
            .iter()
            .filter_map(|record| record.rating)
            .sum();
        let avg_rating = if total_orders == 0 {
            Decimal::ZERO
        } else {
            rating_sum / Decimal::from(total_orders)
        };
        let today_orders = self
            .records
            .iter()
            .filter(|record| {
                record
                    .order_date
                    .is_some_and(|date| date.local_day() == today)
            })
            .count() as u64;

        OrderStats {
            total_orders,
            total_revenue,
            avg_order_value: total_revenue.div_count(total_orders),
            avg_rating,
            today_orders,
        }
    }
}
