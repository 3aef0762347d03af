//! Order operations on the shared store.
//!
//! Two independent persisted shapes: the single active-order slot and the
//! numbered history list. Neither feeds the cart observer channel — only
//! cart changes broadcast.

use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::warn;

use crate::domain::orders::{ActiveOrder, OrderDraft, OrderHistory, OrderReceipt, OrderRecord, OrderStats};
use crate::domain::shared::Timestamp;

use super::{SharedStore, StoreError, read_json, read_json_lenient, write_json};

impl SharedStore {
    // =========================================================================
    // Active order slot
    // =========================================================================

    /// Persist `order` as the active order, replacing any previous one.
    pub fn save_active_order(&self, order: &ActiveOrder) -> Result<(), StoreError> {
        write_json(self.kv.as_ref(), &self.settings.active_order_key, order)
    }

    /// The active order. Absent or corrupt storage reads as `None`
    /// (logged).
    #[must_use]
    pub fn active_order(&self) -> Option<ActiveOrder> {
        match self.try_active_order() {
            Ok(order) => order,
            Err(error) => {
                warn!(key = %self.settings.active_order_key, %error,
                    "unreadable active order, substituting none");
                None
            }
        }
    }

    /// Strict variant of [`active_order`](Self::active_order).
    ///
    /// # Errors
    ///
    /// Returns error when the backend fails or the stored record is
    /// corrupt.
    pub fn try_active_order(&self) -> Result<Option<ActiveOrder>, StoreError> {
        read_json(self.kv.as_ref(), &self.settings.active_order_key)
    }

    /// Drop the active-order key entirely.
    pub fn clear_active_order(&self) -> Result<(), StoreError> {
        self.kv.remove(&self.settings.active_order_key)?;
        Ok(())
    }

    /// True while an active order exists and has not reached a terminal
    /// status.
    #[must_use]
    pub fn has_active_order(&self) -> bool {
        self.active_order().is_some_and(|order| order.is_open())
    }

    // =========================================================================
    // Order history
    // =========================================================================

    /// The order history, oldest first. Absent or corrupt storage reads
    /// as empty (logged).
    #[must_use]
    pub fn order_history(&self) -> Vec<OrderRecord> {
        read_json_lenient(self.kv.as_ref(), &self.settings.order_history_key)
    }

    /// Strict variant of [`order_history`](Self::order_history).
    ///
    /// # Errors
    ///
    /// Returns error when the backend fails or the stored list is
    /// corrupt.
    pub fn try_order_history(&self) -> Result<Vec<OrderRecord>, StoreError> {
        read_json(self.kv.as_ref(), &self.settings.order_history_key)
            .map(Option::unwrap_or_default)
    }

    /// Append `draft` to the history, assigning the next order number and
    /// the current timestamp. Returns what was assigned.
    pub fn add_to_order_history(&self, draft: OrderDraft) -> Result<OrderReceipt, StoreError> {
        let mut history = OrderHistory::from_records(self.order_history());
        let receipt = history.append(draft, Timestamp::now());
        self.write_history(&history)?;
        Ok(receipt)
    }

    /// Shallow-merge `patch` onto the order numbered `order_id` and
    /// persist. Returns the updated record, or `None` (store unchanged)
    /// when no order matches. The order number itself is not patchable.
    pub fn update_order(
        &self,
        order_id: u64,
        patch: &Map<String, Value>,
    ) -> Result<Option<OrderRecord>, StoreError> {
        let mut history = OrderHistory::from_records(self.order_history());
        let Some(updated) = history.apply_patch(order_id, patch)? else {
            return Ok(None);
        };
        self.write_history(&history)?;
        Ok(Some(updated))
    }

    /// Replace the history with the empty list.
    pub fn clear_order_history(&self) -> Result<(), StoreError> {
        self.write_history(&OrderHistory::new())
    }

    /// Remove every order numbered `order_id` and persist.
    pub fn delete_from_history(&self, order_id: u64) -> Result<(), StoreError> {
        let mut history = OrderHistory::from_records(self.order_history());
        history.remove(order_id);
        self.write_history(&history)
    }

    /// Case-insensitive substring search across the customer, payment,
    /// token, and order-number fields. A blank query returns the full
    /// history.
    #[must_use]
    pub fn search_orders(&self, query: &str) -> Vec<OrderRecord> {
        OrderHistory::from_records(self.order_history()).search(query)
    }

    /// Inclusive local-calendar-day range filter on the order date. With
    /// neither bound given the full history is returned.
    #[must_use]
    pub fn filter_orders_by_date(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Vec<OrderRecord> {
        OrderHistory::from_records(self.order_history()).filter_by_date(from, to)
    }

    /// Aggregates over the whole history; today's count uses the local
    /// calendar day.
    #[must_use]
    pub fn order_stats(&self) -> OrderStats {
        OrderHistory::from_records(self.order_history()).stats(Timestamp::now().local_day())
    }

    fn write_history(&self, history: &OrderHistory) -> Result<(), StoreError> {
        write_json(
            self.kv.as_ref(),
            &self.settings.order_history_key,
            &history.records(),
        )
    }
}
