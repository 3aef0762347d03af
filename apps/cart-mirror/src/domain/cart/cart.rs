//! Cart aggregate.

use crate::domain::shared::{ItemId, Money};

use super::item::CartItem;

/// Ordered collection of cart items.
///
/// Insertion order is significant and duplicate ids are allowed; removal
/// is by position or by exact id match. The aggregate owns the defaulting
/// and aggregation rules; persistence lives elsewhere.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from previously persisted items.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// The items, in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Consume the cart, yielding its items.
    #[must_use]
    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    /// Number of lines (not quantities) in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart holds no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item, assigning the defaults a loose record may omit: a
    /// millisecond-timestamp id and a quantity of 1.
    pub fn add(&mut self, mut item: CartItem, now_millis: i64) {
        if item.id.is_none() {
            item.id = Some(ItemId::from_millis(now_millis));
        }
        if item.qty.is_none() {
            item.qty = Some(1);
        }
        self.items.push(item);
    }

    /// Remove the line at `index`. Out of range is a no-op.
    ///
    /// Returns whether a line was removed.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.items.remove(index);
            true
        } else {
            false
        }
    }

    /// Remove every line whose id exactly matches `id`.
    ///
    /// Returns the number of lines removed.
    pub fn remove_by_id(&mut self, id: &ItemId) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.id.as_ref() != Some(id));
        before - self.items.len()
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Σ price × quantity across all lines. Lines with an absent or
    /// unparsable price contribute zero.
    #[must_use]
    pub fn total(&self) -> Money {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Σ quantity across all lines, an absent quantity counting as 1.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.items.iter().map(CartItem::quantity).sum()
    }
}
