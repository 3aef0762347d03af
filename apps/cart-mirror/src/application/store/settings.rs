//! Store key configuration.

/// Storage key names for the store's three persisted slots.
///
/// Every UI on one origin must agree on these; the prefix constructor
/// covers the usual `<site>_cart` naming convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Key holding the serialized cart list.
    pub cart_key: String,
    /// Key holding the single active-order record.
    pub active_order_key: String,
    /// Key holding the order-history list.
    pub order_history_key: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            cart_key: "cart".to_string(),
            active_order_key: "active_order".to_string(),
            order_history_key: "orders".to_string(),
        }
    }
}

impl StoreSettings {
    /// Settings with every key namespaced under `prefix`.
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            cart_key: format!("{prefix}_cart"),
            active_order_key: format!("{prefix}_active_order"),
            order_history_key: format!("{prefix}_orders"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_distinct() {
        let settings = StoreSettings::default();
        assert_ne!(settings.cart_key, settings.order_history_key);
        assert_ne!(settings.cart_key, settings.active_order_key);
    }

    #[test]
    fn prefix_namespaces_every_key() {
        let settings = StoreSettings::with_prefix("gourmetverse");
        assert_eq!(settings.cart_key, "gourmetverse_cart");
        assert_eq!(settings.active_order_key, "gourmetverse_active_order");
        assert_eq!(settings.order_history_key, "gourmetverse_orders");
    }
}
