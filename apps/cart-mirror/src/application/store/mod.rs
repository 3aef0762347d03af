//! Shared Store Façade
//!
//! [`SharedStore`] is the surface collaborating UIs call: cart CRUD with
//! observer notifications, the single active-order slot, and the order
//! history. It owns no storage of its own — reads and writes go through
//! the [`KeyValueStore`] port, and changes made by other contexts arrive
//! through the [`ChangeNotifier`] port and trigger a re-read plus a
//! re-broadcast to local observers.

mod errors;
mod orders;
mod settings;

pub use errors::StoreError;
pub use settings::StoreSettings;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::application::ports::{ChangeNotifier, KeyValueStore};
use crate::domain::cart::{Cart, CartItem};
use crate::domain::shared::{ItemId, Money, Timestamp};

/// Callback invoked with a fresh cart snapshot after every change,
/// local or cross-context.
pub type CartObserver = Box<dyn Fn(&[CartItem]) + Send + Sync>;

type ObserverList = Arc<Mutex<Vec<Arc<dyn Fn(&[CartItem]) + Send + Sync>>>>;

/// Façade over one origin's shared cart and order state.
///
/// Construct one per context (per simulated tab). Instances sharing a
/// backend see each other's writes; instances sharing a notifier hear
/// about them.
pub struct SharedStore {
    kv: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn ChangeNotifier>,
    settings: StoreSettings,
    observers: ObserverList,
    external_wired: AtomicBool,
}

impl SharedStore {
    /// Create a store over the given backend and notifier with the
    /// default key names.
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>, notifier: Arc<dyn ChangeNotifier>) -> Self {
        Self::with_settings(kv, notifier, StoreSettings::default())
    }

    /// Create a store with explicit key settings.
    #[must_use]
    pub fn with_settings(
        kv: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn ChangeNotifier>,
        settings: StoreSettings,
    ) -> Self {
        Self {
            kv,
            notifier,
            settings,
            observers: Arc::new(Mutex::new(Vec::new())),
            external_wired: AtomicBool::new(false),
        }
    }

    /// The key settings this store reads and writes under.
    #[must_use]
    pub fn settings(&self) -> &StoreSettings {
        &self.settings
    }

    /// Register an optional observer, hook up cross-context resync, and
    /// return the current cart snapshot.
    ///
    /// Safe to call more than once; the external subscription is made
    /// only on the first call for this store instance.
    pub fn init(&self, observer: Option<CartObserver>) -> Vec<CartItem> {
        if let Some(observer) = observer {
            self.on_cart_change(observer);
        }
        self.wire_external();
        self.cart()
    }

    fn wire_external(&self) {
        if self.external_wired.swap(true, Ordering::SeqCst) {
            return;
        }
        let kv = Arc::clone(&self.kv);
        let observers = Arc::clone(&self.observers);
        let cart_key = self.settings.cart_key.clone();
        self.notifier.subscribe(
            &self.settings.cart_key,
            Arc::new(move |key: &str| {
                debug!(key, "external cart change, resyncing");
                let items: Vec<CartItem> = read_json_lenient(kv.as_ref(), &cart_key);
                notify_observers(&observers, &items);
            }),
        );
    }

    /// Register an additional cart observer. Observers are invoked in
    /// registration order and are not de-duplicated.
    pub fn on_cart_change(&self, observer: CartObserver) {
        self.observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::from(observer));
    }

    // =========================================================================
    // Cart operations
    // =========================================================================

    /// Current cart. Absent or corrupt storage reads as empty (logged).
    #[must_use]
    pub fn cart(&self) -> Vec<CartItem> {
        read_json_lenient(self.kv.as_ref(), &self.settings.cart_key)
    }

    /// Strict variant of [`cart`](Self::cart).
    ///
    /// # Errors
    ///
    /// Returns error when the backend fails or the stored value is
    /// corrupt, instead of substituting the empty cart.
    pub fn try_cart(&self) -> Result<Vec<CartItem>, StoreError> {
        read_json(self.kv.as_ref(), &self.settings.cart_key).map(Option::unwrap_or_default)
    }

    /// Persist `items` as the new cart and notify observers with the new
    /// snapshot. Observers run only after the write succeeded.
    pub fn save_cart(&self, items: Vec<CartItem>) -> Result<Vec<CartItem>, StoreError> {
        write_json(self.kv.as_ref(), &self.settings.cart_key, &items)?;
        notify_observers(&self.observers, &items);
        Ok(items)
    }

    /// Append `item`, assigning a millisecond-timestamp id and a
    /// quantity of 1 when the caller omitted them. Returns the new cart.
    pub fn add_item(&self, item: CartItem) -> Result<Vec<CartItem>, StoreError> {
        let mut cart = Cart::from_items(self.cart());
        cart.add(item, Timestamp::now().unix_millis());
        self.save_cart(cart.into_items())
    }

    /// Remove the line at `index`. Out of range is a no-op that returns
    /// the unchanged cart without persisting or notifying.
    pub fn remove_item(&self, index: usize) -> Result<Vec<CartItem>, StoreError> {
        let mut cart = Cart::from_items(self.cart());
        if cart.remove_at(index) {
            self.save_cart(cart.into_items())
        } else {
            Ok(cart.into_items())
        }
    }

    /// Remove every line whose id exactly equals `id`; no cross-type
    /// coercion. Returns the filtered cart.
    pub fn remove_by_id(&self, id: &ItemId) -> Result<Vec<CartItem>, StoreError> {
        let mut cart = Cart::from_items(self.cart());
        cart.remove_by_id(id);
        self.save_cart(cart.into_items())
    }

    /// Replace the cart with the empty list.
    pub fn clear_cart(&self) -> Result<Vec<CartItem>, StoreError> {
        self.save_cart(Vec::new())
    }

    /// Σ price × quantity. Lines with an absent or unparsable price
    /// contribute zero.
    #[must_use]
    pub fn total(&self) -> Money {
        Cart::from_items(self.cart()).total()
    }

    /// Σ quantity, an absent quantity counting as 1.
    #[must_use]
    pub fn count(&self) -> u64 {
        Cart::from_items(self.cart()).count()
    }
}

fn notify_observers(observers: &ObserverList, items: &[CartItem]) {
    let snapshot: Vec<_> = observers
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .cloned()
        .collect();
    if snapshot.is_empty() {
        return;
    }
    debug!(observer_count = snapshot.len(), "notifying cart observers");
    for observer in snapshot {
        // A misbehaving observer must not block the rest.
        if panic::catch_unwind(AssertUnwindSafe(|| observer(items))).is_err() {
            warn!("cart observer panicked; continuing with remaining observers");
        }
    }
}

pub(super) fn read_json<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = kv.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })
}

pub(super) fn read_json_lenient<T: DeserializeOwned + Default>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> T {
    match read_json(kv, key) {
        Ok(Some(value)) => value,
        Ok(None) => T::default(),
        Err(error) => {
            warn!(key, %error, "unreadable stored value, substituting default");
            T::default()
        }
    }
}

pub(super) fn write_json<T: Serialize>(
    kv: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    kv.set(key, &raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rust_decimal_macros::dec;
    use serde_json::json;

    use crate::application::ports::KeyListener;
    use crate::infrastructure::persistence::MemoryBackend;

    use super::*;

    /// Notifier test double: records subscriptions and can replay an
    /// external change on demand.
    #[derive(Default)]
    struct ManualNotifier {
        subscriptions: Mutex<Vec<(String, KeyListener)>>,
    }

    impl ManualNotifier {
        fn fire(&self, key: &str) {
            let listeners: Vec<KeyListener> = self
                .subscriptions
                .lock()
                .unwrap()
                .iter()
                .filter(|(k, _)| k == key)
                .map(|(_, l)| Arc::clone(l))
                .collect();
            for listener in listeners {
                listener(key);
            }
        }

        fn subscription_count(&self) -> usize {
            self.subscriptions.lock().unwrap().len()
        }
    }

    impl ChangeNotifier for ManualNotifier {
        fn subscribe(&self, key: &str, listener: KeyListener) {
            self.subscriptions
                .lock()
                .unwrap()
                .push((key.to_string(), listener));
        }
    }

    struct Fixture {
        backend: Arc<MemoryBackend>,
        notifier: Arc<ManualNotifier>,
        store: SharedStore,
    }

    fn fixture() -> Fixture {
        let backend = Arc::new(MemoryBackend::new());
        let notifier = Arc::new(ManualNotifier::default());
        let store = SharedStore::new(
            Arc::clone(&backend) as Arc<dyn KeyValueStore>,
            Arc::clone(&notifier) as Arc<dyn ChangeNotifier>,
        );
        Fixture {
            backend,
            notifier,
            store,
        }
    }

    fn observed() -> (Arc<Mutex<Vec<Vec<CartItem>>>>, CartObserver) {
        let seen: Arc<Mutex<Vec<Vec<CartItem>>>> = Arc::default();
        let sink = Arc::clone(&seen);
        let observer: CartObserver = Box::new(move |items| {
            sink.lock().unwrap().push(items.to_vec());
        });
        (seen, observer)
    }

    #[test]
    fn init_returns_current_snapshot() {
        let f = fixture();
        f.store
            .save_cart(vec![CartItem {
                id: Some(ItemId::Int(1)),
                ..CartItem::default()
            }])
            .unwrap();

        let snapshot = f.store.init(None);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn init_subscribes_externally_only_once() {
        let f = fixture();
        f.store.init(None);
        f.store.init(None);
        assert_eq!(f.notifier.subscription_count(), 1);
    }

    #[test]
    fn save_cart_notifies_with_new_snapshot() {
        let f = fixture();
        let (seen, observer) = observed();
        f.store.init(Some(observer));

        f.store
            .save_cart(vec![CartItem::default(), CartItem::default()])
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].len(), 2);
    }

    #[test]
    fn add_item_assigns_defaults_and_persists() {
        let f = fixture();
        let cart = f
            .store
            .add_item(CartItem {
                name: Some("Espresso".to_string()),
                price: Some(Money::new(dec!(3.50))),
                ..CartItem::default()
            })
            .unwrap();

        assert!(cart[0].id.is_some());
        assert_eq!(cart[0].qty, Some(1));
        assert_eq!(f.store.cart().len(), 1);
    }

    #[test]
    fn remove_item_out_of_range_does_not_notify() {
        let f = fixture();
        f.store.add_item(CartItem::default()).unwrap();

        let (seen, observer) = observed();
        f.store.on_cart_change(observer);

        let cart = f.store.remove_item(9).unwrap();
        assert_eq!(cart.len(), 1);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn remove_by_id_is_exact_match() {
        let f = fixture();
        f.store
            .add_item(CartItem {
                id: Some(ItemId::Int(1)),
                ..CartItem::default()
            })
            .unwrap();
        f.store
            .add_item(CartItem {
                id: Some(ItemId::from("1")),
                ..CartItem::default()
            })
            .unwrap();

        let cart = f.store.remove_by_id(&ItemId::Int(1)).unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].id, Some(ItemId::from("1")));
    }

    #[test]
    fn corrupt_cart_reads_as_empty_leniently() {
        let f = fixture();
        f.backend.set(&f.store.settings().cart_key, "not json").unwrap();

        assert!(f.store.cart().is_empty());
        assert!(matches!(
            f.store.try_cart(),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn total_and_count_from_persisted_cart() {
        let f = fixture();
        let items: Vec<CartItem> = serde_json::from_value(json!([
            {"id": 1, "price": "10.50", "qty": 2},
            {"id": 2, "price": "3", "qty": 1}
        ]))
        .unwrap();
        f.store.save_cart(items).unwrap();

        assert_eq!(f.store.total(), Money::new(dec!(24.00)));
        assert_eq!(f.store.count(), 3);
    }

    #[test]
    fn external_change_resyncs_and_notifies() {
        let f = fixture();
        let (seen, observer) = observed();
        f.store.init(Some(observer));

        // Another context rewrites the cart key behind this store's back.
        f.backend
            .set(&f.store.settings().cart_key, r#"[{"id": 5}]"#)
            .unwrap();
        f.notifier.fire(&f.store.settings().cart_key);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0][0].id, Some(ItemId::Int(5)));
    }

    #[test]
    fn panicking_observer_does_not_block_the_rest() {
        let f = fixture();
        f.store.on_cart_change(Box::new(|_| panic!("bad observer")));
        let (seen, observer) = observed();
        f.store.on_cart_change(observer);

        let result = f.store.clear_cart();

        assert!(result.is_ok());
        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn failed_write_returns_error_and_skips_observers() {
        let backend = Arc::new(MemoryBackend::with_quota(4));
        let notifier = Arc::new(ManualNotifier::default());
        let store = SharedStore::new(backend, notifier);

        let (seen, observer) = observed();
        store.on_cart_change(observer);

        let result = store.add_item(CartItem {
            name: Some("a name long enough to bust the quota".to_string()),
            ..CartItem::default()
        });

        assert!(result.is_err());
        assert!(seen.lock().unwrap().is_empty());
    }
}
