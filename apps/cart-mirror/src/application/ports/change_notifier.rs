//! Change-Notification Port (Driven Port)
//!
//! The platform contract mirrored here: a write to the shared store is
//! announced to every context except the writer, carrying the changed key
//! name. Subscribers filter for the keys they own and re-read on arrival.

use std::sync::Arc;

/// Callback invoked with the changed key name.
pub type KeyListener = Arc<dyn Fn(&str) + Send + Sync>;

/// Port for cross-context change notifications.
pub trait ChangeNotifier: Send + Sync {
    /// Register `listener` for changes other contexts make to `key`.
    ///
    /// Subscriptions live as long as the notifier; there is no
    /// unsubscribe, matching the platform event this mirrors.
    fn subscribe(&self, key: &str, listener: KeyListener);
}
