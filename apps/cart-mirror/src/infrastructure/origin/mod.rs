//! Simulated Shared Origin
//!
//! [`OriginHub`] plays the platform's role: one origin-scoped store
//! shared by several contexts (tabs), plus a change event delivered to
//! every context *except* the writer. Open one [`OriginContext`] per
//! simulated tab; each handle implements both the storage and the
//! notification port, so it plugs straight into a store façade.
//!
//! Delivery is synchronous and in subscription order. There is no merge
//! or versioning — concurrent writers race and the last write wins.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;
use uuid::Uuid;

use crate::application::ports::{ChangeNotifier, KeyListener, KeyValueStore, StorageError};

/// Identity of one execution context (one simulated tab).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(Uuid);

impl ContextId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct Subscription {
    context: ContextId,
    key: String,
    listener: KeyListener,
}

/// One shared origin: a storage backend plus cross-context change
/// fan-out.
pub struct OriginHub {
    backend: Arc<dyn KeyValueStore>,
    subscriptions: RwLock<Vec<Subscription>>,
}

impl OriginHub {
    /// Create a hub over `backend`.
    #[must_use]
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Arc<Self> {
        Arc::new(Self {
            backend,
            subscriptions: RwLock::new(Vec::new()),
        })
    }

    /// Open a new context (tab) on this origin.
    #[must_use]
    pub fn context(self: &Arc<Self>) -> OriginContext {
        OriginContext {
            id: ContextId::generate(),
            hub: Arc::clone(self),
        }
    }

    /// Number of registered subscriptions, for diagnostics.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn announce(&self, writer: ContextId, key: &str) {
        let listeners: Vec<KeyListener> = {
            let subscriptions = self
                .subscriptions
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            subscriptions
                .iter()
                .filter(|sub| sub.context != writer && sub.key == key)
                .map(|sub| Arc::clone(&sub.listener))
                .collect()
        };
        if listeners.is_empty() {
            return;
        }
        debug!(%writer, key, listener_count = listeners.len(), "fanning out storage change");
        for listener in listeners {
            listener(key);
        }
    }
}

/// A storage handle scoped to one context.
///
/// Reads and writes go to the shared backend; successful writes announce
/// the changed key to every *other* context; subscriptions hear the other
/// contexts' writes.
#[derive(Clone)]
pub struct OriginContext {
    id: ContextId,
    hub: Arc<OriginHub>,
}

impl OriginContext {
    /// This context's identity.
    #[must_use]
    pub const fn id(&self) -> ContextId {
        self.id
    }
}

impl KeyValueStore for OriginContext {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.hub.backend.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.hub.backend.set(key, value)?;
        self.hub.announce(self.id, key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.hub.backend.remove(key)?;
        self.hub.announce(self.id, key);
        Ok(())
    }
}

impl ChangeNotifier for OriginContext {
    fn subscribe(&self, key: &str, listener: KeyListener) {
        self.hub
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Subscription {
                context: self.id,
                key: key.to_string(),
                listener,
            });
    }
}
