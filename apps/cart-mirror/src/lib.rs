// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Cart Mirror - Rust Core Library
//!
//! Shared cart and order-history store for the Storefront UIs.
//!
//! Several execution contexts (browser tabs, embedded webviews, test
//! harnesses) share one origin-scoped key-value store. This crate mirrors
//! a cart and an order history through that store and broadcasts change
//! notifications: local writes notify the writer's observers directly,
//! and a cross-context change event triggers a re-read and re-broadcast
//! everywhere else. Last write wins; there is no merging.
//!
//! # Architecture
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Cart and order logic with no I/O
//!   - `cart`: the cart aggregate and its item records
//!   - `orders`: the numbered history, the active-order slot, search and
//!     stats
//!   - `shared`: money, timestamps, item ids, lenient serde adapters
//!
//! - **Application**: Ports and the façade
//!   - `ports`: `KeyValueStore` (storage) and `ChangeNotifier`
//!     (cross-context change events)
//!   - `store`: the `SharedStore` façade UIs call
//!
//! - **Infrastructure**: Adapters (implementations)
//!   - `persistence`: in-memory and JSON-file backends
//!   - `origin`: the `OriginHub`, simulating one origin shared by many
//!     contexts with writer-excluded event fan-out
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use cart_mirror::{CartItem, MemoryBackend, OriginHub, SharedStore};
//!
//! let hub = OriginHub::new(Arc::new(MemoryBackend::new()));
//!
//! // One store per tab; both handles see the same origin.
//! let menu_ctx = Arc::new(hub.context());
//! let menu = SharedStore::new(menu_ctx.clone(), menu_ctx);
//! let admin_ctx = Arc::new(hub.context());
//! let admin = SharedStore::new(admin_ctx.clone(), admin_ctx);
//!
//! // The admin tab hears about the menu tab's writes.
//! admin.init(Some(Box::new(|items| {
//!     println!("cart now has {} lines", items.len());
//! })));
//!
//! menu.add_item(CartItem {
//!     name: Some("Espresso".into()),
//!     ..CartItem::default()
//! })?;
//! assert_eq!(admin.count(), 1);
//! # Ok::<(), cart_mirror::StoreError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Cart and order logic with no external dependencies.
pub mod domain;

/// Application layer - Port definitions and the store façade.
pub mod application;

/// Infrastructure layer - Adapters and backends.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain re-exports
pub use domain::cart::{Cart, CartItem};
pub use domain::orders::{
    ActiveOrder, OrderDraft, OrderHistory, OrderReceipt, OrderRecord, OrderStats, PatchError,
};
pub use domain::shared::{ItemId, Money, Timestamp};

// Application re-exports
pub use application::ports::{ChangeNotifier, KeyListener, KeyValueStore, StorageError};
pub use application::store::{CartObserver, SharedStore, StoreError, StoreSettings};

// Infrastructure re-exports
pub use infrastructure::origin::{ContextId, OriginContext, OriginHub};
pub use infrastructure::persistence::{FileBackend, MemoryBackend};
