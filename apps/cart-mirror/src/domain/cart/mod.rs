//! Cart Context
//!
//! The cart aggregate and its item records.

pub mod cart;
pub mod item;

pub use cart::Cart;
pub use item::CartItem;
