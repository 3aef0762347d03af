//! Domain layer - cart and order logic with no I/O.

pub mod cart;
pub mod orders;
pub mod shared;
