//! Sales: the cashier cart and the sale records it turns into.
//!
//! This crate contains the cart state machine and sale payloads, implemented
//! purely as deterministic logic (no IO, no HTTP, no storage).

pub mod cart;
pub mod sale;

pub use cart::{Cart, CartLineItem};
pub use sale::{NewSale, ProductSale, Sale, SaleLine, SoldProduct};
