//! Products catalog types.
//!
//! The catalog is owned by the remote API; this crate holds the product
//! snapshot the console works with and the payloads it submits, with their
//! validation rules (no IO, no HTTP, no storage).

pub mod product;

pub use product::{NewProduct, Product, ProductUpdate};
