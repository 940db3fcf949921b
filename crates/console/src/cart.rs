//! Cart store: the cashier cart, persisted on every change.

use rust_decimal::Decimal;

use counterdesk_core::ProductId;
use counterdesk_products::Product;
use counterdesk_sales::{Cart, CartLineItem};

use crate::storage::{KeyValueStore, PersistentStorage, keys};

/// Write-through wrapper around [`Cart`].
///
/// Each mutator that changes the cart re-serialises the whole cart under the
/// `cart` key before returning; no-ops write nothing.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: PersistentStorage<S>,
    cart: Cart,
}

impl<S: KeyValueStore> CartStore<S> {
    /// Initialise from the persisted cart (empty if missing or corrupt).
    pub fn restore(backend: S) -> Self {
        let storage = PersistentStorage::new(backend);
        let cart: Cart = storage.get_or_default(keys::CART);
        if !cart.is_empty() {
            tracing::debug!(lines = cart.len(), items = cart.total_items(), "restored cart");
        }
        Self { storage, cart }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn lines(&self) -> &[CartLineItem] {
        self.cart.lines()
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.cart.get(product_id)
    }

    pub fn add_to_cart(&mut self, product: &Product, quantity: u32) -> bool {
        let changed = self.cart.add(product, quantity);
        if changed {
            tracing::debug!(product_id = %product.id, quantity, "added to cart");
        }
        self.persist_if(changed)
    }

    pub fn remove_from_cart(&mut self, product_id: &ProductId) -> Option<CartLineItem> {
        let removed = self.cart.remove(product_id);
        self.persist_if(removed.is_some());
        removed
    }

    pub fn increment(&mut self, product_id: &ProductId) -> bool {
        let changed = self.cart.increment(product_id);
        self.persist_if(changed)
    }

    pub fn decrement(&mut self, product_id: &ProductId) -> bool {
        let changed = self.cart.decrement(product_id);
        self.persist_if(changed)
    }

    pub fn clear_cart(&mut self) -> bool {
        let changed = self.cart.clear();
        self.persist_if(changed)
    }

    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    pub fn total_items(&self) -> u64 {
        self.cart.total_items()
    }

    fn persist_if(&self, changed: bool) -> bool {
        if changed {
            self.storage.set(keys::CART, &self.cart);
        }
        changed
    }
}
