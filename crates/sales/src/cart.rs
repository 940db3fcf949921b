//! Cashier cart state machine.
//!
//! # Invariants
//! - At most one line per product id.
//! - Every line has `quantity >= 1`; bringing a line to zero removes it.
//! - Lines keep insertion order.
//!
//! Operating on a product id that is not in the cart is a no-op, never an
//! error. Mutators report whether they changed anything so callers can decide
//! whether to persist.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use counterdesk_core::{DomainError, Entity, ProductId, position_of};
use counterdesk_products::Product;

use crate::sale::{NewSale, SaleLine};

/// A product snapshot plus the quantity being bought.
///
/// Serialises as the product record with an extra `quantity` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    #[serde(flatten)]
    product: Product,
    quantity: u32,
}

impl CartLineItem {
    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `selling_price × quantity`.
    pub fn subtotal(&self) -> Decimal {
        self.product
            .selling_price
            .saturating_mul(Decimal::from(self.quantity))
    }

    /// `profit_per_item × quantity`.
    pub fn profit(&self) -> Decimal {
        self.product
            .profit_per_item
            .saturating_mul(Decimal::from(self.quantity))
    }
}

impl Entity for CartLineItem {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.product.id
    }
}

/// Ordered collection of cart lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "Vec<CartLineItem>")]
pub struct Cart {
    lines: Vec<CartLineItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of `product`.
    ///
    /// An existing line for the same id is bumped (its snapshot is kept as
    /// first added); otherwise a new line is appended. Stock is not checked
    /// here. A zero quantity changes nothing.
    pub fn add(&mut self, product: &Product, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        match self.position(&product.id) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                let before = line.quantity;
                line.quantity = before.saturating_add(quantity);
                line.quantity != before
            }
            None => {
                self.lines.push(CartLineItem {
                    product: product.clone(),
                    quantity,
                });
                true
            }
        }
    }

    /// Drop the line for `product_id`, returning it if it was present.
    pub fn remove(&mut self, product_id: &ProductId) -> Option<CartLineItem> {
        let idx = self.position(product_id)?;
        Some(self.lines.remove(idx))
    }

    pub fn increment(&mut self, product_id: &ProductId) -> bool {
        let Some(idx) = self.position(product_id) else {
            return false;
        };
        let line = &mut self.lines[idx];
        match line.quantity.checked_add(1) {
            Some(next) => {
                line.quantity = next;
                true
            }
            None => false,
        }
    }

    /// Take one unit off; the last unit removes the line.
    pub fn decrement(&mut self, product_id: &ProductId) -> bool {
        let Some(idx) = self.position(product_id) else {
            return false;
        };
        if self.lines[idx].quantity <= 1 {
            self.lines.remove(idx);
        } else {
            self.lines[idx].quantity -= 1;
        }
        true
    }

    pub fn clear(&mut self) -> bool {
        let changed = !self.lines.is_empty();
        self.lines.clear();
        changed
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.position(product_id).map(|idx| &self.lines[idx])
    }

    pub fn lines(&self) -> &[CartLineItem] {
        &self.lines
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartLineItem> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of `selling_price × quantity` over all lines.
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .fold(Decimal::ZERO, |sum, line| sum.saturating_add(line.subtotal()))
    }

    /// Sum of quantities over all lines.
    pub fn total_items(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of `profit_per_item × quantity` over all lines.
    pub fn total_profit(&self) -> Decimal {
        self.lines
            .iter()
            .fold(Decimal::ZERO, |sum, line| sum.saturating_add(line.profit()))
    }

    /// Lines asking for more units than the snapshot's recorded stock.
    pub fn lines_over_stock(&self) -> impl Iterator<Item = &CartLineItem> {
        self.lines
            .iter()
            .filter(|line| line.product.exceeds_stock(line.quantity))
    }

    /// The sale payload for checking this cart out, in line order.
    ///
    /// Returns `None` for an empty cart.
    pub fn to_sale(&self) -> Option<NewSale> {
        if self.lines.is_empty() {
            return None;
        }
        Some(NewSale {
            product_sales: self
                .lines
                .iter()
                .map(|line| SaleLine {
                    product_id: line.product_id().clone(),
                    qty_sold: line.quantity,
                })
                .collect(),
        })
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        position_of(&self.lines, product_id)
    }
}

impl Serialize for Cart {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.lines.serialize(serializer)
    }
}

impl TryFrom<Vec<CartLineItem>> for Cart {
    type Error = DomainError;

    /// Rebuild a cart from stored lines, rejecting any that break the invariants.
    fn try_from(lines: Vec<CartLineItem>) -> Result<Self, Self::Error> {
        {
            let mut seen = std::collections::HashSet::with_capacity(lines.len());
            for line in &lines {
                if line.quantity == 0 {
                    return Err(DomainError::invariant(format!(
                        "cart line for product {} has zero quantity",
                        line.product_id()
                    )));
                }
                if !seen.insert(line.product_id()) {
                    return Err(DomainError::invariant(format!(
                        "duplicate cart line for product {}",
                        line.product_id()
                    )));
                }
            }
        }
        Ok(Self { lines })
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counterdesk_core::AuditInfo;
    use std::collections::HashSet;

    fn product(id: &str, price_cents: i64, stock: i64) -> Product {
        Product {
            id: id.parse().unwrap(),
            product_name: format!("item {id}"),
            stock_qty: stock,
            selling_price: Decimal::new(price_cents, 2),
            profit_per_item: Decimal::new(price_cents / 4, 2),
            audit: AuditInfo::default(),
        }
    }

    fn pid(id: &str) -> ProductId {
        id.parse().unwrap()
    }

    #[test]
    fn adding_same_product_twice_bumps_one_line() {
        let mut cart = Cart::new();
        let milk = product("milk", 249, 10);

        assert!(cart.add(&milk, 1));
        assert!(cart.add(&milk, 2));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(&pid("milk")).unwrap().quantity(), 3);
        assert_eq!(cart.total(), Decimal::new(747, 2));
        assert_eq!(cart.total_items(), 3);
    }

    #[test]
    fn add_keeps_first_snapshot() {
        let mut cart = Cart::new();
        let milk = product("milk", 249, 10);
        cart.add(&milk, 1);

        let repriced = product("milk", 299, 10);
        cart.add(&repriced, 1);

        let line = cart.get(&pid("milk")).unwrap();
        assert_eq!(line.product().selling_price, Decimal::new(249, 2));
        assert_eq!(line.quantity(), 2);
    }

    #[test]
    fn zero_quantity_add_is_a_no_op() {
        let mut cart = Cart::new();
        assert!(!cart.add(&product("milk", 249, 10), 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn decrement_at_one_removes_line() {
        let mut cart = Cart::new();
        cart.add(&product("bread", 350, 5), 1);
        cart.add(&product("eggs", 420, 5), 2);

        assert!(cart.decrement(&pid("bread")));
        assert!(cart.get(&pid("bread")).is_none());

        assert!(cart.decrement(&pid("eggs")));
        assert_eq!(cart.get(&pid("eggs")).unwrap().quantity(), 1);
    }

    #[test]
    fn missing_ids_are_no_ops() {
        let mut cart = Cart::new();
        cart.add(&product("bread", 350, 5), 1);
        let before = cart.clone();

        assert!(!cart.increment(&pid("ghost")));
        assert!(!cart.decrement(&pid("ghost")));
        assert!(cart.remove(&pid("ghost")).is_none());
        assert_eq!(cart, before);
    }

    #[test]
    fn increment_saturates_at_max() {
        let mut cart = Cart::new();
        cart.add(&product("bread", 350, 5), u32::MAX);
        assert!(!cart.increment(&pid("bread")));
        assert!(!cart.add(&product("bread", 350, 5), 7));
        assert_eq!(cart.total_items(), u64::from(u32::MAX));
    }

    #[test]
    fn clear_resets_totals() {
        let mut cart = Cart::new();
        cart.add(&product("bread", 350, 5), 2);
        assert!(cart.clear());
        assert!(!cart.clear());
        assert_eq!(cart.total(), Decimal::ZERO);
        assert_eq!(cart.total_items(), 0);
    }

    #[test]
    fn remove_keeps_order_of_remaining_lines() {
        let mut cart = Cart::new();
        for id in ["a", "b", "c"] {
            cart.add(&product(id, 100, 5), 1);
        }
        let removed = cart.remove(&pid("b")).unwrap();
        assert_eq!(removed.product_id(), &pid("b"));

        let order: Vec<&str> = cart.iter().map(|l| l.product_id().as_str()).collect();
        assert_eq!(order, vec!["a", "c"]);
    }

    #[test]
    fn lines_over_stock_are_reported_not_rejected() {
        let mut cart = Cart::new();
        cart.add(&product("scarce", 100, 1), 3);
        cart.add(&product("plenty", 100, 50), 3);

        let over: Vec<&str> = cart
            .lines_over_stock()
            .map(|l| l.product_id().as_str())
            .collect();
        assert_eq!(over, vec!["scarce"]);
    }

    #[test]
    fn checkout_payload_follows_line_order() {
        let mut cart = Cart::new();
        assert!(cart.to_sale().is_none());

        cart.add(&product("b", 100, 5), 2);
        cart.add(&product("a", 100, 5), 1);

        let sale = cart.to_sale().unwrap();
        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "productSales": [
                    { "productId": "b", "qtySold": 2 },
                    { "productId": "a", "qtySold": 1 }
                ]
            })
        );
    }

    #[test]
    fn stored_line_shape_is_product_plus_quantity() {
        let mut cart = Cart::new();
        cart.add(&product("milk", 249, 10), 2);

        let json = serde_json::to_value(&cart).unwrap();
        let line = &json[0];
        assert_eq!(line["id"], "milk");
        assert_eq!(line["productName"], "item milk");
        assert_eq!(line["quantity"], 2);
        assert!(line["sellingPrice"].is_number());
    }

    #[test]
    fn stored_cart_with_broken_invariants_is_rejected() {
        let mut cart = Cart::new();
        cart.add(&product("milk", 249, 10), 1);
        let mut json = serde_json::to_value(&cart).unwrap();

        json[0]["quantity"] = serde_json::json!(0);
        assert!(serde_json::from_value::<Cart>(json.clone()).is_err());

        json[0]["quantity"] = serde_json::json!(1);
        let line = json[0].clone();
        json.as_array_mut().unwrap().push(line);
        assert!(serde_json::from_value::<Cart>(json).is_err());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Add(usize, u32),
            Remove(usize),
            Increment(usize),
            Decrement(usize),
            Clear,
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => (0usize..5, 0u32..4).prop_map(|(p, q)| Op::Add(p, q)),
                1 => (0usize..5).prop_map(Op::Remove),
                2 => (0usize..5).prop_map(Op::Increment),
                3 => (0usize..5).prop_map(Op::Decrement),
                1 => Just(Op::Clear),
            ]
        }

        fn catalog() -> Vec<Product> {
            (0..5i64)
                .map(|i| product(&format!("p{i}"), 99 + i * 150, 10))
                .collect()
        }

        fn apply(cart: &mut Cart, catalog: &[Product], op: &Op) {
            match op {
                Op::Add(p, q) => {
                    cart.add(&catalog[*p], *q);
                }
                Op::Remove(p) => {
                    cart.remove(&catalog[*p].id);
                }
                Op::Increment(p) => {
                    cart.increment(&catalog[*p].id);
                }
                Op::Decrement(p) => {
                    cart.decrement(&catalog[*p].id);
                }
                Op::Clear => {
                    cart.clear();
                }
            }
        }

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 512,
                ..ProptestConfig::default()
            })]

            /// Property: no duplicate ids and no non-positive quantities, and the
            /// derived totals match their formulas, after every mutation.
            #[test]
            fn invariants_hold_after_every_mutation(ops in prop::collection::vec(op(), 0..60)) {
                let catalog = catalog();
                let mut cart = Cart::new();

                for op in &ops {
                    apply(&mut cart, &catalog, op);

                    let mut ids = HashSet::new();
                    for line in cart.iter() {
                        prop_assert!(line.quantity() >= 1);
                        prop_assert!(ids.insert(line.product_id().clone()));
                    }

                    let expected_total = cart
                        .iter()
                        .map(|l| l.product().selling_price * Decimal::from(l.quantity()))
                        .sum::<Decimal>();
                    let expected_items: u64 = cart.iter().map(|l| u64::from(l.quantity())).sum();
                    prop_assert_eq!(cart.total(), expected_total);
                    prop_assert_eq!(cart.total_items(), expected_items);
                }
            }

            /// Property: serialising and reloading reproduces the same lines in the same order.
            #[test]
            fn stored_cart_reloads_identically(ops in prop::collection::vec(op(), 0..40)) {
                let catalog = catalog();
                let mut cart = Cart::new();
                for op in &ops {
                    apply(&mut cart, &catalog, op);
                }

                let stored = serde_json::to_string(&cart).unwrap();
                let reloaded: Cart = serde_json::from_str(&stored).unwrap();
                prop_assert_eq!(reloaded, cart);
            }
        }
    }
}
