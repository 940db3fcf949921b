use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use counterdesk_core::{AuditInfo, DomainError, DomainResult, Entity, ProductId};

/// Product snapshot as listed by the remote catalog.
///
/// Prices travel as JSON numbers and are held as exact decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub product_name: String,
    pub stock_qty: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub selling_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub profit_per_item: Decimal,
    #[serde(flatten)]
    pub audit: AuditInfo,
}

impl Product {
    /// Check if the product can be sold (active and in stock).
    pub fn can_be_sold(&self) -> bool {
        self.audit.is_active() && self.stock_qty > 0
    }

    /// Whether selling `quantity` units would go past the recorded stock.
    pub fn exceeds_stock(&self, quantity: u32) -> bool {
        i64::from(quantity) > self.stock_qty
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Payload for adding a product to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub product_name: String,
    pub stock_qty: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub selling_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub profit_per_item: Decimal,
}

impl NewProduct {
    pub fn validate(&self) -> DomainResult<()> {
        validate_fields(
            &self.product_name,
            self.stock_qty,
            self.selling_price,
            self.profit_per_item,
        )
    }
}

/// Payload for editing an existing catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub id: ProductId,
    pub product_name: String,
    pub stock_qty: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub selling_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub profit_per_item: Decimal,
}

impl ProductUpdate {
    /// Start an edit from the current snapshot.
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            product_name: product.product_name.clone(),
            stock_qty: product.stock_qty,
            selling_price: product.selling_price,
            profit_per_item: product.profit_per_item,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        validate_fields(
            &self.product_name,
            self.stock_qty,
            self.selling_price,
            self.profit_per_item,
        )
    }
}

fn validate_fields(
    name: &str,
    stock_qty: i64,
    selling_price: Decimal,
    profit_per_item: Decimal,
) -> DomainResult<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("product name is required"));
    }
    if stock_qty < 0 {
        return Err(DomainError::validation("stock quantity cannot be negative"));
    }
    if selling_price.is_sign_negative() {
        return Err(DomainError::validation("selling price cannot be negative"));
    }
    if profit_per_item > selling_price {
        return Err(DomainError::validation(
            "profit per item cannot exceed the selling price",
        ));
    }
    Ok(())
}
