use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use counterdesk_core::{Entity, ProductId, SaleId, Timestamp};

/// One product line of a checkout request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLine {
    pub product_id: ProductId,
    pub qty_sold: u32,
}

/// Checkout request submitted to the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub product_sales: Vec<SaleLine>,
}

/// Product details embedded in a sale report line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoldProduct {
    pub id: ProductId,
    pub product_name: String,
    pub stock_qty: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub selling_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub profit_per_item: Decimal,
}

/// A product line of a recorded sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSale {
    pub qty_sold: u32,
    pub products: SoldProduct,
    #[serde(with = "rust_decimal::serde::float")]
    pub revenue: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub profit: Decimal,
}

/// A recorded sale, as listed by the sale report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    pub sale_date: Timestamp,
    pub product_sales: Vec<ProductSale>,
}

impl Sale {
    pub fn revenue(&self) -> Decimal {
        self.product_sales.iter().map(|line| line.revenue).sum()
    }

    pub fn profit(&self) -> Decimal {
        self.product_sales.iter().map(|line| line.profit).sum()
    }

    pub fn units_sold(&self) -> u64 {
        self.product_sales
            .iter()
            .map(|line| u64::from(line.qty_sold))
            .sum()
    }
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
