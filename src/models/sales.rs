// src/models/sales.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    models::catalog::{Product, ProductCategory},
};

/// Receita de uma venda: preço unitário vezes quantidade, com duas casas.
///
/// Calculada uma única vez, na inserção. Alterar o preço do produto depois
/// não muda a receita gravada.
pub fn compute_revenue(price: Decimal, quantity_sold: i32) -> Decimal {
    (price * Decimal::from(quantity_sold)).round_dp(2)
}

// Linha da tabela 'sales'
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity_sold: i32,
    pub sale_date: DateTime<Utc>,
    pub total_revenue: Decimal,
}

// Venda pronta para ser gravada, com a receita já calculada
#[derive(Debug, Clone, PartialEq)]
pub struct NewSale {
    pub product_id: Uuid,
    pub quantity_sold: i32,
    pub sale_date: DateTime<Utc>,
    pub total_revenue: Decimal,
}

impl NewSale {
    pub fn priced_from(product: &Product, quantity_sold: i32, sale_date: DateTime<Utc>) -> Self {
        Self {
            product_id: product.id,
            quantity_sold,
            sale_date,
            total_revenue: compute_revenue(product.price, quantity_sold),
        }
    }
}

// Resultado do LEFT JOIN sales x products. Produto ausente = venda órfã.
#[derive(Debug, Clone, FromRow)]
pub struct SaleRow {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity_sold: i32,
    pub sale_date: DateTime<Utc>,
    pub total_revenue: Decimal,
    pub product_name: Option<String>,
    pub product_category: Option<ProductCategory>,
}

// Venda com o nome e a categoria do produto
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaleRecord {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub category: ProductCategory,
    pub quantity_sold: i32,
    pub sale_date: DateTime<Utc>,
    pub total_revenue: Decimal,
}

impl TryFrom<SaleRow> for SaleRecord {
    type Error = AppError;

    fn try_from(row: SaleRow) -> Result<Self, Self::Error> {
        match (row.product_name, row.product_category) {
            (Some(product_name), Some(category)) => Ok(SaleRecord {
                id: row.id,
                product_id: row.product_id,
                product_name,
                category,
                quantity_sold: row.quantity_sold,
                sale_date: row.sale_date,
                total_revenue: row.total_revenue,
            }),
            _ => Err(AppError::OrphanSale { sale_id: row.id }),
        }
    }
}

// Dados para registrar uma venda
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalePayload {
    #[validate(required(message = "O campo 'productId' é obrigatório."))]
    pub product_id: Option<Uuid>,

    #[validate(range(min = 1, message = "A quantidade vendida deve ser maior que zero."))]
    pub quantity_sold: i32,

    // Se não vier, usa o momento atual
    pub sale_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn row(name: Option<&str>, category: Option<ProductCategory>) -> SaleRow {
        SaleRow {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            quantity_sold: 2,
            sale_date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
            total_revenue: dec("20.00"),
            product_name: name.map(str::to_string),
            product_category: category,
        }
    }

    #[test]
    fn revenue_is_price_times_quantity() {
        assert_eq!(compute_revenue(dec("10.00"), 3), dec("30.00"));
        assert_eq!(compute_revenue(dec("0"), 7), Decimal::ZERO);
        assert_eq!(compute_revenue(dec("19.99"), 1), dec("19.99"));
    }

    #[test]
    fn new_sale_uses_the_price_it_is_given() {
        let mut product = Product {
            id: Uuid::new_v4(),
            name: "Headphones".to_string(),
            category: ProductCategory::Electronics,
            current_stock_level: 10,
            reorder_point: 5,
            price: dec("10.00"),
            created_at: Utc::now(),
        };
        let at = Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap();
        let sale = NewSale::priced_from(&product, 3, at);
        assert_eq!(sale.total_revenue, dec("30.00"));

        // Preço muda depois: a venda já calculada não muda
        product.price = dec("99.00");
        assert_eq!(sale.total_revenue, dec("30.00"));
        assert_eq!(sale.product_id, product.id);
        assert_eq!(sale.sale_date, at);
    }

    #[test]
    fn joined_row_becomes_a_record() {
        let record = SaleRecord::try_from(row(Some("Puzzle"), Some(ProductCategory::Toys))).unwrap();
        assert_eq!(record.product_name, "Puzzle");
        assert_eq!(record.category, ProductCategory::Toys);
        assert_eq!(record.total_revenue, dec("20.00"));
    }

    #[test]
    fn row_without_product_is_an_integrity_fault() {
        let orphan = row(None, None);
        let sale_id = orphan.id;
        match SaleRecord::try_from(orphan) {
            Err(AppError::OrphanSale { sale_id: id }) => assert_eq!(id, sale_id),
            other => panic!("esperava OrphanSale, veio {:?}", other),
        }
    }

    #[test]
    fn sale_payload_requires_positive_quantity() {
        let payload = CreateSalePayload {
            product_id: Some(Uuid::new_v4()),
            quantity_sold: 0,
            sale_date: None,
        };
        assert!(payload.validate().is_err());

        let missing_product = CreateSalePayload {
            product_id: None,
            quantity_sold: 1,
            sale_date: None,
        };
        assert!(missing_product.validate().is_err());
    }
}
