// src/models/catalog.rs

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// --- Categorias ---
// Conjunto fechado. Para adicionar uma nova categoria é preciso migrar o enum no banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "product_category")]
pub enum ProductCategory {
    Electronics,
    Clothing,
    Home,
    Books,
    Toys,
}

impl ProductCategory {
    #[cfg(test)]
    pub const ALL: [ProductCategory; 5] = [
        ProductCategory::Electronics,
        ProductCategory::Clothing,
        ProductCategory::Home,
        ProductCategory::Books,
        ProductCategory::Toys,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCategory::Electronics => "Electronics",
            ProductCategory::Clothing => "Clothing",
            ProductCategory::Home => "Home",
            ProductCategory::Books => "Books",
            ProductCategory::Toys => "Toys",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Produto ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: ProductCategory,
    pub current_stock_level: i32,
    pub reorder_point: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Estoque abaixo do ponto de pedido. Igualdade não conta como estoque baixo.
    pub fn needs_reorder(&self) -> bool {
        self.current_stock_level < self.reorder_point
    }
}

// Produto com o alerta de reposição já calculado (listagem da API)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductListing {
    #[serde(flatten)]
    pub product: Product,
    pub needs_reorder: bool,
}

impl From<Product> for ProductListing {
    fn from(product: Product) -> Self {
        let needs_reorder = product.needs_reorder();
        Self { product, needs_reorder }
    }
}

pub fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn default_reorder_point() -> i32 {
    10
}

// Dados para cadastrar um produto
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(length(min = 1, max = 100, message = "O nome deve ter entre 1 e 100 caracteres."))]
    pub name: String,

    pub category: ProductCategory,

    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    #[serde(default)]
    pub current_stock_level: i32,

    #[validate(range(min = 0, message = "O ponto de pedido não pode ser negativo."))]
    #[serde(default = "default_reorder_point")]
    pub reorder_point: i32,

    #[validate(custom(function = "validate_not_negative"))]
    pub price: Decimal,
}

// Atualização parcial. Mudar o preço não altera a receita das vendas já gravadas.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(length(min = 1, max = 100, message = "O nome deve ter entre 1 e 100 caracteres."))]
    pub name: Option<String>,

    pub category: Option<ProductCategory>,

    #[validate(range(min = 0, message = "O estoque não pode ser negativo."))]
    pub current_stock_level: Option<i32>,

    #[validate(range(min = 0, message = "O ponto de pedido não pode ser negativo."))]
    pub reorder_point: Option<i32>,

    pub price: Option<Decimal>,
}

impl UpdateProductPayload {
    // O validator não cobre Option<Decimal>; checamos o preço à parte.
    pub fn validate_price(&self) -> Result<(), ValidationError> {
        match &self.price {
            Some(price) => validate_not_negative(price),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    fn product(stock: i32, reorder: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: "Lamp".to_string(),
            category: ProductCategory::Home,
            current_stock_level: stock,
            reorder_point: reorder,
            price: Decimal::from_str("19.90").unwrap(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn reorder_is_strictly_below_the_threshold() {
        assert!(product(4, 5).needs_reorder());
        assert!(!product(5, 5).needs_reorder());
        assert!(!product(6, 5).needs_reorder());
        assert!(!product(0, 0).needs_reorder());
    }

    #[test]
    fn listing_carries_the_flag() {
        let listing = ProductListing::from(product(1, 10));
        assert!(listing.needs_reorder);

        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["needsReorder"], true);
        assert_eq!(json["currentStockLevel"], 1);
        assert_eq!(json["category"], "Home");
    }

    #[test]
    fn create_payload_rejects_negative_values() {
        let payload: CreateProductPayload = serde_json::from_value(serde_json::json!({
            "name": "Drone",
            "category": "Toys",
            "currentStockLevel": -1,
            "price": -5,
        }))
        .unwrap();

        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("current_stock_level"));
        assert!(fields.contains_key("price"));
    }

    #[test]
    fn create_payload_defaults_reorder_point() {
        let payload: CreateProductPayload = serde_json::from_value(serde_json::json!({
            "name": "Novel",
            "category": "Books",
            "price": 12.5,
        }))
        .unwrap();

        assert!(payload.validate().is_ok());
        assert_eq!(payload.reorder_point, 10);
        assert_eq!(payload.current_stock_level, 0);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let parsed = serde_json::from_value::<CreateProductPayload>(serde_json::json!({
            "name": "Sofa",
            "category": "Furniture",
            "price": 100,
        }));
        assert!(parsed.is_err());
    }

    #[test]
    fn update_payload_validates_only_present_fields() {
        let empty = UpdateProductPayload::default();
        assert!(empty.validate().is_ok());

        assert!(empty.validate_price().is_ok());

        let bad = UpdateProductPayload {
            price: Some(Decimal::from_str("-0.01").unwrap()),
            ..Default::default()
        };
        assert!(bad.validate().is_ok());
        assert!(bad.validate_price().is_err());

        let short = UpdateProductPayload {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(short.validate().is_err());
    }
}
