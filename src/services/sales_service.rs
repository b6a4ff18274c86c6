// src/services/sales_service.rs

use chrono::{DateTime, Utc};
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{ProductRepository, SalesRepository},
    models::sales::{NewSale, Sale, SaleRecord},
};

#[derive(Clone)]
pub struct SalesService {
    sales_repo: SalesRepository,
    product_repo: ProductRepository,
}

impl SalesService {
    pub fn new(sales_repo: SalesRepository, product_repo: ProductRepository) -> Self {
        Self { sales_repo, product_repo }
    }

    /// Registra uma venda com a receita calculada pelo preço atual do produto.
    /// O produto fica travado (FOR UPDATE) até a venda ser gravada.
    pub async fn record_sale<'e, E>(
        &self,
        executor: E,
        product_id: Uuid,
        quantity_sold: i32,
        sale_date: Option<DateTime<Utc>>,
    ) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let product = self
            .product_repo
            .find_by_id_for_update(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ProductNotFound(product_id))?;

        let new_sale = NewSale::priced_from(&product, quantity_sold, sale_date.unwrap_or_else(Utc::now));
        let sale = self.sales_repo.insert_sale(&mut *tx, &new_sale).await?;

        tx.commit().await?;

        tracing::info!(
            "🧾 Venda registrada: {} x {} = {}",
            quantity_sold,
            product.name,
            sale.total_revenue
        );
        Ok(sale)
    }

    // Vendas com produto, em ordem cronológica
    pub async fn list_sales(&self) -> Result<Vec<SaleRecord>, AppError> {
        self.sales_repo
            .list_with_product(self.sales_repo.pool())
            .await?
            .into_iter()
            .map(SaleRecord::try_from)
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        models::catalog::{CreateProductPayload, Product, ProductCategory, UpdateProductPayload},
        services::product_service::ProductService,
    };
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use sqlx::PgPool;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn services(pool: &PgPool) -> (SalesService, ProductService) {
        let product_repo = ProductRepository::new(pool.clone());
        (
            SalesService::new(SalesRepository::new(pool.clone()), product_repo.clone()),
            ProductService::new(product_repo),
        )
    }

    async fn product(products: &ProductService, price: &str) -> Product {
        products
            .create_product(&CreateProductPayload {
                name: "Board Game".to_string(),
                category: ProductCategory::Toys,
                current_stock_level: 20,
                reorder_point: 5,
                price: dec(price),
            })
            .await
            .unwrap()
    }

    #[sqlx::test]
    async fn two_sales_of_three_at_ten_total_sixty(pool: PgPool) {
        let (sales, products) = services(&pool);
        let item = product(&products, "10.00").await;

        let first = sales.record_sale(&pool, item.id, 3, None).await.unwrap();
        let second = sales.record_sale(&pool, item.id, 3, None).await.unwrap();
        assert_eq!(first.total_revenue, dec("30.00"));
        assert_eq!(second.total_revenue, dec("30.00"));

        let records = sales.list_sales().await.unwrap();
        let revenue: Decimal = records.iter().map(|r| r.total_revenue).sum();
        let items: i32 = records.iter().map(|r| r.quantity_sold).sum();
        assert_eq!(revenue, dec("60.00"));
        assert_eq!(items, 6);
        assert!(records.iter().all(|r| r.product_name == "Board Game"));
    }

    #[sqlx::test]
    async fn price_change_keeps_recorded_revenue(pool: PgPool) {
        let (sales, products) = services(&pool);
        let item = product(&products, "10.00").await;
        sales.record_sale(&pool, item.id, 3, None).await.unwrap();

        let changes = UpdateProductPayload {
            price: Some(dec("99.00")),
            ..Default::default()
        };
        products.update_product(item.id, &changes).await.unwrap();

        let later = sales.record_sale(&pool, item.id, 1, None).await.unwrap();
        assert_eq!(later.total_revenue, dec("99.00"));

        let records = sales.list_sales().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].total_revenue, dec("30.00"));
    }

    #[sqlx::test]
    async fn explicit_sale_date_is_kept(pool: PgPool) {
        let (sales, products) = services(&pool);
        let item = product(&products, "5.00").await;
        let when = Utc.with_ymd_and_hms(2023, 11, 24, 20, 0, 0).unwrap();

        let sale = sales.record_sale(&pool, item.id, 2, Some(when)).await.unwrap();
        assert_eq!(sale.sale_date, when);
    }

    #[sqlx::test]
    async fn unknown_product_is_not_found(pool: PgPool) {
        let (sales, _) = services(&pool);
        let missing = Uuid::new_v4();

        match sales.record_sale(&pool, missing, 1, None).await {
            Err(AppError::ProductNotFound(id)) => assert_eq!(id, missing),
            other => panic!("esperava ProductNotFound, veio {:?}", other),
        }
        assert!(sales.list_sales().await.unwrap().is_empty());
    }
}
