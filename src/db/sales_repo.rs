// src/db/sales_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use crate::{
    common::error::AppError,
    models::sales::{NewSale, Sale, SaleRow},
};

// LEFT JOIN de propósito: uma venda sem produto aparece e vira erro de integridade
const SALES_WITH_PRODUCT: &str = r#"
    SELECT
        s.id,
        s.product_id,
        s.quantity_sold,
        s.sale_date,
        s.total_revenue,
        p.name AS product_name,
        p.category AS product_category
    FROM sales s
    LEFT JOIN products p ON p.id = s.product_id
    ORDER BY s.sale_date ASC, s.id ASC
"#;

#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Todas as vendas com nome e categoria do produto.
    pub async fn list_with_product<'e, E>(&self, executor: E) -> Result<Vec<SaleRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, SaleRow>(SALES_WITH_PRODUCT)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    // A receita chega pronta: o banco só grava
    pub async fn insert_sale<'e, E>(&self, executor: E, sale: &NewSale) -> Result<Sale, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (product_id, quantity_sold, sale_date, total_revenue)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
            .bind(sale.product_id)
            .bind(sale.quantity_sold)
            .bind(sale.sale_date)
            .bind(sale.total_revenue)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                // Produto apagado entre a leitura e a inserção
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::ProductNotFound(sale.product_id);
                    }
                }
                e.into()
            })?;
        Ok(sale)
    }
}
