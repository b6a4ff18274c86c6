// src/db/product_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;
use crate::{
    common::error::AppError,
    models::catalog::{CreateProductPayload, Product, UpdateProductPayload},
};

// Repositório de produtos: todas as interações com a tabela 'products'
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn list_products<'e, E>(&self, executor: E) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>("SELECT * FROM products ORDER BY name ASC, id ASC")
            .fetch_all(executor)
            .await?;
        Ok(products)
    }

    /// Produtos com estoque abaixo do ponto de pedido, calculado direto no banco.
    /// Ordenado por id para a saída ser estável.
    pub async fn list_low_stock<'e, E>(&self, executor: E) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE current_stock_level < reorder_point
            ORDER BY id ASC
            "#,
        )
            .fetch_all(executor)
            .await?;
        Ok(products)
    }

    // Trava a linha: o preço lido aqui é o que vai para a venda
    pub async fn find_by_id_for_update<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        payload: &CreateProductPayload,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, category, current_stock_level, reorder_point, price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
            .bind(&payload.name)
            .bind(payload.category)
            .bind(payload.current_stock_level)
            .bind(payload.reorder_point)
            .bind(payload.price)
            .fetch_one(executor)
            .await?;
        Ok(product)
    }

    /// Atualização parcial: campos ausentes mantêm o valor atual (COALESCE).
    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<Option<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                name = COALESCE($2, name),
                category = COALESCE($3, category),
                current_stock_level = COALESCE($4, current_stock_level),
                reorder_point = COALESCE($5, reorder_point),
                price = COALESCE($6, price)
            WHERE id = $1
            RETURNING *
            "#,
        )
            .bind(id)
            .bind(payload.name.as_deref())
            .bind(payload.category)
            .bind(payload.current_stock_level)
            .bind(payload.reorder_point)
            .bind(payload.price)
            .fetch_optional(executor)
            .await?;
        Ok(product)
    }

    // As vendas do produto vão junto (ON DELETE CASCADE)
    pub async fn delete_product<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
