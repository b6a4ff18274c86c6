// src/services/product_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProductRepository,
    models::catalog::{CreateProductPayload, Product, ProductListing, UpdateProductPayload},
};

#[derive(Clone)]
pub struct ProductService {
    repo: ProductRepository,
}

impl ProductService {
    pub fn new(repo: ProductRepository) -> Self {
        Self { repo }
    }

    pub async fn list_products(&self) -> Result<Vec<ProductListing>, AppError> {
        let products = self.repo.list_products(self.repo.pool()).await?;
        Ok(products.into_iter().map(ProductListing::from).collect())
    }

    pub async fn low_stock_products(&self) -> Result<Vec<Product>, AppError> {
        self.repo.list_low_stock(self.repo.pool()).await
    }

    pub async fn create_product(&self, payload: &CreateProductPayload) -> Result<Product, AppError> {
        let product = self.repo.create_product(self.repo.pool(), payload).await?;
        tracing::info!("📦 Produto cadastrado: {} ({})", product.name, product.id);
        Ok(product)
    }

    pub async fn update_product(
        &self,
        id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<Product, AppError> {
        self.repo
            .update_product(self.repo.pool(), id, payload)
            .await?
            .ok_or(AppError::ProductNotFound(id))
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        if !self.repo.delete_product(self.repo.pool(), id).await? {
            return Err(AppError::ProductNotFound(id));
        }
        tracing::info!("🗑️ Produto removido (e suas vendas): {}", id);
        Ok(())
    }
}
