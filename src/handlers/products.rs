// src/handlers/products.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::catalog::{CreateProductPayload, Product, ProductListing, UpdateProductPayload},
};

// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses(
        (status = 200, description = "Produtos com o alerta de reposição", body = Vec<ProductListing>)
    )
)]
pub async fn list_products(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = app_state.product_service.list_products().await?;
    Ok((StatusCode::OK, Json(products)))
}

// GET /api/products/low-stock
#[utoipa::path(
    get,
    path = "/api/products/low-stock",
    tag = "Products",
    responses(
        (status = 200, description = "Produtos com estoque abaixo do ponto de pedido", body = Vec<Product>)
    )
)]
pub async fn list_low_stock(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = app_state.product_service.low_stock_products().await?;
    Ok((StatusCode::OK, Json(products)))
}

// POST /api/products
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto cadastrado", body = Product),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let product = app_state.product_service.create_product(&payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

// PATCH /api/products/{id}
#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    tag = "Products",
    request_body = UpdateProductPayload,
    params(
        ("id" = Uuid, Path, description = "ID do Produto")
    ),
    responses(
        (status = 200, description = "Produto atualizado. Vendas já gravadas mantêm a receita gravada.", body = Product),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    payload.validate_price().map_err(|e| {
        // Mesmo formato de resposta das demais validações
        let mut errors = validator::ValidationErrors::new();
        errors.add("price", e);
        AppError::ValidationError(errors)
    })?;

    let product = app_state.product_service.update_product(id, &payload).await?;
    Ok((StatusCode::OK, Json(product)))
}

// DELETE /api/products/{id}
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(
        ("id" = Uuid, Path, description = "ID do Produto")
    ),
    responses(
        (status = 204, description = "Produto removido junto com suas vendas"),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.product_service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
