// src/handlers/sales.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::sales::{CreateSalePayload, Sale, SaleRecord},
};

// GET /api/sales
#[utoipa::path(
    get,
    path = "/api/sales",
    tag = "Sales",
    responses(
        (status = 200, description = "Vendas com nome e categoria do produto", body = Vec<SaleRecord>)
    )
)]
pub async fn list_sales(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let sales = app_state.sales_service.list_sales().await?;
    Ok((StatusCode::OK, Json(sales)))
}

// POST /api/sales
#[utoipa::path(
    post,
    path = "/api/sales",
    tag = "Sales",
    request_body = CreateSalePayload,
    responses(
        (status = 201, description = "Venda registrada com a receita calculada pelo preço atual", body = Sale),
        (status = 400, description = "Dados inválidos"),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn create_sale(
    State(app_state): State<AppState>,
    Json(payload): Json<CreateSalePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let Some(product_id) = payload.product_id else {
        // O validate() acima já garante; mantido sem unwrap
        let mut errors = validator::ValidationErrors::new();
        errors.add("productId", validator::ValidationError::new("required"));
        return Err(AppError::ValidationError(errors));
    };

    let sale = app_state
        .sales_service
        .record_sale(&app_state.db_pool, product_id, payload.quantity_sold, payload.sale_date)
        .await?;

    Ok((StatusCode::CREATED, Json(sale)))
}
