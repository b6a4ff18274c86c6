// src/handlers/export.rs

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};

use crate::{
    common::error::AppError,
    config::AppState,
    services::export_service::EXPORT_FILE_NAME,
};

// GET /export
#[utoipa::path(
    get,
    path = "/export",
    tag = "Export",
    responses(
        (status = 200, description = "Todas as vendas em CSV (só o cabeçalho quando não há vendas)", body = String, content_type = "text/csv"),
        (status = 503, description = "Banco de dados indisponível")
    )
)]
pub async fn export_sales(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let csv = app_state.export_service.export_sales_csv().await?;

    let disposition = format!("attachment; filename=\"{}\"", EXPORT_FILE_NAME);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    ))
}
