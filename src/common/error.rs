// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Produto não encontrado: {0}")]
    ProductNotFound(Uuid),

    // Banco fora do ar, pool esgotado ou fechado. Não tentamos de novo aqui.
    #[error("Banco de dados indisponível: {0}")]
    StoreUnavailable(sqlx::Error),

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(sqlx::Error),

    // Venda apontando para um produto que não existe mais (falha de integridade)
    #[error("Venda {sale_id} referencia um produto inexistente")]
    OrphanSale { sale_id: Uuid },

    #[error("Falha ao gerar gráfico: {0}")]
    ChartRender(String),

    #[error("Falha ao renderizar template: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Falha ao gerar CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

// Separa "banco inalcançável" dos demais erros do sqlx.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => AppError::StoreUnavailable(err),
            other => AppError::DatabaseError(other),
        }
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::ProductNotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match self {
            // Devolve os detalhes de cada campo inválido.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }
            AppError::ProductNotFound(id) => format!("Produto {} não encontrado.", id),
            AppError::StoreUnavailable(ref e) => {
                tracing::error!("Banco de dados indisponível: {}", e);
                "Banco de dados indisponível no momento.".to_string()
            }
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
