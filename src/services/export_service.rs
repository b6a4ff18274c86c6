// src/services/export_service.rs

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    common::error::AppError,
    models::{catalog::ProductCategory, sales::SaleRecord},
    services::sales_service::SalesService,
};

pub const EXPORT_FILE_NAME: &str = "sales_report.csv";

// Ordem fixa das colunas do relatório
pub const EXPORT_HEADER: [&str; 5] = [
    "sale_date",
    "product_name",
    "product_category",
    "quantity_sold",
    "total_revenue",
];

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    sale_date: String,
    product_name: &'a str,
    product_category: ProductCategory,
    quantity_sold: i32,
    // Texto com a escala gravada no banco (ex.: "30.00"), nunca float
    #[serde(with = "rust_decimal::serde::str")]
    total_revenue: Decimal,
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Serializa as vendas em CSV. O cabeçalho sai sempre, mesmo sem nenhuma venda.
pub fn write_sales_csv(sales: &[SaleRecord]) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(EXPORT_HEADER)?;
    for sale in sales {
        writer.serialize(ExportRow {
            sale_date: format_timestamp(&sale.sale_date),
            product_name: &sale.product_name,
            product_category: sale.category,
            quantity_sold: sale.quantity_sold,
            total_revenue: sale.total_revenue,
        })?;
    }

    writer
        .into_inner()
        .map_err(|e| AppError::InternalServerError(anyhow::anyhow!("Falha ao finalizar o CSV: {}", e)))
}

#[derive(Clone)]
pub struct ExportService {
    sales_service: SalesService,
}

impl ExportService {
    pub fn new(sales_service: SalesService) -> Self {
        Self { sales_service }
    }

    pub async fn export_sales_csv(&self) -> Result<Vec<u8>, AppError> {
        let sales = self.sales_service.list_sales().await?;
        let bytes = write_sales_csv(&sales)?;
        tracing::info!("📄 Relatório CSV gerado com {} vendas", sales.len());
        Ok(bytes)
    }
}
