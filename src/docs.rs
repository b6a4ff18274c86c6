// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_dashboard,
        handlers::export::export_sales,

        // --- Products ---
        handlers::products::list_products,
        handlers::products::list_low_stock,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,

        // --- Sales ---
        handlers::sales::list_sales,
        handlers::sales::create_sale,
    ),
    components(
        schemas(
            // --- Catálogo ---
            models::catalog::ProductCategory,
            models::catalog::Product,
            models::catalog::ProductListing,
            models::catalog::CreateProductPayload,
            models::catalog::UpdateProductPayload,

            // --- Vendas ---
            models::sales::Sale,
            models::sales::SaleRecord,
            models::sales::CreateSalePayload,

            // --- Dashboard ---
            models::dashboard::DashboardKpis,
            models::dashboard::CategoryTotal,
            models::dashboard::MonthlyTotal,
            models::dashboard::HourDayPivot,
            models::dashboard::SalesSummary,
            models::dashboard::RenderedCharts,
            models::dashboard::NoDataReport,
            models::dashboard::ReadyReport,
        )
    ),
    tags(
        (name = "Dashboard", description = "Indicadores, gráficos e exportação"),
        (name = "Export", description = "Relatório CSV de vendas"),
        (name = "Products", description = "Catálogo e alertas de reposição"),
        (name = "Sales", description = "Registro e consulta de vendas")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/dashboard",
            "/export",
            "/api/products",
            "/api/products/low-stock",
            "/api/products/{id}",
            "/api/sales",
        ] {
            assert!(doc.paths.paths.contains_key(path), "faltou {}", path);
        }
    }
}
