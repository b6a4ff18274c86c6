// src/handlers/dashboard.rs

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse},
    Json,
};
use serde::Serialize;

use crate::{
    common::{
        error::AppError,
        format::{format_count, format_money},
    },
    config::{AppState, DASHBOARD_TEMPLATE},
    models::{
        catalog::Product,
        dashboard::{DashboardKpis, DashboardReport, RenderedCharts},
    },
};

// Valores já formatados para o template
#[derive(Debug, Serialize)]
pub struct KpiView {
    pub total_revenue: String,
    pub total_items_sold: String,
    pub sales_count: String,
    pub top_category: String,
}

impl From<&DashboardKpis> for KpiView {
    fn from(kpis: &DashboardKpis) -> Self {
        Self {
            total_revenue: format_money(kpis.total_revenue),
            total_items_sold: format_count(kpis.total_items_sold),
            sales_count: format_count(kpis.sales_count as i64),
            top_category: kpis.top_category.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LowStockView {
    pub name: String,
    pub category: String,
    pub current_stock_level: String,
    pub reorder_point: String,
}

impl From<&Product> for LowStockView {
    fn from(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            category: product.category.to_string(),
            current_stock_level: format_count(i64::from(product.current_stock_level)),
            reorder_point: format_count(i64::from(product.reorder_point)),
        }
    }
}

// Nomes em snake_case, os mesmos que o template usa
#[derive(Debug, Serialize)]
pub struct ChartsView<'a> {
    pub category_revenue: &'a str,
    pub monthly_trend: &'a str,
    pub hour_day_heatmap: &'a str,
}

impl<'a> From<&'a RenderedCharts> for ChartsView<'a> {
    fn from(charts: &'a RenderedCharts) -> Self {
        Self {
            category_revenue: &charts.category_revenue,
            monthly_trend: &charts.monthly_trend,
            hour_day_heatmap: &charts.hour_day_heatmap,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardView<'a> {
    pub no_data: bool,
    pub kpis: Option<KpiView>,
    pub charts: Option<ChartsView<'a>>,
    pub low_stock: Vec<LowStockView>,
}

impl<'a> From<&'a DashboardReport> for DashboardView<'a> {
    fn from(report: &'a DashboardReport) -> Self {
        let low_stock = report.low_stock().iter().map(LowStockView::from).collect();
        match report {
            DashboardReport::NoData(_) => Self {
                no_data: true,
                kpis: None,
                charts: None,
                low_stock,
            },
            DashboardReport::Ready(ready) => Self {
                no_data: false,
                kpis: Some(KpiView::from(&ready.summary.kpis)),
                charts: Some(ChartsView::from(&ready.charts)),
                low_stock,
            },
        }
    }
}

pub fn render_dashboard(
    templates: &minijinja::Environment<'static>,
    report: &DashboardReport,
) -> Result<String, AppError> {
    let template = templates.get_template(DASHBOARD_TEMPLATE)?;
    let html = template.render(DashboardView::from(report))?;
    Ok(html)
}

// GET /
pub async fn dashboard_page(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let report = app_state.report_service.build_dashboard().await?;
    let html = render_dashboard(&app_state.templates, &report)?;
    Ok(Html(html))
}

// GET /api/dashboard
#[utoipa::path(
    get,
    path = "/api/dashboard",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Indicadores, tabelas e gráficos (PNG base64), ou status 'noData' quando não há vendas"),
        (status = 503, description = "Banco de dados indisponível")
    )
)]
pub async fn get_dashboard(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let report = app_state.report_service.build_dashboard().await?;
    Ok((StatusCode::OK, Json(report)))
}
