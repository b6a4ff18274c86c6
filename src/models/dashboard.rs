// src/models/dashboard.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::models::catalog::{Product, ProductCategory};

pub const NO_CATEGORY: &str = "N/A";

// Colunas do heatmap, sempre nesta ordem
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

pub const HOURS_PER_DAY: usize = 24;

// 1. Indicadores (os cards do topo)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    pub total_revenue: Decimal,
    pub total_items_sold: i64,
    pub sales_count: usize,
    pub top_category: String, // "N/A" quando não há vendas
}

// 2. Receita por categoria (gráfico de barras)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: ProductCategory,
    pub revenue: Decimal,
}

// 3. Receita por mês (gráfico de linha). O mês é identificado pelo último dia dele.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    pub month_end: NaiveDate,
    pub revenue: Decimal,
}

// 4. Quantidade de vendas por hora (linhas 0..23) e dia da semana (colunas Monday..Sunday)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HourDayPivot {
    #[schema(value_type = Vec<String>)]
    pub days: [&'static str; 7],
    #[schema(value_type = Vec<Vec<u32>>)]
    pub counts: [[u32; 7]; HOURS_PER_DAY],
}

impl Default for HourDayPivot {
    fn default() -> Self {
        Self {
            days: WEEKDAYS,
            counts: [[0; 7]; HOURS_PER_DAY],
        }
    }
}

impl HourDayPivot {
    pub fn record(&mut self, hour: u32, weekday_from_monday: u32) {
        if let Some(cell) = self
            .counts
            .get_mut(hour as usize)
            .and_then(|row| row.get_mut(weekday_from_monday as usize))
        {
            *cell += 1;
        }
    }

    pub fn get(&self, hour: usize, day: usize) -> u32 {
        self.counts[hour][day]
    }

    #[cfg(test)]
    pub fn total(&self) -> u64 {
        self.counts.iter().flatten().map(|&c| u64::from(c)).sum()
    }

    pub fn max(&self) -> u32 {
        self.counts.iter().flatten().copied().max().unwrap_or(0)
    }
}

// Tudo que o agregador calcula a partir das vendas
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub kpis: DashboardKpis,
    pub category_totals: Vec<CategoryTotal>,
    pub monthly_totals: Vec<MonthlyTotal>,
    pub hour_day_pivot: HourDayPivot,
}

// PNGs em base64, prontos para <img src="data:image/png;base64,...">
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderedCharts {
    pub category_revenue: String,
    pub monthly_trend: String,
    pub hour_day_heatmap: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoDataReport {
    pub low_stock: Vec<Product>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReadyReport {
    pub summary: SalesSummary,
    pub low_stock: Vec<Product>,
    pub charts: RenderedCharts,
}

// Sem vendas não é erro: o dashboard mostra o estado "sem dados" e nenhum gráfico é gerado.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum DashboardReport {
    NoData(NoDataReport),
    Ready(ReadyReport),
}

impl DashboardReport {
    pub fn low_stock(&self) -> &[Product] {
        match self {
            DashboardReport::NoData(report) => &report.low_stock,
            DashboardReport::Ready(report) => &report.low_stock,
        }
    }
}
