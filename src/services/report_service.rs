// src/services/report_service.rs

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate, Timelike};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::{ProductRepository, SalesRepository},
    models::{
        catalog::{Product, ProductCategory},
        dashboard::{
            CategoryTotal, DashboardKpis, DashboardReport, HourDayPivot, MonthlyTotal, NoDataReport,
            ReadyReport, SalesSummary, NO_CATEGORY,
        },
        sales::SaleRecord,
    },
    services::chart_service::ChartService,
};

/// Último dia do mês da data (balde do gráfico mensal).
pub fn month_end(date: NaiveDate) -> NaiveDate {
    date.with_day(1)
        .and_then(|first| first.checked_add_months(Months::new(1)))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

/// Agregação em uma passada sobre as vendas: KPIs, receita por categoria,
/// receita por mês e o pivot hora x dia da semana (UTC).
///
/// Sem vendas: "N/A" como categoria líder, tabelas vazias e pivot zerado.
pub fn summarize_sales(sales: &[SaleRecord]) -> SalesSummary {
    let mut total_revenue = Decimal::ZERO;
    let mut total_items_sold: i64 = 0;
    // chave = nome da categoria, para a saída sair em ordem alfabética
    let mut by_category: BTreeMap<&'static str, (ProductCategory, Decimal)> = BTreeMap::new();
    let mut by_month: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    let mut pivot = HourDayPivot::default();

    for sale in sales {
        total_revenue += sale.total_revenue;
        total_items_sold += i64::from(sale.quantity_sold);

        by_category
            .entry(sale.category.as_str())
            .or_insert((sale.category, Decimal::ZERO))
            .1 += sale.total_revenue;

        *by_month
            .entry(month_end(sale.sale_date.date_naive()))
            .or_insert(Decimal::ZERO) += sale.total_revenue;

        pivot.record(
            sale.sale_date.hour(),
            sale.sale_date.weekday().num_days_from_monday(),
        );
    }

    let category_totals: Vec<CategoryTotal> = by_category
        .into_values()
        .map(|(category, revenue)| CategoryTotal { category, revenue })
        .collect();

    // Empate: fica a primeira em ordem alfabética
    let top_category = category_totals
        .iter()
        .fold(None, |best: Option<&CategoryTotal>, current| match best {
            Some(b) if b.revenue >= current.revenue => Some(b),
            _ => Some(current),
        })
        .map(|c| c.category.to_string())
        .unwrap_or_else(|| NO_CATEGORY.to_string());

    let monthly_totals = by_month
        .into_iter()
        .map(|(month_end, revenue)| MonthlyTotal { month_end, revenue })
        .collect();

    SalesSummary {
        kpis: DashboardKpis {
            total_revenue,
            total_items_sold,
            sales_count: sales.len(),
            top_category,
        },
        category_totals,
        monthly_totals,
        hour_day_pivot: pivot,
    }
}

#[derive(Clone)]
pub struct ReportService {
    sales_repo: SalesRepository,
    product_repo: ProductRepository,
    charts: ChartService,
}

impl ReportService {
    pub fn new(sales_repo: SalesRepository, product_repo: ProductRepository, charts: ChartService) -> Self {
        Self { sales_repo, product_repo, charts }
    }

    /// Lê vendas e estoque baixo na mesma transação REPEATABLE READ (um único snapshot).
    pub async fn load<'e, E>(&self, executor: E) -> Result<(Vec<SaleRecord>, Vec<Product>), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // As duas leituras enxergam o mesmo snapshot
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let rows = self.sales_repo.list_with_product(&mut *tx).await?;
        let low_stock = self.product_repo.list_low_stock(&mut *tx).await?;

        // Só leitura: o commit só fecha a transação
        tx.commit().await?;

        let sales = rows
            .into_iter()
            .map(SaleRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((sales, low_stock))
    }

    /// Monta o dashboard. Sem vendas devolve `NoData` e nenhum gráfico é gerado.
    pub async fn build_dashboard(&self) -> Result<DashboardReport, AppError> {
        let (sales, low_stock) = self.load(self.sales_repo.pool()).await?;

        if sales.is_empty() {
            tracing::info!("📭 Nenhuma venda registrada; dashboard sem dados");
            return Ok(DashboardReport::NoData(NoDataReport { low_stock }));
        }

        let summary = summarize_sales(&sales);
        let charts = self.charts.render(&summary).await?;

        tracing::info!(
            "📊 Dashboard gerado: {} vendas, {} produtos com estoque baixo",
            summary.kpis.sales_count,
            low_stock.len()
        );

        Ok(DashboardReport::Ready(ReadyReport { summary, low_stock, charts }))
    }
}
