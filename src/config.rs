// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use minijinja::Environment;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{ProductRepository, SalesRepository},
    services::{
        chart_service::{ChartService, ChartStyle},
        export_service::ExportService,
        product_service::ProductService,
        report_service::ReportService,
        sales_service::SalesService,
    },
};

pub const DASHBOARD_TEMPLATE: &str = "dashboard.html";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_address: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Separado do ambiente real para poder testar sem mexer em variáveis globais
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let bind_address = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:3000".to_string());

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(v) => v.parse().context("DB_MAX_CONNECTIONS deve ser um número inteiro")?,
            None => 5,
        };
        let acquire_secs: u64 = match lookup("DB_ACQUIRE_TIMEOUT_SECS") {
            Some(v) => v.parse().context("DB_ACQUIRE_TIMEOUT_SECS deve ser um número inteiro")?,
            None => 3,
        };

        Ok(Self {
            database_url,
            bind_address,
            db_max_connections,
            db_acquire_timeout: Duration::from_secs(acquire_secs),
        })
    }
}

pub fn build_templates() -> anyhow::Result<Environment<'static>> {
    let mut env = Environment::new();
    env.add_template(DASHBOARD_TEMPLATE, include_str!("../templates/dashboard.html"))?;
    Ok(env)
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub product_service: ProductService,
    pub sales_service: SalesService,
    pub report_service: ReportService,
    pub export_service: ExportService,
    pub templates: Arc<Environment<'static>>,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::from_pool(db_pool, ChartService::new(ChartStyle::default()))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, charts: ChartService) -> anyhow::Result<Self> {
        let product_repo = ProductRepository::new(db_pool.clone());
        let sales_repo = SalesRepository::new(db_pool.clone());

        let product_service = ProductService::new(product_repo.clone());
        let sales_service = SalesService::new(sales_repo.clone(), product_repo.clone());
        let report_service = ReportService::new(sales_repo, product_repo, charts);
        let export_service = ExportService::new(sales_service.clone());

        Ok(Self {
            db_pool,
            product_service,
            sales_service,
            report_service,
            export_service,
            templates: Arc::new(build_templates()?),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_the_url_is_set() {
        let config = Config::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/retail")])).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.db_acquire_timeout, Duration::from_secs(3));
    }

    #[test]
    fn missing_database_url_is_an_error() {
        assert!(Config::from_lookup(lookup_from(&[])).is_err());
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let result = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/retail"),
            ("DB_MAX_CONNECTIONS", "many"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db/retail"),
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("DB_ACQUIRE_TIMEOUT_SECS", "1"),
        ]))
        .unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.db_max_connections, 12);
        assert_eq!(config.db_acquire_timeout, Duration::from_secs(1));
    }

    #[test]
    fn dashboard_template_compiles() {
        let env = build_templates().unwrap();
        assert!(env.get_template(DASHBOARD_TEMPLATE).is_ok());
    }
}
