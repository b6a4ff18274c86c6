// src/services.rs

pub mod chart_service;
pub mod export_service;
pub mod product_service;
pub mod report_service;
pub mod sales_service;
