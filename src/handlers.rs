// src/handlers.rs

pub mod dashboard;
pub mod export;
pub mod products;
pub mod sales;
