//! tests/mod.rs
//! Helpers compartidos por las pruebas.

mod list_tests;
mod reconcile_tests;
mod store_tests;

use std::sync::Arc;

use chrono::NaiveDate;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Pool, Sqlite};

use crate::config::app_config::{AppConfig, AppMode};
use crate::config::sheet_config::SheetLayout;
use crate::models::sheet_model::SheetTable;
use crate::services::memory_sheets::MemorySheetsBackend;
use crate::services::outreach_service::OutreachService;
use crate::services::retry::RetryPolicy;
use crate::services::sheets_service::SheetsGateway;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("fecha válida")
}

pub fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

pub fn table(sheet: &str, rows: &[&[&str]]) -> SheetTable {
    SheetTable::from_values(sheet, rows.iter().map(|r| row(r)).collect())
}

/// Reintentos rápidos para no dormir en las pruebas.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(6, std::time::Duration::from_millis(1))
}

pub fn gateway(backend: &MemorySheetsBackend) -> SheetsGateway {
    SheetsGateway::new(Arc::new(backend.clone()), fast_retry())
}

pub async fn memory_pool() -> Pool<Sqlite> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("pool sqlite en memoria")
}

/// Servicio completo sobre la planilla de demostración.
pub async fn demo_service(mode: AppMode) -> (OutreachService, MemorySheetsBackend, AppConfig) {
    let config = AppConfig::for_tests(mode);
    let backend = MemorySheetsBackend::with_demo_data(&SheetLayout::default()).await;
    let service = crate::app::build_outreach_service(
        &config,
        Arc::new(backend.clone()),
        memory_pool().await,
    )
    .await
    .expect("servicio de prueba");
    (service, backend, config)
}
