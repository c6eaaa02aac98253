//! services/sheets_service.rs
//! Acceso a la planilla: backend intercambiable + reintentos por cuota.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::models::sheet_model::{CellUpdate, SheetTable};
use crate::services::retry::RetryPolicy;

/// Operaciones crudas sobre la planilla remota (Google Sheets o memoria).
#[async_trait]
pub trait SheetsBackend: Send + Sync {
    /// Todas las filas de la hoja, cabecero incluido.
    async fn read_values(&self, sheet: &str) -> Result<Vec<Vec<String>>, GatewayError>;

    /// Escribe varias celdas en una sola llamada.
    async fn update_cells(&self, sheet: &str, updates: &[CellUpdate]) -> Result<(), GatewayError>;

    /// Agrega filas al final de la hoja.
    async fn append_rows(&self, sheet: &str, rows: &[Vec<String>]) -> Result<(), GatewayError>;
}

#[derive(Clone)]
pub struct SheetsGateway {
    backend: Arc<dyn SheetsBackend>,
    retry: RetryPolicy,
}

impl SheetsGateway {
    pub fn new(backend: Arc<dyn SheetsBackend>, retry: RetryPolicy) -> Self {
        SheetsGateway { backend, retry }
    }

    pub async fn read_values(&self, sheet: &str) -> Result<Vec<Vec<String>>, GatewayError> {
        self.retry
            .run(
                "read_values",
                || self.backend.read_values(sheet),
                GatewayError::is_rate_limited,
            )
            .await
            .map_err(|e| self.exhausted(e))
    }

    /// Lee la hoja como tabla con cabecero (nombres recortados, vacíos descartados).
    pub async fn read_table(&self, sheet: &str) -> Result<SheetTable, GatewayError> {
        let values = self.read_values(sheet).await?;
        log::debug!("(read_table) {}: {} fila(s) leídas", sheet, values.len());
        Ok(SheetTable::from_values(sheet, values))
    }

    pub async fn write_cells(&self, sheet: &str, updates: &[CellUpdate]) -> Result<(), GatewayError> {
        if updates.is_empty() {
            return Ok(());
        }
        self.retry
            .run(
                "write_cells",
                || self.backend.update_cells(sheet, updates),
                GatewayError::is_rate_limited,
            )
            .await
            .map_err(|e| self.exhausted(e))
    }

    pub async fn append_rows(&self, sheet: &str, rows: &[Vec<String>]) -> Result<(), GatewayError> {
        if rows.is_empty() {
            return Ok(());
        }
        self.retry
            .run(
                "append_rows",
                || self.backend.append_rows(sheet, rows),
                GatewayError::is_rate_limited,
            )
            .await
            .map_err(|e| self.exhausted(e))
    }

    /// Un error de cuota que sale de `run` ya agotó todos los intentos.
    fn exhausted(&self, err: GatewayError) -> GatewayError {
        match err {
            GatewayError::RateLimited { message, .. } => GatewayError::RateLimited {
                attempts: self.retry.max_attempts.max(1),
                message,
            },
            other => other,
        }
    }
}
