//! services/throttle_service.rs
//! Límite "una generación por día" guardado en la hoja de control (CHAVE | VALOR).

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::models::sheet_model::{CellUpdate, SheetTable};
use crate::services::sheets_service::SheetsGateway;
use crate::util::parse_date;

const KEY_COL: usize = 0;
const VALUE_COL: usize = 1;

#[derive(Clone)]
pub struct ThrottleService {
    gateway: SheetsGateway,
    control_sheet: String,
}

impl ThrottleService {
    pub fn new(gateway: SheetsGateway, control_sheet: String) -> Self {
        ThrottleService {
            gateway,
            control_sheet,
        }
    }

    /// Privilegiado -> siempre. Si no, sólo si la fecha guardada no es `today`.
    pub async fn can_generate_today(&self, key: &str, today: NaiveDate, privileged: bool) -> Result<bool> {
        if privileged {
            return Ok(true);
        }
        let last = self.stored_date(key).await?;
        log::info!(
            "(can_generate_today) clave={} última={:?} hoy={}",
            key,
            last,
            today
        );
        Ok(last != Some(today))
    }

    /// Guarda `today` bajo `key`: sobrescribe el valor si la clave existe, si no agrega fila.
    pub async fn record_generation(&self, key: &str, today: NaiveDate) -> Result<()> {
        let values = self
            .gateway
            .read_values(&self.control_sheet)
            .await
            .with_context(|| format!("No se pudo leer {}", self.control_sheet))?;
        let value = today.format("%Y-%m-%d").to_string();

        match find_key(&values, key) {
            Some(row_idx) => {
                self.gateway
                    .write_cells(
                        &self.control_sheet,
                        &[CellUpdate::new(row_idx + 1, VALUE_COL + 1, value)],
                    )
                    .await
                    .with_context(|| format!("No se pudo actualizar {} en {}", key, self.control_sheet))?;
            }
            None => {
                self.gateway
                    .append_rows(&self.control_sheet, &[vec![key.to_string(), value]])
                    .await
                    .with_context(|| format!("No se pudo agregar {} en {}", key, self.control_sheet))?;
            }
        }
        log::info!("(record_generation) clave={} registrada para {}", key, today);
        Ok(())
    }

    async fn stored_date(&self, key: &str) -> Result<Option<NaiveDate>> {
        let values = self
            .gateway
            .read_values(&self.control_sheet)
            .await
            .with_context(|| format!("No se pudo leer {}", self.control_sheet))?;
        Ok(find_key(&values, key)
            .and_then(|idx| parse_date(SheetTable::cell(&values[idx], VALUE_COL))))
    }
}

/// Búsqueda lineal en la columna de claves; la hoja tiene una fila por clave.
fn find_key(values: &[Vec<String>], key: &str) -> Option<usize> {
    values
        .iter()
        .position(|row| SheetTable::cell(row, KEY_COL).trim() == key)
}
