//! services/memory_sheets.rs
//! Backend en memoria: modo demo (SHEETS_BACKEND=memory) y doble para tests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::config::sheet_config::SheetLayout;
use crate::error::GatewayError;
use crate::models::sheet_model::CellUpdate;
use crate::services::sheets_service::SheetsBackend;

#[derive(Default)]
struct MemoryState {
    sheets: HashMap<String, Vec<Vec<String>>>,
    protected: HashSet<String>,
    calls: usize,
}

#[derive(Clone, Default)]
pub struct MemorySheetsBackend {
    state: Arc<Mutex<MemoryState>>,
}

fn row(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|c| c.to_string()).collect()
}

impl MemorySheetsBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Datos de demostración: 4 clientes, una regla por status.
    pub async fn with_demo_data(layout: &SheetLayout) -> Self {
        let backend = Self::new();
        backend
            .set_sheet(
                &layout.crm_sheet,
                vec![
                    row(&[
                        "WHATSAPP", "NOME", "STATUS", "PRIORIDADE", "DIAS DE INATIVIDADE",
                        "TOTAL DE PEDIDOS", "PROXIMO CONTATO PERMITIDO", "ULTIMO CONTATO",
                        "CAMPANHA DO DIA", "ELEGIVEL",
                    ]),
                    row(&["85999990001", "Cliente A", "7-15", "3", "10", "12", "", "", "", "SIM"]),
                    row(&["85999990002", "Cliente B", "16-30", "2", "20", "5", "", "", "", "SIM"]),
                    row(&["85999990003", "Cliente C", "31-60", "1", "45", "3", "", "", "", "SIM"]),
                    row(&["85999990004", "Cliente D", "61-90", "1", "75", "1", "", "", "", "SIM"]),
                ],
            )
            .await;
        backend
            .set_sheet(
                &layout.rules_sheet,
                vec![
                    row(&["STATUS", "QTD POR DIA", "CAMPANHA", "MENSAGEM"]),
                    row(&["7-15", "1", "VOLTA_7", "Olá! Sentimos sua falta."]),
                    row(&["16-30", "1", "VOLTA_16", "Olá! Temos novidades no cardápio."]),
                    row(&["31-60", "1", "VOLTA_31", "Olá! Cupom especial para você."]),
                    row(&["61-90", "1", "VOLTA_61", "Olá! Faz tempo que não pede."]),
                ],
            )
            .await;
        backend
            .set_sheet(
                &layout.log_sheet,
                vec![row(&["DATA ENVIO", "WHATSAPP", "STATUS DO DIA", "CAMPANHA"])],
            )
            .await;
        backend
            .set_sheet(&layout.control_sheet, vec![row(&["CHAVE", "VALOR"])])
            .await;
        backend
            .set_sheet(
                &layout.adhoc_sheet,
                vec![
                    row(&["WHATSAPP", "NOME", "STATUS", "CAMPANHA", "ENVIADO?"]),
                    row(&["85999990001", "Cliente A", "7-15", "PONTUAL", "FALSE"]),
                    row(&["85999990003", "Cliente C", "31-60", "PONTUAL", "FALSE"]),
                ],
            )
            .await;
        backend
    }

    pub async fn set_sheet(&self, sheet: &str, values: Vec<Vec<String>>) {
        self.state
            .lock()
            .await
            .sheets
            .insert(sheet.to_string(), values);
    }

    pub async fn sheet(&self, sheet: &str) -> Option<Vec<Vec<String>>> {
        self.state.lock().await.sheets.get(sheet).cloned()
    }

    /// Rechaza escrituras en la hoja como lo hace un rango protegido.
    pub async fn protect(&self, sheet: &str) {
        self.state.lock().await.protected.insert(sheet.to_string());
    }

    /// Cantidad de llamadas recibidas (lecturas y escrituras).
    pub async fn call_count(&self) -> usize {
        self.state.lock().await.calls
    }
}

#[async_trait]
impl SheetsBackend for MemorySheetsBackend {
    async fn read_values(&self, sheet: &str) -> Result<Vec<Vec<String>>, GatewayError> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        state
            .sheets
            .get(sheet)
            .cloned()
            .ok_or_else(|| GatewayError::SheetNotFound(sheet.to_string()))
    }

    async fn update_cells(&self, sheet: &str, updates: &[CellUpdate]) -> Result<(), GatewayError> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        if state.protected.contains(sheet) {
            return Err(GatewayError::Protected {
                sheet: sheet.to_string(),
                message: "You are trying to edit a protected cell or object.".to_string(),
            });
        }
        let values = state
            .sheets
            .get_mut(sheet)
            .ok_or_else(|| GatewayError::SheetNotFound(sheet.to_string()))?;
        for cell in updates {
            if cell.row == 0 || cell.col == 0 {
                return Err(GatewayError::InvalidData(format!(
                    "celda inválida ({}, {})",
                    cell.row, cell.col
                )));
            }
            if values.len() < cell.row {
                values.resize(cell.row, Vec::new());
            }
            let target = &mut values[cell.row - 1];
            if target.len() < cell.col {
                target.resize(cell.col, String::new());
            }
            target[cell.col - 1] = cell.value.clone();
        }
        Ok(())
    }

    async fn append_rows(&self, sheet: &str, rows: &[Vec<String>]) -> Result<(), GatewayError> {
        let mut state = self.state.lock().await;
        state.calls += 1;
        if state.protected.contains(sheet) {
            return Err(GatewayError::Protected {
                sheet: sheet.to_string(),
                message: "You are trying to edit a protected cell or object.".to_string(),
            });
        }
        state
            .sheets
            .get_mut(sheet)
            .ok_or_else(|| GatewayError::SheetNotFound(sheet.to_string()))?
            .extend(rows.iter().cloned());
        Ok(())
    }
}
