//! services/reconcile_service.rs
//! Grava en la planilla los contactos marcados como enviados:
//! CRM_GERAL (último contacto + campaña del día) y LOG_ENVIO (una fila por envío).

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::config::sheet_config::*;
use crate::error::GatewayError;
use crate::models::outreach_model::{LogEntry, OutreachEntry, ReconcileSummary};
use crate::models::sheet_model::{CellUpdate, HeaderMap, SheetTable};
use crate::services::sheets_service::SheetsGateway;
use crate::util::digits_only;

/// Escrituras del CRM para las entradas enviadas. Devuelve las celdas y
/// cuántas entradas encontraron su fila; las que no aparecen se ignoran.
pub fn plan_crm_updates(
    table: &SheetTable,
    sent: &[&OutreachEntry],
    today: NaiveDate,
) -> Result<(Vec<CellUpdate>, usize), GatewayError> {
    let h = &table.header;
    let wpp_col = h.require(CRM_WHATSAPP)?;
    let last_contact_col = h.require(CRM_LAST_CONTACT)?;
    let campaign_col = h.require(CRM_CAMPAIGN_OF_DAY)?;

    // índice teléfono -> fila (1-based), armado una sola vez
    let mut by_phone: HashMap<String, usize> = HashMap::new();
    for (i, row) in table.rows.iter().enumerate() {
        let phone = digits_only(SheetTable::cell(row, wpp_col));
        if !phone.is_empty() {
            by_phone.insert(phone, SheetTable::sheet_row_number(i));
        }
    }

    let date = today.format("%Y-%m-%d").to_string();
    let mut cells = Vec::new();
    let mut matched = 0;
    for entry in sent {
        let Some(&row) = by_phone.get(&digits_only(&entry.whatsapp)) else {
            log::warn!(
                "(plan_crm_updates) {} no está en {}; se ignora",
                entry.whatsapp,
                h.sheet()
            );
            continue;
        };
        cells.push(CellUpdate::new(row, last_contact_col + 1, date.clone()));
        cells.push(CellUpdate::new(row, campaign_col + 1, entry.campaign.trim()));
        matched += 1;
    }
    Ok((cells, matched))
}

/// Filas para LOG_ENVIO, tan anchas como el cabecero, columnas ubicadas por nombre.
pub fn build_log_rows(header: &HeaderMap, entries: &[LogEntry]) -> Result<Vec<Vec<String>>, GatewayError> {
    let date_col = header.require(LOG_DATE)?;
    let wpp_col = header.require(LOG_WHATSAPP)?;
    let status_col = header.require(LOG_STATUS)?;
    let campaign_col = header.require(LOG_CAMPAIGN)?;

    Ok(entries
        .iter()
        .map(|e| {
            let mut row = vec![String::new(); header.width()];
            row[date_col] = e.date.format("%Y-%m-%d").to_string();
            row[wpp_col] = e.whatsapp.clone();
            row[status_col] = e.status.clone();
            row[campaign_col] = e.campaign.clone();
            row
        })
        .collect())
}

#[derive(Clone)]
pub struct ReconcileService {
    gateway: SheetsGateway,
    layout: SheetLayout,
}

impl ReconcileService {
    pub fn new(gateway: SheetsGateway, layout: SheetLayout) -> Self {
        ReconcileService { gateway, layout }
    }

    /// Sólo procesa las entradas que `is_sent` acepta. Sin ninguna, no toca la planilla.
    ///
    /// El batch del CRM y el append del LOG son llamadas separadas: si la segunda
    /// falla, el CRM ya quedó actualizado.
    pub async fn reconcile<P>(
        &self,
        entries: &[OutreachEntry],
        is_sent: P,
        today: NaiveDate,
    ) -> Result<ReconcileSummary>
    where
        P: Fn(&OutreachEntry) -> bool,
    {
        let sent: Vec<&OutreachEntry> = entries.iter().filter(|e| is_sent(e)).collect();
        if sent.is_empty() {
            log::info!("(reconcile) Ninguna entrada marcada como enviada; nada que grabar.");
            return Ok(ReconcileSummary::default());
        }

        let crm = self
            .gateway
            .read_table(&self.layout.crm_sheet)
            .await
            .with_context(|| format!("No se pudo leer {}", self.layout.crm_sheet))?;
        let (cells, updated_count) = plan_crm_updates(&crm, &sent, today)?;

        self.gateway
            .write_cells(&self.layout.crm_sheet, &cells)
            .await
            .with_context(|| format!("Fallo al actualizar {}", self.layout.crm_sheet))?;
        log::info!(
            "(reconcile) {}: {} contacto(s) actualizados ({} celdas)",
            self.layout.crm_sheet,
            updated_count,
            cells.len()
        );

        let log_values = self
            .gateway
            .read_values(&self.layout.log_sheet)
            .await
            .with_context(|| format!("No se pudo leer {}", self.layout.log_sheet))?;
        let header = HeaderMap::from_header(
            &self.layout.log_sheet,
            log_values.first().map(|r| r.as_slice()).unwrap_or(&[]),
        );
        let log_entries: Vec<LogEntry> = sent
            .iter()
            .map(|e| LogEntry {
                date: today,
                whatsapp: digits_only(&e.whatsapp),
                status: e.status.trim().to_string(),
                campaign: e.campaign.trim().to_string(),
            })
            .collect();
        let rows = build_log_rows(&header, &log_entries)?;

        self.gateway
            .append_rows(&self.layout.log_sheet, &rows)
            .await
            .with_context(|| format!("Fallo al agregar filas en {}", self.layout.log_sheet))?;
        log::info!("(reconcile) {}: {} fila(s) agregadas", self.layout.log_sheet, rows.len());

        Ok(ReconcileSummary {
            updated_count,
            logged_count: rows.len(),
        })
    }
}
