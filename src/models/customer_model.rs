//! models/customer_model.rs
//! Registros tipados del CRM (CRM_GERAL) y reglas por status (CONFIGURACAO).

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::sheet_config::*;
use crate::error::GatewayError;
use crate::models::sheet_model::SheetTable;
use crate::util::{digits_only, parse_date, parse_number, parse_quantity, parse_truthy};

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CustomerRecord {
    /// Fila en la hoja (1-based).
    pub row: usize,
    /// Teléfono sólo con dígitos (clave del cliente).
    pub whatsapp: String,
    pub name: String,
    pub status: String,
    pub priority: f64,
    pub days_inactive: f64,
    pub total_orders: f64,
    pub next_allowed_contact: Option<NaiveDate>,
    pub eligible: bool,
}

impl CustomerRecord {
    /// Elegible y fuera del período de enfriamiento.
    pub fn is_contactable(&self, today: NaiveDate) -> bool {
        self.eligible
            && self
                .next_allowed_contact
                .map_or(true, |next| next <= today)
    }

    pub fn from_table(table: &SheetTable) -> Result<Vec<CustomerRecord>, GatewayError> {
        let h = &table.header;
        let wpp = h.require(CRM_WHATSAPP)?;
        let name = h.require(CRM_NAME)?;
        let status = h.require(CRM_STATUS)?;
        let eligible = h.require(CRM_ELIGIBLE)?;
        let next = h.require(CRM_NEXT_CONTACT)?;
        let priority = h.optional(CRM_PRIORITY)?;
        let days = h.optional(CRM_DAYS_INACTIVE)?;
        let orders = h.optional(CRM_TOTAL_ORDERS)?;

        Ok(table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| CustomerRecord {
                row: SheetTable::sheet_row_number(i),
                whatsapp: digits_only(SheetTable::cell(row, wpp)),
                name: SheetTable::cell(row, name).trim().to_string(),
                status: SheetTable::cell(row, status).trim().to_string(),
                priority: parse_number(SheetTable::opt_cell(row, priority)),
                days_inactive: parse_number(SheetTable::opt_cell(row, days)),
                total_orders: parse_number(SheetTable::opt_cell(row, orders)),
                next_allowed_contact: parse_date(SheetTable::cell(row, next)),
                eligible: parse_truthy(SheetTable::cell(row, eligible)),
            })
            .collect())
    }
}

/// Cuántos clientes de cada status entran en la lista diaria.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusRule {
    pub status: String,
    pub quantity_per_day: usize,
    pub campaign: String,
    pub message_template: String,
}

impl StatusRule {
    pub fn from_table(table: &SheetTable) -> Result<Vec<StatusRule>, GatewayError> {
        let h = &table.header;
        let status = h.require(RULE_STATUS)?;
        let quantity = h.require(RULE_QUANTITY)?;
        let campaign = h.optional(RULE_CAMPAIGN)?;
        let message = h.optional(RULE_MESSAGE)?;

        Ok(table
            .rows
            .iter()
            .filter(|row| !SheetTable::cell(row, status).trim().is_empty())
            .map(|row| StatusRule {
                status: SheetTable::cell(row, status).trim().to_string(),
                quantity_per_day: parse_quantity(SheetTable::cell(row, quantity)),
                campaign: SheetTable::opt_cell(row, campaign).trim().to_string(),
                message_template: SheetTable::opt_cell(row, message).trim().to_string(),
            })
            .collect())
    }
}
