//! services/list_service.rs
//! Generación de listas: diaria (cupo por status, sorteo estable en el día)
//! y pontual (un status, por prioridad; o la hoja LISTA_PONTUAL).

use std::cmp::Ordering;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::sheet_config::*;
use crate::error::GatewayError;
use crate::models::customer_model::{CustomerRecord, StatusRule};
use crate::models::outreach_model::OutreachEntry;
use crate::models::sheet_model::SheetTable;
use crate::services::sheets_service::SheetsGateway;
use crate::util::{digits_only, parse_truthy};

/// Teléfonos con menos dígitos que esto (DDD + número) se descartan en la lista pontual.
const MIN_PHONE_DIGITS: usize = 10;

/// Link `https://wa.me/<país+número>?text=<mensaje>`. Sin dígitos -> "".
/// No antepone el código de país si el número ya empieza con él.
pub fn whatsapp_link(phone: &str, message: &str, country_code: &str) -> String {
    let mut number = digits_only(phone);
    if number.is_empty() {
        return String::new();
    }
    if !number.starts_with(country_code) {
        number = format!("{}{}", country_code, number);
    }
    let message = message.trim();
    if message.is_empty() {
        format!("https://wa.me/{}", number)
    } else {
        format!("https://wa.me/{}?text={}", number, urlencoding::encode(message))
    }
}

/// Semilla del día (AAAAMMDD): mismo día, mismo sorteo.
pub fn daily_seed(today: NaiveDate) -> u64 {
    (today.year() as u64) * 10_000 + (today.month() as u64) * 100 + today.day() as u64
}

/// Lista diaria: para cada regla con cupo > 0, los clientes contactables de ese
/// status; si sobran candidatos se barajan con la semilla del día y se toman los primeros.
pub fn build_daily_entries(
    customers: &[CustomerRecord],
    rules: &[StatusRule],
    today: NaiveDate,
    country_code: &str,
) -> Vec<OutreachEntry> {
    let seed = daily_seed(today);
    let mut out = Vec::new();

    for rule in rules.iter().filter(|r| r.quantity_per_day > 0) {
        let mut candidates: Vec<&CustomerRecord> = customers
            .iter()
            .filter(|c| c.is_contactable(today) && c.status == rule.status)
            .collect();
        if candidates.is_empty() {
            continue;
        }
        if candidates.len() > rule.quantity_per_day {
            let mut rng = StdRng::seed_from_u64(seed);
            candidates.shuffle(&mut rng);
        }

        out.extend(candidates.into_iter().take(rule.quantity_per_day).map(|c| {
            OutreachEntry {
                whatsapp: c.whatsapp.clone(),
                name: c.name.clone(),
                status: c.status.clone(),
                campaign: rule.campaign.clone(),
                message: rule.message_template.clone(),
                link: whatsapp_link(&c.whatsapp, &rule.message_template, country_code),
                sent: false,
                priority: Some(c.priority),
                days_inactive: Some(c.days_inactive),
                total_orders: Some(c.total_orders),
            }
        }));
    }
    out
}

/// Lista pontual por status: contactables, teléfono válido, ordenados por
/// prioridad desc y días de inactividad desc (orden estable, sin azar).
pub fn build_priority_entries(
    customers: &[CustomerRecord],
    status: &str,
    total: usize,
    campaign: &str,
    message: &str,
    today: NaiveDate,
    country_code: &str,
) -> Vec<OutreachEntry> {
    let wanted = status.trim().to_uppercase();
    let mut candidates: Vec<&CustomerRecord> = customers
        .iter()
        .filter(|c| c.status.to_uppercase() == wanted)
        .filter(|c| c.is_contactable(today))
        .filter(|c| c.whatsapp.len() >= MIN_PHONE_DIGITS)
        .collect();

    candidates.sort_by(|a, b| {
        b.priority
            .partial_cmp(&a.priority)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.days_inactive
                    .partial_cmp(&a.days_inactive)
                    .unwrap_or(Ordering::Equal)
            })
    });

    candidates
        .into_iter()
        .take(total)
        .map(|c| OutreachEntry {
            whatsapp: c.whatsapp.clone(),
            name: c.name.clone(),
            status: c.status.clone(),
            campaign: campaign.trim().to_string(),
            message: message.trim().to_string(),
            link: whatsapp_link(&c.whatsapp, message, country_code),
            sent: false,
            priority: Some(c.priority),
            days_inactive: Some(c.days_inactive),
            total_orders: Some(c.total_orders),
        })
        .collect()
}

/// Lista pontual armada a mano en la hoja LISTA_PONTUAL.
/// Columnas ausentes quedan en blanco; la campaña del request (si hay) pisa la de la hoja.
pub fn build_sheet_entries(
    table: &SheetTable,
    campaign_override: Option<&str>,
    message: &str,
    country_code: &str,
) -> Result<Vec<OutreachEntry>, GatewayError> {
    let h = &table.header;
    let wpp = h.optional(ADHOC_WHATSAPP)?;
    let name = h.optional(ADHOC_NAME)?;
    let status = h.optional(ADHOC_STATUS)?;
    let campaign = h.optional(ADHOC_CAMPAIGN)?;
    let sent = h.optional(ADHOC_SENT)?;
    let campaign_override = campaign_override.map(str::trim).filter(|c| !c.is_empty());

    Ok(table
        .rows
        .iter()
        .filter(|row| row.iter().any(|c| !c.trim().is_empty()))
        .map(|row| {
            let whatsapp = digits_only(SheetTable::opt_cell(row, wpp));
            OutreachEntry {
                link: whatsapp_link(&whatsapp, message, country_code),
                whatsapp,
                name: SheetTable::opt_cell(row, name).trim().to_string(),
                status: SheetTable::opt_cell(row, status).trim().to_string(),
                campaign: campaign_override
                    .map(str::to_string)
                    .unwrap_or_else(|| SheetTable::opt_cell(row, campaign).trim().to_string()),
                message: message.trim().to_string(),
                sent: parse_truthy(SheetTable::opt_cell(row, sent)),
                priority: None,
                days_inactive: None,
                total_orders: None,
            }
        })
        .collect())
}

#[derive(Clone)]
pub struct ListService {
    gateway: SheetsGateway,
    layout: SheetLayout,
    country_code: String,
}

impl ListService {
    pub fn new(gateway: SheetsGateway, layout: SheetLayout, country_code: String) -> Self {
        ListService {
            gateway,
            layout,
            country_code,
        }
    }

    pub async fn customers(&self) -> Result<Vec<CustomerRecord>> {
        let table = self
            .gateway
            .read_table(&self.layout.crm_sheet)
            .await
            .with_context(|| format!("No se pudo leer {}", self.layout.crm_sheet))?;
        Ok(CustomerRecord::from_table(&table)?)
    }

    pub async fn rules(&self) -> Result<Vec<StatusRule>> {
        let table = self
            .gateway
            .read_table(&self.layout.rules_sheet)
            .await
            .with_context(|| format!("No se pudo leer {}", self.layout.rules_sheet))?;
        Ok(StatusRule::from_table(&table)?)
    }

    pub async fn daily_list(&self, today: NaiveDate) -> Result<Vec<OutreachEntry>> {
        let customers = self.customers().await?;
        let rules = self.rules().await?;
        let entries = build_daily_entries(&customers, &rules, today, &self.country_code);
        log::info!(
            "(daily_list) {} cliente(s), {} regla(s) -> {} contacto(s) para {}",
            customers.len(),
            rules.len(),
            entries.len(),
            today
        );
        Ok(entries)
    }

    pub async fn priority_list(
        &self,
        today: NaiveDate,
        status: &str,
        total: usize,
        campaign: &str,
        message: &str,
    ) -> Result<Vec<OutreachEntry>> {
        let customers = self.customers().await?;
        let entries = build_priority_entries(
            &customers,
            status,
            total,
            campaign,
            message,
            today,
            &self.country_code,
        );
        log::info!(
            "(priority_list) status={} pedidos={} -> {} contacto(s)",
            status,
            total,
            entries.len()
        );
        Ok(entries)
    }

    pub async fn sheet_list(&self, campaign: Option<&str>, message: &str) -> Result<Vec<OutreachEntry>> {
        let table = self
            .gateway
            .read_table(&self.layout.adhoc_sheet)
            .await
            .with_context(|| format!("No se pudo leer {}", self.layout.adhoc_sheet))?;
        let entries = build_sheet_entries(&table, campaign, message, &self.country_code)?;
        log::info!("(sheet_list) {} contacto(s) en {}", entries.len(), self.layout.adhoc_sheet);
        Ok(entries)
    }
}
