//! models/outreach_model.rs
//! Listas de contacto generadas, requests y responses de la API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Contexto explícito de cada request (reemplaza el estado global de sesión).
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    pub today: NaiveDate,
    /// Saltea el límite diario (modo ADMIN con el toggle activo).
    pub privileged: bool,
}

impl RequestContext {
    pub fn new(today: NaiveDate, privileged: bool) -> Self {
        Self { today, privileged }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutreachEntry {
    pub whatsapp: String,
    pub name: String,
    pub status: String,
    pub campaign: String,
    pub message: String,
    pub link: String,
    pub sent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_inactive: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_orders: Option<f64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Daily,
    Adhoc,
}

impl ListKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListKind::Daily => "daily",
            ListKind::Adhoc => "adhoc",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "daily" => Some(ListKind::Daily),
            "adhoc" => Some(ListKind::Adhoc),
            _ => None,
        }
    }
}

/// generated -> reconciled (terminal).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ListStatus {
    Generated,
    Reconciled,
}

impl ListStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListStatus::Generated => "generated",
            ListStatus::Reconciled => "reconciled",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "generated" => Some(ListStatus::Generated),
            "reconciled" => Some(ListStatus::Reconciled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OutreachList {
    pub id: String,
    pub kind: ListKind,
    pub status: ListStatus,
    pub generated_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub entries: Vec<OutreachEntry>,
}

/// Fila de auditoría en LOG_ENVIO.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub date: NaiveDate,
    pub whatsapp: String,
    pub status: String,
    pub campaign: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub updated_count: usize,
    pub logged_count: usize,
}

// ----------------------------------------------------------------
// Requests / responses
// ----------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateDailyRequest {
    pub admin: Option<bool>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AdhocMode {
    /// Lista ya armada en la hoja LISTA_PONTUAL.
    #[default]
    Sheet,
    /// N clientes de un mismo status, por prioridad.
    ByStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateAdhocRequest {
    pub admin: Option<bool>,
    pub campaign: Option<String>,
    pub message: Option<String>,
    #[serde(default)]
    pub mode: AdhocMode,
    pub status: Option<String>,
    pub total: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkRequest {
    pub sent: Vec<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub list: OutreachList,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconcileResponse {
    pub success: bool,
    pub list_id: String,
    pub updated_count: usize,
    pub logged_count: usize,
    pub message: String,
}
