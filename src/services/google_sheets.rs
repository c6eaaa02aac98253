//! services/google_sheets.rs
//! Backend real: Google Sheets API v4 vía reqwest.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;

use crate::error::GatewayError;
use crate::models::sheet_model::CellUpdate;
use crate::services::google_auth::{ServiceAccountKey, TokenProvider, READ_SCOPES, WRITE_SCOPES};
use crate::services::sheets_service::SheetsBackend;
use crate::util::column_letter;

const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

#[derive(Clone)]
pub struct GoogleSheetsBackend {
    spreadsheet_id: String,
    http_client: Client,
    reader: TokenProvider,
    writer: TokenProvider,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl GoogleSheetsBackend {
    pub fn new(spreadsheet_id: String, key: ServiceAccountKey) -> Self {
        let http_client = Client::new();
        let key = Arc::new(key);
        Self {
            spreadsheet_id,
            reader: TokenProvider::new(key.clone(), READ_SCOPES, http_client.clone()),
            writer: TokenProvider::new(key, WRITE_SCOPES, http_client.clone()),
            http_client,
        }
    }

    fn values_url(&self, range: &str) -> String {
        format!(
            "{}/{}/values/{}",
            SHEETS_API_BASE,
            self.spreadsheet_id,
            urlencoding::encode(range)
        )
    }

    async fn check(sheet: &str, resp: Response) -> Result<Response, GatewayError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(classify_failure(sheet, status.as_u16(), body))
    }
}

/// Clasifica una respuesta no exitosa de la API.
pub fn classify_failure(sheet: &str, status: u16, body: String) -> GatewayError {
    if status == 429 || body.contains("Quota exceeded") || body.contains("RESOURCE_EXHAUSTED") {
        return GatewayError::RateLimited {
            attempts: 1,
            message: body,
        };
    }
    if (status == 400 || status == 403) && body.to_lowercase().contains("protected") {
        return GatewayError::Protected {
            sheet: sheet.to_string(),
            message: body,
        };
    }
    if status == 400 && body.contains("Unable to parse range") {
        return GatewayError::SheetNotFound(sheet.to_string());
    }
    GatewayError::Api {
        status,
        message: body,
    }
}

/// Rango A1 con el nombre de hoja entre comillas simples.
fn a1_range(sheet: &str, cell: Option<&CellUpdate>) -> String {
    let quoted = format!("'{}'", sheet.replace('\'', "''"));
    match cell {
        Some(c) => format!("{}!{}{}", quoted, column_letter(c.col - 1), c.row),
        None => quoted,
    }
}

fn cell_to_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[async_trait]
impl SheetsBackend for GoogleSheetsBackend {
    async fn read_values(&self, sheet: &str) -> Result<Vec<Vec<String>>, GatewayError> {
        let token = self.reader.access_token().await?;
        let resp = self
            .http_client
            .get(self.values_url(&a1_range(sheet, None)))
            .bearer_auth(token)
            .send()
            .await?;
        let resp = Self::check(sheet, resp).await?;
        let range: ValueRange = resp.json().await?;
        Ok(range
            .values
            .iter()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect())
    }

    async fn update_cells(&self, sheet: &str, updates: &[CellUpdate]) -> Result<(), GatewayError> {
        if updates.iter().any(|c| c.row == 0 || c.col == 0) {
            return Err(GatewayError::InvalidData(
                "celdas con fila/columna 0 (deben ser 1-based)".to_string(),
            ));
        }
        let token = self.writer.access_token().await?;
        let data: Vec<_> = updates
            .iter()
            .map(|c| {
                json!({
                    "range": a1_range(sheet, Some(c)),
                    "values": [[c.value]],
                })
            })
            .collect();
        let url = format!(
            "{}/{}/values:batchUpdate",
            SHEETS_API_BASE, self.spreadsheet_id
        );
        let resp = self
            .http_client
            .post(&url)
            .bearer_auth(token)
            .json(&json!({ "valueInputOption": "USER_ENTERED", "data": data }))
            .send()
            .await?;
        Self::check(sheet, resp).await?;
        log::info!("(update_cells) {}: {} celda(s) escritas", sheet, updates.len());
        Ok(())
    }

    async fn append_rows(&self, sheet: &str, rows: &[Vec<String>]) -> Result<(), GatewayError> {
        let token = self.writer.access_token().await?;
        let url = format!("{}:append", self.values_url(&a1_range(sheet, None)));
        let resp = self
            .http_client
            .post(&url)
            .query(&[
                ("valueInputOption", "USER_ENTERED"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .bearer_auth(token)
            .json(&json!({ "values": rows }))
            .send()
            .await?;
        Self::check(sheet, resp).await?;
        log::info!("(append_rows) {}: {} fila(s) agregadas", sheet, rows.len());
        Ok(())
    }
}
