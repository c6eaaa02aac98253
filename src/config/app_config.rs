//! config/app_config.rs
//! Configuración leída de variables de entorno (.env cargado con dotenv en main).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use crate::config::sheet_config::SheetLayout;

/// CLIENT: una generación por día. ADMIN: ilimitado (pruebas).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppMode {
    Client,
    Admin,
}

impl AppMode {
    pub fn parse(raw: &str) -> Result<Self> {
        match raw.trim().to_uppercase().as_str() {
            "" | "CLIENT" => Ok(AppMode::Client),
            "ADMIN" => Ok(AppMode::Admin),
            other => Err(anyhow!("APP_MODE inválido: '{}' (CLIENT o ADMIN)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetsBackendKind {
    Google {
        spreadsheet_id: String,
        service_account_file: PathBuf,
    },
    Memory,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub mode: AppMode,
    pub backend: SheetsBackendKind,
    pub bind_host: String,
    pub bind_port: u16,
    pub database_path: PathBuf,
    pub default_country_code: String,
    pub adhoc_default_total: usize,
    pub retry_max_attempts: u32,
    pub retry_initial_delay: Duration,
    pub layout: SheetLayout,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mode = AppMode::parse(&env::var("APP_MODE").unwrap_or_default())?;

        let backend = match env::var("SHEETS_BACKEND")
            .unwrap_or_else(|_| "google".to_string())
            .trim()
            .to_lowercase()
            .as_str()
        {
            "google" => SheetsBackendKind::Google {
                spreadsheet_id: env::var("SPREADSHEET_ID")
                    .map_err(|_| anyhow!("No se definió SPREADSHEET_ID"))?,
                service_account_file: env::var("GOOGLE_SERVICE_ACCOUNT_FILE")
                    .map(PathBuf::from)
                    .map_err(|_| anyhow!("No se definió GOOGLE_SERVICE_ACCOUNT_FILE"))?,
            },
            "memory" => SheetsBackendKind::Memory,
            other => return Err(anyhow!("SHEETS_BACKEND inválido: '{}'", other)),
        };

        Ok(AppConfig {
            mode,
            backend,
            bind_host: env::var("BIND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            bind_port: parse_var("BIND_PORT", 5022)?,
            database_path: env::var("DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data").join("outreach.db")),
            default_country_code: env::var("DEFAULT_COUNTRY_CODE")
                .unwrap_or_else(|_| "55".to_string()),
            adhoc_default_total: parse_var("ADHOC_DEFAULT_TOTAL", 37)?,
            retry_max_attempts: parse_var("SHEETS_RETRY_MAX_ATTEMPTS", 6)?,
            retry_initial_delay: Duration::from_millis(parse_var(
                "SHEETS_RETRY_INITIAL_DELAY_MS",
                1000,
            )?),
            layout: SheetLayout::default(),
        })
    }

    /// Config para tests y modo demo: backend en memoria, sin esperas.
    #[cfg(test)]
    pub fn for_tests(mode: AppMode) -> Self {
        AppConfig {
            mode,
            backend: SheetsBackendKind::Memory,
            bind_host: "127.0.0.1".to_string(),
            bind_port: 0,
            database_path: PathBuf::from(":memory:"),
            default_country_code: "55".to_string(),
            adhoc_default_total: 37,
            retry_max_attempts: 6,
            retry_initial_delay: Duration::from_millis(1),
            layout: SheetLayout::default(),
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Valor inválido en {}: '{}'", name, raw)),
        _ => Ok(default),
    }
}
