use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Pool, Sqlite};

use crate::config::app_config::{AppConfig, SheetsBackendKind};
use crate::logger::init_logger;
use crate::services::google_auth::ServiceAccountKey;
use crate::services::google_sheets::GoogleSheetsBackend;
use crate::services::memory_sheets::MemorySheetsBackend;
use crate::services::sheets_service::SheetsBackend;

mod app;
mod config;
mod error;
mod handlers;
mod logger;
mod models;
mod services;
mod util;

#[cfg(test)]
mod tests;

async fn setup_database(config: &AppConfig) -> Pool<Sqlite> {
    // Carpeta del archivo SQLite (./data por defecto)
    if let Some(parent) = config.database_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).expect("No se pudo crear el directorio de la base");
        }
    }

    log::info!("Conectando a SQLite en {}", config.database_path.display());

    let options = SqliteConnectOptions::new()
        .filename(&config.database_path)
        .create_if_missing(true);

    Pool::<Sqlite>::connect_with(options)
        .await
        .expect("No se pudo conectar a la base de datos SQLite.")
}

async fn setup_backend(config: &AppConfig) -> Arc<dyn SheetsBackend> {
    match &config.backend {
        SheetsBackendKind::Google {
            spreadsheet_id,
            service_account_file,
        } => {
            let key = ServiceAccountKey::from_file(service_account_file)
                .expect("No se pudo cargar la cuenta de servicio");
            log::info!(
                "Usando Google Sheets {} como cuenta {}",
                spreadsheet_id,
                key.client_email
            );
            Arc::new(GoogleSheetsBackend::new(spreadsheet_id.clone(), key))
        }
        SheetsBackendKind::Memory => {
            log::warn!("SHEETS_BACKEND=memory: usando planilla de demostración en memoria");
            Arc::new(MemorySheetsBackend::with_demo_data(&config.layout).await)
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Cargar .env al inicio
    init_logger();

    let config = AppConfig::from_env().expect("Configuración inválida");
    log::info!("Modo de la aplicación: {:?}", config.mode);

    let db_pool = setup_database(&config).await;
    let backend = setup_backend(&config).await;

    let outreach_service = app::build_outreach_service(&config, backend, db_pool)
        .await
        .unwrap_or_else(|e| panic!("Fallo al inicializar servicios: {:?}", e));

    let bind = (config.bind_host.clone(), config.bind_port);
    log::info!("Levantando servidor en {}:{}", bind.0, bind.1);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(outreach_service.clone()))
            .app_data(web::Data::new(config.clone()))
            .configure(app::init_app)
    })
    .workers(1)
    .bind(bind)?
    .run()
    .await
}
