//! app.rs
use std::sync::Arc;

use actix_web::web;
use anyhow::Result;
use sqlx::{Pool, Sqlite};

use crate::config::app_config::AppConfig;
use crate::handlers::{crm_handler, outreach_handler};
use crate::services::list_service::ListService;
use crate::services::list_store_service::ListStoreService;
use crate::services::outreach_service::OutreachService;
use crate::services::reconcile_service::ReconcileService;
use crate::services::retry::RetryPolicy;
use crate::services::sheets_service::{SheetsBackend, SheetsGateway};
use crate::services::throttle_service::ThrottleService;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(crm_handler::health_endpoint))
            .route("/crm", web::get().to(crm_handler::list_customers_endpoint))
            .route("/rules", web::get().to(crm_handler::list_rules_endpoint))
            .service(
                web::scope("/daily-list").route(
                    "/generate",
                    web::post().to(outreach_handler::generate_daily_endpoint),
                ),
            )
            .service(
                web::scope("/adhoc-list").route(
                    "/generate",
                    web::post().to(outreach_handler::generate_adhoc_endpoint),
                ),
            )
            .service(
                web::scope("/lists")
                    .route(
                        "/{id}",
                        web::get().to(outreach_handler::get_list_endpoint),
                    )
                    .route(
                        "/{id}/marks",
                        web::post().to(outreach_handler::mark_list_endpoint),
                    )
                    .route(
                        "/{id}/reconcile",
                        web::post().to(outreach_handler::reconcile_list_endpoint),
                    ),
            ),
    );
}

/// Arma todos los servicios sobre un backend de planilla y el pool SQLite.
pub async fn build_outreach_service(
    config: &AppConfig,
    backend: Arc<dyn SheetsBackend>,
    db_pool: Pool<Sqlite>,
) -> Result<OutreachService> {
    let retry = RetryPolicy::new(config.retry_max_attempts, config.retry_initial_delay);
    let gateway = SheetsGateway::new(backend, retry);

    let store = ListStoreService::new(db_pool);
    store.run_migrations().await?;

    Ok(OutreachService::new(
        ListService::new(
            gateway.clone(),
            config.layout.clone(),
            config.default_country_code.clone(),
        ),
        ThrottleService::new(gateway.clone(), config.layout.control_sheet.clone()),
        ReconcileService::new(gateway, config.layout.clone()),
        store,
        config.adhoc_default_total,
    ))
}
