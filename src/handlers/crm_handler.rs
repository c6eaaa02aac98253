//! handlers/crm_handler.rs
//! Vistas de administración (sólo modo ADMIN) y health check.

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::config::app_config::{AppConfig, AppMode};
use crate::handlers::outreach_handler::error_response;
use crate::services::outreach_service::OutreachService;

fn admin_only() -> HttpResponse {
    HttpResponse::Forbidden().json(json!({
        "success": false,
        "error": "Disponible sólo en modo ADMIN",
    }))
}

/// GET /api/health
pub async fn health_endpoint(config: web::Data<AppConfig>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "mode": config.mode,
    }))
}

/// GET /api/crm
pub async fn list_customers_endpoint(
    outreach_service: web::Data<OutreachService>,
    config: web::Data<AppConfig>,
) -> HttpResponse {
    if config.mode != AppMode::Admin {
        return admin_only();
    }
    match outreach_service.lists().customers().await {
        Ok(customers) => HttpResponse::Ok().json(json!({
            "success": true,
            "total": customers.len(),
            "items": customers,
        })),
        Err(e) => error_response("list_customers_endpoint", &e),
    }
}

/// GET /api/rules
pub async fn list_rules_endpoint(
    outreach_service: web::Data<OutreachService>,
    config: web::Data<AppConfig>,
) -> HttpResponse {
    if config.mode != AppMode::Admin {
        return admin_only();
    }
    match outreach_service.lists().rules().await {
        Ok(rules) => HttpResponse::Ok().json(json!({
            "success": true,
            "items": rules,
        })),
        Err(e) => error_response("list_rules_endpoint", &e),
    }
}
