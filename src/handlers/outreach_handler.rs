//! handlers/outreach_handler.rs
//! Endpoints de la lista diaria (fixa) y de la lista pontual.

use actix_web::{web, HttpResponse};
use chrono::Local;
use serde_json::json;

use crate::config::app_config::{AppConfig, AppMode};
use crate::error::GatewayError;
use crate::models::outreach_model::{
    GenerateAdhocRequest, GenerateDailyRequest, GenerateResponse, MarkRequest, ReconcileResponse,
    RequestContext,
};
use crate::services::outreach_service::{
    GenerateOutcome, MarkOutcome, OutreachService, ReconcileOutcome,
};

/// El toggle admin sólo vale cuando el servicio corre en modo ADMIN.
pub fn request_context(config: &AppConfig, admin: Option<bool>) -> RequestContext {
    let privileged = config.mode == AppMode::Admin && admin.unwrap_or(true);
    RequestContext::new(Local::now().date_naive(), privileged)
}

/// Traduce errores de servicio a respuestas HTTP.
pub fn error_response(context: &str, e: &anyhow::Error) -> HttpResponse {
    log::error!("({}) {:?}", context, e);
    match e.chain().find_map(|c| c.downcast_ref::<GatewayError>()) {
        Some(g @ GatewayError::Protected { .. }) => HttpResponse::Forbidden().json(json!({
            "success": false,
            "error": "Permission denied",
            "details": g.to_string(),
            "hint": g.protected_hint(),
        })),
        Some(g @ (GatewayError::MissingColumn { .. } | GatewayError::DuplicateColumn { .. })) => {
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": "Configuration error",
                "details": g.to_string(),
            }))
        }
        Some(g @ GatewayError::RateLimited { .. }) => {
            HttpResponse::ServiceUnavailable().json(json!({
                "success": false,
                "error": "Quota exceeded",
                "details": g.to_string(),
            }))
        }
        _ => HttpResponse::InternalServerError().json(json!({
            "success": false,
            "error": "Internal server error",
            "details": format!("{:?}", e),
        })),
    }
}

fn warning(status: actix_web::http::StatusCode, text: &str) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "success": false,
        "warning": text,
    }))
}

fn generate_response(outcome: GenerateOutcome, already_msg: &str) -> HttpResponse {
    use actix_web::http::StatusCode;
    match outcome {
        GenerateOutcome::Generated { list, warning } => HttpResponse::Ok().json(GenerateResponse {
            success: true,
            list,
            warning,
        }),
        GenerateOutcome::AlreadyGeneratedToday => warning(StatusCode::CONFLICT, already_msg),
        GenerateOutcome::Empty => warning(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Nenhum cliente elegível para hoje; nada foi gerado.",
        ),
        GenerateOutcome::Invalid(msg) => warning(StatusCode::BAD_REQUEST, &msg),
    }
}

/// POST /api/daily-list/generate
pub async fn generate_daily_endpoint(
    outreach_service: web::Data<OutreachService>,
    config: web::Data<AppConfig>,
    body: Option<web::Json<GenerateDailyRequest>>,
) -> HttpResponse {
    let req = body.map(|b| b.into_inner()).unwrap_or_default();
    let ctx = request_context(&config, req.admin);
    log::info!(
        "(generate_daily_endpoint) hoy={} privilegiado={}",
        ctx.today,
        ctx.privileged
    );

    match outreach_service.generate_daily(ctx).await {
        Ok(outcome) => generate_response(
            outcome,
            "Você já gerou a Lista Fixa hoje. Tente novamente amanhã.",
        ),
        Err(e) => error_response("generate_daily_endpoint", &e),
    }
}

/// POST /api/adhoc-list/generate
pub async fn generate_adhoc_endpoint(
    outreach_service: web::Data<OutreachService>,
    config: web::Data<AppConfig>,
    body: web::Json<GenerateAdhocRequest>,
) -> HttpResponse {
    let req = body.into_inner();
    let ctx = request_context(&config, req.admin);

    match outreach_service.generate_adhoc(ctx, req).await {
        Ok(outcome) => generate_response(
            outcome,
            "Você já gerou a Lista Pontual hoje. Tente novamente amanhã.",
        ),
        Err(e) => error_response("generate_adhoc_endpoint", &e),
    }
}

/// GET /api/lists/{id}
pub async fn get_list_endpoint(
    outreach_service: web::Data<OutreachService>,
    path: web::Path<String>,
) -> HttpResponse {
    let id = path.into_inner();
    match outreach_service.get_list(&id).await {
        Ok(Some(list)) => HttpResponse::Ok().json(list),
        Ok(None) => HttpResponse::NotFound().json(json!({
            "success": false,
            "error": "List not found",
        })),
        Err(e) => error_response("get_list_endpoint", &e),
    }
}

/// POST /api/lists/{id}/marks
pub async fn mark_list_endpoint(
    outreach_service: web::Data<OutreachService>,
    path: web::Path<String>,
    body: web::Json<MarkRequest>,
) -> HttpResponse {
    use actix_web::http::StatusCode;
    let id = path.into_inner();

    match outreach_service.mark(&id, &body.sent).await {
        Ok(MarkOutcome::Updated(list)) => HttpResponse::Ok().json(json!({
            "success": true,
            "list": list,
            "message": "Marcações aplicadas.",
        })),
        Ok(MarkOutcome::NotFound) => HttpResponse::NotFound().json(json!({
            "success": false,
            "error": "List not found",
        })),
        Ok(MarkOutcome::AlreadyReconciled) => warning(
            StatusCode::CONFLICT,
            "Esta lista já foi gravada no CRM; as marcações não podem mudar.",
        ),
        Ok(MarkOutcome::LengthMismatch { expected, got }) => HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": format!("Esperava {} marcações, recebi {}", expected, got),
        })),
        Err(e) => error_response("mark_list_endpoint", &e),
    }
}

/// POST /api/lists/{id}/reconcile
pub async fn reconcile_list_endpoint(
    outreach_service: web::Data<OutreachService>,
    config: web::Data<AppConfig>,
    path: web::Path<String>,
) -> HttpResponse {
    use actix_web::http::StatusCode;
    let id = path.into_inner();
    let ctx = request_context(&config, None);

    match outreach_service.reconcile(ctx, &id).await {
        Ok(ReconcileOutcome::Applied { list_id, summary }) => {
            HttpResponse::Ok().json(ReconcileResponse {
                success: true,
                list_id,
                updated_count: summary.updated_count,
                logged_count: summary.logged_count,
                message: format!(
                    "Atualizado! {} contatos gravados no CRM e {} no LOG.",
                    summary.updated_count, summary.logged_count
                ),
            })
        }
        Ok(ReconcileOutcome::NotFound) => HttpResponse::NotFound().json(json!({
            "success": false,
            "error": "List not found",
        })),
        Ok(ReconcileOutcome::NothingMarked) => warning(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Marque pelo menos 1 contato como ENVIADO antes de atualizar.",
        ),
        Ok(ReconcileOutcome::AlreadyReconciled) => warning(
            StatusCode::CONFLICT,
            "Esta lista já foi gravada no CRM.",
        ),
        Err(e) => error_response("reconcile_list_endpoint", &e),
    }
}
