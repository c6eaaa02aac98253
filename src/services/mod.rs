//! services/mod.rs
//! Módulo que agrupa los distintos "servicios" o "capas de negocio" de la app.

pub mod google_auth;
pub mod google_sheets;
pub mod list_service;
pub mod list_store_service;
pub mod memory_sheets;
pub mod outreach_service;
pub mod reconcile_service;
pub mod retry;
pub mod sheets_service;
pub mod throttle_service;
