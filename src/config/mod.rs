//! config/mod.rs
//! Configuración de la aplicación (variables de entorno y layout de la planilla).

pub mod app_config;
pub mod sheet_config;
