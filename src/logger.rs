//! logger.rs
//! env_logger con nivel por RUST_LOG; sqlx sólo avisa por defecto.

use env_logger::Env;

pub fn init_logger() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info,sqlx=warn".to_string());

    env_logger::Builder::from_env(Env::default().default_filter_or(filter))
        .format_timestamp_secs()
        .format_module_path(false)
        .init();
}
