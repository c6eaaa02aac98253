//! handlers/mod.rs
pub mod crm_handler;
pub mod outreach_handler;
