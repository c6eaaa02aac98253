//! models/mod.rs
//! Módulo raíz para modelos/estructuras compartidas.

pub mod customer_model;
pub mod outreach_model;
pub mod sheet_model;
