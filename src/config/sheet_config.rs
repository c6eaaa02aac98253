//! config/sheet_config.rs
//! Nombres de las hojas y columnas de la planilla del CRM.
//! Las columnas se buscan por nombre EXACTO (fila 1), nunca por posición.

use serde::{Deserialize, Serialize};

/// Hojas de la planilla, con valores por defecto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetLayout {
    pub crm_sheet: String,
    pub rules_sheet: String,
    pub log_sheet: String,
    pub control_sheet: String,
    pub adhoc_sheet: String,
}

impl Default for SheetLayout {
    fn default() -> Self {
        SheetLayout {
            crm_sheet: "CRM_GERAL".to_string(),
            rules_sheet: "CONFIGURACAO".to_string(),
            log_sheet: "LOG_ENVIO".to_string(),
            control_sheet: "CONTROLE_APP".to_string(),
            adhoc_sheet: "LISTA_PONTUAL".to_string(),
        }
    }
}

// CRM_GERAL
pub const CRM_WHATSAPP: &str = "WHATSAPP";
pub const CRM_NAME: &str = "NOME";
pub const CRM_STATUS: &str = "STATUS";
pub const CRM_PRIORITY: &str = "PRIORIDADE";
pub const CRM_DAYS_INACTIVE: &str = "DIAS DE INATIVIDADE";
pub const CRM_TOTAL_ORDERS: &str = "TOTAL DE PEDIDOS";
pub const CRM_NEXT_CONTACT: &str = "PROXIMO CONTATO PERMITIDO";
pub const CRM_LAST_CONTACT: &str = "ULTIMO CONTATO";
pub const CRM_CAMPAIGN_OF_DAY: &str = "CAMPANHA DO DIA";
pub const CRM_ELIGIBLE: &str = "ELEGIVEL";

// CONFIGURACAO
pub const RULE_STATUS: &str = "STATUS";
pub const RULE_QUANTITY: &str = "QTD POR DIA";
pub const RULE_CAMPAIGN: &str = "CAMPANHA";
pub const RULE_MESSAGE: &str = "MENSAGEM";

// LOG_ENVIO
pub const LOG_DATE: &str = "DATA ENVIO";
pub const LOG_WHATSAPP: &str = "WHATSAPP";
pub const LOG_STATUS: &str = "STATUS DO DIA";
pub const LOG_CAMPAIGN: &str = "CAMPANHA";

// LISTA_PONTUAL
pub const ADHOC_WHATSAPP: &str = "WHATSAPP";
pub const ADHOC_NAME: &str = "NOME";
pub const ADHOC_STATUS: &str = "STATUS";
pub const ADHOC_CAMPAIGN: &str = "CAMPANHA";
pub const ADHOC_SENT: &str = "ENVIADO?";

// CONTROLE_APP: columna A = clave, columna B = valor
pub const DAILY_LIST_THROTTLE_KEY: &str = "LISTA_FIXA_LAST_DATE";
pub const ADHOC_LIST_THROTTLE_KEY: &str = "LISTA_PONTUAL_LAST_DATE";
