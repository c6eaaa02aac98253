//! error.rs
//! Errores del acceso a la planilla (gateway). El resto de la app usa anyhow.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Falta una columna obligatoria en el cabecero: error de configuración, fatal.
    #[error("{sheet}: columna '{column}' no encontrada en el cabecero")]
    MissingColumn { sheet: String, column: String },

    #[error("{sheet}: columna '{column}' aparece duplicada en el cabecero")]
    DuplicateColumn { sheet: String, column: String },

    /// Cuota de la API agotada (429). Se reintenta con backoff.
    #[error("cuota de la API excedida tras {attempts} intento(s): {message}")]
    RateLimited { attempts: u32, message: String },

    /// Escritura rechazada por un rango protegido. No se reintenta.
    #[error("{sheet}: escritura bloqueada por protección de la planilla: {message}")]
    Protected { sheet: String, message: String },

    #[error("hoja '{0}' no encontrada")]
    SheetNotFound(String),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),

    #[error("autenticación: {0}")]
    Auth(String),

    #[error("datos inválidos: {0}")]
    InvalidData(String),
}

impl GatewayError {
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GatewayError::RateLimited { .. })
    }

    /// Mensaje accionable para el operador cuando la planilla bloquea la escritura.
    pub fn protected_hint(&self) -> Option<String> {
        match self {
            GatewayError::Protected { sheet, .. } => Some(format!(
                "A conta de serviço não tem permissão para editar a aba {}. \
                 No Google Sheets, abra 'Dados > Proteger páginas e intervalos' e adicione o \
                 e-mail da conta de serviço como editor, ou libere as colunas \
                 'ULTIMO CONTATO' e 'CAMPANHA DO DIA'.",
                sheet
            )),
            _ => None,
        }
    }
}
