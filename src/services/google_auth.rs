//! services/google_auth.rs
//! Token OAuth2 de una cuenta de servicio (JWT firmado RS256 con openssl).

use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::{DateTime, Duration, Utc};
use openssl::hash::MessageDigest;
use openssl::pkey::PKey;
use openssl::sign::Signer;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::error::GatewayError;

/// Lectura: planilla y drive sólo lectura.
pub const READ_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets.readonly",
    "https://www.googleapis.com/auth/drive.readonly",
];

/// Escritura: planilla y drive.
pub const WRITE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

/// Margen antes del vencimiento para pedir un token nuevo.
const REFRESH_MARGIN_SECS: i64 = 60;
const ASSERTION_LIFETIME_SECS: i64 = 3600;

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

impl ServiceAccountKey {
    pub fn from_file(path: &Path) -> Result<Self, GatewayError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GatewayError::Auth(format!("no se pudo leer {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            GatewayError::Auth(format!("credencial inválida en {}: {}", path.display(), e))
        })
    }
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

/// Provee tokens de acceso para un conjunto de scopes, con cache hasta el vencimiento.
#[derive(Clone)]
pub struct TokenProvider {
    key: Arc<ServiceAccountKey>,
    scopes: String,
    http_client: Client,
    cached: Arc<Mutex<Option<CachedToken>>>,
}

impl TokenProvider {
    pub fn new(key: Arc<ServiceAccountKey>, scopes: &[&str], http_client: Client) -> Self {
        Self {
            key,
            scopes: scopes.join(" "),
            http_client,
            cached: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn access_token(&self) -> Result<String, GatewayError> {
        let mut guard = self.cached.lock().await;
        let now = Utc::now();
        if let Some(tok) = guard.as_ref() {
            if tok.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now {
                return Ok(tok.access_token.clone());
            }
        }

        log::info!(
            "(access_token) Solicitando token para {} (scopes='{}')",
            self.key.client_email,
            self.scopes
        );
        let assertion = build_assertion(&self.key, &self.scopes, now)?;
        let resp = self
            .http_client
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GatewayError::Auth(format!(
                "intercambio de token falló ({}): {}",
                status, body
            )));
        }
        let token: TokenResponse = resp.json().await?;
        let cached = CachedToken {
            access_token: token.access_token,
            expires_at: now + Duration::seconds(token.expires_in),
        };
        let access = cached.access_token.clone();
        *guard = Some(cached);
        Ok(access)
    }
}

/// `header.claims.firma`, todo en base64url sin padding.
pub fn build_assertion(
    key: &ServiceAccountKey,
    scopes: &str,
    now: DateTime<Utc>,
) -> Result<String, GatewayError> {
    let header = serde_json::json!({ "alg": "RS256", "typ": "JWT" });
    let claims = serde_json::json!({
        "iss": key.client_email,
        "scope": scopes,
        "aud": key.token_uri,
        "iat": now.timestamp(),
        "exp": now.timestamp() + ASSERTION_LIFETIME_SECS,
    });
    let signing_input = format!(
        "{}.{}",
        URL_SAFE_NO_PAD.encode(header.to_string()),
        URL_SAFE_NO_PAD.encode(claims.to_string())
    );

    let signature = sign_rs256(&key.private_key, signing_input.as_bytes())
        .map_err(|e| GatewayError::Auth(format!("no se pudo firmar el JWT: {}", e)))?;

    Ok(format!("{}.{}", signing_input, URL_SAFE_NO_PAD.encode(signature)))
}

fn sign_rs256(private_key_pem: &str, data: &[u8]) -> Result<Vec<u8>, openssl::error::ErrorStack> {
    let pkey = PKey::private_key_from_pem(private_key_pem.as_bytes())?;
    let mut signer = Signer::new(MessageDigest::sha256(), &pkey)?;
    signer.update(data)?;
    signer.sign_to_vec()
}
