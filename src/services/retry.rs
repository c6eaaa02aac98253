//! services/retry.rs
//! Política genérica de reintentos con backoff exponencial.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 6,
            initial_delay: Duration::from_secs(1),
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay,
            ..Self::default()
        }
    }

    /// Espera después del intento `attempt` (1-based): initial * multiplier^(attempt-1).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self
            .multiplier
            .max(1)
            .saturating_pow(attempt.saturating_sub(1));
        self.initial_delay.saturating_mul(factor)
    }

    /// Ejecuta `op` hasta `max_attempts` veces. Sólo reintenta cuando
    /// `is_retryable` acepta el error; cualquier otro error se propaga de inmediato.
    /// Tras el último intento se devuelve el último error.
    pub async fn run<T, E, F, Fut, P>(&self, label: &str, mut op: F, is_retryable: P) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: Display,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt < attempts && is_retryable(&err) => {
                    let delay = self.delay_for(attempt);
                    log::warn!(
                        "({}) reintento {}/{} tras error: {} (espera {:?})",
                        label,
                        attempt,
                        attempts,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
