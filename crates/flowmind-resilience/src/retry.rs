//! Retry wrapper with exponential backoff and jitter (§4.6 C7).

use std::future::Future;
use std::time::Duration;

use flowmind_error::{FlowmindError, FlowmindErrorKind};
use tokio::time::sleep;
use tracing::warn;

/// Error-kinds that are never retried even if the error would otherwise
/// classify as retryable (§4.6 default non-retryable set).
const NON_RETRYABLE_KINDS: &[FlowmindErrorKind] = &[
    FlowmindErrorKind::Validation,
    FlowmindErrorKind::Config,
    FlowmindErrorKind::NotFound,
];

/// Message substrings that mark an error non-retryable regardless of kind
/// (§4.6 canonical pattern list).
const NON_RETRYABLE_PATTERNS: &[&str] = &[
    "validation",
    "invalid",
    "unauthorized",
    "forbidden",
    "not found",
    "permission",
];

/// Retry backoff configuration (§4.6).
#[derive(Debug, Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(30),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Delay before attempt `n` (0-indexed retry count), per §4.6:
    /// `delay_n = min(max_delay, initial_delay * multiplier^n)`, perturbed
    /// by ±25% when `jitter` is set.
    #[must_use]
    pub fn delay_for(&self, n: u32) -> Duration {
        let base_ms = self.initial_delay.as_millis() as f64;
        let scaled_ms = base_ms * self.multiplier.powi(n as i32);
        let capped_ms = scaled_ms.min(self.max_delay.as_millis() as f64);

        let jittered_ms = if self.jitter {
            use rand::Rng;
            capped_ms * rand::rng().random_range(0.75..=1.25)
        } else {
            capped_ms
        };

        Duration::from_millis(jittered_ms.max(0.0) as u64)
    }
}

/// Whether `error` should be retried under the default classification
/// (§4.6): non-retryable kind or message pattern overrides the error's own
/// [`FlowmindError::is_retryable`].
#[must_use]
pub fn is_retryable(error: &FlowmindError) -> bool {
    if NON_RETRYABLE_KINDS.contains(error.kind()) {
        return false;
    }
    let message = error.message().to_lowercase();
    if NON_RETRYABLE_PATTERNS.iter().any(|pattern| message.contains(pattern)) {
        return false;
    }
    error.is_retryable()
}

/// State accumulated across attempts, surfaced to the dead-letter queue on
/// exhaustion (§4.6 `retry_state`).
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct RetryState {
    pub attempt: u32,
    pub started_at: Option<chrono::DateTime<chrono::Utc>>,
    pub last_error: Option<String>,
}

/// Run `f`, retrying on retryable failure up to `config.max_retries`
/// additional times (`max_retries + 1` attempts total), sleeping between
/// attempts per [`RetryConfig::delay_for`]. Returns the final error and the
/// accumulated [`RetryState`] on exhaustion.
pub async fn with_retry<F, Fut, T>(mut f: F, config: &RetryConfig) -> Result<T, (FlowmindError, RetryState)>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, FlowmindError>>,
{
    let mut state = RetryState {
        attempt: 0,
        started_at: Some(chrono::Utc::now()),
        last_error: None,
    };

    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(error) => {
                state.last_error = Some(error.to_string());
                if state.attempt >= config.max_retries || !is_retryable(&error) {
                    return Err((error, state));
                }
                let delay = config.delay_for(state.attempt);
                warn!(attempt = state.attempt, ?delay, error = %error, "retrying after failure");
                state.attempt += 1;
                sleep(delay).await;
            }
        }
    }
}
