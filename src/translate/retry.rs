//! Retry with randomized backoff for translation calls.
//!
//! Translation failures are assumed transient (rate limits, flaky network),
//! so each text unit gets a bounded number of attempts with a randomized
//! pause between them. When every attempt fails, the original text is kept:
//! an untranslated cue at the right time beats a missing one.

use crate::error::Result;
use crate::services::Translator;
use crate::{defaults, error::SublinguaError};
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;
use tracing::warn;

/// Attempt and backoff bounds for one translation unit.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts per unit, including the first.
    pub max_attempts: u32,
    /// Lower bound of the randomized pause between attempts (ms).
    pub backoff_min_ms: u64,
    /// Upper bound of the randomized pause between attempts (ms).
    pub backoff_max_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: defaults::TRANSLATION_MAX_ATTEMPTS,
            backoff_min_ms: defaults::BACKOFF_MIN_MS,
            backoff_max_ms: defaults::BACKOFF_MAX_MS,
        }
    }
}

impl RetryPolicy {
    fn backoff(&self) -> Duration {
        let ms = rand::rng().random_range(self.backoff_min_ms..=self.backoff_max_ms);
        Duration::from_millis(ms)
    }
}

/// Sleep seam, mockable so retry tests run instantly.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real delay backed by the tokio timer.
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// No-op delay for tests.
pub struct NoopDelay;

#[async_trait]
impl Delay for NoopDelay {
    async fn sleep(&self, _duration: Duration) {}
}

/// Translate one unit, retrying per `policy`.
///
/// Returns `Ok(translated)` on any successful attempt; after the last
/// failure, returns `Err` with the final error so the caller can decide to
/// fall back.
pub async fn translate_with_retry(
    translator: &dyn Translator,
    delay: &dyn Delay,
    policy: &RetryPolicy,
    text: &str,
    source: &str,
    target: &str,
) -> Result<String> {
    let attempts = policy.max_attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        match translator.translate(text, source, target).await {
            Ok(translated) => return Ok(translated),
            Err(e) => {
                warn!(attempt, max = attempts, error = %e, "translation attempt failed");
                last_error = Some(e);
                if attempt < attempts {
                    delay.sleep(policy.backoff()).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or(SublinguaError::Translation {
        message: "translation failed with no recorded error".to_string(),
    }))
}
