//! Retry policies and a generic retry combinator.
//!
//! The key-value store offers no compare-and-swap, so read-modify-write
//! updates are attempted, verified, and repeated on failure. Each caller picks
//! a [`RetryPolicy`]; [`retry`] applies it on top of `tokio-retry`.

use rand::Rng;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::RetryIf;
use tracing::warn;

type BackoffFn = Arc<dyn Fn(usize) -> Duration + Send + Sync>;

/// How many times to attempt an operation and how long to wait in between.
///
/// `backoff(n)` is the pause after the `n`-th failed attempt (1-based).
#[derive(Clone)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    backoff: BackoffFn,
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

impl RetryPolicy {
    /// Creates a policy from an attempt budget and a backoff function.
    ///
    /// A budget of zero is treated as one attempt.
    pub fn new(
        max_attempts: usize,
        backoff: impl Fn(usize) -> Duration + Send + Sync + 'static,
    ) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff: Arc::new(backoff),
        }
    }

    /// Constant pause of `base` plus a random `0..=spread`.
    pub fn jittered(max_attempts: usize, base: Duration, spread: Duration) -> Self {
        Self::new(max_attempts, move |_| base + random_up_to(spread))
    }

    /// `base` doubled after every failure, capped at `cap`, plus a random `0..=jitter`.
    pub fn exponential(max_attempts: usize, base: Duration, cap: Duration, jitter: Duration) -> Self {
        Self::new(max_attempts, move |attempt| {
            let shift = attempt.saturating_sub(1).min(20) as u32;
            base.saturating_mul(1u32 << shift).min(cap) + random_up_to(jitter)
        })
    }

    /// Retries without pausing.
    pub fn immediate(max_attempts: usize) -> Self {
        Self::new(max_attempts, |_| Duration::ZERO)
    }

    /// Policy for adding to a shared list: 5 attempts, 50-150ms apart.
    pub fn for_list_insert() -> Self {
        Self::jittered(5, Duration::from_millis(50), Duration::from_millis(100))
    }

    /// Policy for removing from a shared list: 10 attempts, exponential from
    /// 50ms up to 1s, plus up to 50ms jitter.
    pub fn for_list_removal() -> Self {
        Self::exponential(
            10,
            Duration::from_millis(50),
            Duration::from_millis(1000),
            Duration::from_millis(50),
        )
    }

    /// Pause after the `attempt`-th failure.
    pub fn backoff(&self, attempt: usize) -> Duration {
        (self.backoff)(attempt)
    }

    /// Pauses between consecutive attempts; one fewer than `max_attempts`.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let backoff = Arc::clone(&self.backoff);
        (1..self.max_attempts).map(move |attempt| backoff(attempt))
    }
}

fn random_up_to(spread: Duration) -> Duration {
    let max_ms = spread.as_millis() as u64;
    if max_ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=max_ms))
}

/// Returned when every attempt failed.
#[derive(Debug)]
pub struct RetryExhausted<E> {
    pub attempts: usize,
    pub last_error: E,
}

impl<E: fmt::Display> fmt::Display for RetryExhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gave up after {} attempts: {}",
            self.attempts, self.last_error
        )
    }
}

/// Runs `op` until it succeeds or the policy's attempt budget is spent.
///
/// `op` receives the 1-based attempt number. Every failure is retried; inputs
/// that can never succeed must be rejected before calling this.
pub async fn retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    label: &'static str,
    mut op: F,
) -> Result<T, RetryExhausted<E>>
where
    F: FnMut(usize) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut attempt = 0usize;
    let max_attempts = policy.max_attempts;

    let action = || {
        attempt += 1;
        op(attempt)
    };
    let condition = |e: &E| {
        warn!(operation = label, max_attempts, error = %e, "Attempt failed");
        metrics::counter!("sitebot_store_retries_total", "op" => label).increment(1);
        true
    };

    let result = RetryIf::start(policy.delays(), action, condition).await;

    result.map_err(|last_error| RetryExhausted {
        attempts: attempt,
        last_error,
    })
}
