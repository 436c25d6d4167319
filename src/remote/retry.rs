//! Bounded retry with exponential backoff for external calls.
//!
//! Every batch of work (a fingerprint batch, one group's member set, a
//! description batch) moves through a small state machine:
//!
//! ```text
//! Pending -> InFlight(1) -> Succeeded
//!                        -> Retrying(1) -> InFlight(2) -> ...
//!                        -> PermanentlyFailed
//! ```
//!
//! A failed attempt is retried only when the error is transient and the
//! attempt budget is not exhausted. Each attempt is bounded by a timeout.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info};

use crate::remote::FetchError;

/// Lifecycle of one unit of external work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Pending,
    InFlight { attempt: u32 },
    /// Attempt `attempt` failed transiently; another attempt will follow
    Retrying { attempt: u32 },
    Succeeded { attempts: u32 },
    PermanentlyFailed { attempts: u32 },
}

impl BatchState {
    /// Move to the next in-flight attempt. Terminal and in-flight states are unchanged.
    #[must_use]
    pub fn dispatch(self) -> Self {
        match self {
            Self::Pending => Self::InFlight { attempt: 1 },
            Self::Retrying { attempt } => Self::InFlight {
                attempt: attempt + 1,
            },
            other => other,
        }
    }

    /// Transition taken when the in-flight attempt completes
    #[must_use]
    pub fn complete(self, succeeded: bool, transient: bool, max_attempts: u32) -> Self {
        match self {
            Self::InFlight { attempt } if succeeded => Self::Succeeded { attempts: attempt },
            Self::InFlight { attempt } if transient && attempt < max_attempts => {
                Self::Retrying { attempt }
            }
            Self::InFlight { attempt } => Self::PermanentlyFailed { attempts: attempt },
            other => other,
        }
    }

    /// Number of attempts started so far
    #[must_use]
    pub fn attempts(self) -> u32 {
        match self {
            Self::Pending => 0,
            Self::InFlight { attempt } | Self::Retrying { attempt } => attempt,
            Self::Succeeded { attempts } | Self::PermanentlyFailed { attempts } => attempts,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Succeeded { .. } | Self::PermanentlyFailed { .. }
        )
    }
}

/// Result of driving one unit of work to a terminal state
#[derive(Debug)]
pub struct Attempt<T> {
    pub outcome: Result<T, FetchError>,
    pub attempts: u32,
}

impl<T> Attempt<T> {
    /// Attempts beyond the first
    #[must_use]
    pub fn retries(&self) -> u32 {
        self.attempts.saturating_sub(1)
    }
}

/// Retry and timeout settings shared by all external calls in a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per unit of work, including the first (>= 1)
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Cap on any single delay
    pub max_backoff: Duration,
    /// Bound on each individual attempt
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(8),
            timeout: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Policy with no delay between attempts
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Delay after `failed_attempt` (1-based): initial * 2^(n-1), capped
    #[must_use]
    pub fn backoff_for(&self, failed_attempt: u32) -> Duration {
        let exponent = failed_attempt.saturating_sub(1).min(16);
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(exponent))
            .min(self.max_backoff)
    }

    /// Drive `op` to a terminal state, retrying transient failures.
    ///
    /// `op` is invoked once per attempt. `label` names the unit of work in logs.
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Attempt<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut state = BatchState::Pending.dispatch();

        loop {
            let result = match tokio::time::timeout(self.timeout, op()).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(self.timeout)),
            };

            let transient = result.as_ref().err().is_some_and(FetchError::is_transient);
            state = state.complete(result.is_ok(), transient, max_attempts);

            match (state, result) {
                (BatchState::Retrying { attempt }, Err(err)) => {
                    let delay = self.backoff_for(attempt);
                    info!("{label}: attempt {attempt}/{max_attempts} failed ({err}), retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                    state = state.dispatch();
                }
                (_, Ok(value)) => {
                    debug!("{label}: succeeded after {} attempt(s)", state.attempts());
                    return Attempt {
                        outcome: Ok(value),
                        attempts: state.attempts(),
                    };
                }
                (_, Err(err)) => {
                    info!("{label}: giving up after {} attempt(s): {err}", state.attempts());
                    return Attempt {
                        outcome: Err(err),
                        attempts: state.attempts(),
                    };
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn server_error() -> FetchError {
        FetchError::Status {
            status: 503,
            url: "http://example.test".to_string(),
        }
    }

    #[test]
    fn test_state_transitions() {
        let state = BatchState::Pending.dispatch();
        assert_eq!(state, BatchState::InFlight { attempt: 1 });

        let state = state.complete(false, true, 3);
        assert_eq!(state, BatchState::Retrying { attempt: 1 });
        assert!(!state.is_terminal());

        let state = state.dispatch().complete(true, false, 3);
        assert_eq!(state, BatchState::Succeeded { attempts: 2 });
        assert!(state.is_terminal());
    }

    #[test]
    fn test_attempt_budget_exhausted() {
        let state = BatchState::InFlight { attempt: 3 }.complete(false, true, 3);
        assert_eq!(state, BatchState::PermanentlyFailed { attempts: 3 });
    }

    #[test]
    fn test_permanent_error_is_not_retried() {
        let state = BatchState::InFlight { attempt: 1 }.complete(false, false, 3);
        assert_eq!(state, BatchState::PermanentlyFailed { attempts: 1 });
    }

    #[test]
    fn test_backoff_is_exponential_and_capped() {
        let policy = RetryPolicy {
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(3),
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff_for(1), Duration::from_millis(500));
        assert_eq!(policy.backoff_for(2), Duration::from_secs(1));
        assert_eq!(policy.backoff_for(3), Duration::from_secs(2));
        assert_eq!(policy.backoff_for(4), Duration::from_secs(3));
        assert_eq!(policy.backoff_for(40), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_run_recovers_from_transient_failure() {
        let calls = &AtomicU32::new(0);
        let attempt = RetryPolicy::immediate(3)
            .run("test", move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(server_error())
                } else {
                    Ok(42)
                }
            })
            .await;

        assert_eq!(attempt.attempts, 2);
        assert_eq!(attempt.retries(), 1);
        assert_eq!(attempt.outcome.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_run_gives_up_after_max_attempts() {
        let calls = &AtomicU32::new(0);
        let attempt: Attempt<()> = RetryPolicy::immediate(3)
            .run("test", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(server_error())
            })
            .await;

        assert!(attempt.outcome.is_err());
        assert_eq!(attempt.attempts, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_run_stops_on_permanent_error() {
        let calls = &AtomicU32::new(0);
        let attempt: Attempt<()> = RetryPolicy::immediate(5)
            .run("test", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(FetchError::Decode("garbage".to_string()))
            })
            .await;

        assert!(attempt.outcome.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_run_times_out_slow_attempts() {
        let policy = RetryPolicy {
            timeout: Duration::from_millis(10),
            ..RetryPolicy::immediate(2)
        };
        let attempt: Attempt<()> = policy
            .run("slow", || async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(())
            })
            .await;

        assert!(matches!(attempt.outcome, Err(FetchError::Timeout(_))));
        assert_eq!(attempt.attempts, 2);
    }
}
