//! Ordered resolution strategies.
//!
//! The backend's scoped endpoints are unreliable, so several pages resolve a
//! value by trying a list of independent strategies in order and keeping the
//! first success. Each strategy is a small type implementing [`Strategy`] and
//! can be tested on its own; [`first_success`] is the combinator.
//!
//! An `Unauthorized` failure stops the chain: retrying other endpoints with the
//! same session cannot succeed.

use async_trait::async_trait;

use crate::repository::{ServiceError, ServiceResult};

#[async_trait]
pub trait Strategy<I, T>: Send + Sync
where
    I: Sync + ?Sized,
{
    /// Stable name used in logs and in [`Resolved::strategy`].
    fn name(&self) -> &'static str;

    async fn attempt(&self, input: &I) -> ServiceResult<T>;
}

/// A failed attempt, kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub strategy: &'static str,
    pub error: ServiceError,
}

#[derive(Debug)]
pub struct Resolved<T> {
    pub value: T,
    pub strategy: &'static str,
    /// Strategies that failed before `strategy` succeeded.
    pub failures: Vec<Failure>,
}

#[derive(Debug, thiserror::Error)]
#[error("all {} resolution strategies failed", .failures.len())]
pub struct Exhausted {
    pub failures: Vec<Failure>,
}

impl Exhausted {
    pub fn is_unauthorized(&self) -> bool {
        self.failures.iter().any(|f| f.error.is_unauthorized())
    }

    pub fn last_error(&self) -> Option<&ServiceError> {
        self.failures.last().map(|f| &f.error)
    }
}

pub async fn first_success<I, T>(
    input: &I,
    chain: &[&dyn Strategy<I, T>],
) -> Result<Resolved<T>, Exhausted>
where
    I: Sync + ?Sized,
{
    let mut failures = Vec::new();

    for strategy in chain {
        match strategy.attempt(input).await {
            Ok(value) => {
                if !failures.is_empty() {
                    tracing::info!(
                        strategy = strategy.name(),
                        skipped = failures.len(),
                        "Resolved via fallback strategy"
                    );
                }
                return Ok(Resolved {
                    value,
                    strategy: strategy.name(),
                    failures,
                });
            }
            Err(error) => {
                tracing::warn!(strategy = strategy.name(), %error, "Resolution strategy failed");
                let stop = error.is_unauthorized();
                failures.push(Failure {
                    strategy: strategy.name(),
                    error,
                });
                if stop {
                    break;
                }
            }
        }
    }

    Err(Exhausted { failures })
}
