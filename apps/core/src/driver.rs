//! Caller-side time budget for queries.
//!
//! The resolver itself is synchronous. The driver runs each query on tokio's
//! blocking pool and stops waiting once the budget is spent; the abandoned
//! computation finishes in the background and its result is dropped.

use crate::engine::SymbolicEngine;
use crate::error::{AppError, MathError};
use crate::resolver::{MathQueryResolver, MathReply};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::warn;

pub fn timeout_reply(budget: Duration) -> MathReply {
    let err = MathError::Computation(format!(
        "computation timed out after {} ms",
        budget.as_millis()
    ));
    MathReply::handled(err.to_reply())
}

pub async fn resolve_with_timeout<E>(
    resolver: Arc<MathQueryResolver<E>>,
    query: String,
    budget: Duration,
) -> Result<MathReply, AppError>
where
    E: SymbolicEngine + 'static,
{
    let task = tokio::task::spawn_blocking(move || resolver.handle_math_query(&query));
    match timeout(budget, task).await {
        Ok(joined) => joined.map_err(|e| AppError::Internal(format!("query task failed: {}", e))),
        Err(_) => {
            warn!(budget_ms = budget.as_millis() as u64, "query timed out");
            Ok(timeout_reply(budget))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_resolves_within_budget() {
        let resolver = Arc::new(MathQueryResolver::new());
        let reply = resolve_with_timeout(resolver, "2 + 3".to_string(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(reply, MathReply::handled("Result: 5.0"));
    }

    #[test]
    fn test_timeout_reply_text() {
        assert_eq!(
            timeout_reply(Duration::from_millis(250)).reply,
            "Error parsing math expression: computation timed out after 250 ms"
        );
    }
}
