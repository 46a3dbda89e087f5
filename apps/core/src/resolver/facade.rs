//! # MathQueryResolver
//!
//! Single entry point: one free-text query in, one [`MathReply`] out.
//!
//! ## Pipeline
//! 1. Empty or whitespace-only input gets a prompt back.
//! 2. Over-long input is rejected before any regex work.
//! 3. Unit conversion phrases are answered directly.
//! 4. The relevance gate turns away text with no math in it.
//! 5. Classification, parsing and the engine call; any [`MathError`] is
//!    rendered here and nowhere else.

use crate::config::ResolverConfig;
use crate::engine::{PolyEngine, SymbolicEngine};
use crate::error::{MathError, ParseError};
use crate::resolver::conversion::convert;
use crate::resolver::dispatcher::OperationDispatcher;
use crate::resolver::gate::is_math_query;
use crate::resolver::operation::OperationClassifier;
use crate::resolver::reply::MathReply;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info_span, warn};
use uuid::Uuid;

pub const EMPTY_QUERY_REPLY: &str = "Please enter a math question.";
pub const NOT_MATH_REPLY: &str = "I cannot solve this math problem.";

/// Stateless resolver. Shareable across threads behind an `Arc`.
#[derive(Debug, Clone)]
pub struct MathQueryResolver<E = PolyEngine> {
    engine: E,
    max_query_chars: usize,
}

impl MathQueryResolver<PolyEngine> {
    pub fn new() -> Self {
        Self::with_engine(PolyEngine)
    }
}

impl Default for MathQueryResolver<PolyEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: SymbolicEngine> MathQueryResolver<E> {
    pub fn with_engine(engine: E) -> Self {
        Self {
            engine,
            max_query_chars: ResolverConfig::default().max_query_chars,
        }
    }

    pub fn with_max_query_chars(mut self, limit: usize) -> Self {
        self.max_query_chars = limit;
        self
    }

    pub fn from_config(engine: E, config: &ResolverConfig) -> Self {
        Self::with_engine(engine).with_max_query_chars(config.max_query_chars)
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn max_query_chars(&self) -> usize {
        self.max_query_chars
    }

    pub fn handle_math_query(&self, text: &str) -> MathReply {
        let query_id = Uuid::new_v4();
        let span = info_span!("math_query", %query_id);
        let _guard = span.enter();

        if text.trim().is_empty() {
            return MathReply::handled(EMPTY_QUERY_REPLY);
        }

        if text.chars().count() > self.max_query_chars {
            warn!(limit = self.max_query_chars, "query too long");
            let err = MathError::from(ParseError::TooLong {
                limit: self.max_query_chars,
            });
            return MathReply::handled(err.to_reply());
        }

        let conversion = convert(text);
        if conversion.handled {
            debug!("answered as unit conversion");
            return MathReply::handled(conversion.reply.unwrap_or_default());
        }

        if !is_math_query(text) {
            debug!("not math related");
            return MathReply::not_handled(NOT_MATH_REPLY);
        }

        match panic::catch_unwind(AssertUnwindSafe(|| self.run_pipeline(text))) {
            Ok(Ok(reply)) => MathReply::handled(reply),
            Ok(Err(err)) => {
                warn!(error = %err, "math pipeline failed");
                MathReply::handled(err.to_reply())
            }
            Err(_) => {
                error!("engine panicked");
                let err = MathError::Computation("internal engine failure".to_string());
                MathReply::handled(err.to_reply())
            }
        }
    }

    fn run_pipeline(&self, text: &str) -> Result<String, MathError> {
        let classification = OperationClassifier::classify_detailed(text);
        debug!(
            operation = %classification.operation,
            expression = %classification.expression,
            "classified"
        );
        OperationDispatcher::new(&self.engine)
            .dispatch(classification.operation, &classification.expression)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let resolver = MathQueryResolver::new();
        for text in ["", "   ", "\n\t"] {
            assert_eq!(
                resolver.handle_math_query(text),
                MathReply::handled(EMPTY_QUERY_REPLY)
            );
        }
    }

    #[test]
    fn test_length_limit() {
        let resolver = MathQueryResolver::new().with_max_query_chars(10);
        let reply = resolver.handle_math_query("1 + 1 + 1 + 1 + 1");
        assert!(reply.handled);
        assert_eq!(
            reply.reply,
            "Error parsing math expression: input exceeds 10 characters"
        );
    }

    #[test]
    fn test_conversion_before_gate() {
        let reply = MathQueryResolver::new().handle_math_query("100 C to F");
        assert_eq!(reply, MathReply::handled("100.0°C = 212.0°F"));
    }

    #[test]
    fn test_not_math() {
        let reply = MathQueryResolver::new().handle_math_query("hello there");
        assert_eq!(reply, MathReply::not_handled(NOT_MATH_REPLY));
    }
}
