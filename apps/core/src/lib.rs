//! MathQuery core
//!
//! Natural-language math query resolver: unit conversions, a relevance gate,
//! operation classification and an exact symbolic engine behind a trait.

pub mod config;
pub mod driver;
pub mod engine;
pub mod error;
pub mod resolver;
pub mod telemetry;

#[cfg(test)]
mod tests;

pub use config::{LogFormat, ResolverConfig};
pub use engine::{PolyEngine, SymbolicEngine};
pub use error::{AppError, MathError, ParseError};
pub use resolver::{MathQueryResolver, MathReply};
