//! # Resolver Module
//!
//! Turns a free-text question into a short textual answer.
//!
//! ## Components
//! - **Conversion**: temperature and length phrases answered directly
//! - **Gate**: cheap check for anything math-like
//! - **Extractor**: pulls the most plausible expression out of prose
//! - **Operation**: ordered trigger table (derivative, integral, ...)
//! - **Parser**: the only place query text becomes an expression
//! - **Dispatcher**: engine call and reply formatting per operation
//! - **Facade**: [`MathQueryResolver`], ties the stages together

pub mod conversion;
pub mod dispatcher;
pub mod extractor;
pub mod facade;
pub mod gate;
pub mod operation;
pub mod parser;
pub mod reply;

pub use conversion::{convert, ConversionMatch, ConversionResult, Unit};
pub use dispatcher::{OperationDispatcher, CALCULUS_VARIABLE};
pub use extractor::extract;
pub use facade::MathQueryResolver;
pub use gate::is_math_query;
pub use operation::{Classification, Operation, OperationClassifier};
pub use parser::SafeExpressionParser;
pub use reply::MathReply;
