//! Test Module
//!
//! Cross-module test suite for the math query resolver.
//!
//! ## Test Categories
//! - `resolver_tests`: End-to-end replies through `MathQueryResolver`
//! - `dispatcher_tests`: Dispatch and reply formatting against a canned engine
//! - `engine_tests`: `PolyEngine` behaviour through the `SymbolicEngine` trait
//! - `config_tests`: Environment and env-file configuration loading
//! - `property_tests`: Randomised robustness checks (quickcheck)

pub mod dispatcher_tests;
pub mod property_tests;
