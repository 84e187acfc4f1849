//! Application layer orchestrating domain logic and infrastructure.

pub mod engine;
pub mod parse;
pub mod session;
