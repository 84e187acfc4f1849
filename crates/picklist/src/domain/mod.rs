//! Pick-list domain: line items, progress, and their invariants.

pub mod errors;
pub mod model;
