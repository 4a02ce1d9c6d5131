//! Rule ingestion, query dispatch, and the adaptive indexing controller
//! built on top of `spocp-core`'s grammar/comparator and `spocp-store`'s
//! append-only storage.

pub mod controller;
pub mod engine;

pub use controller::AdaptiveController;
pub use engine::DecisionEngine;
