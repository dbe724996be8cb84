// kart/src/pipeline/mod.rs

//! A small async step pipeline: named steps, skip conditions, and handlers that share a
//! lock-protected context. Order placement is expressed as one of these.

pub mod context_data;
pub mod definition;
pub mod execution;
pub mod step;

pub use context_data::ContextData;
pub use definition::{Handler, Pipeline};
pub use step::{SkipCondition, StepDef};
