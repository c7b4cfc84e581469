//! Conditional and value resolution engine

mod context;
mod dynamic;
mod engine;

pub use context::*;
pub use dynamic::*;
pub use engine::*;
