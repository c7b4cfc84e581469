//! Field descriptor model and builder layer

mod base;
mod builders;
mod kinds;

pub use base::*;
pub use builders::*;
pub use kinds::*;
