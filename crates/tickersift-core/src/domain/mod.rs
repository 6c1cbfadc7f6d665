//! Domain types shared across the screening pipeline.

mod snapshot;
mod symbol;

pub use snapshot::QuoteSnapshot;
pub use symbol::Symbol;
