pub mod constant;
pub mod index;

pub use index::{Accesses, Collection, Database, Index, IndexSnapshot, IndexUsage, Provenance};
