pub mod index;

pub use index::LookupIndex;
