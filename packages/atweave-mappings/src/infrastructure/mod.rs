//! Mapping sources
//!
//! Adapters that load a `MappingSet` from persisted rename data.

pub mod tiny;

pub use tiny::{read_tiny, read_tiny_file};
