//! atweave-mappings - Multi-Namespace Identifier Mapping Table
//!
//! Immutable record of every class, field, and method identifier of a
//! codebase, translated across a fixed ordered set of naming schemes
//! ("namespaces"). Loaded once per run, indexed for O(1) lookup, and
//! read-only thereafter.
//!
//! ## Core Contract
//!
//! 1. A query for an identifier unknown in the source namespace is a
//!    miss (`Ok(None)`), never an error.
//! 2. An identifier known in the source namespace but absent in the
//!    target namespace is mapping corruption and fails fast with
//!    [`MappingError::MissingCounterpart`].
//! 3. Field descriptors are namespace-invariant; method descriptors and
//!    member owners are translated through the class map.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use atweave_mappings::read_tiny_file;
//!
//! let mappings = read_tiny_file(Path::new("mappings.tiny"))?;
//! let named = mappings.map_class("official", "named", "a")?;
//! let pool = mappings.class_pool("intermediary")?;
//! ```

pub mod domain;
pub mod error;
pub mod infrastructure;

pub use domain::{ClassMapping, MappingSet, MemberMapping, MemberRef};
pub use error::{MappingError, Result};
pub use infrastructure::{read_tiny, read_tiny_file};
