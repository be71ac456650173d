//! atweave-transform - Access Transformer Resolution and Application
//!
//! Resolves human-authored access transformer directives (requests to
//! loosen or tighten the visibility of classes, fields, methods, and
//! constructors inside a compiled archive) across every namespace of a
//! mapping table, then verifies and applies the result through a binary
//! patcher collaborator.
//!
//! ## Core Contract
//!
//! 1. **Fail-closed resolution**: nothing is patched unless every
//!    directive is provably resolvable in every target namespace. A
//!    resolution failure enumerates every unresolved owner and member.
//! 2. **Constructor special case**: `<init>` signatures never appear in
//!    the mapping table but still propagate, with their parameter types
//!    rewritten through the class map.
//! 3. **Fail-late verification**: after patching, any requested class the
//!    patcher could not locate fails the run, but already-patched classes
//!    are not rolled back.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use atweave_transform::{read_directives_file, run, TargetArchive, TransformRequest};
//!
//! let mappings = atweave_mappings::read_tiny_file(Path::new("mappings.tiny"))?;
//! let directives = read_directives_file(Path::new("widen.at"))?;
//! let request = TransformRequest {
//!     authoring_namespace: "named".into(),
//!     targets: vec![
//!         TargetArchive::new("named", "game-named.jar"),
//!         TargetArchive::new("intermediary", "game-intermediary.jar"),
//!     ],
//! };
//! run(&mappings, &directives, &request, &mut patcher)?;
//! ```

pub mod apply;
pub mod directives;
pub mod domain;
pub mod error;
pub mod pipeline;
pub mod resolver;

pub use apply::{apply_namespace, ArchivePatcher, PatchOutcome, PatchRequest};
pub use directives::{read_directives, read_directives_file};
pub use domain::{Directive, MemberTarget, TransformPlan, TransformSet, UnresolvedReport};
pub use error::{Result, TransformError};
pub use pipeline::{run, TargetArchive, TransformRequest};
pub use resolver::resolve;
