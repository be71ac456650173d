//! Resolve → apply pipeline
//!
//! Single-threaded, batch-oriented: the whole resolve, build, and
//! verify/apply sequence runs to completion before returning. The caller
//! supplies archives that are already remapped into each target
//! namespace and consistent with the mapping table.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::apply::{apply_namespace, ArchivePatcher};
use crate::domain::Directive;
use crate::error::Result;
use crate::resolver;
use atweave_mappings::MappingSet;

/// One target namespace and the archive renamed into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetArchive {
    pub namespace: String,
    pub archive: PathBuf,
}

impl TargetArchive {
    pub fn new(namespace: impl Into<String>, archive: impl Into<PathBuf>) -> Self {
        Self {
            namespace: namespace.into(),
            archive: archive.into(),
        }
    }
}

/// One full transform run: authoring namespace plus target archives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformRequest {
    pub authoring_namespace: String,
    pub targets: Vec<TargetArchive>,
}

/// Resolve `directives` against `mappings` and patch every target archive.
///
/// Fail-closed before any mutation: no archive is touched unless every
/// directive resolved in every target namespace. Patch verification is
/// fail-late per archive: earlier archives stay mutated if a later one
/// comes up short.
pub fn run(
    mappings: &MappingSet,
    directives: &[Directive],
    request: &TransformRequest,
    patcher: &mut dyn ArchivePatcher,
) -> Result<()> {
    info!(classes = mappings.class_count(), "mapping table loaded");

    let target_names: Vec<String> = request
        .targets
        .iter()
        .map(|target| target.namespace.clone())
        .collect();
    let plan = resolver::resolve(mappings, directives, &request.authoring_namespace, &target_names)?;
    info!(classes = plan.class_count(), "classes need their access changed");

    for (target, (namespace, transforms)) in request.targets.iter().zip(plan.iter()) {
        debug_assert_eq!(target.namespace, namespace);
        info!(namespace, archive = %target.archive.display(), "transforming archive");
        apply_namespace(mappings, namespace, transforms, &target.archive, patcher)?;
    }

    info!("transformation complete");
    Ok(())
}
