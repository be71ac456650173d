//! Verifier/Applicator
//!
//! Hands one namespace's transform set to the binary patcher and checks
//! afterwards that every requested class was actually found and patched.
//! Patching mutates the archive in place; a completeness failure does not
//! roll the archive back (fail-late, matching the surrounding build).

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{MemberTarget, TransformSet};
use crate::error::{Result, TransformError};
use atweave_mappings::MappingSet;

/// One class the patcher must locate and transform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchRequest {
    /// Class name in the archive's namespace
    pub class: String,
    /// Targets to widen/narrow within that class
    pub targets: std::collections::BTreeSet<MemberTarget>,
}

/// What the patcher did for one requested class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOutcome {
    /// Archive entry path (`<class>.class`)
    pub entry_path: String,
    /// Whether the entry was found and its access flags rewritten
    pub patched: bool,
}

/// Port for the external binary patcher collaborator.
///
/// Implementations own all archive/zip I/O and class-file rewriting.
/// They must return one outcome per request; `class_pool` is the full
/// set of class names known in the archive's namespace, for inner-class
/// access decisions.
pub trait ArchivePatcher {
    fn locate_and_patch(
        &mut self,
        archive: &Path,
        requests: &[PatchRequest],
        class_pool: &HashSet<String>,
    ) -> Result<Vec<PatchOutcome>>;
}

/// Apply one namespace's transforms to its archive and verify completeness.
///
/// Fails with [`TransformError::IncompletePatch`] listing every class the
/// patcher did not transform, with archive-entry suffixes stripped. The
/// classes that did patch stay patched.
pub fn apply_namespace(
    mappings: &MappingSet,
    namespace: &str,
    transforms: &TransformSet,
    archive: &Path,
    patcher: &mut dyn ArchivePatcher,
) -> Result<()> {
    let class_pool = mappings.class_pool(namespace)?;

    let requests: Vec<PatchRequest> = transforms
        .iter()
        .map(|(class, targets)| PatchRequest {
            class: class.clone(),
            targets: targets.clone(),
        })
        .collect();

    debug!(
        namespace,
        requests = requests.len(),
        archive = %archive.display(),
        "patching archive"
    );
    let outcomes = patcher.locate_and_patch(archive, &requests, &class_pool)?;

    // Verify against the request list, not the outcome list: a patcher
    // that returns fewer outcomes than requests must not pass.
    let patched: HashSet<&str> = outcomes
        .iter()
        .filter(|outcome| outcome.patched)
        .map(|outcome| {
            outcome
                .entry_path
                .strip_suffix(".class")
                .unwrap_or(&outcome.entry_path)
        })
        .collect();

    let missed: Vec<String> = requests
        .iter()
        .filter(|request| !patched.contains(request.class.as_str()))
        .map(|request| request.class.clone())
        .collect();

    if missed.is_empty() {
        Ok(())
    } else {
        warn!(namespace, ?missed, "patcher missed requested classes");
        Err(TransformError::IncompletePatch {
            namespace: namespace.to_owned(),
            missed,
        })
    }
}
