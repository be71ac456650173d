//! Domain layer for the namespace mapping table
//!
//! A `MappingSet` is an immutable record of every class, field, and method
//! identifier translated across a fixed, ordered set of namespaces. It is
//! loaded once per run and read-only thereafter, so it is safe to share
//! across threads.
//!
//! # Domain Models
//!
//! - `ClassMapping`: one logical class, named per namespace
//! - `MemberRef`: an (owner, name, descriptor) triple within one namespace
//! - `MemberMapping`: one logical field or method, referenced per namespace
//! - `MappingSet`: the indexed, queryable table

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{MappingError, Result};

pub mod descriptor;

// ═══════════════════════════════════════════════════════════════════════════
// Domain Models
// ═══════════════════════════════════════════════════════════════════════════

/// A class or member reference within a single namespace.
///
/// The descriptor distinguishes methods (parenthesized parameter list,
/// e.g. `(Lfoo/Bar;)V`) from fields (bare type descriptor, e.g. `I`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemberRef {
    /// Fully-qualified owner class name
    pub owner: String,

    /// Member name
    pub name: String,

    /// Type descriptor
    pub desc: String,
}

impl MemberRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            desc: desc.into(),
        }
    }

    /// Signature text (`name + descriptor`) as authored in directives
    pub fn signature(&self) -> String {
        format!("{}{}", self.name, self.desc)
    }

    /// Index key (`owner/name + descriptor`) for O(1) member lookup
    fn id(&self) -> String {
        format!("{}/{}{}", self.owner, self.name, self.desc)
    }
}

/// One logical class, with its name in every namespace.
///
/// `None` means the source data carried no name for that namespace; the
/// hole surfaces as `MappingError::MissingCounterpart` when queried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMapping {
    names: Vec<Option<String>>,
}

impl ClassMapping {
    pub fn new(names: Vec<Option<String>>) -> Self {
        Self { names }
    }

    /// Class name in the namespace at `ns` (by mapping-set order)
    pub fn name(&self, ns: usize) -> Option<&str> {
        self.names.get(ns).and_then(|n| n.as_deref())
    }
}

/// One logical field or method, with its reference in every namespace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberMapping {
    refs: Vec<Option<MemberRef>>,
}

impl MemberMapping {
    pub fn new(refs: Vec<Option<MemberRef>>) -> Self {
        Self { refs }
    }

    /// Member reference in the namespace at `ns` (by mapping-set order)
    pub fn get(&self, ns: usize) -> Option<&MemberRef> {
        self.refs.get(ns).and_then(|r| r.as_ref())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Mapping Set
// ═══════════════════════════════════════════════════════════════════════════

/// Immutable, indexed mapping table across a fixed set of namespaces.
///
/// All lookups are O(1) via per-namespace indexes built at construction
/// time; iteration order of `classes()`/`methods()`/`fields()` is the
/// order the entries were loaded in, which keeps resolution deterministic.
#[derive(Debug, Clone)]
pub struct MappingSet {
    namespaces: Vec<String>,
    classes: Vec<ClassMapping>,
    fields: Vec<MemberMapping>,
    methods: Vec<MemberMapping>,

    /// Per namespace: class name → index into `classes`
    class_index: Vec<HashMap<String, usize>>,
    /// Per namespace: member id → index into `fields`
    field_index: Vec<HashMap<String, usize>>,
    /// Per namespace: member id → index into `methods`
    method_index: Vec<HashMap<String, usize>>,
}

impl MappingSet {
    pub fn new(
        namespaces: Vec<String>,
        classes: Vec<ClassMapping>,
        fields: Vec<MemberMapping>,
        methods: Vec<MemberMapping>,
    ) -> Self {
        let ns_count = namespaces.len();

        let mut class_index = vec![HashMap::new(); ns_count];
        for (i, class) in classes.iter().enumerate() {
            for (ns, index) in class_index.iter_mut().enumerate() {
                if let Some(name) = class.name(ns) {
                    index.insert(name.to_owned(), i);
                }
            }
        }

        let field_index = Self::build_member_index(&fields, ns_count);
        let method_index = Self::build_member_index(&methods, ns_count);

        Self {
            namespaces,
            classes,
            fields,
            methods,
            class_index,
            field_index,
            method_index,
        }
    }

    fn build_member_index(
        members: &[MemberMapping],
        ns_count: usize,
    ) -> Vec<HashMap<String, usize>> {
        let mut index = vec![HashMap::new(); ns_count];
        for (i, member) in members.iter().enumerate() {
            for (ns, map) in index.iter_mut().enumerate() {
                if let Some(r) = member.get(ns) {
                    map.insert(r.id(), i);
                }
            }
        }
        index
    }

    /// Ordered namespace names, as loaded
    pub fn namespaces(&self) -> &[String] {
        &self.namespaces
    }

    /// Position of `namespace` in the loaded order
    pub fn namespace_index(&self, namespace: &str) -> Result<usize> {
        self.namespaces
            .iter()
            .position(|n| n == namespace)
            .ok_or_else(|| MappingError::UnknownNamespace(namespace.to_owned()))
    }

    pub fn classes(&self) -> &[ClassMapping] {
        &self.classes
    }

    pub fn fields(&self) -> &[MemberMapping] {
        &self.fields
    }

    pub fn methods(&self) -> &[MemberMapping] {
        &self.methods
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Translate a class name between namespaces.
    ///
    /// Returns `Ok(None)` when the class is unknown in `from`. A class
    /// known in `from` but absent in `to` is mapping corruption and
    /// fails with `MissingCounterpart`.
    pub fn map_class(&self, from: &str, to: &str, name: &str) -> Result<Option<&str>> {
        let from_ns = self.namespace_index(from)?;
        let to_ns = self.namespace_index(to)?;

        let Some(&i) = self.class_index[from_ns].get(name) else {
            return Ok(None);
        };
        match self.classes[i].name(to_ns) {
            Some(mapped) => Ok(Some(mapped)),
            None => Err(MappingError::MissingCounterpart {
                namespace: to.to_owned(),
                symbol: name.to_owned(),
            }),
        }
    }

    /// Translate a method reference between namespaces
    pub fn map_method(&self, from: &str, to: &str, member: &MemberRef) -> Result<Option<&MemberRef>> {
        let (from_ns, to_ns) = (self.namespace_index(from)?, self.namespace_index(to)?);
        Self::map_member(&self.methods, &self.method_index, from_ns, to_ns, to, member)
    }

    /// Translate a field reference between namespaces
    pub fn map_field(&self, from: &str, to: &str, member: &MemberRef) -> Result<Option<&MemberRef>> {
        let (from_ns, to_ns) = (self.namespace_index(from)?, self.namespace_index(to)?);
        Self::map_member(&self.fields, &self.field_index, from_ns, to_ns, to, member)
    }

    fn map_member<'a>(
        members: &'a [MemberMapping],
        index: &[HashMap<String, usize>],
        from_ns: usize,
        to_ns: usize,
        to: &str,
        member: &MemberRef,
    ) -> Result<Option<&'a MemberRef>> {
        let Some(&i) = index[from_ns].get(&member.id()) else {
            return Ok(None);
        };
        match members[i].get(to_ns) {
            Some(mapped) => Ok(Some(mapped)),
            None => Err(MappingError::MissingCounterpart {
                namespace: to.to_owned(),
                symbol: member.id(),
            }),
        }
    }

    /// Full set of class names known in `namespace`.
    ///
    /// Pure read-only map over immutable entries, so it runs in parallel.
    pub fn class_pool(&self, namespace: &str) -> Result<HashSet<String>> {
        let ns = self.namespace_index(namespace)?;
        Ok(self
            .classes
            .par_iter()
            .filter_map(|class| class.name(ns).map(str::to_owned))
            .collect())
    }

    /// Rewrite every class segment of a type descriptor from one namespace
    /// to another.
    ///
    /// Segments naming classes unknown to the table pass through unchanged,
    /// as do primitives and array dimensions. A segment naming a class with
    /// no counterpart in `to` fails with `MissingCounterpart`.
    pub fn remap_descriptor(&self, from: &str, to: &str, desc: &str) -> Result<String> {
        descriptor::rewrite(desc, |segment| {
            Ok(self.map_class(from, to, segment)?.map(str::to_owned))
        })
    }
}
