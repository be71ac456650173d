//! Domain layer for access transform resolution
//!
//! # Domain Models
//!
//! - `Directive`: one requested access change, authored in one namespace
//! - `MemberTarget`: what to patch inside a class (the class itself, or
//!   one named member)
//! - `TransformSet`: per-namespace map from class name to targets
//! - `TransformPlan`: one `TransformSet` per target namespace
//! - `UnresolvedReport`: the structured resolution failure

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Marker prefix for constructor signatures, which never appear in the
/// mapping table but still need translating.
pub const CONSTRUCTOR_PREFIX: &str = "<init>(";

/// One requested access change: a class, or one member of a class.
///
/// Both parts are expressed in the authoring namespace. `member` is the
/// signature text `name + descriptor` (`frob(La;)V` for a method,
/// `countI` for a field); `None` means "transform the class itself".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Directive {
    pub owner: String,
    pub member: Option<String>,
}

impl Directive {
    /// Whole-class directive
    pub fn class(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            member: None,
        }
    }

    /// Member directive
    pub fn member(owner: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            member: Some(member.into()),
        }
    }

    /// Whether this directive names a constructor
    pub fn is_constructor(&self) -> bool {
        self.member
            .as_deref()
            .is_some_and(|m| m.starts_with(CONSTRUCTOR_PREFIX))
    }
}

/// What to patch inside one class.
///
/// A tagged variant instead of a magic sentinel string, so the
/// whole-class marker can never collide with a real member signature.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MemberTarget {
    /// The class itself
    Whole,
    /// One member, as signature text in the set's namespace
    Member(String),
}

/// Per-namespace transforms: class name → targets to patch.
///
/// BTree ordering keeps resolution output deterministic: resolving the
/// same directives against the same table twice yields identical sets.
pub type TransformSet = BTreeMap<String, BTreeSet<MemberTarget>>;

/// One `TransformSet` per target namespace, in target order.
///
/// Only ever constructed fully resolved; a resolution with leftovers
/// fails before any plan exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformPlan {
    sets: Vec<(String, TransformSet)>,
}

impl TransformPlan {
    pub(crate) fn new(targets: &[String]) -> Self {
        Self {
            sets: targets
                .iter()
                .map(|ns| (ns.clone(), TransformSet::new()))
                .collect(),
        }
    }

    pub(crate) fn insert(&mut self, target: usize, class: String, member: MemberTarget) {
        self.sets[target].1.entry(class).or_default().insert(member);
    }

    /// Transform set for one target namespace
    pub fn get(&self, namespace: &str) -> Option<&TransformSet> {
        self.sets
            .iter()
            .find(|(ns, _)| ns == namespace)
            .map(|(_, set)| set)
    }

    /// Iterate (namespace, transform set) in target order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TransformSet)> {
        self.sets.iter().map(|(ns, set)| (ns.as_str(), set))
    }

    /// Number of classes needing patching (same in every namespace)
    pub fn class_count(&self) -> usize {
        self.sets.first().map_or(0, |(_, set)| set.len())
    }
}

/// Every directive the mapping table never matched.
///
/// Always complete: all unresolved owners and, per owner, all of its
/// unresolved member signatures, never just the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnresolvedReport {
    /// Whole-class directives with no class entry
    pub classes: Vec<String>,
    /// Member directives with no member entry, keyed by owner
    pub members: BTreeMap<String, Vec<String>>,
}

impl UnresolvedReport {
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.members.is_empty()
    }
}

impl fmt::Display for UnresolvedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "unable to find mappings for the following access transformer entries:")?;
        for class in &self.classes {
            writeln!(f, "\t{class}")?;
        }
        for (owner, members) in &self.members {
            writeln!(f, "\t{owner}:")?;
            for member in members {
                writeln!(f, "\t\t{member}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_target_orders_before_members() {
        let mut targets = BTreeSet::new();
        targets.insert(MemberTarget::Member("frob()V".into()));
        targets.insert(MemberTarget::Whole);
        assert_eq!(targets.iter().next(), Some(&MemberTarget::Whole));
    }

    #[test]
    fn constructor_detection() {
        assert!(Directive::member("a", "<init>(Lb;)V").is_constructor());
        assert!(!Directive::member("a", "init()V").is_constructor());
        assert!(!Directive::class("a").is_constructor());
    }

    #[test]
    fn report_serializes_for_tooling() {
        let mut report = UnresolvedReport::default();
        report.classes.push("com/example/Gone".into());
        report
            .members
            .entry("com/example/Foo".into())
            .or_default()
            .push("frob()V".into());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["classes"][0], "com/example/Gone");
        assert_eq!(json["members"]["com/example/Foo"][0], "frob()V");
    }

    #[test]
    fn report_lists_every_entry() {
        let mut report = UnresolvedReport::default();
        report.classes.push("com/example/Gone".into());
        report
            .members
            .entry("com/example/Foo".into())
            .or_default()
            .extend(["frob()V".into(), "countI".into()]);

        let text = report.to_string();
        assert!(text.contains("com/example/Gone"));
        assert!(text.contains("com/example/Foo:"));
        assert!(text.contains("frob()V"));
        assert!(text.contains("countI"));
    }
}
