//! Directive resolution across namespaces
//!
//! Translates a directive set authored in one namespace into one
//! `TransformSet` per target namespace. Resolution is fail-closed: either
//! every directive resolves in every target namespace, or the whole pass
//! fails with a report listing every unresolved owner and member.
//!
//! Each pass consumes the pending working set and returns the shrunken
//! remainder, so nothing resolved can linger and nothing pending can be
//! dropped without appearing in the failure report.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::domain::{Directive, MemberTarget, TransformPlan, CONSTRUCTOR_PREFIX};
use crate::error::{Result, TransformError};
use atweave_mappings::{MappingError, MappingSet, MemberMapping, MemberRef};

/// Directives not yet matched by any pass.
struct Pending {
    /// Whole-class directives, by owner name in the authoring namespace
    classes: BTreeSet<String>,
    /// Member directives: owner → signature texts, authoring namespace
    members: BTreeMap<String, BTreeSet<String>>,
}

impl Pending {
    fn partition(directives: &[Directive]) -> Self {
        let mut classes = BTreeSet::new();
        let mut members: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for directive in directives {
            match &directive.member {
                None => {
                    classes.insert(directive.owner.clone());
                }
                Some(member) => {
                    members
                        .entry(directive.owner.clone())
                        .or_default()
                        .insert(member.clone());
                }
            }
        }

        Self { classes, members }
    }

    fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.members.is_empty()
    }

    fn into_report(self) -> crate::domain::UnresolvedReport {
        crate::domain::UnresolvedReport {
            classes: self.classes.into_iter().collect(),
            members: self
                .members
                .into_iter()
                .map(|(owner, sigs)| (owner, sigs.into_iter().collect()))
                .collect(),
        }
    }
}

/// Resolve `directives` (authored in `authoring`) into one transform set
/// per namespace in `targets`.
///
/// Fails with [`TransformError::Unresolved`] if any directive survives
/// all passes, and with [`TransformError::Mapping`] immediately on a
/// mapping-table hole. Never returns a partial plan.
pub fn resolve(
    mappings: &MappingSet,
    directives: &[Directive],
    authoring: &str,
    targets: &[String],
) -> Result<TransformPlan> {
    let authoring_ns = mappings.namespace_index(authoring)?;
    let target_ns: Vec<usize> = targets
        .iter()
        .map(|t| mappings.namespace_index(t))
        .collect::<atweave_mappings::Result<_>>()?;

    let mut plan = TransformPlan::new(targets);

    let pending = Pending::partition(directives);
    let pending = class_pass(mappings, authoring_ns, targets, &target_ns, pending, &mut plan)?;
    let pending = member_pass(mappings.methods(), authoring_ns, targets, &target_ns, pending, &mut plan)?;
    let pending = member_pass(mappings.fields(), authoring_ns, targets, &target_ns, pending, &mut plan)?;
    let pending = constructor_pass(mappings, authoring, targets, pending, &mut plan)?;

    if pending.is_empty() {
        Ok(plan)
    } else {
        Err(TransformError::Unresolved(pending.into_report()))
    }
}

/// Match whole-class directives against the table's class entries.
fn class_pass(
    mappings: &MappingSet,
    authoring_ns: usize,
    targets: &[String],
    target_ns: &[usize],
    mut pending: Pending,
    plan: &mut TransformPlan,
) -> Result<Pending> {
    for class in mappings.classes() {
        let Some(name) = class.name(authoring_ns) else {
            continue;
        };
        if !pending.classes.remove(name) {
            continue;
        }

        for (i, &ns) in target_ns.iter().enumerate() {
            let mapped = class
                .name(ns)
                .ok_or_else(|| missing_counterpart(&targets[i], name))?;
            plan.insert(i, mapped.to_owned(), MemberTarget::Whole);
        }
    }

    debug!(left = pending.classes.len(), "class pass done");
    Ok(pending)
}

/// Match member directives against one kind of member entry (methods or
/// fields). Field directives only ever match field entries; there is no
/// constructor-style fallback for fields.
fn member_pass(
    entries: &[MemberMapping],
    authoring_ns: usize,
    targets: &[String],
    target_ns: &[usize],
    mut pending: Pending,
    plan: &mut TransformPlan,
) -> Result<Pending> {
    for entry in entries {
        let Some(authored) = entry.get(authoring_ns) else {
            continue;
        };
        let Some(sigs) = pending.members.get_mut(&authored.owner) else {
            continue;
        };
        if !sigs.remove(&authored.signature()) {
            continue;
        }

        for (i, &ns) in target_ns.iter().enumerate() {
            let mapped = entry
                .get(ns)
                .ok_or_else(|| missing_counterpart(&targets[i], &member_id(authored)))?;
            plan.insert(
                i,
                mapped.owner.clone(),
                MemberTarget::Member(mapped.signature()),
            );
        }

        if sigs.is_empty() {
            pending.members.remove(&authored.owner);
        }
    }

    Ok(pending)
}

/// Propagate surviving constructor directives.
///
/// Constructors are never part of the mapping table, but their owners
/// and parameter types still rename: the owner goes through the class
/// map, each `L...;` parameter segment goes through the class map, and
/// the `<init>` name is preserved verbatim.
fn constructor_pass(
    mappings: &MappingSet,
    authoring: &str,
    targets: &[String],
    pending: Pending,
    plan: &mut TransformPlan,
) -> Result<Pending> {
    let mut still = BTreeMap::new();

    for (owner, mut sigs) in pending.members {
        let constructors: Vec<String> = sigs
            .iter()
            .filter(|sig| sig.starts_with(CONSTRUCTOR_PREFIX))
            .cloned()
            .collect();

        for sig in constructors {
            sigs.remove(&sig);
            let desc = &sig["<init>".len()..];

            for (i, target) in targets.iter().enumerate() {
                let mapped_owner = mappings
                    .map_class(authoring, target, &owner)?
                    .unwrap_or(&owner)
                    .to_owned();
                let mapped_desc = mappings.remap_descriptor(authoring, target, desc)?;
                plan.insert(
                    i,
                    mapped_owner,
                    MemberTarget::Member(format!("<init>{mapped_desc}")),
                );
            }
        }

        if !sigs.is_empty() {
            still.insert(owner, sigs);
        }
    }

    Ok(Pending {
        classes: pending.classes,
        members: still,
    })
}

fn member_id(member: &MemberRef) -> String {
    format!("{}.{}{}", member.owner, member.name, member.desc)
}

fn missing_counterpart(namespace: &str, symbol: &str) -> TransformError {
    TransformError::Mapping(MappingError::MissingCounterpart {
        namespace: namespace.to_owned(),
        symbol: symbol.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use atweave_mappings::ClassMapping;

    fn namespaces() -> Vec<String> {
        vec!["named".into(), "official".into(), "intermediary".into()]
    }

    fn class(named: &str, official: &str, intermediary: &str) -> ClassMapping {
        ClassMapping::new(vec![
            Some(named.into()),
            Some(official.into()),
            Some(intermediary.into()),
        ])
    }

    fn entry(refs: [(&str, &str, &str); 3]) -> MemberMapping {
        MemberMapping::new(
            refs.iter()
                .map(|(owner, name, desc)| Some(MemberRef::new(*owner, *name, *desc)))
                .collect(),
        )
    }

    fn sample() -> MappingSet {
        MappingSet::new(
            namespaces(),
            vec![
                class("com/example/Foo", "a", "net/ex/class_1"),
                class("com/example/Bar", "b", "net/ex/class_2"),
            ],
            vec![entry([
                ("com/example/Foo", "count", "I"),
                ("a", "d", "I"),
                ("net/ex/class_1", "field_1", "I"),
            ])],
            vec![entry([
                ("com/example/Foo", "frob", "(Lcom/example/Bar;)V"),
                ("a", "e", "(Lb;)V"),
                ("net/ex/class_1", "method_1", "(Lnet/ex/class_2;)V"),
            ])],
        )
    }

    fn targets() -> Vec<String> {
        vec!["official".into(), "intermediary".into()]
    }

    fn whole() -> BTreeSet<MemberTarget> {
        [MemberTarget::Whole].into()
    }

    fn member(sig: &str) -> BTreeSet<MemberTarget> {
        [MemberTarget::Member(sig.into())].into()
    }

    #[test]
    fn class_directive_yields_wildcard_per_target() {
        let plan = resolve(
            &sample(),
            &[Directive::class("com/example/Foo")],
            "named",
            &targets(),
        )
        .unwrap();

        let official = plan.get("official").unwrap();
        assert_eq!(official.get("a"), Some(&whole()));
        assert_eq!(official.len(), 1);

        let intermediary = plan.get("intermediary").unwrap();
        assert_eq!(intermediary.get("net/ex/class_1"), Some(&whole()));
        assert_eq!(intermediary.len(), 1);
    }

    #[test]
    fn method_directive_translates_owner_name_and_descriptor() {
        let plan = resolve(
            &sample(),
            &[Directive::member("com/example/Foo", "frob(Lcom/example/Bar;)V")],
            "named",
            &targets(),
        )
        .unwrap();

        assert_eq!(plan.get("official").unwrap().get("a"), Some(&member("e(Lb;)V")));
        assert_eq!(
            plan.get("intermediary").unwrap().get("net/ex/class_1"),
            Some(&member("method_1(Lnet/ex/class_2;)V"))
        );
    }

    #[test]
    fn field_directive_matches_field_entries_exactly() {
        let plan = resolve(
            &sample(),
            &[Directive::member("com/example/Foo", "countI")],
            "named",
            &targets(),
        )
        .unwrap();

        assert_eq!(plan.get("official").unwrap().get("a"), Some(&member("dI")));
    }

    #[test]
    fn constructor_directive_resolves_without_a_table_entry() {
        let plan = resolve(
            &sample(),
            &[Directive::member("com/example/Foo", "<init>(Lcom/example/Bar;)V")],
            "named",
            &targets(),
        )
        .unwrap();

        // Name preserved verbatim, owner and parameter types translated.
        assert_eq!(
            plan.get("official").unwrap().get("a"),
            Some(&member("<init>(Lb;)V"))
        );
        assert_eq!(
            plan.get("intermediary").unwrap().get("net/ex/class_1"),
            Some(&member("<init>(Lnet/ex/class_2;)V"))
        );
    }

    #[test]
    fn constructor_primitive_params_pass_through() {
        let plan = resolve(
            &sample(),
            &[Directive::member("com/example/Foo", "<init>([JI)V")],
            "named",
            &targets(),
        )
        .unwrap();

        assert_eq!(
            plan.get("official").unwrap().get("a"),
            Some(&member("<init>([JI)V"))
        );
    }

    #[test]
    fn unknown_class_fails_closed_with_full_report() {
        let err = resolve(
            &sample(),
            &[
                Directive::class("com/example/Gone"),
                Directive::member("com/example/Lost", "frob()V"),
                Directive::member("com/example/Lost", "spinJ"),
                Directive::member("com/example/Foo", "missing()V"),
            ],
            "named",
            &targets(),
        )
        .unwrap_err();

        let TransformError::Unresolved(report) = err else {
            panic!("expected unresolved report, got {err:?}");
        };
        assert_eq!(report.classes, ["com/example/Gone"]);
        assert_eq!(
            report.members["com/example/Lost"],
            vec!["frob()V".to_owned(), "spinJ".to_owned()]
        );
        assert_eq!(report.members["com/example/Foo"], vec!["missing()V".to_owned()]);
    }

    #[test]
    fn drained_constructor_owner_counts_as_resolved() {
        // The only pending member is a constructor; once it propagates,
        // its owner must drop out of the pending map entirely.
        let plan = resolve(
            &sample(),
            &[Directive::member("com/example/Bar", "<init>()V")],
            "named",
            &targets(),
        )
        .unwrap();
        assert_eq!(
            plan.get("official").unwrap().get("b"),
            Some(&member("<init>()V"))
        );
    }

    #[test]
    fn whole_class_and_member_targets_coexist_per_key() {
        let plan = resolve(
            &sample(),
            &[
                Directive::class("com/example/Foo"),
                Directive::member("com/example/Foo", "countI"),
            ],
            "named",
            &targets(),
        )
        .unwrap();

        let targets_for_a = plan.get("official").unwrap().get("a").unwrap();
        assert!(targets_for_a.contains(&MemberTarget::Whole));
        assert!(targets_for_a.contains(&MemberTarget::Member("dI".into())));
        assert_eq!(targets_for_a.len(), 2);
    }

    #[test]
    fn mapping_hole_aborts_instead_of_accumulating() {
        let set = MappingSet::new(
            namespaces(),
            vec![ClassMapping::new(vec![
                Some("com/example/Foo".into()),
                None,
                Some("net/ex/class_1".into()),
            ])],
            vec![],
            vec![],
        );

        let err = resolve(&set, &[Directive::class("com/example/Foo")], "named", &targets())
            .unwrap_err();
        assert!(matches!(
            err,
            TransformError::Mapping(MappingError::MissingCounterpart { .. })
        ));
    }

    #[test]
    fn resolution_is_idempotent() {
        let directives = vec![
            Directive::class("com/example/Bar"),
            Directive::member("com/example/Foo", "frob(Lcom/example/Bar;)V"),
            Directive::member("com/example/Foo", "<init>()V"),
        ];
        let set = sample();

        let first = resolve(&set, &directives, "named", &targets()).unwrap();
        let second = resolve(&set, &directives, "named", &targets()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_authoring_namespace_is_a_mapping_error() {
        let err = resolve(&sample(), &[], "bogus", &targets()).unwrap_err();
        assert!(matches!(
            err,
            TransformError::Mapping(MappingError::UnknownNamespace(_))
        ));
    }
}
