//! Tiny v1 mapping reader
//!
//! Loads a `MappingSet` from the tab-separated tiny format:
//!
//! ```text
//! v1	official	intermediary	named
//! CLASS	a	net/ex/class_1	com/example/Foo
//! FIELD	a	I	d	field_1	count
//! METHOD	a	(Lb;)V	e	method_1	frob
//! ```
//!
//! Member owners and descriptors are authored in the first namespace;
//! their translations into the other namespaces are derived through the
//! class rows after the whole file is read.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::domain::{descriptor, ClassMapping, MappingSet, MemberMapping, MemberRef};
use crate::error::{MappingError, Result};

struct RawMember {
    owner: String,
    desc: String,
    names: Vec<Option<String>>,
}

/// Read a tiny v1 mapping file from `path`
pub fn read_tiny_file(path: &Path) -> Result<MappingSet> {
    read_tiny(BufReader::new(File::open(path)?))
}

/// Read tiny v1 mappings from any buffered reader
pub fn read_tiny(reader: impl BufRead) -> Result<MappingSet> {
    let mut namespaces: Option<Vec<String>> = None;
    let mut classes: Vec<ClassMapping> = Vec::new();
    let mut raw_fields: Vec<RawMember> = Vec::new();
    let mut raw_methods: Vec<RawMember> = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line_no = i + 1;
        let line = line?;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let columns: Vec<&str> = line.split('\t').collect();

        if namespaces.is_none() {
            if columns[0] != "v1" || columns.len() < 3 {
                return Err(MappingError::parse(
                    line_no,
                    "expected header: v1 followed by at least two namespaces",
                ));
            }
            namespaces = Some(columns[1..].iter().map(|s| (*s).to_owned()).collect());
            continue;
        }
        let ns_count = namespaces.as_ref().map_or(0, Vec::len);

        match columns[0] {
            "CLASS" => {
                if columns.len() != 1 + ns_count {
                    return Err(MappingError::parse(line_no, "wrong column count for CLASS row"));
                }
                classes.push(ClassMapping::new(
                    columns[1..].iter().map(|c| column(c)).collect(),
                ));
            }
            kind @ ("FIELD" | "METHOD") => {
                if columns.len() != 3 + ns_count {
                    return Err(MappingError::parse(
                        line_no,
                        format!("wrong column count for {kind} row"),
                    ));
                }
                let raw = RawMember {
                    owner: columns[1].to_owned(),
                    desc: columns[2].to_owned(),
                    names: columns[3..].iter().map(|c| column(c)).collect(),
                };
                if kind == "FIELD" {
                    raw_fields.push(raw);
                } else {
                    raw_methods.push(raw);
                }
            }
            other => {
                return Err(MappingError::parse(line_no, format!("unknown row kind: {other}")));
            }
        }
    }

    let namespaces =
        namespaces.ok_or_else(|| MappingError::parse(0, "empty mapping data, no header"))?;
    let ns_count = namespaces.len();

    // First-namespace class lookup for deriving member owners/descriptors.
    let class_by_primary: HashMap<&str, &ClassMapping> = classes
        .iter()
        .filter_map(|class| class.name(0).map(|name| (name, class)))
        .collect();

    let fields = derive_members(&raw_fields, &class_by_primary, ns_count, false)?;
    let methods = derive_members(&raw_methods, &class_by_primary, ns_count, true)?;

    Ok(MappingSet::new(namespaces, classes, fields, methods))
}

fn column(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_owned())
    }
}

fn derive_members(
    raw: &[RawMember],
    class_by_primary: &HashMap<&str, &ClassMapping>,
    ns_count: usize,
    remap_desc: bool,
) -> Result<Vec<MemberMapping>> {
    raw.iter()
        .map(|member| {
            let refs = (0..ns_count)
                .map(|ns| derive_ref(member, class_by_primary, ns, remap_desc))
                .collect::<Result<_>>()?;
            Ok(MemberMapping::new(refs))
        })
        .collect()
}

/// Derive one member reference for namespace `ns`.
///
/// Returns `Ok(None)` when the member has no name in that namespace, or
/// when the owner class exists but carries no name there (the hole then
/// surfaces as `MissingCounterpart` at query time, not at load time).
fn derive_ref(
    member: &RawMember,
    class_by_primary: &HashMap<&str, &ClassMapping>,
    ns: usize,
    remap_desc: bool,
) -> Result<Option<MemberRef>> {
    let Some(name) = member.names.get(ns).and_then(|n| n.as_deref()) else {
        return Ok(None);
    };

    let owner = match class_by_primary.get(member.owner.as_str()) {
        Some(class) => match class.name(ns) {
            Some(owner) => owner.to_owned(),
            None => return Ok(None),
        },
        None => member.owner.clone(),
    };

    let desc = if remap_desc && ns != 0 {
        let mut hole = false;
        let desc = descriptor::rewrite(&member.desc, |segment| {
            Ok(match class_by_primary.get(segment) {
                Some(class) => match class.name(ns) {
                    Some(mapped) => Some(mapped.to_owned()),
                    None => {
                        hole = true;
                        None
                    }
                },
                None => None,
            })
        })?;
        if hole {
            return Ok(None);
        }
        desc
    } else {
        member.desc.clone()
    };

    Ok(Some(MemberRef::new(owner, name, desc)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "v1\tofficial\tintermediary\tnamed\n\
        CLASS\ta\tnet/ex/class_1\tcom/example/Foo\n\
        CLASS\tb\tnet/ex/class_2\tcom/example/Bar\n\
        FIELD\ta\tI\td\tfield_1\tcount\n\
        METHOD\ta\t(Lb;)V\te\tmethod_1\tfrob\n";

    fn read(text: &str) -> Result<MappingSet> {
        read_tiny(Cursor::new(text))
    }

    #[test]
    fn reads_namespace_order_from_header() {
        let set = read(SAMPLE).unwrap();
        assert_eq!(set.namespaces(), ["official", "intermediary", "named"]);
        assert_eq!(set.class_count(), 2);
    }

    #[test]
    fn derives_member_owners_and_descriptors() {
        let set = read(SAMPLE).unwrap();

        let method = MemberRef::new("com/example/Foo", "frob", "(Lcom/example/Bar;)V");
        let official = set.map_method("named", "official", &method).unwrap().unwrap();
        assert_eq!(official, &MemberRef::new("a", "e", "(Lb;)V"));

        let intermediary = set.map_method("named", "intermediary", &method).unwrap().unwrap();
        assert_eq!(intermediary.owner, "net/ex/class_1");
        assert_eq!(intermediary.desc, "(Lnet/ex/class_2;)V");
    }

    #[test]
    fn field_descriptors_are_namespace_invariant() {
        let set = read(SAMPLE).unwrap();
        let field = MemberRef::new("com/example/Foo", "count", "I");
        let official = set.map_field("named", "official", &field).unwrap().unwrap();
        assert_eq!(official, &MemberRef::new("a", "d", "I"));
    }

    #[test]
    fn empty_columns_become_holes() {
        let text = "v1\tofficial\tnamed\nCLASS\ta\t\n";
        let set = read(text).unwrap();
        let err = set.map_class("official", "named", "a").unwrap_err();
        assert!(matches!(err, MappingError::MissingCounterpart { .. }));
    }

    #[test]
    fn rejects_malformed_rows() {
        let err = read("v1\tofficial\tnamed\nCLASS\ta\n").unwrap_err();
        assert!(matches!(err, MappingError::Parse { line: 2, .. }));

        let err = read("v1\tofficial\tnamed\nBOGUS\ta\tb\n").unwrap_err();
        assert!(matches!(err, MappingError::Parse { line: 2, .. }));

        let err = read("not-a-header\n").unwrap_err();
        assert!(matches!(err, MappingError::Parse { line: 1, .. }));
    }

    #[test]
    fn skips_blank_lines_and_comments() {
        let text = "v1\tofficial\tnamed\n\n# comment\nCLASS\ta\tcom/example/Foo\n";
        let set = read(text).unwrap();
        assert_eq!(set.class_count(), 1);
    }
}
