//! Type descriptor rewriting
//!
//! Rewrites `L<class>;` segments of a field or method descriptor through a
//! class lookup, leaving primitives, array dimensions, and parentheses
//! untouched. Used for constructor descriptors, which have no entry of
//! their own in the mapping table.

use crate::error::{MappingError, Result};

/// Rewrite every object-type segment of `desc` through `map_class`.
///
/// `map_class` returns `Ok(Some(_))` for a translated class, `Ok(None)` to
/// keep the segment as-is, or an error to abort the rewrite. Everything
/// outside `L...;` segments is copied byte-for-byte.
pub fn rewrite<F>(desc: &str, mut map_class: F) -> Result<String>
where
    F: FnMut(&str) -> Result<Option<String>>,
{
    let mut out = String::with_capacity(desc.len());
    let mut rest = desc;

    while let Some(start) = rest.find('L') {
        let Some(len) = rest[start..].find(';') else {
            return Err(MappingError::Descriptor(desc.to_owned()));
        };
        let end = start + len;

        out.push_str(&rest[..start]);
        let segment = &rest[start + 1..end];
        match map_class(segment)? {
            Some(mapped) => {
                out.push('L');
                out.push_str(&mapped);
                out.push(';');
            }
            None => out.push_str(&rest[start..=end]),
        }
        rest = &rest[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}
