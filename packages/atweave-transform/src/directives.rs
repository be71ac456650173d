//! Directive source
//!
//! Minimal authoring format, one directive per line:
//!
//! ```text
//! # widen the whole class
//! com/example/Foo
//! # widen one member (signature text: name + descriptor)
//! com/example/Foo frob(Lcom/example/Bar;)V
//! ```
//!
//! `#` starts a comment; duplicate (owner, member) pairs collapse to one.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::domain::Directive;
use crate::error::{Result, TransformError};

/// Read directives from a file at `path`
pub fn read_directives_file(path: &Path) -> Result<Vec<Directive>> {
    read_directives(BufReader::new(File::open(path)?))
}

/// Read directives from any buffered reader, deduplicating as we go
pub fn read_directives(reader: impl BufRead) -> Result<Vec<Directive>> {
    let mut seen = HashSet::new();
    let mut directives = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split_whitespace();
        let owner = parts.next().unwrap_or("");
        let member = parts.next();
        if parts.next().is_some() {
            return Err(TransformError::parse(
                i + 1,
                "expected an owner class and at most one member signature",
            ));
        }

        let directive = match member {
            Some(member) => Directive::member(owner, member),
            None => Directive::class(owner),
        };
        if seen.insert(directive.clone()) {
            directives.push(directive);
        }
    }

    Ok(directives)
}
