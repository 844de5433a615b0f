//! Turtle serialization of an [`OutputGraph`]
//!
//! Triples are grouped by subject, `rdf:type` is written as `a` and listed
//! first, and IRIs use the `ex:`/`wd:`/`rdf:` prefixes whenever the local part
//! is a valid prefixed name.

use super::model::{Iri, OutputGraph, Triple, EX_NAMESPACE, RDF_NAMESPACE, WD_NAMESPACE};
use std::fmt::Write;

/// Prefix declarations, in output order
pub const PREFIXES: &[(&str, &str)] = &[
    ("ex", EX_NAMESPACE),
    ("rdf", RDF_NAMESPACE),
    ("wd", WD_NAMESPACE),
];

/// Render the graph as a Turtle document
pub fn serialize(graph: &OutputGraph) -> String {
    let mut out = String::new();
    for (prefix, namespace) in PREFIXES {
        let _ = writeln!(out, "@prefix {}: <{}> .", prefix, namespace);
    }

    let rdf_type = Iri::rdf_type();
    let triples: Vec<&Triple> = graph.iter().collect();

    for group in triples.chunk_by(|a, b| a.subject == b.subject) {
        let mut statements: Vec<&Triple> = group.to_vec();
        // BTreeSet order is stable within each key; only hoist rdf:type.
        statements.sort_by_key(|t| t.predicate != rdf_type);

        out.push('\n');
        out.push_str(&format_iri(&group[0].subject));

        for (i, triple) in statements.iter().enumerate() {
            let predicate = if triple.predicate == rdf_type {
                "a".to_string()
            } else {
                format_iri(&triple.predicate)
            };
            let separator = if i == 0 { " " } else { " ;\n    " };
            let _ = write!(out, "{}{} {}", separator, predicate, format_iri(&triple.object));
        }
        out.push_str(" .\n");
    }

    out
}

/// Prefixed name when possible, `<iri>` otherwise
pub fn format_iri(iri: &Iri) -> String {
    for (prefix, namespace) in PREFIXES {
        if let Some(local) = iri.as_str().strip_prefix(namespace) {
            if is_prefixed_local(local) {
                return format!("{}:{}", prefix, local);
            }
        }
    }
    format!("<{}>", escape_iri(iri.as_str()))
}

/// Conservative subset of Turtle's PN_LOCAL: ASCII alphanumerics, `_`, `-`
/// and `%XX` escapes, not starting with `-`.
fn is_prefixed_local(local: &str) -> bool {
    if local.starts_with('-') {
        return false;
    }
    let bytes = local.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = |j: usize| bytes.get(j).map(u8::is_ascii_hexdigit).unwrap_or(false);
                if !(hex(i + 1) && hex(i + 2)) {
                    return false;
                }
                i += 3;
            }
            b if b.is_ascii_alphanumeric() || b == b'_' || b == b'-' => i += 1,
            _ => return false,
        }
    }
    true
}

/// Percent-escape characters that may not appear inside an IRIREF
fn escape_iri(iri: &str) -> String {
    let mut out = String::with_capacity(iri.len());
    for c in iri.chars() {
        match c {
            '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\' => {
                let _ = write!(out, "%{:02X}", c as u32);
            }
            c if c <= ' ' => {
                let _ = write!(out, "%{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
