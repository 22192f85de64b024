//! Reserved-character escaping for map keys.
//!
//! The store reserves `$` and `.` in field names. Before a document (or an
//! update path) crosses the wire, every map key has those characters
//! replaced with full-width analogs outside the ASCII range; reading back
//! restores them. Only keys are touched — values, including strings, pass
//! through unchanged — and the walk descends through maps and sequences
//! alike, so keys nested inside list elements are escaped too.
//!
//! Escaping is a total function: it never errors, and `unescape(escape(d))`
//! is the identity for any tree whose keys are free of the substitute
//! characters.

use indexmap::IndexMap;

use crate::doc::plain::Plain;

/// Full-width substitute for `$` (U+FF04).
pub const ESCAPED_DOLLAR: char = '＄';
/// Full-width substitute for `.` (U+FF0E).
pub const ESCAPED_DOT: char = '．';

/// Escapes reserved characters in a single map key.
pub fn escape_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            '$' => ESCAPED_DOLLAR,
            '.' => ESCAPED_DOT,
            c => c,
        })
        .collect()
}

/// Restores reserved characters in a single map key.
pub fn unescape_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            ESCAPED_DOLLAR => '$',
            ESCAPED_DOT => '.',
            c => c,
        })
        .collect()
}

/// Returns a copy of the document with all map keys escaped.
pub fn escape(doc: &Plain) -> Plain {
    transform(doc, &escape_key)
}

/// Returns a copy of the document with all map keys unescaped.
pub fn unescape(doc: &Plain) -> Plain {
    transform(doc, &unescape_key)
}

fn transform(doc: &Plain, key_fn: &dyn Fn(&str) -> String) -> Plain {
    match doc {
        Plain::Map(map) => {
            let mut out = IndexMap::with_capacity(map.len());
            for (key, value) in map {
                out.insert(key_fn(key), transform(value, key_fn));
            }
            Plain::Map(out)
        }
        Plain::Seq(items) => Plain::Seq(items.iter().map(|item| transform(item, key_fn)).collect()),
        scalar => scalar.clone(),
    }
}
