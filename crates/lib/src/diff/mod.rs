//! Minimal partial-update computation.
//!
//! The diff engine reads a tracked document's change state directly and
//! emits an [`Update`] that transforms the committed baseline into the
//! current effective view. Map changes are expressed per key; unchanged
//! subtrees with a modified branch child recurse into dotted paths, so
//! touching one deeply nested field produces a single `$set` at
//! `"a.b.c"` rather than a rewrite of `"a"`.
//!
//! Lists diff positionally while they only grow or mutate in place; a
//! shrink shifts every later index, so it falls back to rewriting the
//! whole sequence at its path.
//!
//! All emitted paths and serialized values have reserved key characters
//! escaped (see [`crate::escape`]); paths therefore split unambiguously
//! on `.`.

mod errors;
mod update;

pub use errors::DiffError;
pub use update::{Update, apply_update};

use tracing::debug;

use crate::doc::{Doc, List, Value};
use crate::escape::{escape, escape_key};

/// Computes the minimal update for a tracked branch value.
///
/// Returns an empty update for a clean document. Scalar and reference
/// values have no change state to diff and are rejected.
///
/// ```
/// use overdoc::{Doc, diff};
///
/// let mut doc = Doc::new().with("a", 1i64);
/// doc.set("b", 2i64);
/// let update = diff::diff_doc(&doc);
/// assert_eq!(
///     serde_json::to_string(&update).unwrap(),
///     r#"{"$set":{"b":2}}"#,
/// );
/// ```
pub fn diff(value: &Value) -> Result<Update, DiffError> {
    match value {
        Value::Doc(doc) => Ok(diff_doc(doc)),
        Value::List(list) => Ok(diff_list(list)),
        other => Err(DiffError::UnsupportedType {
            actual: other.type_name(),
        }),
    }
}

/// Computes the minimal update for a map document.
pub fn diff_doc(doc: &Doc) -> Update {
    let mut update = Update::new();
    doc_updates(doc, "", &mut update);
    update
}

/// Computes the minimal update for a list document.
///
/// At the top level a shrink produces a `$set` with an empty path,
/// meaning "replace the whole document".
pub fn diff_list(list: &List) -> Update {
    let mut update = Update::new();
    list_updates(list, "", &mut update);
    update
}

/// Serializes a value for the wire: lower to plain, then escape keys.
fn serialize(value: &Value) -> crate::doc::Plain {
    escape(&value.to_plain())
}

fn doc_updates(doc: &Doc, prefix: &str, out: &mut Update) {
    for key in doc.tombstoned() {
        out.unset(format!("{prefix}{}", escape_key(key)));
    }

    // Overlay entries rewrite wholesale at their own path.
    for (key, value) in doc.overlay() {
        out.set(format!("{prefix}{}", escape_key(key)), serialize(value));
    }

    // Clean baseline entries may still hold a modified branch child.
    for (key, value) in doc.baseline() {
        if doc.is_tombstoned(key) || doc.in_overlay(key) {
            continue;
        }
        match value {
            Value::Doc(child) if child.modified() => {
                let child_prefix = format!("{prefix}{}.", escape_key(key));
                doc_updates(child, &child_prefix, out);
            }
            Value::List(child) if child.modified() => {
                let child_prefix = format!("{prefix}{}.", escape_key(key));
                list_updates(child, &child_prefix, out);
            }
            _ => {}
        }
    }
}

fn list_updates(list: &List, prefix: &str, out: &mut Update) {
    let baseline = list.baseline();
    let current = list.items();

    // A shrink shifts every later index; rewrite the whole sequence.
    if current.len() < baseline.len() {
        let path = prefix.strip_suffix('.').unwrap_or(prefix);
        debug!(path, "list shrank, rewriting sequence wholesale");
        out.set(
            path.to_string(),
            crate::doc::Plain::Seq(current.iter().map(|v| serialize(v)).collect()),
        );
        return;
    }

    for (index, item) in current.iter().enumerate() {
        match baseline.get(index) {
            // Appended past the old length.
            None => out.set(format!("{prefix}{index}"), serialize(item)),
            // Replaced in place (scalars by value, branches by node).
            Some(base) if item != base => out.set(format!("{prefix}{index}"), serialize(item)),
            // Positionally shared; recurse if the child itself changed.
            Some(_) => match item {
                Value::Doc(child) if child.modified() => {
                    let child_prefix = format!("{prefix}{index}.");
                    doc_updates(child, &child_prefix, out);
                }
                Value::List(child) if child.modified() => {
                    let child_prefix = format!("{prefix}{index}.");
                    list_updates(child, &child_prefix, out);
                }
                _ => {}
            },
        }
    }
}
