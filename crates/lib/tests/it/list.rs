//! List integration tests: positional tracking, apply/revert, and bounds
//! checking.

use overdoc::{Doc, List, Plain, Value};

// ===== BASIC OPERATIONS =====

#[test]
fn test_list_basic_operations() {
    let mut list = List::new();

    assert!(list.is_empty());
    assert_eq!(list.len(), 0);
    assert!(!list.modified());

    list.push(1i64);
    list.push("two");
    list.push(true);

    assert_eq!(list.len(), 3);
    assert_eq!(list.get(0).unwrap().as_int(), Some(1));
    assert_eq!(list.get(1).unwrap().as_text(), Some("two"));
    assert_eq!(list.get(2).unwrap().as_bool(), Some(true));
}

#[test]
fn test_list_bounds_are_checked() {
    let mut list: List = [Value::Int(1)].into_iter().collect();

    assert!(list.get(1).is_err());
    assert!(list.set(1, 2i64).is_err());
    assert!(list.delete(1).is_err());
    // Insert allows the one-past-the-end position
    assert!(list.insert(2, 2i64).is_err());
    list.insert(1, 2i64).unwrap();
    assert_eq!(list.len(), 2);
}

#[test]
fn test_list_delete_returns_removed_item() {
    let mut list: List = [Value::Int(1), Value::Int(2), Value::Int(3)]
        .into_iter()
        .collect();

    let removed = list.delete(1).unwrap();
    assert_eq!(removed.as_int(), Some(2));
    assert_eq!(list.len(), 2);
    assert_eq!(list.get(1).unwrap().as_int(), Some(3));
}

// ===== MODIFIED TRACKING =====

#[test]
fn test_list_modified_on_structural_changes() {
    let mut list: List = [Value::Int(1), Value::Int(2)].into_iter().collect();
    assert!(!list.modified());

    list.push(3i64);
    assert!(list.modified());
    list.delete(2).unwrap();
    assert!(!list.modified());

    list.set(0, 10i64).unwrap();
    assert!(list.modified());
    list.set(0, 1i64).unwrap();
    assert!(!list.modified());
}

#[test]
fn test_list_replacing_branch_child_is_a_modification() {
    let child = Doc::new().with("x", 1i64);
    let mut list: List = [Value::Doc(child.clone())].into_iter().collect();
    assert!(!list.modified());

    // An identically-shaped fresh document is a different node.
    list.set(0, Doc::new().with("x", 1i64)).unwrap();
    assert!(list.modified());

    // Restoring a clone of the original child restores the clean state.
    list.set(0, child).unwrap();
    assert!(!list.modified());
}

#[test]
fn test_list_child_modification_propagates() {
    let mut list: List = [Value::Doc(Doc::new().with("x", 1i64))]
        .into_iter()
        .collect();
    assert!(!list.modified());

    let child = list.get_mut(0).unwrap().as_doc_mut().unwrap();
    child.set("x", 2i64);

    assert!(list.modified());
}

// ===== APPLY AND REVERT =====

#[test]
fn test_list_apply_snapshots_working_copy() {
    let mut list: List = [Value::Int(1)].into_iter().collect();
    list.push(2i64);
    list.apply();

    assert!(!list.modified());
    assert_eq!(list.baseline().len(), 2);

    list.delete(0).unwrap();
    list.revert();
    assert_eq!(list.len(), 2);
    assert_eq!(list.get(0).unwrap().as_int(), Some(1));
}

#[test]
fn test_list_apply_commits_children_first() {
    let mut list: List = [Value::Doc(Doc::new().with("x", 1i64))]
        .into_iter()
        .collect();
    list.get_mut(0)
        .unwrap()
        .as_doc_mut()
        .unwrap()
        .set("x", 2i64);

    list.apply();

    assert!(!list.modified());
    let child = list.get(0).unwrap().as_doc().unwrap();
    assert!(!child.modified());
    assert_eq!(child.get_as::<i64>("x"), Some(2));

    // The baseline snapshot shares the (now clean) child node.
    assert_eq!(list.baseline()[0], *list.get(0).unwrap());
}

#[test]
fn test_list_revert_restores_children() {
    let mut list: List = [Value::Doc(Doc::new().with("x", 1i64))]
        .into_iter()
        .collect();
    list.get_mut(0)
        .unwrap()
        .as_doc_mut()
        .unwrap()
        .set("x", 2i64);
    list.push(9i64);

    list.revert();

    assert_eq!(list.len(), 1);
    let child = list.get(0).unwrap().as_doc().unwrap();
    assert!(!child.modified());
    assert_eq!(child.get_as::<i64>("x"), Some(1));
}

// ===== PLAIN ROUND TRIP =====

#[test]
fn test_list_plain_round_trip() {
    let mut list = List::new();
    list.push(1i64);
    list.push(Doc::new().with("x", 2i64));
    list.apply();

    let plain = list.to_plain();
    let back = List::from_plain(&plain).unwrap();

    assert!(!back.modified());
    assert_eq!(back.to_plain(), plain);
}

#[test]
fn test_list_from_plain_rejects_non_sequences() {
    let err = List::from_plain(&Plain::Text("abc".to_string())).unwrap_err();
    assert!(err.is_type_error());
}
