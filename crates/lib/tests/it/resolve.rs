//! Registry and resolver integration tests: typed reconstruction,
//! memoized loading, and cycle tolerance.

use std::rc::Rc;

use overdoc::{Doc, Id, List, Plain, Reference, Registry, Resolver, Value};

use crate::helpers::{MemoryLoader, stored_plain};

// ===== REGISTRY =====

#[test]
fn test_registry_reconstructs_references() {
    let target = Rc::new(Doc::new().with("_id", Id::new()).with("_type", "person"));
    let mut reference = Reference::new();
    reference.assign(Rc::clone(&target)).unwrap();

    let doc = Doc::new().with("owner", reference.clone());
    let plain = doc.to_plain();

    let registry = Registry::with_defaults();
    let back = Doc::from_plain_with(&registry, &plain).unwrap();

    let owner = back.get("owner").unwrap().as_ref_value().unwrap();
    assert_eq!(*owner, reference);
    // The resolved target does not survive serialization.
    assert!(owner.resolved().is_none());
}

#[test]
fn test_registry_without_defaults_reads_plain_maps() {
    let mut reference = Reference::new();
    reference
        .assign(Rc::new(Doc::new().with("_id", Id::new())))
        .unwrap();
    let plain = Doc::new().with("owner", reference).to_plain();

    let back = Doc::from_plain_with(&Registry::new(), &plain).unwrap();
    assert!(back.get("owner").unwrap().as_doc().is_some());
}

#[test]
fn test_registry_custom_factory() {
    let mut registry = Registry::with_defaults();
    registry.register("marker", |_plain| Ok(Value::Text("seen".to_string())));
    assert!(registry.contains("marker"));
    assert!(registry.contains("reference"));

    let plain = Plain::from_json_str(r#"{"tagged":{"_type":"marker","x":1}}"#).unwrap();
    let doc = Doc::from_plain_with(&registry, &plain).unwrap();
    assert_eq!(doc.get_as::<&str>("tagged"), Some("seen"));
}

// ===== REFERENCE ASSIGNMENT =====

#[test]
fn test_reference_assign_captures_identity_fields() {
    let id = Id::new();
    let target = Rc::new(Doc::new().with("_id", id).with("_type", "person"));

    let mut reference = Reference::new();
    reference.assign(target).unwrap();

    assert_eq!(reference.target_id(), Some(id));
    assert_eq!(reference.target_type(), "person");
    assert!(reference.resolved().is_some());

    reference.clear();
    assert_eq!(reference.target_id(), None);
    assert!(reference.resolved().is_none());
}

#[test]
fn test_reference_assign_requires_an_id() {
    let mut reference = Reference::new();
    let err = reference.assign(Rc::new(Doc::new())).unwrap_err();
    assert!(matches!(
        err,
        overdoc::DocError::InvalidReference { .. }
    ));
}

// ===== RESOLUTION =====

fn reference_to(id: Id, type_name: &str, auto_load: bool) -> Reference {
    let plain = Plain::from_json_str(&format!(
        r#"{{"_type":"reference","referenced_id":"{id}","referenced_type":"{type_name}","auto_load":{auto_load}}}"#
    ))
    .unwrap();
    Reference::from_plain(&plain).unwrap()
}

#[test]
fn test_resolver_loads_auto_load_references() {
    let loader = MemoryLoader::new();
    let id = Id::new();
    loader.insert(stored_plain(id, "person", "Alice"));

    let mut doc = Doc::new()
        .with("owner", reference_to(id, "person", true))
        .with("viewer", reference_to(id, "person", false));

    let registry = Registry::with_defaults();
    Resolver::new(&loader, &registry)
        .resolve(&mut doc, false)
        .unwrap();

    let owner = doc.get("owner").unwrap().as_ref_value().unwrap();
    let resolved = owner.resolved().expect("auto-load reference resolves");
    assert_eq!(resolved.get_as::<&str>("name"), Some("Alice"));

    // The non-auto-load reference is left alone.
    let viewer = doc.get("viewer").unwrap().as_ref_value().unwrap();
    assert!(viewer.resolved().is_none());
    assert_eq!(loader.calls(), 1);
}

#[test]
fn test_resolver_load_all_resolves_everything() {
    let loader = MemoryLoader::new();
    let id = Id::new();
    loader.insert(stored_plain(id, "person", "Alice"));

    let mut doc = Doc::new().with("viewer", reference_to(id, "person", false));

    let registry = Registry::with_defaults();
    Resolver::new(&loader, &registry)
        .resolve(&mut doc, true)
        .unwrap();

    let viewer = doc.get("viewer").unwrap().as_ref_value().unwrap();
    assert!(viewer.resolved().is_some());
}

#[test]
fn test_resolver_memoizes_shared_targets() {
    let loader = MemoryLoader::new();
    let id = Id::new();
    loader.insert(stored_plain(id, "person", "Alice"));

    // Two references to the same target, one nested inside a list.
    let contacts: List = [Value::Ref(reference_to(id, "person", true))]
        .into_iter()
        .collect();
    let mut doc = Doc::new()
        .with("owner", reference_to(id, "person", true))
        .with("contacts", contacts);

    let registry = Registry::with_defaults();
    Resolver::new(&loader, &registry)
        .resolve(&mut doc, false)
        .unwrap();

    assert_eq!(loader.calls(), 1);

    let owner = doc.get("owner").unwrap().as_ref_value().unwrap();
    let list = doc.get("contacts").unwrap().as_list().unwrap();
    let contact = list.get(0).unwrap().as_ref_value().unwrap();
    assert!(Rc::ptr_eq(
        owner.resolved().unwrap(),
        contact.resolved().unwrap()
    ));
}

#[test]
fn test_resolver_shares_memo_across_documents() {
    let loader = MemoryLoader::new();
    let id = Id::new();
    loader.insert(stored_plain(id, "person", "Alice"));

    let mut first = Doc::new().with("owner", reference_to(id, "person", true));
    let mut second = Doc::new().with("owner", reference_to(id, "person", true));

    let registry = Registry::with_defaults();
    let resolver = Resolver::new(&loader, &registry);
    let mut memo = std::collections::HashMap::new();
    resolver.resolve_all(&mut first, false, &mut memo).unwrap();
    resolver.resolve_all(&mut second, false, &mut memo).unwrap();

    assert_eq!(loader.calls(), 1);
}

#[test]
fn test_resolver_tolerates_missing_targets() {
    let loader = MemoryLoader::new();
    let mut doc = Doc::new().with("owner", reference_to(Id::new(), "person", true));

    let registry = Registry::with_defaults();
    Resolver::new(&loader, &registry)
        .resolve(&mut doc, false)
        .unwrap();

    let owner = doc.get("owner").unwrap().as_ref_value().unwrap();
    assert!(owner.resolved().is_none());
    assert_eq!(loader.calls(), 1);
}

#[test]
fn test_resolver_skips_references_without_ids() {
    let loader = MemoryLoader::new();
    let mut doc = Doc::new().with("owner", Reference::auto_loading());

    let registry = Registry::with_defaults();
    Resolver::new(&loader, &registry)
        .resolve(&mut doc, true)
        .unwrap();

    assert_eq!(loader.calls(), 0);
}

#[test]
fn test_resolver_does_not_recurse_into_loaded_targets() {
    let loader = MemoryLoader::new();
    let a = Id::new();
    let b = Id::new();

    // a and b reference each other.
    let mut a_plain = stored_plain(a, "person", "Alice");
    let mut b_plain = stored_plain(b, "person", "Bob");
    if let Plain::Map(map) = &mut a_plain {
        map.insert("friend".to_string(), reference_to(b, "person", true).to_plain());
    }
    if let Plain::Map(map) = &mut b_plain {
        map.insert("friend".to_string(), reference_to(a, "person", true).to_plain());
    }
    loader.insert(a_plain);
    loader.insert(b_plain);

    let mut doc = Doc::new().with("owner", reference_to(a, "person", true));

    let registry = Registry::with_defaults();
    Resolver::new(&loader, &registry)
        .resolve(&mut doc, false)
        .unwrap();

    // Only the direct reference loads; the next hop is the caller's call.
    assert_eq!(loader.calls(), 1);
    let owner = doc.get("owner").unwrap().as_ref_value().unwrap();
    let loaded = owner.resolved().unwrap();
    let friend = loaded.get("friend").unwrap().as_ref_value().unwrap();
    assert!(friend.resolved().is_none());
}
