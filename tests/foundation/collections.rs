//! Integration tests for persistent collections

use scopedsl_foundation::{LtMap, LtVec};

#[test]
fn vec_push_shares_structure() {
    let a: LtVec<i32> = [1, 2].into_iter().collect();
    let b = a.push_back(3);
    assert_eq!(a.len(), 2);
    assert_eq!(b.len(), 3);
    assert_eq!(b.last(), Some(&3));
    assert!(b.contains(&1));
}

#[test]
fn map_iterates_in_key_order() {
    let map = LtMap::new().insert("torso", 1).insert("head", 2).insert("legs", 3);
    let keys: Vec<_> = map.keys().copied().collect();
    assert_eq!(keys, vec!["head", "legs", "torso"]);
}

#[test]
fn map_insert_and_remove_are_persistent() {
    let a = LtMap::new().insert("a", 1);
    let b = a.insert("b", 2);
    let c = b.remove("a");
    assert_eq!(a.len(), 1);
    assert_eq!(b.len(), 2);
    assert!(!c.contains_key("a"));
    assert_eq!(c.get("b"), Some(&2));
    assert_eq!(b, a.insert("b", 2));
}
