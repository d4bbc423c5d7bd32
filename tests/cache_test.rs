//! Tests for the shared-instance cache (one construction per key, stable sharing)

use std::cell::Cell;
use std::rc::Rc;

use rstest::rstest;

use plantree::util::testing::init_test_setup;
use plantree::{CacheKey, Element, InstanceCache};

fn element_cache() -> InstanceCache<Element> {
    InstanceCache::new(|key: &CacheKey| match key {
        CacheKey::Id(id) => Element::command(format!("runner-{}", id), *id),
        CacheKey::Name(name) => Element::notify(name.clone(), 1),
    })
}

// ============================================================
// Sharing Tests
// ============================================================

#[test]
fn given_same_key_when_getting_twice_then_same_instance_is_returned() {
    init_test_setup();
    let mut cache = element_cache();

    let first = cache.get(0u64) as *const Element;
    let second = cache.get(1u64) as *const Element;
    let third = cache.get(0u64) as *const Element;

    assert!(std::ptr::eq(first, third), "equal keys share one instance");
    assert!(!std::ptr::eq(first, second), "distinct keys get distinct instances");
    assert_eq!(cache.len(), 2);
}

#[test]
fn given_growing_cache_when_rehash_occurs_then_early_references_stay_valid() {
    let mut cache = element_cache();
    let first = cache.get(0u64) as *const Element;

    // enough inserts to force the map to reallocate
    for id in 1..64u64 {
        cache.get(id);
    }

    let again = cache.get(0u64) as *const Element;
    assert!(std::ptr::eq(first, again));
}

// ============================================================
// Construction Cost Tests
// ============================================================

#[test]
fn given_repeated_gets_when_counting_constructions_then_one_per_key() {
    let built = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&built);
    let mut cache = InstanceCache::new(move |key: &CacheKey| {
        counter.set(counter.get() + 1);
        key.to_string()
    });

    cache.get("alpha");
    cache.get("alpha");
    cache.get("beta");
    cache.get("alpha");

    assert_eq!(built.get(), 2, "one construction per distinct key");
    assert_eq!(cache.len(), 2);
}

// ============================================================
// Key Variant Tests
// ============================================================

#[rstest]
#[case(CacheKey::Id(0))]
#[case(CacheKey::Id(u64::MAX))]
#[case(CacheKey::Name("".to_string()))]
#[case(CacheKey::Name("runner-eu-1".to_string()))]
fn given_any_key_variant_when_getting_then_instance_is_cached(#[case] key: CacheKey) {
    let mut cache = element_cache();
    assert!(!cache.contains(key.clone()));

    cache.get(key.clone());
    assert!(cache.contains(key));
    assert_eq!(cache.len(), 1);
}

#[test]
fn given_id_and_name_keys_when_getting_then_they_do_not_collide() {
    let mut cache = element_cache();
    cache.get(7u64);
    cache.get("7");

    assert_eq!(cache.len(), 2);
}
