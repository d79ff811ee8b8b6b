//! Scope lifetime tests against the headless engine

use opendesign_engine::{create_string_ref, with_scope, HeadlessEngine, NativeEngine, RawHandle};
use std::panic::{catch_unwind, AssertUnwindSafe};

#[test]
fn test_no_handle_survives_its_scope() {
    let engine = HeadlessEngine::new();
    let first = with_scope(&engine, |scope| create_string_ref(scope, "first").raw());

    for count in 0..300 {
        let allocated: Vec<RawHandle> = with_scope(&engine, |scope| {
            let mut raws = Vec::new();
            for i in 0..count % 8 {
                if i % 3 == 0 {
                    raws.push(scope.error_slot().raw());
                } else {
                    raws.push(create_string_ref(scope, &format!("value-{i}")).raw());
                }
            }
            assert!(raws.iter().all(|raw| engine.is_live(*raw)));
            raws
        });

        assert!(allocated.iter().all(|raw| !engine.is_live(*raw)), "count = {count}");
        assert_eq!(engine.live_handle_count(), 0);
    }

    // the first scope's slot has been recycled hundreds of times by now
    with_scope(&engine, |scope| {
        let fresh = create_string_ref(scope, "secret");
        assert_eq!(fresh.raw().index(), first.index());
        assert!(!engine.is_live(first));
        assert!(engine.is_live(fresh.raw()));
    });
}

#[test]
fn test_slot_generation_does_not_wrap_to_a_released_handle() {
    let engine = HeadlessEngine::new();
    let first = with_scope(&engine, |scope| create_string_ref(scope, "first").raw());

    for _ in 0..255 {
        with_scope(&engine, |scope| {
            create_string_ref(scope, "filler");
        });
    }

    with_scope(&engine, |scope| {
        let fresh = create_string_ref(scope, "secret");
        assert_eq!(fresh.raw().index(), first.index());
        assert_eq!(fresh.raw().generation(), 256);
        assert!(!engine.is_live(first));
    });
}

#[test]
fn test_nested_scope_releases_before_outer() {
    let engine = HeadlessEngine::new();

    with_scope(&engine, |outer| {
        let kept = create_string_ref(outer, "outer");

        let inner_raw = outer.nest(|inner| {
            let s = create_string_ref(inner, "inner");
            // outer handles stay usable inside the nested scope
            assert!(engine.is_live(kept.raw()));
            s.raw()
        });

        assert!(!engine.is_live(inner_raw));
        assert!(engine.is_live(kept.raw()));
        assert_eq!(outer.allocation_count(), 1);
    });

    assert_eq!(engine.live_handle_count(), 0);
}

#[test]
fn test_scope_releases_when_closure_panics() {
    let engine = HeadlessEngine::new();
    let mut leaked = None;

    let result = catch_unwind(AssertUnwindSafe(|| {
        with_scope(&engine, |scope| {
            leaked = Some(create_string_ref(scope, "doomed").raw());
            panic!("engine call blew up");
        })
    }));

    assert!(result.is_err());
    assert!(!engine.is_live(leaked.unwrap()));
    assert_eq!(engine.live_handle_count(), 0);
}

#[test]
fn test_stale_handle_reads_nothing() {
    let engine = HeadlessEngine::new();

    let error_raw = with_scope(&engine, |scope| scope.error_slot().raw());

    // a fresh allocation reuses the slot under a new generation
    with_scope(&engine, |scope| {
        let fresh = scope.error_slot();
        assert_eq!(fresh.raw().index(), error_raw.index());
        assert_ne!(fresh.raw().generation(), error_raw.generation());
        assert!(!engine.is_live(error_raw));
        assert_eq!(engine.error_message(fresh), None);
    });
}
