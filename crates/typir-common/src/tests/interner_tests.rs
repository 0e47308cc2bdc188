use crate::Interner;

#[test]
fn interning_deduplicates() {
    let interner = Interner::new();
    let a = interner.intern("hello");
    let b = interner.intern("hello");
    let c = interner.intern("world");

    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.resolve(a), "hello");
    assert_eq!(interner.resolve(c), "world");
}

#[test]
fn interner_tracks_unique_count() {
    let interner = Interner::new();
    assert!(interner.is_empty());

    interner.intern("a");
    interner.intern("b");
    interner.intern("a");

    assert_eq!(interner.len(), 2);
}
