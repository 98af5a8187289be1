// LinkedHashMap property tests (public API only).
//
// Property 1: order preservation.
//  - Model: Vec of keys in first-insertion order, duplicates skipped.
//  - Invariant: keys() == model after any insert sequence, regardless of
//    how many times the bucket array grew; every key finds its first value.
//
// Property 2: erase consistency.
//  - Operations: erase the entry at a random position reached by walking
//    a cursor forward from begin().
//  - Invariant: count(k) == 0 afterwards, len drops by exactly one, and the
//    remaining keys keep their relative order.
use linked_hashmap::LinkedHashMap;
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_order_preserved_across_growth(ops in proptest::collection::vec((0u32..500, any::<i64>()), 0..400)) {
        let mut m: LinkedHashMap<u32, i64> = LinkedHashMap::new();
        let mut model: Vec<(u32, i64)> = Vec::new();
        for (k, v) in ops {
            let fresh = !model.iter().any(|(mk, _)| *mk == k);
            let (_, inserted) = m.insert(k, v);
            prop_assert_eq!(inserted, fresh);
            if fresh {
                model.push((k, v));
            }
            prop_assert!(m.len() * 4 <= m.capacity() * 3);
        }
        let seen: Vec<(u32, i64)> = m.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(&seen, &model);
        for (k, v) in &model {
            prop_assert_eq!(m.get(k), Some(v));
        }
    }
}

proptest! {
    #[test]
    fn prop_erase_consistency(n in 1usize..120, picks in proptest::collection::vec(any::<prop::sample::Index>(), 1..40)) {
        let mut m: LinkedHashMap<usize, usize> = (0..n).map(|i| (i, i * 3)).collect();
        let mut model: Vec<usize> = (0..n).collect();
        for pick in picks {
            if model.is_empty() {
                break;
            }
            let pos = pick.index(model.len());
            let mut c = m.begin();
            for _ in 0..pos {
                c.move_next(&m).unwrap();
            }
            let before = m.len();
            let (k, v) = m.erase(c).unwrap();
            prop_assert_eq!(k, model.remove(pos));
            prop_assert_eq!(v, k * 3);
            prop_assert_eq!(m.count(&k), 0);
            prop_assert_eq!(m.len(), before - 1);
            prop_assert!(m.keys().copied().eq(model.iter().copied()));
        }
    }
}
