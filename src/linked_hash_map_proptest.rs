#![cfg(test)]

// Property tests for LinkedHashMap kept inside the crate so the model can
// also check bucket-level invariants through crate-private state.

use crate::{Cursor, Error, LinkedHashMap};
use proptest::prelude::*;
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations so shrinking moves toward earlier keys and
// shorter op lists.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    GetOrDefault(usize),
    Erase(usize),
    Remove(usize),
    Find(usize),
    Contains(String),
    Mutate(usize, i32),
    Clear,
    Iterate,
    WalkBack,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::GetOrDefault),
            2 => idx.clone().prop_map(OpI::Erase),
            1 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Find),
            1 => prop_oneof![contains_pool, "[a-z]{0,4}"].prop_map(OpI::Contains),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Clear),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::WalkBack),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Ordered model: a Vec of pairs in first-insertion order.
fn model_pos(model: &[(Key, i32)], k: &Key) -> Option<usize> {
    model.iter().position(|(mk, _)| mk == k)
}

// Runs one scenario against both the map and the model. Invariants checked:
// - `insert` never overwrites; the flag reports whether the key was new.
// - Access-or-insert appends `0` only for absent keys.
// - `erase` through a found cursor removes exactly that pair; stale cursors
//   never resolve again.
// - Forward iteration and the backward cursor walk both match the model.
// - After every op: len parity, load factor <= 3/4, capacity monotonic.
fn run<S>(mut sut: LinkedHashMap<Key, i32, S>, pool: Vec<String>, ops: Vec<OpI>) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: Vec<(Key, i32)> = Vec::new();
    let mut stale: Vec<Cursor> = Vec::new();
    let mut capacity = sut.capacity();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(&pool, i);
                let (c, inserted) = sut.insert(k.clone(), v);
                match model_pos(&model, &k) {
                    Some(p) => {
                        prop_assert!(!inserted, "insert must not overwrite");
                        prop_assert_eq!(c.value(&sut), Ok(&model[p].1));
                    }
                    None => {
                        prop_assert!(inserted);
                        model.push((k, v));
                    }
                }
            }
            OpI::GetOrDefault(i) => {
                let k = key_from(&pool, i);
                let got = *sut.get_or_insert_default(k.clone());
                match model_pos(&model, &k) {
                    Some(p) => prop_assert_eq!(got, model[p].1),
                    None => {
                        prop_assert_eq!(got, 0);
                        model.push((k, 0));
                    }
                }
            }
            OpI::Erase(i) => {
                let k = key_from(&pool, i);
                let c = sut.find(&k);
                match model_pos(&model, &k) {
                    Some(p) => {
                        let (kk, vv) = sut.erase(c).expect("found cursor is erasable");
                        let (mk, mv) = model.remove(p);
                        prop_assert!(kk == mk);
                        prop_assert_eq!(vv, mv);
                        stale.push(c);
                    }
                    None => {
                        prop_assert_eq!(c, sut.end());
                        prop_assert_eq!(sut.erase(c), Err(Error::InvalidIterator));
                    }
                }
            }
            OpI::Remove(i) => {
                let k = key_from(&pool, i);
                let removed = sut.remove(&k);
                let expected = model_pos(&model, &k).map(|p| model.remove(p).1);
                prop_assert_eq!(removed, expected);
            }
            OpI::Find(i) => {
                let k = key_from(&pool, i);
                let c = sut.find(k.0.as_str());
                match model_pos(&model, &k) {
                    Some(p) => prop_assert_eq!(c.get(&sut), Ok((&model[p].0, &model[p].1))),
                    None => {
                        prop_assert!(c.is_end());
                        prop_assert_eq!(sut.count(&k), 0);
                    }
                }
            }
            OpI::Contains(s) => {
                let has_model = model.iter().any(|(k, _)| k.0 == s);
                prop_assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(&pool, i);
                if let Some(p) = model_pos(&model, &k) {
                    let c = sut.find(&k);
                    let v = c.value_mut(&mut sut).expect("live cursor resolves");
                    *v = v.wrapping_add(d);
                    model[p].1 = model[p].1.wrapping_add(d);
                }
            }
            OpI::Clear => {
                stale.push(sut.begin());
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.capacity(), capacity);
            }
            OpI::Iterate => {
                let seen: Vec<(Key, i32)> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(&seen, &model);
            }
            OpI::WalkBack => {
                let mut c = sut.end();
                let mut seen = Vec::new();
                while c != sut.begin() {
                    c.move_prev(&sut).expect("not yet at the first entry");
                    let (k, v) = c.get(&sut).expect("walk stays on live entries");
                    seen.push((k.clone(), *v));
                }
                if sut.is_empty() {
                    prop_assert_eq!(c.move_prev(&sut), Ok(()));
                    prop_assert!(c.is_end());
                } else {
                    prop_assert_eq!(c.move_prev(&sut), Err(Error::InvalidIterator));
                }
                seen.reverse();
                prop_assert_eq!(&seen, &model);
            }
        }

        for c in &stale {
            if !c.is_end() {
                prop_assert_eq!(c.get(&sut), Err(Error::InvalidIterator));
            }
        }
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.len() * 4 <= sut.capacity() * 3);
        prop_assert!(sut.capacity() >= capacity);
        capacity = sut.capacity();

        prop_assert_eq!(sut.table.chained_len(), sut.len());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run(LinkedHashMap::new(), pool, ops)?;
    }
}

// Collision variant using a constant hasher to stress chain unlinking.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        run(LinkedHashMap::with_hasher(ConstBuildHasher), pool, ops)?;
    }
}

// Property: a clone matches the source at the moment of copying and the two
// evolve independently afterwards.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_clone_independence(
        before in proptest::collection::vec((0u16..64, any::<i32>()), 0..60),
        after in proptest::collection::vec((0u16..64, any::<i32>()), 0..30),
    ) {
        let mut a: LinkedHashMap<u16, i32> = LinkedHashMap::new();
        a.extend(before);
        let snapshot: Vec<(u16, i32)> = a.iter().map(|(k, v)| (*k, *v)).collect();

        let mut b = a.clone();
        prop_assert_eq!(b.capacity(), a.capacity());
        for (k, v) in after {
            *b.get_or_insert_default(k) = v;
            if let Some(first) = b.keys().next().copied() {
                b.remove(&first);
            }
        }
        let now: Vec<(u16, i32)> = a.iter().map(|(k, v)| (*k, *v)).collect();
        prop_assert_eq!(now, snapshot);
    }
}
