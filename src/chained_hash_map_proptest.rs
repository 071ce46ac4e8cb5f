#![cfg(test)]

// Property tests for ChainedHashMap kept inside the crate so they can call
// the internal `assert_consistent` check after every operation.

use crate::chained_hash_map::ChainedHashMap;
use core::hash::BuildHasher;
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hasher;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
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

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Put(usize, i32),
    Get(usize),
    Contains(String),
    Remove(usize),
    RemoveIfEq(usize, i32),
    Mutate(usize, i32),
    Clear,
    KeySet,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        // Small values so remove_if_eq hits matches often.
        let val = -3i32..3;
        let op = prop_oneof![
            4 => (idx.clone(), val.clone()).prop_map(|(i, v)| OpI::Put(i, v)),
            2 => idx.clone().prop_map(OpI::Get),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            2 => idx.clone().prop_map(OpI::Remove),
            2 => (idx.clone(), val.clone()).prop_map(|(i, v)| OpI::RemoveIfEq(i, v)),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Clear),
            1 => Just(OpI::KeySet),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Property: State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - `put` overwrites on duplicate keys and returns the previous value.
// - `get`/`contains_key` parity with the model, including borrowed `&str` lookups.
// - `remove` and `remove_if_eq` return exactly what the model removes.
// - `key_set`/`keys` equal the model's key set; `len` matches after each op.
// - Structural consistency (bucket placement, load factor) after each op;
//   capacity never decreases.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: ChainedHashMap<Key, i32> = ChainedHashMap::with_capacity(2).unwrap();
        let mut model: HashMap<Key, i32> = HashMap::new();
        let mut last_capacity = sut.capacity();

        for op in ops {
            match op {
                OpI::Put(i, v) => {
                    let k = key_from(&pool, i);
                    prop_assert_eq!(sut.put(k.clone(), v), model.insert(k, v));
                }
                OpI::Get(i) => {
                    let k = key_from(&pool, i);
                    prop_assert_eq!(sut.get(&k), model.get(&k));
                    prop_assert_eq!(sut.get(k.0.as_str()), model.get(&k));
                }
                OpI::Contains(s) => {
                    let expected = model.contains_key(&Key(s.clone()));
                    prop_assert_eq!(sut.contains_key(s.as_str()), expected);
                }
                OpI::Remove(i) => {
                    let k = key_from(&pool, i);
                    prop_assert_eq!(sut.remove(&k), model.remove(&k));
                }
                OpI::RemoveIfEq(i, v) => {
                    let k = key_from(&pool, i);
                    let expected = match model.get(&k) {
                        Some(stored) if *stored == v => model.remove(&k),
                        _ => None,
                    };
                    prop_assert_eq!(sut.remove_if_eq(&k, &v), expected);
                }
                OpI::Mutate(i, d) => {
                    let k = key_from(&pool, i);
                    if let Some(v) = sut.get_mut(&k) {
                        *v = v.wrapping_add(d);
                    }
                    if let Some(v) = model.get_mut(&k) {
                        *v = v.wrapping_add(d);
                    }
                }
                OpI::Clear => {
                    sut.clear();
                    model.clear();
                    prop_assert_eq!(sut.capacity(), last_capacity);
                }
                OpI::KeySet => {
                    let got: BTreeSet<Key> = sut.key_set().into_iter().cloned().collect();
                    let via_keys: BTreeSet<Key> = sut.keys().cloned().collect();
                    let expected: BTreeSet<Key> = model.keys().cloned().collect();
                    prop_assert_eq!(&got, &expected);
                    prop_assert_eq!(&via_keys, &expected);
                }
            }

            sut.assert_consistent();
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            prop_assert!(sut.capacity() >= last_capacity);
            last_capacity = sut.capacity();
        }

        // Final sweep: every model entry resolves to the same value.
        for (k, v) in &model {
            prop_assert_eq!(sut.get(k), Some(v));
        }
    }
}

// Folds every key into a handful of hashes so chains get long.
#[derive(Clone, Default)]
struct FewBucketsBuildHasher;
struct FewBucketsHasher(u64);
impl BuildHasher for FewBucketsBuildHasher {
    type Hasher = FewBucketsHasher;
    fn build_hasher(&self) -> Self::Hasher {
        FewBucketsHasher(0)
    }
}
impl Hasher for FewBucketsHasher {
    fn write(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.0 = self.0.wrapping_add(*b as u64);
        }
    }
    fn finish(&self) -> u64 {
        self.0 % 3
    }
}

// Property: heavy collisions do not change observable behavior.
// - Keys that share a chain are still distinguished by `Eq`.
// - Resize under collisions keeps every entry reachable.
// - The load-factor bound holds for arbitrary (capacity, load factor) pairs.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_collisions_and_load_factor(
        capacity in 1usize..8,
        max_load_factor in 0.05f64..4.0,
        ops in proptest::collection::vec((any::<bool>(), 0u16..64, any::<u8>()), 1..120)
    ) {
        let mut sut: ChainedHashMap<u16, u8, FewBucketsBuildHasher> =
            ChainedHashMap::with_config_and_hasher(
                crate::TableConfig::new()
                    .initial_capacity(capacity)
                    .max_load_factor(max_load_factor),
                FewBucketsBuildHasher,
            )
            .unwrap();
        let mut model: HashMap<u16, u8> = HashMap::new();

        for (is_put, k, v) in ops {
            if is_put {
                prop_assert_eq!(sut.put(k, v), model.insert(k, v));
                prop_assert!(sut.load_factor() <= max_load_factor);
            } else {
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
            }
            sut.assert_consistent();
        }

        prop_assert_eq!(sut.len(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(sut.get(k), Some(v));
        }
    }
}
