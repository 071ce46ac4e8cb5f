// ChainedHashMap property tests through the public API.
//
// Property 1: uniqueness and round trip.
//  - For any sequence of puts, len() equals the number of distinct keys and
//    get() returns the last value put for each key.
//
// Property 2: load-factor bound and monotone capacity.
//  - For any (capacity, load factor) and any sequence of puts/removes,
//    len/capacity <= max_load_factor after each put and capacity never
//    decreases.
//
// Property 3: key set completeness.
//  - key_set() has exactly len() elements and contains precisely the keys
//    with a present get().
use chained_hashmap::ChainedHashMap;
use proptest::prelude::*;
use std::collections::HashMap;

proptest! {
    #[test]
    fn prop_uniqueness_and_round_trip(
        pairs in proptest::collection::vec((0u32..40, any::<i64>()), 0..200)
    ) {
        let mut m: ChainedHashMap<u32, i64> = ChainedHashMap::new();
        let mut last: HashMap<u32, i64> = HashMap::new();

        for (k, v) in pairs {
            let before = m.len();
            let fresh = !last.contains_key(&k);
            m.put(k, v);
            last.insert(k, v);
            prop_assert_eq!(m.len(), before + usize::from(fresh));
            prop_assert_eq!(m.get(&k), Some(&v));
            prop_assert!(m.contains_key(&k));
        }

        prop_assert_eq!(m.len(), last.len());
        for (k, v) in &last {
            prop_assert_eq!(m.get(k), Some(v));
        }
    }
}

proptest! {
    #[test]
    fn prop_load_factor_and_monotone_capacity(
        capacity in 1usize..32,
        max_load_factor in 0.1f64..3.0,
        ops in proptest::collection::vec((any::<bool>(), 0u32..256), 1..300)
    ) {
        let mut m: ChainedHashMap<u32, u32> =
            ChainedHashMap::with_capacity_and_load_factor(capacity, max_load_factor).unwrap();
        let mut cap = m.capacity();
        prop_assert_eq!(cap, capacity);

        for (is_put, k) in ops {
            if is_put {
                m.put(k, k);
                prop_assert!(m.load_factor() <= max_load_factor);
            } else {
                m.remove(&k);
            }
            prop_assert!(m.capacity() >= cap);
            cap = m.capacity();
        }
    }
}

proptest! {
    #[test]
    fn prop_key_set_completeness(
        ops in proptest::collection::vec((0u8..3, "[a-d]{1,3}"), 1..150)
    ) {
        let mut m: ChainedHashMap<String, usize> = ChainedHashMap::new();
        for (i, (op, k)) in ops.into_iter().enumerate() {
            match op {
                0 | 1 => { m.put(k, i); }
                _ => { m.remove(k.as_str()); }
            }

            let ks = m.key_set();
            prop_assert_eq!(ks.len(), m.len());
            for key in &ks {
                prop_assert!(m.get(key.as_str()).is_some());
            }
            for key in m.keys() {
                prop_assert!(ks.contains(key));
            }
        }
    }
}
