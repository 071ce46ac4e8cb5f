//! chained-hashmap: a single-threaded hash map that resolves collisions by
//! separate chaining and grows by doubling its bucket array.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small, auditable associative container whose amortized cost is
//!   bounded by a configurable maximum load factor.
//! - Layers:
//!   - Entry arena: a `slotmap::SlotMap` owns every `(key, value, hash)`
//!     entry. An entry keeps its arena key for as long as it is stored.
//!   - Buckets: a boxed slice of chains; each chain lists the arena keys of
//!     the entries whose hash reduces to that bucket's index.
//!   - ChainedHashMap<K, V, S>: public API (`put`, `get`, `remove`,
//!     `remove_if_eq`, `key_set`, `clear`, iteration) on top of the two.
//!
//! Constraints
//! - Single-threaded: no internal locking. The map is `Send` but not `Sync`;
//!   wrap it in a mutex to share it.
//! - Keys are unique; `put` on a present key overwrites the value in place.
//! - After every `put`, `len / capacity <= max_load_factor`.
//! - Capacity never shrinks; `remove` and `clear` keep the bucket array.
//!
//! Indexing and growth
//! - Every operation maps a key to `hash % capacity` using the capacity in
//!   effect at the call. The 64-bit hash is computed once at insertion and
//!   cached in the entry.
//! - Growth is checked before insertion with the prospective size
//!   (`len + 1`). Crossing the bound doubles the bucket array and relinks all
//!   entries in one pass from their cached hashes; `K: Hash` is not called
//!   during a resize.
//! - Load factors below `MIN_MAX_LOAD_FACTOR` are refused at construction,
//!   which bounds how far a single `put` can grow the table.
//!
//! Reentrancy policy
//! - Methods call user code only through `K: Hash`, `K: Eq` and, for
//!   `remove_if_eq`, `V: PartialEq`. A debug-only check panics if that code
//!   re-enters the same map. Destructors of removed or cleared entries run
//!   after the map is consistent again and may re-enter freely.
//!
//! Notes and non-goals
//! - Iteration order is unspecified and not stable across resizes.
//! - `key_set()` is rebuilt from the buckets on every call; there is no cached
//!   key set to fall out of sync.
//! - No shrinking, persistence or thread-safety.
//! - Keys whose `Hash` and `Eq` disagree give unspecified (but memory-safe)
//!   lookup results.

mod bucket;
pub mod chained_hash_map;
mod chained_hash_map_proptest;
mod config;
mod error;
mod reentrancy;

// Public surface
pub use chained_hash_map::{ChainedHashMap, Iter, IterMut, Keys, Values, ValuesMut};
pub use config::{TableConfig, DEFAULT_CAPACITY, DEFAULT_MAX_LOAD_FACTOR, MIN_MAX_LOAD_FACTOR};
pub use error::TableError;
