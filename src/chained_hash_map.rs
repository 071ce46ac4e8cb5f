//! ChainedHashMap: separate-chaining table with doubling growth and a debug
//! reentrancy check.

use crate::bucket::{self, Bucket};
use crate::config::TableConfig;
use crate::error::TableError;
use crate::reentrancy::ReentrancyCheck;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::HashSet;
use log::{debug, trace};
use slotmap::{DefaultKey, SlotMap};
use std::collections::hash_map::RandomState;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    hash: u64,
}

type Slots<K, V> = SlotMap<DefaultKey, Entry<K, V>>;

/// Reduce a key hash to a bucket index in `[0, capacity)`.
///
/// Hashes are unsigned, so the plain remainder is already the floor modulus.
/// Every lookup, insertion and rehash goes through here with the capacity in
/// effect at the time of the call.
#[inline]
fn bucket_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity > 0);
    (hash % capacity as u64) as usize
}

/// Capacity needed to hold `prospective` entries under `max_load_factor`,
/// reached by doubling `capacity`. Returns `capacity` when no growth is due.
/// One doubling suffices unless the load factor is below one half.
fn grown_capacity(
    capacity: usize,
    prospective: usize,
    max_load_factor: f64,
) -> Result<usize, TableError> {
    let mut target = capacity;
    while prospective as f64 / target as f64 > max_load_factor {
        target = target
            .checked_mul(2)
            .ok_or(TableError::CapacityOverflow(prospective))?;
    }
    Ok(target)
}

pub struct ChainedHashMap<K, V, S = RandomState> {
    hasher: S,
    buckets: Box<[Bucket]>,
    slots: Slots<K, V>, // entry arena; buckets chain its keys
    max_load_factor: f64,
    reentrancy: ReentrancyCheck,
}

impl<K, V> ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    /// Empty map with 16 buckets and a maximum load factor of 0.75.
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, TableError> {
        Self::with_config_and_hasher(
            TableConfig::new().initial_capacity(capacity),
            Default::default(),
        )
    }

    /// Fails if `capacity` is zero or `max_load_factor` is NaN or below
    /// `MIN_MAX_LOAD_FACTOR`.
    pub fn with_capacity_and_load_factor(
        capacity: usize,
        max_load_factor: f64,
    ) -> Result<Self, TableError> {
        Self::with_config_and_hasher(
            TableConfig::new()
                .initial_capacity(capacity)
                .max_load_factor(max_load_factor),
            Default::default(),
        )
    }
}

impl<K, V> Default for ChainedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(TableConfig::new(), hasher)
    }

    pub fn with_config_and_hasher(config: TableConfig, hasher: S) -> Result<Self, TableError> {
        config.validate()?;
        Ok(Self::from_parts(config, hasher))
    }

    fn from_parts(config: TableConfig, hasher: S) -> Self {
        Self {
            hasher,
            buckets: bucket::new_table(config.initial_capacity),
            slots: SlotMap::with_key(),
            max_load_factor: config.max_load_factor,
            reentrancy: ReentrancyCheck::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of buckets. Only grows.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn max_load_factor(&self) -> f64 {
        self.max_load_factor
    }

    /// Current `len / capacity`.
    pub fn load_factor(&self) -> f64 {
        self.slots.len() as f64 / self.buckets.len() as f64
    }

    // Walk one chain for `q`. Comparing cached hashes first keeps most
    // mismatches away from `K: Eq`.
    fn probe<Q>(
        bucket: &Bucket,
        slots: &Slots<K, V>,
        hash: u64,
        q: &Q,
    ) -> Option<(usize, DefaultKey)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        bucket.find(|slot| {
            slots
                .get(slot)
                .map(|e| e.hash == hash && e.key.borrow() == q)
                .unwrap_or(false)
        })
    }

    /// Bucket index, chain position and arena key of the entry for `q`.
    fn locate<Q>(&self, q: &Q) -> Option<(usize, usize, DefaultKey)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.hasher.hash_one(q);
        let idx = bucket_index(hash, self.buckets.len());
        Self::probe(&self.buckets[idx], &self.slots, hash, q)
            .map(|(pos, slot)| (idx, pos, slot))
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get");
        let (_, _, slot) = self.locate(q)?;
        self.slots.get(slot).map(|e| &e.value)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get_key_value");
        let (_, _, slot) = self.locate(q)?;
        self.slots.get(slot).map(|e| (&e.key, &e.value))
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get_mut");
        let (_, _, slot) = self.locate(q)?;
        self.slots.get_mut(slot).map(|e| &mut e.value)
    }

    /// Same answer as `get(q).is_some()`.
    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("contains_key");
        self.locate(q).is_some()
    }

    /// Insert or overwrite. Returns the previous value when `key` was present.
    ///
    /// Growth is decided before the key is looked up: if one more entry
    /// would push `len / capacity` above the maximum load factor, the table
    /// doubles first (repeatedly, if one doubling is not enough). This also
    /// happens when `key` turns out to be present.
    ///
    /// # Panics
    ///
    /// If the grown bucket count would overflow `usize`; see `try_put`.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        match self.try_put(key, value) {
            Ok(old) => old,
            Err(e) => panic!("{}", e),
        }
    }

    /// `put`, reporting `TableError::CapacityOverflow` instead of panicking
    /// when the table cannot grow enough. The map is unchanged on error and
    /// `key` and `value` are dropped.
    pub fn try_put(&mut self, key: K, value: V) -> Result<Option<V>, TableError> {
        let _g = self.reentrancy.enter("put");

        let capacity = self.buckets.len();
        let target = grown_capacity(capacity, self.slots.len() + 1, self.max_load_factor)?;
        if target != capacity {
            Self::resize(&mut self.buckets, &self.slots, target);
        }

        let hash = self.hasher.hash_one(&key);
        let idx = bucket_index(hash, self.buckets.len());
        if let Some(entry) = Self::probe(&self.buckets[idx], &self.slots, hash, &key)
            .and_then(|(_, slot)| self.slots.get_mut(slot))
        {
            return Ok(Some(core::mem::replace(&mut entry.value, value)));
        }

        let slot = self.slots.insert(Entry { key, value, hash });
        self.buckets[idx].push(slot);
        Ok(None)
    }

    // Relink every entry into a fresh table of `new_capacity` buckets using
    // the cached hashes; entries themselves stay in the arena. Takes fields
    // rather than `&mut self` so callers can hold their reentrancy section.
    fn resize(buckets: &mut Box<[Bucket]>, slots: &Slots<K, V>, new_capacity: usize) {
        let old_capacity = buckets.len();
        let mut table = bucket::new_table(new_capacity);
        for chain in buckets.iter_mut() {
            for slot in chain.drain() {
                if let Some(e) = slots.get(slot) {
                    table[bucket_index(e.hash, new_capacity)].push(slot);
                }
            }
        }
        *buckets = table;
        debug!(
            "resized bucket table from {} to {} buckets, relinked {} entries",
            old_capacity,
            new_capacity,
            slots.len()
        );
    }

    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    /// Unlink and return the stored key and value. Capacity is unchanged.
    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("remove");
        let (idx, pos, slot) = self.locate(q)?;
        let unlinked = self.buckets[idx].unlink(pos);
        debug_assert_eq!(unlinked, slot);
        self.slots.remove(slot).map(|e| (e.key, e.value))
    }

    /// Remove `q` only if its stored value equals `value`, returning the
    /// stored value. A present key with a different value is left untouched.
    pub fn remove_if_eq<Q>(&mut self, q: &Q, value: &V) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: PartialEq,
    {
        let removed = {
            let _g = self.reentrancy.enter("remove_if_eq");
            let (idx, pos, slot) = self.locate(q)?;
            let matches = self
                .slots
                .get(slot)
                .map(|e| e.value == *value)
                .unwrap_or(false);
            if !matches {
                return None;
            }
            self.buckets[idx].unlink(pos);
            self.slots.remove(slot)
        };
        // The key is dropped here, outside the section.
        removed.map(|e| e.value)
    }

    /// Drop every entry; the bucket count is kept.
    pub fn clear(&mut self) {
        let entries = {
            let _g = self.reentrancy.enter("clear");
            for chain in self.buckets.iter_mut() {
                chain.clear();
            }
            core::mem::take(&mut self.slots)
        };
        trace!(
            "cleared {} entries, keeping {} buckets",
            entries.len(),
            self.buckets.len()
        );
        // Entry destructors run with the map already consistent.
        drop(entries);
    }

    /// Snapshot of the current keys, built from the bucket chains on each
    /// call.
    pub fn key_set(&self) -> HashSet<&K, S>
    where
        S: Clone,
    {
        let _g = self.reentrancy.enter("key_set");
        let mut set = HashSet::with_capacity_and_hasher(self.slots.len(), self.hasher.clone());
        set.extend(
            self.buckets
                .iter()
                .flat_map(Bucket::iter)
                .filter_map(|&slot| self.slots.get(slot))
                .map(|e| &e.key),
        );
        set
    }

    /// Lazy iterator over the keys. Call again to restart.
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { it: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { it: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut { it: self.iter_mut() }
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            it: self.slots.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            it: self.slots.iter_mut(),
        }
    }

    /// Panics if any structural invariant is broken.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        let capacity = self.buckets.len();
        assert!(capacity > 0);
        let mut linked = 0;
        for (idx, chain) in self.buckets.iter().enumerate() {
            for &slot in chain.iter() {
                let e = self.slots.get(slot).expect("chain links a live entry");
                assert_eq!(bucket_index(e.hash, capacity), idx, "entry in wrong bucket");
                assert_eq!(self.hasher.hash_one(&e.key), e.hash, "stale cached hash");
                linked += 1;
            }
        }
        assert_eq!(linked, self.slots.len(), "every entry linked exactly once");
        assert!(self.load_factor() <= self.max_load_factor || self.slots.is_empty());
    }
}

impl<K, V, S> fmt::Debug for ChainedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.slots.values().map(|e| (&e.key, &e.value)))
            .finish()
    }
}

impl<K, V, S> Extend<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.put(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut m = Self::with_hasher(S::default());
        m.extend(iter);
        m
    }
}

impl<'a, K, V, S> IntoIterator for &'a ChainedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over immutable entries in `ChainedHashMap`.
pub struct Iter<'a, K, V> {
    it: slotmap::basic::Iter<'a, DefaultKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &e.value))
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// Iterator over mutable entries in `ChainedHashMap`.
pub struct IterMut<'a, K, V> {
    it: slotmap::basic::IterMut<'a, DefaultKey, Entry<K, V>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, e)| (&e.key, &mut e.value))
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

pub struct Keys<'a, K, V> {
    it: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(k, _)| k)
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

pub struct Values<'a, K, V> {
    it: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, v)| v)
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

pub struct ValuesMut<'a, K, V> {
    it: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|(_, v)| v)
    }
    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}
