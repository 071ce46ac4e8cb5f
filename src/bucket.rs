//! Bucket: one chain of entries sharing a reduced hash index.
//!
//! A bucket holds arena keys, not the entries themselves. Entries stay in
//! the map's slot arena; rehashing only moves these small links.

use slotmap::DefaultKey;

#[derive(Debug, Default, Clone)]
pub(crate) struct Bucket {
    chain: Vec<DefaultKey>,
}

impl Bucket {
    pub(crate) const fn new() -> Self {
        Self { chain: Vec::new() }
    }

    #[inline]
    pub(crate) fn push(&mut self, slot: DefaultKey) {
        self.chain.push(slot);
    }

    /// First link satisfying `pred`, with its position in the chain.
    #[inline]
    pub(crate) fn find<F>(&self, mut pred: F) -> Option<(usize, DefaultKey)>
    where
        F: FnMut(DefaultKey) -> bool,
    {
        self.chain
            .iter()
            .copied()
            .enumerate()
            .find(|&(_, slot)| pred(slot))
    }

    /// Unlink the entry at `pos`. Chain order carries no meaning, so the last
    /// link fills the hole.
    #[inline]
    pub(crate) fn unlink(&mut self, pos: usize) -> DefaultKey {
        self.chain.swap_remove(pos)
    }

    pub(crate) fn iter(&self) -> core::slice::Iter<'_, DefaultKey> {
        self.chain.iter()
    }

    pub(crate) fn drain(&mut self) -> std::vec::Drain<'_, DefaultKey> {
        self.chain.drain(..)
    }

    pub(crate) fn clear(&mut self) {
        self.chain.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.chain.len()
    }
}

/// Allocate `capacity` empty buckets.
pub(crate) fn new_table(capacity: usize) -> Box<[Bucket]> {
    std::iter::repeat_with(Bucket::new).take(capacity).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn push_find_unlink() {
        let mut arena: SlotMap<DefaultKey, u32> = SlotMap::new();
        let a = arena.insert(1);
        let b = arena.insert(2);
        let c = arena.insert(3);

        let mut bucket = Bucket::new();
        bucket.push(a);
        bucket.push(b);
        bucket.push(c);
        assert_eq!(bucket.len(), 3);

        let (pos, found) = bucket.find(|k| k == a).expect("a is linked");
        assert_eq!(found, a);
        assert_eq!(bucket.unlink(pos), a);
        assert_eq!(bucket.len(), 2);
        assert!(bucket.find(|k| k == a).is_none());
        assert_eq!(bucket.find(|k| k == b).map(|(_, k)| k), Some(b));
        assert_eq!(bucket.find(|k| k == c).map(|(_, k)| k), Some(c));
    }

    #[test]
    fn drain_and_clear_empty_the_chain() {
        let mut arena: SlotMap<DefaultKey, u32> = SlotMap::new();
        let mut bucket = Bucket::new();
        for i in 0..4 {
            bucket.push(arena.insert(i));
        }
        assert_eq!(bucket.drain().count(), 4);
        assert_eq!(bucket.len(), 0);

        bucket.push(arena.insert(9));
        bucket.clear();
        assert_eq!(bucket.iter().count(), 0);
    }

    #[test]
    fn new_table_has_requested_length() {
        let t = new_table(16);
        assert_eq!(t.len(), 16);
        assert!(t.iter().all(|b| b.len() == 0));
    }
}
