//! HashIndex: separate chaining over arena entries.
//!
//! The bucket array holds only chain heads; chain links live in each
//! `Entry::bucket`. Bucket count is a power of two, so `hash mod capacity`
//! reduces to a mask.

use crate::entry::{Links, Slots};
use crate::order_list::OrderList;
use core::borrow::Borrow;
use slotmap::DefaultKey;

/// Bucket count of a freshly constructed map.
pub(crate) const INITIAL_CAPACITY: usize = 16;

#[derive(Clone, Debug)]
pub(crate) struct HashIndex {
    buckets: Vec<Option<DefaultKey>>,
}

impl HashIndex {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        debug_assert!(capacity.is_power_of_two());
        Self {
            buckets: vec![None; capacity],
        }
    }

    /// Smallest valid bucket count that holds `len` entries without growing.
    pub(crate) fn capacity_for(len: usize) -> usize {
        let mut capacity = INITIAL_CAPACITY;
        while len.saturating_mul(4) > capacity.saturating_mul(3) {
            capacity *= 2;
        }
        capacity
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    fn bucket_of(&self, hash: u64) -> usize {
        (hash & (self.buckets.len() as u64 - 1)) as usize
    }

    /// True when one more entry would push the load factor past 3/4.
    #[inline]
    pub(crate) fn needs_growth(&self, len: usize) -> bool {
        len.saturating_mul(4) >= self.capacity().saturating_mul(3)
    }

    /// Walk the chain for `hash`, comparing stored hashes before keys.
    pub(crate) fn locate<K, V, Q>(&self, slots: &Slots<K, V>, hash: u64, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mut cur = self.buckets[self.bucket_of(hash)];
        while let Some(k) = cur {
            let e = &slots[k];
            if e.hash == hash && e.key.borrow() == q {
                return Some(k);
            }
            cur = e.bucket.next;
        }
        None
    }

    /// Push `k` onto the head of its bucket chain.
    pub(crate) fn place<K, V>(&mut self, slots: &mut Slots<K, V>, k: DefaultKey) {
        let b = self.bucket_of(slots[k].hash);
        let head = self.buckets[b];
        slots[k].bucket = Links {
            prev: None,
            next: head,
        };
        if let Some(h) = head {
            slots[h].bucket.prev = Some(k);
        }
        self.buckets[b] = Some(k);
    }

    /// Detach `k` from its chain using its own links; no chain scan.
    pub(crate) fn unlink<K, V>(&mut self, slots: &mut Slots<K, V>, k: DefaultKey) {
        let Links { prev, next } = slots[k].bucket;
        match prev {
            Some(p) => slots[p].bucket.next = next,
            None => {
                let b = self.bucket_of(slots[k].hash);
                self.buckets[b] = next;
            }
        }
        if let Some(n) = next {
            slots[n].bucket.prev = prev;
        }
        slots[k].bucket = Links::default();
    }

    /// Double the bucket count and re-chain every entry in insertion order,
    /// so the resulting layout does not depend on the previous one.
    pub(crate) fn grow<K, V>(&mut self, slots: &mut Slots<K, V>, order: &OrderList) {
        let capacity = self.capacity() * 2;
        self.buckets = vec![None; capacity];
        let mut cur = order.head();
        while let Some(k) = cur {
            cur = slots[k].order.next;
            self.place(slots, k);
        }
    }

    /// Empty every bucket, keeping the bucket count.
    pub(crate) fn clear(&mut self) {
        self.buckets.fill(None);
    }

    pub(crate) fn reset(&mut self, capacity: usize) {
        *self = Self::with_capacity(capacity);
    }

    #[cfg(test)]
    pub(crate) fn chain_len(&self, bucket: usize, slots_next: impl Fn(DefaultKey) -> Option<DefaultKey>) -> usize {
        let mut n = 0;
        let mut cur = self.buckets[bucket];
        while let Some(k) = cur {
            n += 1;
            cur = slots_next(k);
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use slotmap::SlotMap;

    // Entries hash to their own key, so bucket placement is predictable.
    fn setup(keys: &[u64]) -> (Slots<u64, ()>, OrderList, HashIndex, Vec<DefaultKey>) {
        let mut slots: Slots<u64, ()> = SlotMap::with_key();
        let mut order = OrderList::new();
        let mut index = HashIndex::with_capacity(INITIAL_CAPACITY);
        let mut handles = Vec::new();
        for &key in keys {
            let k = slots.insert(Entry::new(key, (), key));
            order.append(&mut slots, k);
            index.place(&mut slots, k);
            handles.push(k);
        }
        (slots, order, index, handles)
    }

    fn total_chained(index: &HashIndex, slots: &Slots<u64, ()>) -> usize {
        (0..index.capacity())
            .map(|b| index.chain_len(b, |k| slots[k].bucket.next))
            .sum()
    }

    fn chain(index: &HashIndex, slots: &Slots<u64, ()>, bucket: usize) -> Vec<DefaultKey> {
        let mut out = Vec::new();
        let mut cur = index.buckets[bucket];
        while let Some(k) = cur {
            out.push(k);
            cur = slots[k].bucket.next;
        }
        out
    }

    /// Invariant: every placed entry is found; absent keys are not.
    #[test]
    fn locate_present_and_absent() {
        let (slots, _order, index, handles) = setup(&[1, 17, 33, 2]);
        assert_eq!(index.locate(&slots, 17, &17), Some(handles[1]));
        assert_eq!(index.locate(&slots, 2, &2), Some(handles[3]));
        assert_eq!(index.locate(&slots, 49, &49), None);
        // Same bucket, matching hash, different key.
        assert_eq!(index.locate(&slots, 1, &999), None);
    }

    /// Invariant: colliding entries share one chain; the newest is the head.
    #[test]
    fn collisions_chain_at_head() {
        let (slots, _order, index, handles) = setup(&[1, 17, 33]);
        assert_eq!(index.chain_len(1, |k| slots[k].bucket.next), 3);
        assert_eq!(index.buckets[1], Some(handles[2]));
        assert_eq!(slots[handles[2]].bucket.next, Some(handles[1]));
        assert_eq!(slots[handles[0]].bucket.prev, Some(handles[1]));
    }

    /// Invariant: unlink from head, middle and tail of a chain leaves the
    /// remaining entries reachable.
    #[test]
    fn unlink_within_chain() {
        let (mut slots, _order, mut index, handles) = setup(&[1, 17, 33, 49]);
        index.unlink(&mut slots, handles[1]);
        assert_eq!(index.locate(&slots, 17, &17), None);
        assert_eq!(index.locate(&slots, 49, &49), Some(handles[3]));
        index.unlink(&mut slots, handles[3]);
        index.unlink(&mut slots, handles[0]);
        assert_eq!(index.locate(&slots, 33, &33), Some(handles[2]));
        assert_eq!(index.chain_len(1, |k| slots[k].bucket.next), 1);
        index.unlink(&mut slots, handles[2]);
        assert_eq!(index.buckets[1], None);
    }

    /// Invariant: growth doubles the bucket count and re-chains every entry
    /// into `hash mod capacity`.
    #[test]
    fn grow_rechains_all_entries() {
        let keys: Vec<u64> = (0..12).map(|i| i * 16 + 3).collect();
        let (mut slots, order, mut index, handles) = setup(&keys);
        assert_eq!(index.chain_len(3, |k| slots[k].bucket.next), 12);

        index.grow(&mut slots, &order);
        assert_eq!(index.capacity(), 32);
        assert_eq!(total_chained(&index, &slots), 12);
        for (&key, &h) in keys.iter().zip(&handles) {
            assert_eq!(index.locate(&slots, key, &key), Some(h));
        }
        assert_eq!(index.chain_len(3, |k| slots[k].bucket.next), 6);
        assert_eq!(index.chain_len(19, |k| slots[k].bucket.next), 6);

        // Re-chaining walks the order list, so the newest entry of each
        // bucket ends up at its head.
        let even: Vec<DefaultKey> = [10, 8, 6, 4, 2, 0].iter().map(|&i| handles[i]).collect();
        let odd: Vec<DefaultKey> = [11, 9, 7, 5, 3, 1].iter().map(|&i| handles[i]).collect();
        assert_eq!(chain(&index, &slots, 3), even);
        assert_eq!(chain(&index, &slots, 19), odd);
        assert_eq!(slots[handles[10]].bucket.prev, None);
        assert_eq!(slots[handles[0]].bucket.prev, Some(handles[2]));
    }

    #[test]
    fn load_factor_threshold() {
        let index = HashIndex::with_capacity(16);
        assert!(!index.needs_growth(11));
        assert!(index.needs_growth(12));
        assert_eq!(HashIndex::capacity_for(0), 16);
        assert_eq!(HashIndex::capacity_for(12), 16);
        assert_eq!(HashIndex::capacity_for(13), 32);
        assert_eq!(HashIndex::capacity_for(100), 256);
    }
}
