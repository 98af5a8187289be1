//! OrderList: intrusive doubly linked list defining iteration order.
//!
//! The list stores only its endpoints; the links live in each `Entry` and
//! the arena owns the entries.

use crate::entry::{Links, Slots};
use slotmap::DefaultKey;

#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct OrderList {
    head: Option<DefaultKey>,
    tail: Option<DefaultKey>,
}

impl OrderList {
    pub(crate) const fn new() -> Self {
        Self {
            head: None,
            tail: None,
        }
    }

    #[inline]
    pub(crate) fn head(&self) -> Option<DefaultKey> {
        self.head
    }

    #[inline]
    pub(crate) fn tail(&self) -> Option<DefaultKey> {
        self.tail
    }

    /// Link `k` after the current tail.
    pub(crate) fn append<K, V>(&mut self, slots: &mut Slots<K, V>, k: DefaultKey) {
        let prev = self.tail;
        slots[k].order = Links { prev, next: None };
        match prev {
            Some(t) => slots[t].order.next = Some(k),
            None => self.head = Some(k),
        }
        self.tail = Some(k);
    }

    /// Splice `k` out, joining its neighbours. O(1).
    pub(crate) fn unlink<K, V>(&mut self, slots: &mut Slots<K, V>, k: DefaultKey) {
        let Links { prev, next } = slots[k].order;
        match prev {
            Some(p) => slots[p].order.next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => slots[n].order.prev = prev,
            None => self.tail = prev,
        }
        slots[k].order = Links::default();
    }

    /// Forget both endpoints. The caller destroys the entries.
    pub(crate) fn clear(&mut self) {
        self.head = None;
        self.tail = None;
    }

    /// Arena keys from head to tail.
    pub(crate) fn keys<'a, K, V>(
        &self,
        slots: &'a Slots<K, V>,
    ) -> impl Iterator<Item = DefaultKey> + 'a {
        let mut cur = self.head;
        core::iter::from_fn(move || {
            let k = cur?;
            cur = slots[k].order.next;
            Some(k)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Entry;
    use slotmap::SlotMap;

    fn filled(n: u32) -> (Slots<u32, ()>, OrderList, Vec<DefaultKey>) {
        let mut slots: Slots<u32, ()> = SlotMap::with_key();
        let mut list = OrderList::new();
        let mut keys = Vec::new();
        for i in 0..n {
            let k = slots.insert(Entry::new(i, (), 0));
            list.append(&mut slots, k);
            keys.push(k);
        }
        (slots, list, keys)
    }

    fn walk(slots: &Slots<u32, ()>, list: &OrderList) -> Vec<u32> {
        list.keys(slots).map(|k| slots[k].key).collect()
    }

    /// Invariant: `append` preserves call order and maintains both endpoints.
    #[test]
    fn append_keeps_sequence() {
        let (slots, list, keys) = filled(4);
        assert_eq!(walk(&slots, &list), vec![0, 1, 2, 3]);
        assert_eq!(list.head(), Some(keys[0]));
        assert_eq!(list.tail(), Some(keys[3]));
        assert_eq!(slots[keys[0]].order.prev, None);
        assert_eq!(slots[keys[3]].order.next, None);
    }

    /// Invariant: unlinking head, middle and tail re-joins neighbours and
    /// moves the endpoints.
    #[test]
    fn unlink_at_every_position() {
        let (mut slots, mut list, keys) = filled(5);
        list.unlink(&mut slots, keys[2]);
        assert_eq!(walk(&slots, &list), vec![0, 1, 3, 4]);
        assert_eq!(slots[keys[2]].order, Links::default());

        list.unlink(&mut slots, keys[0]);
        assert_eq!(list.head(), Some(keys[1]));
        assert_eq!(slots[keys[1]].order.prev, None);

        list.unlink(&mut slots, keys[4]);
        assert_eq!(list.tail(), Some(keys[3]));
        assert_eq!(walk(&slots, &list), vec![1, 3]);

        list.unlink(&mut slots, keys[1]);
        list.unlink(&mut slots, keys[3]);
        assert_eq!(list.head(), None);
        assert_eq!(list.tail(), None);
    }

    #[test]
    fn clear_resets_endpoints() {
        let (slots, mut list, _) = filled(3);
        list.clear();
        assert!(walk(&slots, &list).is_empty());
        assert_eq!(list.tail(), None);
    }
}
