//! Borrowing and owning iterators in insertion order.

use crate::entry::{Entry, Slots};
use crate::order_list::OrderList;
use core::iter::FusedIterator;
use slotmap::{DefaultKey, SecondaryMap};

/// Iterator over `(&K, &V)` in insertion order.
pub struct Iter<'a, K, V> {
    slots: &'a Slots<K, V>,
    front: Option<DefaultKey>,
    back: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) fn new(slots: &'a Slots<K, V>, order: &OrderList) -> Self {
        Self {
            slots,
            front: order.head(),
            back: order.tail(),
            remaining: slots.len(),
        }
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slots = self.slots;
        let e = &slots[self.front?];
        self.front = e.order.next;
        self.remaining -= 1;
        Some((&e.key, &e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slots = self.slots;
        let e = &slots[self.back?];
        self.back = e.order.prev;
        self.remaining -= 1;
        Some((&e.key, &e.value))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
impl<K, V> FusedIterator for Iter<'_, K, V> {}

/// Iterator over `(&K, &mut V)` in insertion order.
///
/// Construction splits the arena into disjoint entry borrows up front
/// (one pass over the arena); each step then takes its entry by key.
pub struct IterMut<'a, K, V> {
    pending: SecondaryMap<DefaultKey, &'a mut Entry<K, V>>,
    front: Option<DefaultKey>,
    back: Option<DefaultKey>,
    remaining: usize,
}

impl<'a, K, V> IterMut<'a, K, V> {
    pub(crate) fn new(slots: &'a mut Slots<K, V>, order: &OrderList) -> Self {
        let remaining = slots.len();
        let mut pending = SecondaryMap::with_capacity(remaining);
        for (k, e) in slots.iter_mut() {
            pending.insert(k, e);
        }
        Self {
            pending,
            front: order.head(),
            back: order.tail(),
            remaining,
        }
    }

    fn take(&mut self, k: DefaultKey) -> Option<&'a mut Entry<K, V>> {
        self.remaining -= 1;
        self.pending.remove(k)
    }
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let e = self.take(self.front?)?;
        self.front = e.order.next;
        Some((&e.key, &mut e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for IterMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let e = self.take(self.back?)?;
        self.back = e.order.prev;
        Some((&e.key, &mut e.value))
    }
}

impl<K, V> ExactSizeIterator for IterMut<'_, K, V> {}
impl<K, V> FusedIterator for IterMut<'_, K, V> {}

/// Owning iterator over `(K, V)` in insertion order.
pub struct IntoIter<K, V> {
    slots: Slots<K, V>,
    front: Option<DefaultKey>,
    back: Option<DefaultKey>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(slots: Slots<K, V>, order: OrderList) -> Self {
        Self {
            slots,
            front: order.head(),
            back: order.tail(),
        }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let e = self.slots.remove(self.front?)?;
        self.front = e.order.next;
        Some((e.key, e.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.slots.len(), Some(self.slots.len()))
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let e = self.slots.remove(self.back?)?;
        self.back = e.order.prev;
        Some((e.key, e.value))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}
impl<K, V> FusedIterator for IntoIter<K, V> {}

/// Keys in insertion order.
pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next().map(|(k, _)| k)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(k, _)| k)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

/// Values in insertion order.
pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    #[inline]
    fn next(&mut self) -> Option<&'a V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

/// Mutable values in insertion order.
pub struct ValuesMut<'a, K, V> {
    pub(crate) inner: IterMut<'a, K, V>,
}

impl<'a, K, V> Iterator for ValuesMut<'a, K, V> {
    type Item = &'a mut V;

    fn next(&mut self) -> Option<&'a mut V> {
        self.inner.next().map(|(_, v)| v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for ValuesMut<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, v)| v)
    }
}

impl<K, V> ExactSizeIterator for ValuesMut<'_, K, V> {}
