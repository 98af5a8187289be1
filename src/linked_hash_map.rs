//! LinkedHashMap: the container facade over the arena, the hash index and
//! the order list.

use crate::cursor::{ConstCursor, Cursor, MapId};
use crate::entry::{Entry, Slots};
use crate::error::{Error, Result};
use crate::hash_index::{HashIndex, INITIAL_CAPACITY};
use crate::iter::{IntoIter, Iter, IterMut, Keys, Values, ValuesMut};
use crate::order_list::OrderList;
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::ops::Index;
use log::trace;
use slotmap::{DefaultKey, SlotMap};

/// Hasher used when none is named.
pub type DefaultHashBuilder = hashbrown::hash_map::DefaultHashBuilder;

/// Arena plus both link structures. Kept apart from the hasher and the
/// reentrancy tracker so methods can borrow it mutably while a guard is held.
pub(crate) struct Table<K, V> {
    pub(crate) slots: Slots<K, V>,
    pub(crate) index: HashIndex,
    pub(crate) order: OrderList,
}

impl<K, V> Table<K, V> {
    fn with_capacity(buckets: usize, entries: usize) -> Self {
        Self {
            slots: SlotMap::with_capacity_and_key(entries),
            index: HashIndex::with_capacity(buckets),
            order: OrderList::new(),
        }
    }

    fn locate<Q>(&self, hash: u64, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        self.index.locate(&self.slots, hash, q)
    }

    /// Add a key known to be absent: grow if needed, then link into both
    /// structures.
    fn push(&mut self, key: K, value: V, hash: u64) -> DefaultKey {
        if self.index.needs_growth(self.slots.len()) {
            let from = self.index.capacity();
            self.index.grow(&mut self.slots, &self.order);
            trace!(
                "linked hash map grew from {} to {} buckets at {} entries",
                from,
                self.index.capacity(),
                self.slots.len()
            );
        }
        let k = self.slots.insert(Entry::new(key, value, hash));
        self.order.append(&mut self.slots, k);
        self.index.place(&mut self.slots, k);
        k
    }

    fn unlink(&mut self, k: DefaultKey) -> Option<Entry<K, V>> {
        if !self.slots.contains_key(k) {
            return None;
        }
        self.index.unlink(&mut self.slots, k);
        self.order.unlink(&mut self.slots, k);
        self.slots.remove(k)
    }

    // `SlotMap::clear` bumps every slot generation, so cursors taken before
    // the clear stay stale after slots are reused.
    fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
        self.slots.clear();
    }

    fn entries(&self) -> impl Iterator<Item = &Entry<K, V>> + '_ {
        self.order.keys(&self.slots).map(move |k| &self.slots[k])
    }

    /// Entries reachable across all bucket chains.
    #[cfg(test)]
    pub(crate) fn chained_len(&self) -> usize {
        (0..self.index.capacity())
            .map(|b| self.index.chain_len(b, |k| self.slots[k].bucket.next))
            .sum()
    }
}

/// Hash map that iterates in first-insertion order.
///
/// Entries live in a generational arena and are threaded onto two intrusive
/// lists: a bucket chain for lookup and an order list for traversal.
/// Re-inserting a present key changes neither its value nor its position.
/// The bucket array starts at 16, doubles whenever an insertion would take
/// the load factor past 3/4, and never shrinks.
pub struct LinkedHashMap<K, V, S = DefaultHashBuilder> {
    hasher: S,
    pub(crate) table: Table<K, V>,
    pub(crate) id: MapId,
    reentrancy: DebugReentrancy,
}

impl<K, V> LinkedHashMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_hasher(Default::default())
    }

    /// Map whose bucket array already holds `capacity` entries without growing.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_hasher(capacity, Default::default())
    }
}

impl<K, V> Default for LinkedHashMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, S> LinkedHashMap<K, V, S> {
    fn from_parts(buckets: usize, entries: usize, hasher: S) -> Self {
        Self {
            hasher,
            table: Table::with_capacity(buckets, entries),
            id: MapId::fresh(),
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.table.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.slots.is_empty()
    }

    /// Current bucket count. Starts at 16 and only ever doubles.
    pub fn capacity(&self) -> usize {
        self.table.index.capacity()
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    /// Cursor at the first inserted entry, or `end()` when empty.
    pub fn begin(&self) -> Cursor {
        Cursor::new(self.table.order.head(), self.id)
    }

    /// Past-the-end cursor.
    pub fn end(&self) -> Cursor {
        Cursor::new(None, self.id)
    }

    pub fn cbegin(&self) -> ConstCursor {
        ConstCursor::new(self.table.order.head(), self.id)
    }

    pub fn cend(&self) -> ConstCursor {
        ConstCursor::new(None, self.id)
    }

    pub fn first(&self) -> Option<(&K, &V)> {
        let e = &self.table.slots[self.table.order.head()?];
        Some((&e.key, &e.value))
    }

    pub fn last(&self) -> Option<(&K, &V)> {
        let e = &self.table.slots[self.table.order.tail()?];
        Some((&e.key, &e.value))
    }

    /// Remove the entry `cursor` references and hand back its pair.
    ///
    /// Fails with [`Error::InvalidIterator`] for past-the-end, owner-less,
    /// foreign or stale cursors; the map is untouched in that case.
    pub fn erase(&mut self, cursor: Cursor) -> Result<(K, V)> {
        let _g = self.reentrancy.enter("erase");
        let k = cursor.live_node(self)?;
        let entry = self.table.unlink(k).ok_or(Error::InvalidIterator)?;
        Ok((entry.key, entry.value))
    }

    /// Destroy every entry. The bucket count is kept.
    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter("clear");
        trace!(
            "clearing linked hash map of {} entries, keeping {} buckets",
            self.len(),
            self.capacity()
        );
        self.table.clear();
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.table.slots, &self.table.order)
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut::new(&mut self.table.slots, &self.table.order)
    }

    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    pub fn values_mut(&mut self) -> ValuesMut<'_, K, V> {
        ValuesMut {
            inner: self.iter_mut(),
        }
    }
}

impl<K, V, S> LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_parts(INITIAL_CAPACITY, 0, hasher)
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::from_parts(HashIndex::capacity_for(capacity), capacity, hasher)
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    fn find_node<Q>(&self, q: &Q) -> Option<DefaultKey>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.locate(self.make_hash(q), q)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get");
        let k = self.find_node(q)?;
        Some(&self.table.slots[k].value)
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get_mut");
        let k = self.find_node(q)?;
        Some(&mut self.table.slots[k].value)
    }

    pub fn get_key_value<Q>(&self, q: &Q) -> Option<(&K, &V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("get_key_value");
        let e = &self.table.slots[self.find_node(q)?];
        Some((&e.key, &e.value))
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("contains_key");
        self.find_node(q).is_some()
    }

    /// 1 if the key is present, else 0.
    pub fn count<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("count");
        usize::from(self.find_node(q).is_some())
    }

    /// Bounds-checked access. Never inserts.
    pub fn at<Q>(&self, q: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get(q).ok_or(Error::KeyNotFound)
    }

    pub fn at_mut<Q>(&mut self, q: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.get_mut(q).ok_or(Error::KeyNotFound)
    }

    /// Cursor at the entry for `q`, or `end()`.
    pub fn find<Q>(&self, q: &Q) -> Cursor
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("find");
        Cursor::new(self.find_node(q), self.id)
    }

    /// Read-only cursor at the entry for `q`, or `cend()`.
    pub fn cfind<Q>(&self, q: &Q) -> ConstCursor
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("cfind");
        ConstCursor::new(self.find_node(q), self.id)
    }

    /// Insert `key` if absent. A present key keeps its value and position;
    /// the returned flag tells which case happened and the cursor points at
    /// the entry either way.
    pub fn insert(&mut self, key: K, value: V) -> (Cursor, bool) {
        let _g = self.reentrancy.enter("insert");
        let hash = self.make_hash(&key);
        if let Some(k) = self.table.locate(hash, &key) {
            return (Cursor::new(Some(k), self.id), false);
        }
        let k = self.table.push(key, value, hash);
        (Cursor::new(Some(k), self.id), true)
    }

    /// Value for `key`, inserting `default()` at the tail first if absent.
    /// `default` runs only when an insertion happens.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let _g = self.reentrancy.enter("get_or_insert_with");
        let hash = self.make_hash(&key);
        let k = match self.table.locate(hash, &key) {
            Some(k) => k,
            None => self.table.push(key, default(), hash),
        };
        &mut self.table.slots[k].value
    }

    /// Access-or-insert with `V::default()`.
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Remove the entry for `q`, returning its value.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.remove_entry(q).map(|(_, v)| v)
    }

    pub fn remove_entry<Q>(&mut self, q: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter("remove_entry");
        let k = self.find_node(q)?;
        let entry = self.table.unlink(k)?;
        Some((entry.key, entry.value))
    }
}

impl<K, V, S> Clone for LinkedHashMap<K, V, S>
where
    K: Clone,
    V: Clone,
    S: Clone,
{
    /// Deep copy in insertion order. The copy keeps the source's bucket
    /// count and gets its own identity, so cursors never cross over.
    fn clone(&self) -> Self {
        let mut out = Self::from_parts(self.capacity(), self.len(), self.hasher.clone());
        out.copy_entries(self);
        out
    }

    fn clone_from(&mut self, source: &Self) {
        self.hasher = source.hasher.clone();
        self.table.clear();
        self.table.index.reset(source.capacity());
        self.copy_entries(source);
    }
}

impl<K: Clone, V: Clone, S> LinkedHashMap<K, V, S> {
    // Source keys are unique and share our hasher, so stored hashes are
    // reused and no lookup is needed.
    fn copy_entries(&mut self, source: &Self) {
        for e in source.table.entries() {
            self.table.push(e.key.clone(), e.value.clone(), e.hash);
        }
    }
}

impl<K, V, S> fmt::Debug for LinkedHashMap<K, V, S>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// Equal when both hold the same pairs in the same order.
impl<K, V, S> PartialEq for LinkedHashMap<K, V, S>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, S> Eq for LinkedHashMap<K, V, S> {}

impl<K, Q, V, S> Index<&Q> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash + Borrow<Q>,
    Q: ?Sized + Eq + Hash,
    S: BuildHasher,
{
    type Output = V;

    /// Panics with [`Error::KeyNotFound`] if the key is absent.
    fn index(&self, key: &Q) -> &V {
        match self.at(key) {
            Ok(v) => v,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<K, V, S> Extend<(K, V)> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Pairs whose key is already present are dropped, as with `insert`.
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K, V, S> FromIterator<(K, V)> for LinkedHashMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::with_hasher(S::default());
        map.extend(iter);
        map
    }
}

impl<K, V, S> IntoIterator for LinkedHashMap<K, V, S> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> IntoIter<K, V> {
        IntoIter::new(self.table.slots, self.table.order)
    }
}

impl<'a, K, V, S> IntoIterator for &'a LinkedHashMap<K, V, S> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

impl<'a, K, V, S> IntoIterator for &'a mut LinkedHashMap<K, V, S> {
    type Item = (&'a K, &'a mut V);
    type IntoIter = IterMut<'a, K, V>;

    fn into_iter(self) -> IterMut<'a, K, V> {
        self.iter_mut()
    }
}
