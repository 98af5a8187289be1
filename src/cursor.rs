//! Owner-tagged bidirectional cursors over insertion order.
//!
//! A cursor is a `Copy` token: an optional arena key (none means
//! past-the-end) plus the id of the map that produced it. Cursors do not
//! borrow the map, so they survive insertions, growth and unrelated
//! erasures; every access passes the map explicitly and is validated
//! against the owner id and the arena generation.

use crate::entry::Entry;
use crate::error::{Error, Result};
use crate::linked_hash_map::LinkedHashMap;
use core::sync::atomic::{AtomicU64, Ordering};
use slotmap::DefaultKey;

static NEXT_MAP_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one map instance; fresh for every constructed or cloned map.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub(crate) struct MapId(u64);

impl MapId {
    pub(crate) fn fresh() -> Self {
        MapId(NEXT_MAP_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
struct RawCursor {
    node: Option<DefaultKey>,
    owner: Option<MapId>,
}

impl RawCursor {
    fn check_owner<K, V, S>(&self, map: &LinkedHashMap<K, V, S>) -> Result<()> {
        match self.owner {
            Some(id) if id == map.id => Ok(()),
            _ => Err(Error::InvalidIterator),
        }
    }

    fn entry<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Result<&'a Entry<K, V>> {
        self.check_owner(map)?;
        let k = self.node.ok_or(Error::InvalidIterator)?;
        map.table.slots.get(k).ok_or(Error::InvalidIterator)
    }

    fn next<K, V, S>(&self, map: &LinkedHashMap<K, V, S>) -> Result<Self> {
        let next = self.entry(map)?.order.next;
        Ok(Self { node: next, ..*self })
    }

    // Stepping back from past-the-end lands on the tail, which is still
    // past-the-end for an empty map.
    fn prev<K, V, S>(&self, map: &LinkedHashMap<K, V, S>) -> Result<Self> {
        self.check_owner(map)?;
        if self.node.is_none() {
            return Ok(Self {
                node: map.table.order.tail(),
                ..*self
            });
        }
        let node = self.entry(map)?.order.prev.ok_or(Error::InvalidIterator)?;
        Ok(Self {
            node: Some(node),
            ..*self
        })
    }
}

/// Cursor with read and write access to the entry it references.
///
/// Produced by [`LinkedHashMap::begin`], [`LinkedHashMap::end`],
/// [`LinkedHashMap::find`] and [`LinkedHashMap::insert`]. Two cursors are
/// equal only if they reference the same entry (or are both past-the-end)
/// of the same map instance.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct Cursor {
    raw: RawCursor,
}

/// Read-only cursor. Every [`Cursor`] converts into one.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ConstCursor {
    raw: RawCursor,
}

impl Cursor {
    pub(crate) fn new(node: Option<DefaultKey>, owner: MapId) -> Self {
        Self {
            raw: RawCursor {
                node,
                owner: Some(owner),
            },
        }
    }

    /// Arena key of a live entry of `map`, or `InvalidIterator`.
    pub(crate) fn live_node<K, V, S>(&self, map: &LinkedHashMap<K, V, S>) -> Result<DefaultKey> {
        self.raw.entry(map)?;
        self.raw.node.ok_or(Error::InvalidIterator)
    }

    /// True for the past-the-end position (and for owner-less cursors).
    pub fn is_end(&self) -> bool {
        self.raw.node.is_none()
    }

    /// Advance to the next entry in insertion order. Fails from
    /// past-the-end; the cursor is unchanged on error.
    pub fn move_next<K, V, S>(&mut self, map: &LinkedHashMap<K, V, S>) -> Result<()> {
        self.raw = self.raw.next(map)?;
        Ok(())
    }

    /// Step back to the previous entry. From past-the-end this yields the
    /// last entry, or stays put on an empty map; from the first entry it
    /// fails.
    pub fn move_prev<K, V, S>(&mut self, map: &LinkedHashMap<K, V, S>) -> Result<()> {
        self.raw = self.raw.prev(map)?;
        Ok(())
    }

    pub fn key<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Result<&'a K> {
        self.raw.entry(map).map(|e| &e.key)
    }

    pub fn value<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Result<&'a V> {
        self.raw.entry(map).map(|e| &e.value)
    }

    pub fn get<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Result<(&'a K, &'a V)> {
        self.raw.entry(map).map(|e| (&e.key, &e.value))
    }

    /// Mutable access to the referenced value.
    pub fn value_mut<'a, K, V, S>(&self, map: &'a mut LinkedHashMap<K, V, S>) -> Result<&'a mut V> {
        let k = self.live_node(map)?;
        map.table
            .slots
            .get_mut(k)
            .map(|e| &mut e.value)
            .ok_or(Error::InvalidIterator)
    }
}

impl ConstCursor {
    pub(crate) fn new(node: Option<DefaultKey>, owner: MapId) -> Self {
        Cursor::new(node, owner).into()
    }

    pub fn is_end(&self) -> bool {
        self.raw.node.is_none()
    }

    pub fn move_next<K, V, S>(&mut self, map: &LinkedHashMap<K, V, S>) -> Result<()> {
        self.raw = self.raw.next(map)?;
        Ok(())
    }

    pub fn move_prev<K, V, S>(&mut self, map: &LinkedHashMap<K, V, S>) -> Result<()> {
        self.raw = self.raw.prev(map)?;
        Ok(())
    }

    pub fn key<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Result<&'a K> {
        self.raw.entry(map).map(|e| &e.key)
    }

    pub fn value<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Result<&'a V> {
        self.raw.entry(map).map(|e| &e.value)
    }

    pub fn get<'a, K, V, S>(&self, map: &'a LinkedHashMap<K, V, S>) -> Result<(&'a K, &'a V)> {
        self.raw.entry(map).map(|e| (&e.key, &e.value))
    }
}

impl From<Cursor> for ConstCursor {
    fn from(c: Cursor) -> Self {
        ConstCursor { raw: c.raw }
    }
}

impl PartialEq<ConstCursor> for Cursor {
    fn eq(&self, other: &ConstCursor) -> bool {
        self.raw == other.raw
    }
}

impl PartialEq<Cursor> for ConstCursor {
    fn eq(&self, other: &Cursor) -> bool {
        self.raw == other.raw
    }
}
