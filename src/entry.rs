//! Arena entries and the two link pairs threaded through them.

use slotmap::{DefaultKey, SlotMap};

/// Arena holding every entry. Keys are generational, so a stale key never
/// resolves to an entry inserted later into the same slot.
pub(crate) type Slots<K, V> = SlotMap<DefaultKey, Entry<K, V>>;

/// Non-owning neighbour references within one linked structure.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Links {
    pub(crate) prev: Option<DefaultKey>,
    pub(crate) next: Option<DefaultKey>,
}

#[derive(Debug)]
pub(crate) struct Entry<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    // Computed once at insertion; re-chaining never calls `K: Hash` again.
    pub(crate) hash: u64,
    /// Position in insertion order.
    pub(crate) order: Links,
    /// Position within the bucket chain.
    pub(crate) bucket: Links,
}

impl<K, V> Entry<K, V> {
    pub(crate) fn new(key: K, value: V, hash: u64) -> Self {
        Self {
            key,
            value,
            hash,
            order: Links::default(),
            bucket: Links::default(),
        }
    }
}
