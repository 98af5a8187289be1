//! linked-hashmap: a single-threaded hash map that iterates in insertion
//! order, with owner-checked bidirectional cursors.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: O(1) average lookup, insertion and erasure, with deterministic
//!   insertion-ordered traversal that can be restarted from either end.
//! - Layers:
//!   - Arena: a generational `SlotMap` owning every entry. Entries never
//!     move once inserted, and erased keys never resolve again.
//!   - HashIndex: bucket heads plus per-entry chain links (separate
//!     chaining). Owns nothing.
//!   - OrderList: head/tail plus per-entry order links. Owns nothing.
//!   - LinkedHashMap: keeps the three consistent and exposes the API.
//!   - Cursor / ConstCursor: `(entry, owner id)` tokens validated on use.
//!
//! Invariants
//! - The order list and the union of bucket chains hold the same entries,
//!   and `len()` equals the size of each.
//! - An entry with hash `h` sits in bucket `h mod capacity`; capacity is a
//!   power of two, starting at 16.
//! - After every insertion `len() <= 3/4 * capacity`. The bucket array
//!   doubles before an insertion that would break this and never shrinks,
//!   not even on `clear()`.
//! - Re-inserting a present key is a no-op: value and position are kept.
//!
//! Cursors
//! - Cursors do not borrow the map. Each carries the id of the map that
//!   produced it, so cursors from different maps never compare equal and
//!   are rejected by every other map.
//! - A cursor to an erased entry is stale: the arena generation check
//!   turns every later use into `Error::InvalidIterator`.
//! - Growth re-chains bucket links only, so cursors to live entries stay
//!   valid across insertions and unrelated erasures.
//!
//! Hasher and rehashing
//! - Each entry stores its `u64` hash, computed once at insertion. Growth
//!   and cloning re-chain using the stored hash; `K: Hash` is not called
//!   again for an entry already in the map.
//! - Growth re-chains by walking the order list, so the resulting bucket
//!   layout depends only on insertion order.
//!
//! Reentrancy
//! - Public entry points that run user `Hash`/`Eq` code hold a debug-only
//!   guard; re-entering the same map from that code panics in debug builds.
//!
//! Notes and non-goals
//! - Single-threaded: the map is `!Send + !Sync` in every build profile; no
//!   internal locking.
//! - No shrink-on-erase, no access-order (LRU) mode, no persistence.
//! - `Clone` keeps the source's current bucket count rather than deriving
//!   a tight one from `len()`.

pub mod cursor;
mod entry;
pub mod error;
mod hash_index;
pub mod iter;
pub mod linked_hash_map;
mod linked_hash_map_proptest;
mod order_list;
mod reentrancy;

// Public surface
pub use cursor::{ConstCursor, Cursor};
pub use error::{Error, Result};
pub use linked_hash_map::{DefaultHashBuilder, LinkedHashMap};
