//! Error type shared by the map and its cursors.

/// Result alias for fallible map and cursor operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Contract violations reported by [`LinkedHashMap`](crate::LinkedHashMap)
/// and its cursors. A failed call never mutates the map.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum Error {
    /// Bounds-checked access (`at`, `at_mut`, `map[&key]`) on an absent key.
    #[error("key not found")]
    KeyNotFound,

    /// The cursor is past-the-end, has no owning map, belongs to a different
    /// map, or references an entry that has been erased.
    #[error("invalid iterator")]
    InvalidIterator,
}
