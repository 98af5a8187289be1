//! Debug-only reentrancy guard.
//!
//! Public map operations run user `Hash`/`Eq` code while the two link
//! structures may be mid-update. In debug builds the guard records which
//! operation is in progress and panics, naming both operations, if the same
//! map is entered again before it finishes. Release builds compile it away.

#[cfg(debug_assertions)]
use core::cell::Cell;
use core::marker::PhantomData;

/// Per-map tracker. Public entry points open a section with
/// `let _g = self.reentrancy.enter("op");`.
///
/// The marker keeps the owning map `!Send + !Sync` regardless of profile.
#[derive(Debug, Default)]
pub(crate) struct DebugReentrancy {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    _nosend: PhantomData<*mut ()>,
}

impl DebugReentrancy {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _nosend: PhantomData,
        }
    }

    /// Open a guarded section for `op`. Panics in debug builds if another
    /// section of the same map is still open.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> ReentrancyGuard<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!("reentrancy detected: `{op}` entered while `{outer}` is in progress");
            }
            self.active.set(Some(op));
            return ReentrancyGuard {
                owner: self,
                _pd: PhantomData,
            };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return ReentrancyGuard { _pd: PhantomData };
        }
    }
}

/// Closes the section when dropped, including during unwinding.
pub(crate) struct ReentrancyGuard<'a> {
    #[cfg(debug_assertions)]
    owner: &'a DebugReentrancy,
    _pd: PhantomData<&'a ()>,
}

impl Drop for ReentrancyGuard<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active.get().is_some());
            self.owner.active.set(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DebugReentrancy;

    #[test]
    fn sequential_sections_are_ok() {
        let r = DebugReentrancy::new();
        {
            let _g = r.enter("insert");
        }
        let _g = r.enter("find");
    }

    #[cfg(debug_assertions)]
    #[test]
    fn nested_section_panics_with_both_names() {
        let r = DebugReentrancy::new();
        let res = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _outer = r.enter("insert");
            let _inner = r.enter("find");
        }));
        let err = res.expect_err("expected reentrancy to panic in debug builds");
        let msg = err
            .downcast_ref::<String>()
            .cloned()
            .unwrap_or_default();
        assert!(msg.contains("`find`") && msg.contains("`insert`"), "{msg}");

        // The outer guard was dropped during unwinding.
        let _g = r.enter("erase");
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn nesting_is_noop_in_release() {
        let r = DebugReentrancy::new();
        let _g1 = r.enter("insert");
        let _g2 = r.enter("find");
    }
}
