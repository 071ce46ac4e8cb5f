//! Debug-only reentrancy check for map operations.
//!
//! `ChainedHashMap` calls into user code (`K: Hash`, `K: Eq`) while it walks
//! bucket chains. If that code reaches back into the same map the chains may
//! be observed mid-update. In debug builds the check below panics on such a
//! nested call and names both operations; in release builds it is a no-op.

use core::cell::Cell;
use core::marker::PhantomData;

/// Tracks the operation currently running on one map. Public methods open a
/// section with `let _g = self.reentrancy.enter("get");`.
#[derive(Debug)]
pub(crate) struct ReentrancyCheck {
    #[cfg(debug_assertions)]
    active: Cell<Option<&'static str>>,
    // !Sync in every build profile, but still Send so a map can move
    // behind a Mutex.
    _not_sync: PhantomData<Cell<()>>,
}

impl ReentrancyCheck {
    pub(crate) const fn new() -> Self {
        Self {
            #[cfg(debug_assertions)]
            active: Cell::new(None),
            _not_sync: PhantomData,
        }
    }

    /// Open a section for operation `op`. Panics in debug builds if another
    /// section on the same map is still open.
    #[inline]
    pub(crate) fn enter(&self, op: &'static str) -> Section<'_> {
        #[cfg(debug_assertions)]
        {
            if let Some(outer) = self.active.get() {
                panic!(
                    "reentrancy detected: `{}` called while `{}` is running on the same map",
                    op, outer
                );
            }
            self.active.set(Some(op));
            return Section { owner: self };
        }

        #[cfg(not(debug_assertions))]
        {
            let _ = op;
            return Section { _owner: PhantomData };
        }
    }

    #[cfg(all(test, debug_assertions))]
    pub(crate) fn active(&self) -> Option<&'static str> {
        self.active.get()
    }
}

impl Default for ReentrancyCheck {
    fn default() -> Self {
        Self::new()
    }
}

/// Open section; closing happens on drop.
pub(crate) struct Section<'a> {
    #[cfg(debug_assertions)]
    owner: &'a ReentrancyCheck,
    #[cfg(not(debug_assertions))]
    _owner: PhantomData<&'a ()>,
}

impl Drop for Section<'_> {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        {
            debug_assert!(self.owner.active.get().is_some());
            self.owner.active.set(None);
        }
    }
}
