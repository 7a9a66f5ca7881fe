use std::cell::Cell;
use std::rc::Rc;

// ---------------------------------------------------------------------------
// Busy indicator: scoped acquire/release around blocking work
// ---------------------------------------------------------------------------

/// Shared busy counter read by the UI to show a wait cursor and spinner.
#[derive(Debug, Clone, Default)]
pub struct Busy {
    depth: Rc<Cell<usize>>,
}

impl Busy {
    /// Mark the application busy until the returned guard is dropped.
    pub fn acquire(&self) -> BusyGuard {
        self.depth.set(self.depth.get() + 1);
        BusyGuard {
            depth: Rc::clone(&self.depth),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.depth.get() > 0
    }
}

/// Releases its hold on [`Busy`] when dropped, on every exit path.
#[must_use = "the busy state ends when the guard is dropped"]
#[derive(Debug)]
pub struct BusyGuard {
    depth: Rc<Cell<usize>>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}
