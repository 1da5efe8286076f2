//! Shared storage for the sequence being sorted.
//!
//! Workers hold clones of one [`SharedSequence`] and mutate it concurrently.
//! Element accesses use `Relaxed` atomics: within a phase no two workers touch
//! the same index, and the barrier between phases orders everything else.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Reference-counted, fixed-length buffer of `u32` shared by all workers.
#[derive(Debug, Clone)]
pub struct SharedSequence {
    cells: Arc<[AtomicU32]>,
}

impl SharedSequence {
    /// Copies `data` into a new shared buffer.
    pub fn from_slice(data: &[u32]) -> Self {
        let cells: Arc<[AtomicU32]> = data.iter().map(|&v| AtomicU32::new(v)).collect();
        SharedSequence { cells }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Swaps the values at `left` and `right` if `left`'s value is strictly
    /// greater. Returns whether a swap happened.
    ///
    /// The caller must be the only one touching this pair for the current
    /// phase; the check and the two stores are not one atomic step.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn compare_and_swap(&self, left: usize, right: usize) -> bool {
        let (a, b) = (&self.cells[left], &self.cells[right]);
        let (x, y) = (a.load(Ordering::Relaxed), b.load(Ordering::Relaxed));
        if x > y {
            a.store(y, Ordering::Relaxed);
            b.store(x, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    /// Copies the current contents into `out`, which must have the same length.
    pub fn write_to(&self, out: &mut [u32]) {
        debug_assert_eq!(out.len(), self.len());
        for (slot, cell) in out.iter_mut().zip(self.cells.iter()) {
            *slot = cell.load(Ordering::Relaxed);
        }
    }
}
