//! Block partitioning of a sequence across workers.
//!
//! Every worker gets one contiguous block. The first `w - 1` blocks hold
//! `n / w` elements each and the last block absorbs the remainder, so the
//! blocks tile `[0, n)` with no gaps and no overlaps.

use crate::error::SortError;

/// Largest worker count a sort accepts. Every worker is a dedicated thread
/// and a barrier participant.
pub const MAX_WORKERS: usize = 1024;

/// A worker's block: `len` elements starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    /// First index owned by this block (inclusive).
    pub start: usize,
    /// Number of indices owned by this block.
    pub len: usize,
}

impl Range {
    /// One past the last owned index.
    #[inline]
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// One past the last index this block may compare against in a sequence
    /// of `total` elements.
    ///
    /// This is the owned block plus the first element of the next block,
    /// which the pair starting at the last owned index reaches into.
    pub fn reach(&self, total: usize) -> usize {
        if self.is_empty() {
            self.start
        } else {
            (self.end() + 1).min(total)
        }
    }

    /// Left indices of the pairs this block compares in the phase with the
    /// given parity (0 = even, 1 = odd), in a sequence of `total` elements.
    ///
    /// Parity is taken from the global index so that all blocks agree on
    /// which pairs make up a phase, whatever their sizes.
    pub fn pair_starts(&self, parity: usize, total: usize) -> impl Iterator<Item = usize> {
        let first = if self.start % 2 == parity {
            self.start
        } else {
            self.start + 1
        };
        let stop = self.end().min(total.saturating_sub(1));
        (first..stop).step_by(2)
    }
}

/// Splits `n` elements into `w` contiguous blocks.
///
/// Fails with [`SortError::InvalidConfiguration`] when `w` is zero or above
/// [`MAX_WORKERS`]. When `w > n` the leading blocks are empty and the last
/// one holds everything.
pub fn partition(n: usize, w: usize) -> Result<Vec<Range>, SortError> {
    check_worker_count(w)?;

    let base = n / w;
    let mut ranges = Vec::with_capacity(w);
    for id in 0..w - 1 {
        ranges.push(Range {
            start: id * base,
            len: base,
        });
    }
    // The last block takes the remainder: base + n % w.
    ranges.push(Range {
        start: (w - 1) * base,
        len: n - base * (w - 1),
    });

    Ok(ranges)
}

pub(crate) fn check_worker_count(w: usize) -> Result<(), SortError> {
    if w == 0 {
        return Err(SortError::invalid("worker_count must be at least 1"));
    }
    if w > MAX_WORKERS {
        return Err(SortError::invalid(format!(
            "worker_count {} exceeds the limit of {}",
            w, MAX_WORKERS
        )));
    }
    Ok(())
}
