//! Reference sorts and result checks.
//!
//! The odd-even sort is measured against two baselines:
//! - `sort_unstable`: std's single-threaded pattern-defeating quicksort
//! - `parallel_sort`: rayon's parallel pdqsort over all cores
//!
//! Both also serve as oracles when verifying odd-even output.

use rayon::prelude::*;

/// Sort a slice in-place using std's unstable sort.
#[inline]
pub fn sort_unstable(data: &mut [u32]) {
    data.sort_unstable();
}

/// Parallel unstable sort using rayon's parallel pdqsort.
///
/// # Example
///
/// ```
/// let mut data = vec![4, 2, 3, 1];
/// odd_even_sort::baseline::parallel_sort(&mut data);
/// assert_eq!(data, vec![1, 2, 3, 4]);
/// ```
pub fn parallel_sort(data: &mut [u32]) {
    data.par_sort_unstable();
}

/// Check if a slice is sorted in ascending order.
#[inline]
pub fn is_sorted(data: &[u32]) -> bool {
    data.windows(2).all(|w| w[0] <= w[1])
}

/// Check that `sorted` holds exactly the values of `original`, counting
/// duplicates.
pub fn is_permutation_of(sorted: &[u32], original: &[u32]) -> bool {
    if sorted.len() != original.len() {
        return false;
    }
    let mut a = sorted.to_vec();
    let mut b = original.to_vec();
    a.par_sort_unstable();
    b.par_sort_unstable();
    a == b
}
