//! Parallel Odd-Even Transposition Sort
//!
//! The sequence is split into one contiguous block per worker. Every worker
//! runs the same fixed number of rounds over its block:
//!
//! 1. Even phase: compare-and-swap every pair `(i, i + 1)` with even `i` in
//!    the block.
//! 2. Wait at the barrier.
//! 3. Odd phase: the same for odd `i`.
//! 4. Wait at the barrier.
//!
//! A pair belongs to the worker whose block holds its left index, so the last
//! pair of a block reaches one element into the next block. Within a phase
//! all pairs share a parity and are therefore disjoint, and the barrier keeps
//! phase `k + 1` from starting anywhere before phase `k` has ended everywhere.
//! That ordering is the only synchronization the elements get.
//!
//! ## Rounds
//!
//! `n` phases are enough to sort `n` elements, so `ceil(n / 2)` rounds always
//! suffice. The default is the looser `n` rounds. There is no early exit on
//! convergence.
//!
//! ## Workers
//!
//! Workers run on a rayon pool built with exactly `worker_count` threads for
//! the duration of one sort, started with `ThreadPool::broadcast` so that each
//! barrier participant has a thread of its own. A worker that panics leaves
//! the others waiting at the barrier forever.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Barrier;

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace};

use crate::error::SortError;
use crate::partition::{check_worker_count, partition, Range};
use crate::sequence::SharedSequence;

/// Worker count used by [`SortConfig::default`].
pub const DEFAULT_WORKERS: usize = 4;

const EVEN: usize = 0;
const ODD: usize = 1;

/// Round count used when none is configured: one round per element.
#[inline]
pub fn default_rounds(n: usize) -> usize {
    n
}

/// A round count that always sorts `n` elements: `n` phases, two per round.
#[inline]
pub fn sufficient_rounds(n: usize) -> usize {
    n.div_ceil(2)
}

/// Worker and round settings for one sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortConfig {
    /// Number of parallel workers, and barrier participants.
    pub worker_count: usize,
    /// Rounds each worker runs. `None` means [`default_rounds`].
    pub round_count: Option<usize>,
}

impl SortConfig {
    pub fn new(worker_count: usize) -> Self {
        SortConfig {
            worker_count,
            round_count: None,
        }
    }

    pub fn with_round_count(mut self, rounds: usize) -> Self {
        self.round_count = Some(rounds);
        self
    }

    /// Rounds to run for a sequence of `n` elements.
    pub fn rounds_for(&self, n: usize) -> usize {
        self.round_count.unwrap_or_else(|| default_rounds(n))
    }

    /// Checks that this configuration can sort `n` elements.
    pub fn validate(&self, n: usize) -> Result<(), SortError> {
        check_worker_count(self.worker_count)?;
        if self.round_count == Some(0) && n > 1 {
            return Err(SortError::invalid(format!(
                "round_count must be at least 1 to sort {} elements",
                n
            )));
        }
        Ok(())
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        SortConfig::new(DEFAULT_WORKERS)
    }
}

/// What a finished sort ran with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortReport {
    pub elements: usize,
    pub workers: usize,
    pub rounds: usize,
    /// Block assigned to each worker, by worker id.
    pub ranges: Vec<Range>,
    /// Total swaps performed across all workers.
    pub swaps: usize,
}

struct Worker {
    id: usize,
    range: Range,
    sequence: SharedSequence,
}

impl Worker {
    /// Runs the full round loop and returns the number of swaps made.
    fn run(&self, barrier: &Barrier, rounds: usize) -> usize {
        trace!(
            worker = self.id,
            start = self.range.start,
            len = self.range.len,
            "worker starting"
        );
        let mut swaps = 0;
        for _ in 0..rounds {
            swaps += self.phase(EVEN);
            barrier.wait();
            swaps += self.phase(ODD);
            barrier.wait();
        }
        trace!(worker = self.id, swaps, "worker done");
        swaps
    }

    fn phase(&self, parity: usize) -> usize {
        let total = self.sequence.len();
        let mut swaps = 0;
        for i in self.range.pair_starts(parity, total) {
            debug_assert!(i + 1 < self.range.reach(total));
            if self.sequence.compare_and_swap(i, i + 1) {
                swaps += 1;
            }
        }
        swaps
    }
}

/// Sorts `sequence` ascending with `worker_count` workers and the default
/// round count.
///
/// On error the sequence is left as it was.
///
/// # Example
///
/// ```
/// let mut data = vec![5, 3, 8, 1, 9, 2];
/// odd_even_sort::sort(&mut data, 2).unwrap();
/// assert_eq!(data, vec![1, 2, 3, 5, 8, 9]);
/// ```
pub fn sort(sequence: &mut [u32], worker_count: usize) -> Result<(), SortError> {
    sort_with_config(sequence, &SortConfig::new(worker_count)).map(|_| ())
}

/// Sorts `sequence` ascending according to `config`.
///
/// The configuration is validated and the worker threads are created before
/// the sequence is touched; results are copied back only after every worker
/// has exited.
pub fn sort_with_config(
    sequence: &mut [u32],
    config: &SortConfig,
) -> Result<SortReport, SortError> {
    let n = sequence.len();
    config.validate(n)?;
    let ranges = partition(n, config.worker_count)?;
    let rounds = config.rounds_for(n);

    let pool = ThreadPoolBuilder::new()
        .num_threads(config.worker_count)
        .thread_name(|i| format!("odd-even-{}", i))
        .build()
        .map_err(SortError::WorkerSpawn)?;

    debug!(
        elements = n,
        workers = config.worker_count,
        rounds,
        "starting odd-even sort"
    );

    let shared = SharedSequence::from_slice(sequence);
    let workers: Vec<Worker> = ranges
        .iter()
        .enumerate()
        .map(|(id, &range)| Worker {
            id,
            range,
            sequence: shared.clone(),
        })
        .collect();
    let barrier = Barrier::new(config.worker_count);

    let per_worker = broadcast_workers(&pool, |id| workers[id].run(&barrier, rounds))?;

    shared.write_to(sequence);
    let swaps: usize = per_worker.iter().sum();
    debug!(elements = n, swaps, "odd-even sort finished");

    Ok(SortReport {
        elements: n,
        workers: config.worker_count,
        rounds,
        ranges,
        swaps,
    })
}

/// Runs `op` once on every thread of `pool`, passing the thread index.
///
/// A panic that unwinds out of the pool becomes [`SortError::WorkerFailure`].
/// Only a single-worker pool can get that far: with more workers the
/// survivors are already stuck at the barrier.
fn broadcast_workers<R, F>(pool: &ThreadPool, op: F) -> Result<Vec<R>, SortError>
where
    F: Fn(usize) -> R + Sync,
    R: Send,
{
    panic::catch_unwind(AssertUnwindSafe(|| pool.broadcast(|ctx| op(ctx.index())))).map_err(
        |payload| SortError::WorkerFailure {
            message: panic_message(payload.as_ref()),
        },
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "worker panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::is_sorted;
    use rand::Rng;

    fn sorted_copy(data: &[u32]) -> Vec<u32> {
        let mut expected = data.to_vec();
        expected.sort_unstable();
        expected
    }

    #[test]
    fn test_sort_scenario_two_workers() {
        let mut data = vec![5, 3, 8, 1, 9, 2];
        let config = SortConfig::new(2).with_round_count(6);
        let report = sort_with_config(&mut data, &config).unwrap();
        assert_eq!(data, vec![1, 2, 3, 5, 8, 9]);
        assert_eq!(report.rounds, 6);
        assert_eq!(report.workers, 2);
        assert_eq!(
            report.ranges,
            vec![Range { start: 0, len: 3 }, Range { start: 3, len: 3 }]
        );
    }

    #[test]
    fn test_sort_empty() {
        let mut data: Vec<u32> = vec![];
        sort(&mut data, 1).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn test_sort_single() {
        let mut data = vec![42u32];
        sort(&mut data, 3).unwrap();
        assert_eq!(data, vec![42]);
    }

    #[test]
    fn test_sort_zero_workers_leaves_input() {
        let mut data = vec![3u32, 1, 2];
        let err = sort(&mut data, 0).unwrap_err();
        assert!(err.is_invalid_configuration());
        assert_eq!(data, vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_zero_rounds_rejected() {
        let mut data = vec![2u32, 1];
        let config = SortConfig::new(1).with_round_count(0);
        assert!(sort_with_config(&mut data, &config)
            .unwrap_err()
            .is_invalid_configuration());
        assert_eq!(data, vec![2, 1]);

        // Nothing to compare, so zero rounds is fine.
        let mut one = vec![7u32];
        assert!(sort_with_config(&mut one, &config).is_ok());
    }

    #[test]
    fn test_sort_reverse_sorted() {
        let mut data: Vec<u32> = (0..200).rev().collect();
        sort(&mut data, 4).unwrap();
        assert_eq!(data, (0..200).collect::<Vec<u32>>());
    }

    #[test]
    fn test_sort_random_uneven_blocks() {
        let mut rng = rand::thread_rng();
        let mut data: Vec<u32> = (0..301).map(|_| rng.gen_range(0..100)).collect();
        let expected = sorted_copy(&data);
        sort(&mut data, 7).unwrap();
        assert!(is_sorted(&data));
        assert_eq!(data, expected);
    }

    #[test]
    fn test_sort_more_workers_than_elements() {
        let mut data = vec![4u32, 2, 3];
        let report = sort_with_config(&mut data, &SortConfig::new(6)).unwrap();
        assert_eq!(data, vec![2, 3, 4]);
        assert_eq!(report.ranges.len(), 6);
    }

    #[test]
    fn test_sort_one_element_per_worker() {
        let mut data: Vec<u32> = vec![9, 7, 5, 3, 1, 8, 6, 4, 2, 0];
        let n = data.len();
        sort(&mut data, n).unwrap();
        assert_eq!(data, (0..10).collect::<Vec<u32>>());
    }

    #[test]
    fn test_sort_duplicates_and_extremes() {
        let mut data = vec![u32::MAX, 5, 0, 5, u32::MAX, 1, 0, 5];
        sort(&mut data, 3).unwrap();
        assert_eq!(data, vec![0, 0, 1, 5, 5, 5, u32::MAX, u32::MAX]);
    }

    #[test]
    fn test_sufficient_rounds_sort_reverse_input() {
        for n in [2usize, 3, 10, 33, 64] {
            for workers in [1usize, 2, 3, 4] {
                let mut data: Vec<u32> = (0..n as u32).rev().collect();
                let config = SortConfig::new(workers).with_round_count(sufficient_rounds(n));
                sort_with_config(&mut data, &config).unwrap();
                assert_eq!(data, (0..n as u32).collect::<Vec<u32>>(), "n={} w={}", n, workers);
            }
        }
    }

    #[test]
    fn test_half_plus_one_rounds_sort_random_input() {
        let mut rng = rand::thread_rng();
        let n = 150;
        let mut data: Vec<u32> = (0..n).map(|_| rng.gen()).collect();
        let expected = sorted_copy(&data);
        let config = SortConfig::new(4).with_round_count(n / 2 + 1);
        sort_with_config(&mut data, &config).unwrap();
        assert_eq!(data, expected);
    }

    #[test]
    fn test_sorted_input_makes_no_swaps() {
        let mut data: Vec<u32> = (0..100).collect();
        let report = sort_with_config(&mut data, &SortConfig::new(4)).unwrap();
        assert_eq!(report.swaps, 0);
        assert_eq!(data, (0..100).collect::<Vec<u32>>());
    }

    #[test]
    fn test_single_round_is_one_transposition_pass() {
        // One round = one even and one odd phase, not a full sort.
        let mut data = vec![3u32, 2, 1, 0];
        let config = SortConfig::new(2).with_round_count(1);
        sort_with_config(&mut data, &config).unwrap();
        // even: (3,2)->(2,3), (1,0)->(0,1) => [2,3,0,1]; odd: (3,0) => [2,0,3,1]
        assert_eq!(data, vec![2, 0, 3, 1]);
    }

    #[test]
    fn test_config_defaults() {
        let config = SortConfig::default();
        assert_eq!(config.worker_count, DEFAULT_WORKERS);
        assert_eq!(config.rounds_for(17), 17);
        assert_eq!(config.with_round_count(5).rounds_for(17), 5);
    }

    #[test]
    fn test_sufficient_rounds_values() {
        assert_eq!(sufficient_rounds(0), 0);
        assert_eq!(sufficient_rounds(1), 1);
        assert_eq!(sufficient_rounds(6), 3);
        assert_eq!(sufficient_rounds(7), 4);
        assert_eq!(default_rounds(7), 7);
    }

    #[test]
    fn test_sort_huge_worker_count_leaves_input() {
        let mut data = vec![2u32, 1];
        let err = sort(&mut data, usize::MAX / 2).unwrap_err();
        assert!(err.is_invalid_configuration());
        assert_eq!(data, vec![2, 1]);
    }

    #[test]
    fn test_single_worker_panic_becomes_worker_failure() {
        let pool = ThreadPoolBuilder::new().num_threads(1).build().unwrap();
        let result: Result<Vec<usize>, SortError> =
            broadcast_workers(&pool, |id| panic!("worker {} lost its range", id));
        match result {
            Err(SortError::WorkerFailure { message }) => {
                assert_eq!(message, "worker 0 lost its range");
            }
            other => panic!("expected WorkerFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_broadcast_workers_runs_every_index() {
        let pool = ThreadPoolBuilder::new().num_threads(3).build().unwrap();
        let mut ids = broadcast_workers(&pool, |id| id).unwrap();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("lost a worker");
        assert_eq!(panic_message(payload.as_ref()), "lost a worker");
        let payload: Box<dyn Any + Send> = Box::new(String::from("owned"));
        assert_eq!(panic_message(payload.as_ref()), "owned");
        let payload: Box<dyn Any + Send> = Box::new(17u8);
        assert_eq!(panic_message(payload.as_ref()), "worker panicked");
    }
}
