//! Parallel odd-even transposition sort for `u32` sequences.
//!
//! The sequence is split into one contiguous block per worker and the workers
//! alternate even and odd compare-and-swap phases, meeting at a shared barrier
//! after each one.
//!
//! - [`mod@partition`]: block layout of a sequence across workers
//! - [`sequence`]: the shared buffer workers sort in place
//! - [`coordinator`]: the barrier-synchronized round loop and the entry points
//! - [`baseline`]: reference sorts and result checks

pub mod baseline;
pub mod coordinator;
pub mod error;
pub mod partition;
pub mod sequence;

pub use coordinator::{
    default_rounds, sort, sort_with_config, sufficient_rounds, SortConfig, SortReport,
    DEFAULT_WORKERS,
};
pub use error::SortError;
pub use partition::{partition, Range, MAX_WORKERS};
pub use sequence::SharedSequence;
