//! Candidate execution and output comparison.

pub mod comparator;
pub mod executor;

pub use comparator::OutputComparator;
pub use executor::{CodeExecutor, ExecutionOutcome, ExecutorError};
