//! Errors surfaced by segment compilation.

use thiserror::Error;

use crate::bound::TimeRange;

/// Recoverable compile failures. Sweep invariant violations are bugs and are
/// checked with debug assertions instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    #[error("section {index} has a NaN bound")]
    NanBound { index: usize },
    #[error("inserted segment {inserted} overflows gap {gap}")]
    GapOverflow { gap: TimeRange, inserted: TimeRange },
}
