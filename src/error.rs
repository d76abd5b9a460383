//! Errors reported by the sort entry points.

use std::collections::TryReserveError;
use std::fmt;

/// Where an inconsistent ordering relation was noticed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationSite {
    /// `compare(a, b)` and `compare(b, a)` disagreed before any element was moved.
    OrderingProbe,
    /// The left run ran dry while merging from the low end.
    MergeLo,
    /// The right run ran dry while merging from the high end.
    MergeHi,
}

impl fmt::Display for ViolationSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ViolationSite::OrderingProbe => "ordering probe",
            ViolationSite::MergeLo => "merge_lo",
            ViolationSite::MergeHi => "merge_hi",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while sorting.
///
/// A failed sort is terminal for the call. The range still holds exactly the elements it held
/// before, but possibly in a partially reordered state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SortError {
    /// The comparison function is not a total order over the elements it was given.
    ContractViolation { site: ViolationSite },

    /// The scratch buffer used by merges could not be grown.
    AllocationFailure(TryReserveError),

    /// `lo..hi` does not describe a range inside the slice.
    InvalidRange { lo: usize, hi: usize, len: usize },
}

impl fmt::Display for SortError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortError::ContractViolation { site } => {
                write!(
                    f,
                    "comparison method violates its general contract (detected in {site})"
                )
            }
            SortError::AllocationFailure(err) => {
                write!(f, "failed to allocate merge buffer: {err}")
            }
            SortError::InvalidRange { lo, hi, len } => {
                write!(f, "invalid sort range {lo}..{hi} for slice of length {len}")
            }
        }
    }
}

impl std::error::Error for SortError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SortError::AllocationFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TryReserveError> for SortError {
    fn from(err: TryReserveError) -> Self {
        SortError::AllocationFailure(err)
    }
}
