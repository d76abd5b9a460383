//! An adaptive, stable merge sort for slices.
//!
//! The input is split into natural runs, short runs are extended with binary insertion sort and
//! runs are merged pairwise under a balancing policy that keeps the number of pending runs
//! logarithmic. Merges switch into a galloping mode when one run keeps winning, which makes
//! partially ordered input much cheaper than random input.
//!
//! All entry points work on the same engine. The `try_*` and range variants report errors and
//! return [`SortStats`] on success, the plain [`sort`], [`sort_by`] and [`sort_by_key`] mirror the
//! signatures of `slice::sort*` and panic if the comparison function is not a total order.

use std::cmp::Ordering;

mod buffer;
mod error;
mod gallop;
mod insertion;
mod merge;
mod run;
mod stack;
mod timsort;

#[cfg(feature = "patterns")]
pub mod patterns;

pub use buffer::{SortBuffer, INITIAL_TMP_STORAGE_LEN};
pub use error::{SortError, ViolationSite};
pub use merge::MIN_GALLOP;
pub use run::MIN_MERGE;
pub use timsort::SortStats;

/// Sorts `v[lo..hi]` stably according to `compare`, leaving everything outside the range alone.
///
/// If `buf` is given and has at least the capacity this call would allocate up front, it is used
/// as scratch space and any growth happens inside it. Otherwise the call allocates its own.
///
/// # Errors
///
/// - [`SortError::InvalidRange`] if `lo > hi` or `hi > v.len()`. Nothing is compared or moved.
/// - [`SortError::ContractViolation`] if `compare` is detectably not a total order.
/// - [`SortError::AllocationFailure`] if the scratch buffer could not be grown.
///
/// On error the range still holds the elements it started with, in unspecified order.
pub fn sort_range_by<T, F>(
    v: &mut [T],
    lo: usize,
    hi: usize,
    compare: F,
    buf: Option<&mut SortBuffer<T>>,
) -> Result<SortStats, SortError>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = v.len();
    if lo > hi || hi > len {
        return Err(SortError::InvalidRange { lo, hi, len });
    }

    timsort::stable_sort(&mut v[lo..hi], compare, buf)
}

/// [`sort_range_by`] with the natural order of `T`.
pub fn sort_range<T: Ord>(
    v: &mut [T],
    lo: usize,
    hi: usize,
    buf: Option<&mut SortBuffer<T>>,
) -> Result<SortStats, SortError> {
    sort_range_by(v, lo, hi, |a, b| a.cmp(b), buf)
}

#[inline]
pub fn try_sort<T: Ord>(v: &mut [T]) -> Result<SortStats, SortError> {
    try_sort_by(v, |a, b| a.cmp(b))
}

#[inline]
pub fn try_sort_by<T, F>(v: &mut [T], compare: F) -> Result<SortStats, SortError>
where
    F: FnMut(&T, &T) -> Ordering,
{
    timsort::stable_sort(v, compare, None)
}

#[inline]
pub fn try_sort_by_key<T, K, F>(v: &mut [T], mut f: F) -> Result<SortStats, SortError>
where
    F: FnMut(&T) -> K,
    K: Ord,
{
    try_sort_by(v, |a, b| f(a).cmp(&f(b)))
}

/// Sorts `v` stably in ascending order.
///
/// # Panics
///
/// If the `Ord` implementation of `T` is detectably not a total order, or the scratch buffer
/// can not be allocated.
#[inline]
pub fn sort<T: Ord>(v: &mut [T]) {
    sort_by(v, |a, b| a.cmp(b));
}

/// Sorts `v` stably according to `compare`.
///
/// # Panics
///
/// Same as [`sort`], with `compare` in place of `Ord`.
pub fn sort_by<T, F>(v: &mut [T], compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    if let Err(err) = try_sort_by(v, compare) {
        panic!("{err}");
    }
}

/// Sorts `v` stably by the keys `f` extracts. Keys are recomputed for every comparison.
#[inline]
pub fn sort_by_key<T, K, F>(v: &mut [T], mut f: F)
where
    F: FnMut(&T) -> K,
    K: Ord,
{
    sort_by(v, |a, b| f(a).cmp(&f(b)));
}
