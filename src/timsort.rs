//! The sort driver and the state one sort call carries between merges.

use std::cmp::Ordering;
use std::mem;

use crate::buffer::{self, SortBuffer};
use crate::error::{SortError, ViolationSite};
use crate::gallop::{gallop_left, gallop_right};
use crate::insertion::binary_insertion_sort;
use crate::merge::{merge_hi, merge_lo, GallopState, MIN_GALLOP};
use crate::run::{count_run_and_make_ascending, min_run_length, MIN_MERGE};
use crate::stack::{Run, RunStack};

/// What a successful sort call did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortStats {
    /// Number of elements in the sorted range.
    pub len: usize,
    /// Number of times the comparison function was called.
    pub comparisons: u64,
    /// Number of runs pushed onto the run stack, after extending short ones.
    pub runs: usize,
    /// Number of pairs of adjacent runs combined, including ones that needed no element moves.
    pub merges: usize,
    /// Number of times a merge switched into galloping mode.
    pub gallop_entries: usize,
    /// Largest number of pending runs at any point.
    pub max_stack_depth: usize,
    /// Capacity of the scratch buffer at the end of the call, 0 if none was needed.
    pub buffer_capacity: usize,
    /// Galloping threshold at the end of the call.
    pub min_gallop: usize,
}

/// Sorts all of `v` stably according to `compare`.
///
/// `reusable` is used as scratch space if it is at least as large as the initial scratch size this
/// call wants, otherwise a buffer is allocated for the call.
pub(crate) fn stable_sort<T, F>(
    v: &mut [T],
    mut compare: F,
    reusable: Option<&mut SortBuffer<T>>,
) -> Result<SortStats, SortError>
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = v.len();
    let mut stats = SortStats {
        len,
        min_gallop: MIN_GALLOP,
        ..SortStats::default()
    };

    if mem::size_of::<T>() == 0 || len < 2 {
        // Sorting has no meaningful behavior on zero-sized types, and short inputs are always
        // sorted. Do nothing.
        stats.runs = len.min(1);
        return Ok(stats);
    }

    let mut comparisons = 0u64;

    // A relation that answers the same for (a, b) and (b, a) would be taken for one long run and
    // never reach a merge that could notice. Check once on large ranges.
    if len >= 2 * MIN_MERGE {
        comparisons += 2;
        if compare(&v[0], &v[1]) != compare(&v[1], &v[0]).reverse() {
            log::debug!("ordering probe failed on a range of {len} elements");
            return Err(SortError::ContractViolation {
                site: ViolationSite::OrderingProbe,
            });
        }
    }

    let mut is_less = |a: &T, b: &T| {
        comparisons += 1;
        compare(a, b) == Ordering::Less
    };

    if len < MIN_MERGE {
        // Too short to be worth merging, extend the first run over the whole range.
        let run_len = count_run_and_make_ascending(v, &mut is_less);
        binary_insertion_sort(v, run_len, &mut is_less);

        stats.runs = 1;
        stats.max_stack_depth = 1;
        stats.comparisons = comparisons;
        return Ok(stats);
    }

    let initial_capacity = buffer::initial_capacity(len);
    let mut owned;
    let buf = match reusable {
        Some(buf) if buf.capacity() >= initial_capacity => buf,
        _ => {
            owned = SortBuffer::try_with_capacity(initial_capacity)?;
            &mut owned
        }
    };

    let mut state = MergeState {
        buf,
        range_len: len,
        runs: RunStack::for_len(len),
        gallop: GallopState::new(),
        merges: 0,
    };

    let result = merge_sort(v, &mut state, &mut is_less);

    stats.runs = state.runs_pushed();
    stats.merges = state.merges;
    stats.gallop_entries = state.gallop.entries;
    stats.max_stack_depth = state.runs.max_depth();
    stats.buffer_capacity = state.buf.capacity();
    stats.min_gallop = state.gallop.min_gallop;
    stats.comparisons = comparisons;

    match result {
        Ok(()) => {
            log::trace!("sorted {len} elements: {stats:?}");
            Ok(stats)
        }
        Err(err) => {
            log::debug!("sort of {len} elements aborted after {} merges: {err}", stats.merges);
            Err(err)
        }
    }
}

/// Splits `v` into runs, extends short ones to `min_run` elements and merges them while keeping
/// the run stack balanced.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
fn merge_sort<T, F>(
    v: &mut [T],
    state: &mut MergeState<'_, T>,
    is_less: &mut F,
) -> Result<(), SortError>
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    let min_run = min_run_length(len);

    let mut start = 0;
    while start < len {
        let tail = &mut v[start..];
        let mut run_len = count_run_and_make_ascending(tail, is_less);

        // Insert some more elements into the run if it's too short. Insertion sort is faster than
        // merging on short sequences.
        if run_len < min_run {
            let force = min_run.min(tail.len());
            binary_insertion_sort(&mut tail[..force], run_len, is_less);
            run_len = force;
        }

        state.push_run(Run {
            start,
            len: run_len,
        });
        start += run_len;

        // Merge some pairs of adjacent runs to satisfy the invariants.
        state.merge_collapse(v, is_less)?;
    }

    state.merge_force_collapse(v, is_less)?;

    // Finally, exactly one run must remain in the stack.
    debug_assert_eq!(state.runs.runs(), &[Run { start: 0, len }]);

    Ok(())
}

/// Everything a sort call keeps between merges. Lives for exactly one call.
struct MergeState<'a, T> {
    buf: &'a mut SortBuffer<T>,
    range_len: usize,
    runs: RunStack,
    gallop: GallopState,
    merges: usize,
}

impl<'a, T> MergeState<'a, T> {
    fn push_run(&mut self, run: Run) {
        self.runs.push(run);
    }

    fn runs_pushed(&self) -> usize {
        // Every merge combines two entries into one.
        self.runs.len() + self.merges
    }

    fn merge_collapse<F>(&mut self, v: &mut [T], is_less: &mut F) -> Result<(), SortError>
    where
        F: FnMut(&T, &T) -> bool,
    {
        while let Some(i) = self.runs.collapse_candidate() {
            self.merge_at(v, i, is_less)?;
        }

        Ok(())
    }

    fn merge_force_collapse<F>(&mut self, v: &mut [T], is_less: &mut F) -> Result<(), SortError>
    where
        F: FnMut(&T, &T) -> bool,
    {
        while let Some(i) = self.runs.force_collapse_candidate() {
            self.merge_at(v, i, is_less)?;
        }

        Ok(())
    }

    /// Merges the runs at stack index `i` and `i + 1`.
    ///
    /// Elements of the left run that are already in place in front of the right run, and elements
    /// of the right run that are already in place behind the left run, are skipped using galloping
    /// search before anything is copied.
    #[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
    fn merge_at<F>(&mut self, v: &mut [T], i: usize, is_less: &mut F) -> Result<(), SortError>
    where
        F: FnMut(&T, &T) -> bool,
    {
        let (left, right) = self.runs.combine(i);
        debug_assert!(left.len > 0 && right.len > 0);
        self.merges += 1;

        // Where does the first element of the right run go in the left run.
        let k = gallop_right(&v[right.start], &v[left.start..right.start], 0, is_less);
        let base1 = left.start + k;
        let len1 = left.len - k;
        if len1 == 0 {
            return Ok(());
        }

        // Where does the last element of the left run go in the right run.
        let right_end = right.start + right.len;
        let len2 = gallop_left(
            &v[base1 + len1 - 1],
            &v[right.start..right_end],
            right.len - 1,
            is_less,
        );
        if len2 == 0 {
            return Ok(());
        }

        let merge_slice = &mut v[base1..right.start + len2];

        // SAFETY: Both runs are non-empty and sorted, the buffer is sized for the shorter one and
        // the gallops above guarantee v[right.start] < v[base1] and that v[base1 + len1 - 1] is
        // greater than everything in v[right.start..right.start + len2]. `stable_sort` filters out
        // zero-sized types.
        unsafe {
            if len1 <= len2 {
                let buf = self.buf.ensure(len1, self.range_len)?;
                merge_lo(merge_slice, len1, buf, &mut self.gallop, is_less)
            } else {
                let buf = self.buf.ensure(len2, self.range_len)?;
                merge_hi(merge_slice, len1, buf, &mut self.gallop, is_less)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_ranges_skip_merging() {
        let mut v: Vec<i32> = (0..31).rev().collect();
        let stats = stable_sort(&mut v, |a, b| a.cmp(b), None).unwrap();

        assert!(v.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(stats.merges, 0);
        assert_eq!(stats.buffer_capacity, 0);
        assert_eq!(stats.runs, 1);
    }

    #[test]
    fn runs_pushed_counts_every_run() {
        // Four ascending blocks of 64, each long enough to be its own run.
        let mut v: Vec<i32> = (0..4).flat_map(|b| (0..64).map(move |i| i * 4 + b)).collect();
        let stats = stable_sort(&mut v, |a, b| a.cmp(b), None).unwrap();

        assert_eq!(v, (0..256).collect::<Vec<_>>());
        assert_eq!(stats.runs, 4);
        assert_eq!(stats.merges, 3);
    }

    #[test]
    fn reusable_buffer_used_when_large_enough() {
        let mut buf = SortBuffer::with_capacity(4096);
        let mut v: Vec<u64> = (0..10_000).map(|i| (i * 7919) % 10_007).collect();

        let stats = stable_sort(&mut v, |a, b| a.cmp(b), Some(&mut buf)).unwrap();
        assert!(v.windows(2).all(|w| w[0] <= w[1]));
        assert!(stats.buffer_capacity >= 4096);
        assert!(buf.capacity() >= 4096);
    }
}
