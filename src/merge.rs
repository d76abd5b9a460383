//! Merging of two adjacent runs with adaptive galloping.
//!
//! The shorter run is copied out into the scratch buffer, which leaves a hole in `v` exactly as
//! large as that run. The merge then fills the hole from one end, always taking the next element
//! from whichever run wins the comparison. `merge_lo` copies out the left run and fills from the
//! front, `merge_hi` copies out the right run and fills from the back.
//!
//! Both start in linear mode, comparing run heads one at a time. Once one run wins
//! `min_gallop` times in a row they switch to galloping mode, where `gallop_left` and
//! `gallop_right` find how many elements in a row a run wins and those are moved in one block.
//! Galloping ends when neither run produces a block of at least `MIN_GALLOP` elements. Every round
//! that pays off lowers `min_gallop`, leaving galloping mode raises it, so data without long
//! streaks quickly goes back to plain linear merging.
//!
//! Intermediate state is always tracked by a `MergeHole`, which serves two purposes:
//! 1. Protects integrity of `v` from panics in `is_less`.
//! 2. Moves the remaining buffered elements into place once the merge ends, including when it
//!    ends early because `is_less` turned out to be inconsistent.
//!
//! Either way `v` holds every element it initially held exactly once when the merge returns or
//! unwinds.

use std::ptr;
use std::slice;

use crate::error::{SortError, ViolationSite};
use crate::gallop::{gallop_left, gallop_right};

/// Initial number of consecutive wins after which a merge switches to galloping mode.
pub const MIN_GALLOP: usize = 7;

/// Galloping threshold of one sort call, carried from one merge to the next.
#[derive(Debug)]
pub(crate) struct GallopState {
    pub min_gallop: usize,
    /// How many times a merge switched into galloping mode.
    pub entries: usize,
}

impl GallopState {
    pub fn new() -> Self {
        Self {
            min_gallop: MIN_GALLOP,
            entries: 0,
        }
    }
}

/// Merges the non-decreasing runs `v[..mid]` and `v[mid..]`, buffering the left one.
///
/// # Safety
///
/// Both runs must be non-empty and `buf` must be valid for writes of `mid` elements without
/// overlapping `v`. `T` must not be a zero-sized type.
///
/// The first element of the right run has to be less than the first element of the left run,
/// which `merge_at` establishes before calling. If `is_less` is not a total order the merge may
/// stop early with a `ContractViolation`, the elements of `v` are then still a permutation of the
/// input.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) unsafe fn merge_lo<T, F>(
    v: &mut [T],
    mid: usize,
    buf: *mut T,
    gallop: &mut GallopState,
    is_less: &mut F,
) -> Result<(), SortError>
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    debug_assert!(mid > 0 && mid < len);

    let arr = v.as_mut_ptr();

    // SAFETY: The caller guarantees buf holds mid elements. Every index below is derived from
    // `hole`, which always describes in bounds ranges: the left run remainder buf[start..end], the
    // hole v[dest..dest + hole.len()] and the right run remainder v[dest + hole.len()..len].
    unsafe {
        ptr::copy_nonoverlapping(arr, buf, mid);

        let mut hole = MergeHole {
            buf,
            start: 0,
            end: mid,
            dst: arr,
            dest: 0,
        };

        // The right run starts with the overall smallest element.
        ptr::copy_nonoverlapping(arr.add(mid), arr, 1);
        hole.dest += 1;

        let mut min_gallop = gallop.min_gallop;

        'outer: while hole.dest + hole.len() < len && hole.len() > 1 {
            // How many times in a row the left (count1) or right (count2) run won.
            let mut count1 = 0;
            let mut count2 = 0;

            // Linear mode.
            loop {
                let right = hole.dest + hole.len();

                // If equal, prefer the left run to maintain stability.
                if is_less(&*arr.add(right), &*buf.add(hole.start)) {
                    ptr::copy_nonoverlapping(arr.add(right), arr.add(hole.dest), 1);
                    hole.dest += 1;

                    count2 += 1;
                    count1 = 0;
                    if right + 1 == len {
                        break 'outer;
                    }
                } else {
                    ptr::copy_nonoverlapping(buf.add(hole.start), arr.add(hole.dest), 1);
                    hole.start += 1;
                    hole.dest += 1;

                    count1 += 1;
                    count2 = 0;
                    if hole.len() == 1 {
                        break 'outer;
                    }
                }

                if (count1 | count2) >= min_gallop {
                    break;
                }
            }

            gallop.entries += 1;

            // Galloping mode.
            loop {
                let right = hole.dest + hole.len();

                let left_run = slice::from_raw_parts(buf.add(hole.start), hole.len());
                count1 = gallop_right(&*arr.add(right), left_run, 0, is_less);
                if count1 != 0 {
                    ptr::copy_nonoverlapping(buf.add(hole.start), arr.add(hole.dest), count1);
                    hole.start += count1;
                    hole.dest += count1;
                    if hole.len() <= 1 {
                        break 'outer;
                    }
                }

                // The element that ended the left streak is the next smallest. `right` is
                // unchanged, the hole moved up by exactly the number of elements taken.
                ptr::copy_nonoverlapping(arr.add(right), arr.add(hole.dest), 1);
                hole.dest += 1;
                if right + 1 == len {
                    break 'outer;
                }

                let right = right + 1;
                let right_run = slice::from_raw_parts(arr.add(right), len - right);
                count2 = gallop_left(&*buf.add(hole.start), right_run, 0, is_less);
                if count2 != 0 {
                    // May overlap if the block is longer than the hole.
                    ptr::copy(arr.add(right), arr.add(hole.dest), count2);
                    hole.dest += count2;
                    if right + count2 == len {
                        break 'outer;
                    }
                }

                ptr::copy_nonoverlapping(buf.add(hole.start), arr.add(hole.dest), 1);
                hole.start += 1;
                hole.dest += 1;
                if hole.len() == 1 {
                    break 'outer;
                }

                min_gallop = min_gallop.saturating_sub(1);
                if count1 < MIN_GALLOP && count2 < MIN_GALLOP {
                    break;
                }
            }

            // Penalize leaving galloping mode.
            min_gallop += 2;
        }

        gallop.min_gallop = min_gallop.max(1);

        match hole.len() {
            0 => Err(SortError::ContractViolation {
                site: ViolationSite::MergeLo,
            }),
            1 => {
                // The last left element is the largest, the rest of the right run goes before it.
                let right = hole.dest + 1;
                ptr::copy(arr.add(right), arr.add(hole.dest), len - right);
                hole.dest = len - 1;
                Ok(())
            }
            // The right run is exhausted, `hole` moves the rest of the left run into place.
            _ => Ok(()),
        }
    }
}

/// Merges the non-decreasing runs `v[..mid]` and `v[mid..]`, buffering the right one.
///
/// # Safety
///
/// Both runs must be non-empty and `buf` must be valid for writes of `v.len() - mid` elements
/// without overlapping `v`. `T` must not be a zero-sized type.
///
/// The last element of the left run has to be greater than every element of the right run, which
/// `merge_at` establishes before calling. Inconsistent comparisons are handled as in
/// [`merge_lo`].
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) unsafe fn merge_hi<T, F>(
    v: &mut [T],
    mid: usize,
    buf: *mut T,
    gallop: &mut GallopState,
    is_less: &mut F,
) -> Result<(), SortError>
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    debug_assert!(mid > 0 && mid < len);

    let arr = v.as_mut_ptr();

    // SAFETY: The caller guarantees buf holds len - mid elements. Here the hole sits between the
    // runs: the left run remainder is v[..dest], the hole v[dest..dest + hole.len()] and the right
    // run remainder is buf[..end], so `hole.dest` is the remaining left length and `hole.end` the
    // remaining right length. `hole.start` stays 0.
    unsafe {
        ptr::copy_nonoverlapping(arr.add(mid), buf, len - mid);

        let mut hole = MergeHole {
            buf,
            start: 0,
            end: len - mid,
            dst: arr,
            dest: mid,
        };

        // The left run ends with the overall largest element.
        ptr::copy_nonoverlapping(arr.add(mid - 1), arr.add(len - 1), 1);
        hole.dest -= 1;

        let mut min_gallop = gallop.min_gallop;

        'outer: while hole.dest > 0 && hole.end > 1 {
            let mut count1 = 0;
            let mut count2 = 0;

            // Linear mode.
            loop {
                let (len1, len2) = (hole.dest, hole.end);
                let out = len1 + len2 - 1;

                // If equal, prefer the right run to maintain stability.
                if is_less(&*buf.add(len2 - 1), &*arr.add(len1 - 1)) {
                    ptr::copy_nonoverlapping(arr.add(len1 - 1), arr.add(out), 1);
                    hole.dest -= 1;

                    count1 += 1;
                    count2 = 0;
                    if hole.dest == 0 {
                        break 'outer;
                    }
                } else {
                    ptr::copy_nonoverlapping(buf.add(len2 - 1), arr.add(out), 1);
                    hole.end -= 1;

                    count2 += 1;
                    count1 = 0;
                    if hole.end == 1 {
                        break 'outer;
                    }
                }

                if (count1 | count2) >= min_gallop {
                    break;
                }
            }

            gallop.entries += 1;

            // Galloping mode.
            loop {
                let (len1, len2) = (hole.dest, hole.end);

                let left_run = slice::from_raw_parts(arr, len1);
                count1 = len1 - gallop_right(&*buf.add(len2 - 1), left_run, len1 - 1, is_less);
                if count1 != 0 {
                    // May overlap if the block is longer than the hole.
                    ptr::copy(
                        arr.add(len1 - count1),
                        arr.add(len1 + len2 - count1),
                        count1,
                    );
                    hole.dest -= count1;
                    if hole.dest == 0 {
                        break 'outer;
                    }
                }

                let len1 = hole.dest;
                ptr::copy_nonoverlapping(buf.add(len2 - 1), arr.add(len1 + len2 - 1), 1);
                hole.end -= 1;
                if hole.end == 1 {
                    break 'outer;
                }

                let len2 = hole.end;
                let right_run = slice::from_raw_parts(buf, len2);
                count2 = len2 - gallop_left(&*arr.add(len1 - 1), right_run, len2 - 1, is_less);
                if count2 != 0 {
                    ptr::copy_nonoverlapping(
                        buf.add(len2 - count2),
                        arr.add(len1 + len2 - count2),
                        count2,
                    );
                    hole.end -= count2;
                    if hole.end <= 1 {
                        break 'outer;
                    }
                }

                let len2 = hole.end;
                ptr::copy_nonoverlapping(arr.add(len1 - 1), arr.add(len1 + len2 - 1), 1);
                hole.dest -= 1;
                if hole.dest == 0 {
                    break 'outer;
                }

                min_gallop = min_gallop.saturating_sub(1);
                if count1 < MIN_GALLOP && count2 < MIN_GALLOP {
                    break;
                }
            }

            // Penalize leaving galloping mode.
            min_gallop += 2;
        }

        gallop.min_gallop = min_gallop.max(1);

        match hole.end {
            0 => Err(SortError::ContractViolation {
                site: ViolationSite::MergeHi,
            }),
            1 => {
                // The first right element is the smallest, the rest of the left run goes after it.
                ptr::copy(arr, arr.add(1), hole.dest);
                hole.dest = 0;
                Ok(())
            }
            // The left run is exhausted, `hole` moves the rest of the right run into place.
            _ => Ok(()),
        }
    }
}

// When dropped, copies the range `buf[start..end]` into `dst[dest..]`.
struct MergeHole<T> {
    buf: *mut T,
    start: usize,
    end: usize,
    dst: *mut T,
    dest: usize,
}

impl<T> MergeHole<T> {
    fn len(&self) -> usize {
        self.end - self.start
    }
}

impl<T> Drop for MergeHole<T> {
    fn drop(&mut self) {
        // SAFETY: `T` is not a zero-sized type, the range is inside the buffer and the hole in the
        // destination is exactly this long.
        unsafe {
            ptr::copy_nonoverlapping(self.buf.add(self.start), self.dst.add(self.dest), self.len());
        }
    }
}
