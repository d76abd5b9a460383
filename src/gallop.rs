//! Exponential search for insertion points in sorted runs.
//!
//! Both searches start probing at `hint` and double the step until `key` is bracketed, then finish
//! with a binary search inside the bracket. The cost is O(log d) comparisons where d is the
//! distance between `hint` and the result, which is what makes galloping merges cheap on input
//! with long stretches won by the same run.
//!
//! `gallop_left` and `gallop_right` only differ in how they treat elements equal to `key`. A merge
//! that inserts elements of the right run into the left one uses `gallop_right` so that they land
//! after their equals, and the reverse direction uses `gallop_left`. Together this keeps merges
//! stable.

/// Returns the index of the first element of `run` that is not less than `key`.
///
/// `run` must be non-empty and sorted, and `hint < run.len()`. The closer `hint` is to the result
/// the faster the search.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn gallop_left<T, F>(key: &T, run: &[T], hint: usize, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let len = run.len();
    debug_assert!(len > 0 && hint < len);

    let mut last_ofs = 0;
    let mut ofs = 1;

    // Bracket the result so that run[lo - 1] < key <= run[hi], treating run[-1] as -inf.
    let (mut lo, mut hi) = if is_less(&run[hint], key) {
        // Gallop right until run[hint + last_ofs] < key <= run[hint + ofs].
        let max_ofs = len - hint;
        while ofs < max_ofs && is_less(&run[hint + ofs], key) {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        ofs = ofs.min(max_ofs);

        (hint + last_ofs + 1, hint + ofs)
    } else {
        // Gallop left until run[hint - ofs] < key <= run[hint - last_ofs].
        let max_ofs = hint + 1;
        while ofs < max_ofs && !is_less(&run[hint - ofs], key) {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        ofs = ofs.min(max_ofs);

        (hint + 1 - ofs, hint - last_ofs)
    };
    debug_assert!(lo <= hi && hi <= len);

    while lo < hi {
        let mid = lo + ((hi - lo) >> 1);
        if is_less(&run[mid], key) {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }

    hi
}

/// Returns the index of the first element of `run` that is greater than `key`.
///
/// Same requirements as [`gallop_left`].
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn gallop_right<T, F>(key: &T, run: &[T], hint: usize, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let len = run.len();
    debug_assert!(len > 0 && hint < len);

    let mut last_ofs = 0;
    let mut ofs = 1;

    // Bracket the result so that run[lo - 1] <= key < run[hi], treating run[-1] as -inf.
    let (mut lo, mut hi) = if is_less(key, &run[hint]) {
        // Gallop left until run[hint - ofs] <= key < run[hint - last_ofs].
        let max_ofs = hint + 1;
        while ofs < max_ofs && is_less(key, &run[hint - ofs]) {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        ofs = ofs.min(max_ofs);

        (hint + 1 - ofs, hint - last_ofs)
    } else {
        // Gallop right until run[hint + last_ofs] <= key < run[hint + ofs].
        let max_ofs = len - hint;
        while ofs < max_ofs && !is_less(key, &run[hint + ofs]) {
            last_ofs = ofs;
            ofs = (ofs << 1) + 1;
        }
        ofs = ofs.min(max_ofs);

        (hint + last_ofs + 1, hint + ofs)
    };
    debug_assert!(lo <= hi && hi <= len);

    while lo < hi {
        let mid = lo + ((hi - lo) >> 1);
        if is_less(key, &run[mid]) {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }

    hi
}
