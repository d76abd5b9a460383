//! Run detection and minimum run sizing.

/// Ranges shorter than this are sorted with binary insertion sort alone, no merging happens.
pub const MIN_MERGE: usize = 32;

/// Finds the run starting at the beginning of `v` and returns its length, at least 1 for a
/// non-empty slice.
///
/// Runs are either non-descending (`v[i] <= v[i + 1]`) or strictly descending. Strictly
/// descending runs are reversed in place before returning, which can not reorder equal elements
/// since a descending run never contains two of them next to each other.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn count_run_and_make_ascending<T, F>(v: &mut [T], is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    if len < 2 {
        return len;
    }

    let mut end = 2;

    if is_less(&v[1], &v[0]) {
        while end < len && is_less(&v[end], &v[end - 1]) {
            end += 1;
        }
        v[..end].reverse();
    } else {
        while end < len && !is_less(&v[end], &v[end - 1]) {
            end += 1;
        }
    }

    end
}

/// Returns the minimum acceptable run length for a range of `len` elements.
///
/// For `len < MIN_MERGE` this is `len` itself, the whole range becomes one insertion sorted run.
/// Otherwise the result `k` lies in `MIN_MERGE / 2..=MIN_MERGE` and `len / k` is a power of two or
/// slightly less than one, which keeps the final merges balanced.
pub(crate) fn min_run_length(mut len: usize) -> usize {
    // Becomes 1 if any bit shifted out is set.
    let mut r = 0;
    while len >= MIN_MERGE {
        r |= len & 1;
        len >>= 1;
    }

    len + r
}
