//! Binary insertion sort, used to extend short natural runs to the minimum run length.

/// Sorts `v` using binary insertion sort, given that `v[..start]` is already sorted.
///
/// Each element is placed after all elements that compare equal to it, so the sort is stable.
/// This needs O(n log n) comparisons but O(n^2) moves, and is only used for runs shorter than
/// `MIN_MERGE`.
#[cfg_attr(feature = "no_inline_sub_functions", inline(never))]
pub(crate) fn binary_insertion_sort<T, F>(v: &mut [T], start: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    debug_assert!(start <= len);

    for i in start.max(1)..len {
        let pivot = &v[i];

        // Invariants: everything in v[..left] <= pivot, everything in v[right..i] > pivot.
        let mut left = 0;
        let mut right = i;
        while left < right {
            let mid = left + (right - left) / 2;
            if is_less(pivot, &v[mid]) {
                right = mid;
            } else {
                left = mid + 1;
            }
        }

        // The comparisons are done, moving the elements can not be interrupted by a panic.
        v[left..=i].rotate_right(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_with_presorted_prefix() {
        let mut v = [2, 4, 6, 8, 5, 1, 9, 4];
        binary_insertion_sort(&mut v, 4, &mut |a: &i32, b: &i32| a < b);
        assert_eq!(v, [1, 2, 4, 4, 5, 6, 8, 9]);
    }

    #[test]
    fn start_zero_and_empty() {
        let mut v = [3, 1, 2];
        binary_insertion_sort(&mut v, 0, &mut |a: &i32, b: &i32| a < b);
        assert_eq!(v, [1, 2, 3]);

        let mut v: [i32; 0] = [];
        binary_insertion_sort(&mut v, 0, &mut |a: &i32, b: &i32| a < b);
    }

    #[test]
    fn equal_keys_keep_order() {
        let mut v = [(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd'), (1, 'e')];
        binary_insertion_sort(&mut v, 1, &mut |a: &(i32, char), b: &(i32, char)| a.0 < b.0);
        assert_eq!(v, [(0, 'b'), (0, 'd'), (1, 'a'), (1, 'c'), (1, 'e')]);
    }
}
