//! Stack of pending runs and the policy deciding which of them to merge.

use std::cmp;

/// A sorted, not yet merged stretch `start..start + len` of the range being sorted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Run {
    pub start: usize,
    pub len: usize,
}

/// Pending runs, bottom of the stack first. Adjacent entries are always contiguous,
/// `runs[i].start + runs[i].len == runs[i + 1].start`.
///
/// Once collapsed, the lengths satisfy `runs[i - 2].len > runs[i - 1].len + runs[i].len` and
/// `runs[i - 1].len > runs[i].len`, so they grow at least as fast as the Fibonacci numbers from the
/// top down and the depth stays logarithmic in the range length.
#[derive(Debug)]
pub(crate) struct RunStack {
    runs: Vec<Run>,
    max_depth: usize,
}

impl RunStack {
    /// The capacity reserved up front is the depth the invariant allows for `len` elements,
    /// computed for the smallest possible runs. The stack still grows if that bound is ever off.
    pub fn for_len(len: usize) -> Self {
        let capacity = if len < 120 {
            5
        } else if len < 1542 {
            10
        } else if len < 119_151 {
            24
        } else {
            49
        };

        Self {
            runs: Vec::with_capacity(capacity),
            max_depth: 0,
        }
    }

    pub fn push(&mut self, run: Run) {
        debug_assert!(self
            .runs
            .last()
            .map_or(true, |top| top.start + top.len == run.start));

        self.runs.push(run);
        self.max_depth = cmp::max(self.max_depth, self.runs.len());
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Replaces `runs[i]` and `runs[i + 1]` by a single entry covering both and returns the two
    /// runs as they were. The caller is responsible for actually merging the elements.
    pub fn combine(&mut self, i: usize) -> (Run, Run) {
        let left = self.runs[i];
        let right = self.runs.remove(i + 1);
        debug_assert_eq!(left.start + left.len, right.start);

        self.runs[i].len = left.len + right.len;

        (left, right)
    }

    /// Examines the top of the stack and returns `Some(i)` if `runs[i]` and `runs[i + 1]` have to
    /// be merged before another run may be pushed.
    ///
    /// The invariant is checked on the top four runs, checking only the top three is known to
    /// leave it violated deeper in the stack:
    /// http://envisage-project.eu/timsort-specification-and-verification/
    ///
    /// When the third run from the top is involved, the smaller of the two adjacent pairs is
    /// merged: the lower pair if `runs[n - 1]` is strictly shorter than the top run, the upper pair
    /// otherwise.
    pub fn collapse_candidate(&self) -> Option<usize> {
        let runs = self.runs.as_slice();
        let size = runs.len();
        if size < 2 {
            return None;
        }

        let n = size - 2;
        if (n > 0 && runs[n - 1].len <= runs[n].len + runs[n + 1].len)
            || (n > 1 && runs[n - 2].len <= runs[n - 1].len + runs[n].len)
        {
            if runs[n - 1].len < runs[n + 1].len {
                Some(n - 1)
            } else {
                Some(n)
            }
        } else if runs[n].len <= runs[n + 1].len {
            Some(n)
        } else {
            None
        }
    }

    /// Once the input is exhausted, picks the next pair to merge until a single run remains. Uses
    /// the same smaller-pair preference as [`RunStack::collapse_candidate`].
    pub fn force_collapse_candidate(&self) -> Option<usize> {
        let runs = self.runs.as_slice();
        let size = runs.len();
        if size < 2 {
            return None;
        }

        let n = size - 2;
        if n > 0 && runs[n - 1].len < runs[n + 1].len {
            Some(n - 1)
        } else {
            Some(n)
        }
    }
}
