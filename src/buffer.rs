//! Scratch storage for merges.

use std::cmp;
use std::fmt;

use crate::error::SortError;

/// Initial scratch capacity requested for large ranges. Smaller ranges start at half their
/// length, the most any single merge can need.
pub const INITIAL_TMP_STORAGE_LEN: usize = 256;

/// Reusable scratch memory for the merge phase of a sort.
///
/// The buffer never holds live elements between calls, it is only raw capacity. Passing the same
/// buffer to repeated [`crate::sort_range_by`] calls avoids allocating for every call, and any
/// growth performed by one call is kept for the next.
pub struct SortBuffer<T> {
    // Length is always 0. Elements are copied in bitwise during a merge and copied back out before
    // the merge returns, so the Vec never drops anything.
    buf: Vec<T>,
}

impl<T> SortBuffer<T> {
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Like [`SortBuffer::with_capacity`], but reports allocation failure instead of aborting.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, SortError> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(capacity)?;
        Ok(Self { buf })
    }

    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Makes sure at least `min_capacity` elements fit and returns the start of the storage.
    ///
    /// Growth rounds up to the next power of two, capped at half of `range_len`, which is the
    /// largest run a merge over that range ever copies out. Growing drops the old allocation
    /// instead of copying it, there is nothing in it worth keeping.
    pub(crate) fn ensure(
        &mut self,
        min_capacity: usize,
        range_len: usize,
    ) -> Result<*mut T, SortError> {
        let old_capacity = self.buf.capacity();
        if old_capacity < min_capacity {
            let new_capacity = grown_capacity(min_capacity, range_len);

            let mut fresh = Vec::new();
            fresh.try_reserve_exact(new_capacity)?;
            self.buf = fresh;

            log::trace!(
                "merge buffer grown from {old_capacity} to {} elements",
                self.buf.capacity()
            );
        }

        Ok(self.buf.as_mut_ptr())
    }
}

impl<T> Default for SortBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SortBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SortBuffer")
            .field("capacity", &self.buf.capacity())
            .finish()
    }
}

/// Scratch capacity a sort over `len` elements asks for up front.
pub(crate) fn initial_capacity(len: usize) -> usize {
    if len < 2 * INITIAL_TMP_STORAGE_LEN {
        len / 2
    } else {
        INITIAL_TMP_STORAGE_LEN
    }
}

fn grown_capacity(min_capacity: usize, range_len: usize) -> usize {
    let limit = cmp::max(range_len / 2, min_capacity);

    min_capacity
        .checked_next_power_of_two()
        .map_or(limit, |pow2| cmp::min(pow2, limit))
}
