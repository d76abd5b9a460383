//! Input patterns for testing and benchmarking the sort, limited to `i32` values.
//!
//! Every random pattern is derived from one seed per process, so a failure can be reproduced by
//! running again with `OVERRIDE_SEED` set to the value [`random_init_seed`] reported.

use std::cmp::Reverse;
use std::env;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::OnceCell;
use rand::distributions::Uniform;
use rand::prelude::*;
use zipf::ZipfDistribution;

// --- Public ---

pub fn random(len: usize) -> Vec<i32> {
    //     .
    // : . : :
    // :.:::.::

    random_vec(len)
}

pub fn random_uniform<R>(len: usize, range: R) -> Vec<i32>
where
    R: Into<Uniform<i32>>,
{
    // :.:.:.::

    let mut rng = new_rng();
    let dist: Uniform<i32> = range.into();

    (0..len).map(|_| dist.sample(&mut rng)).collect()
}

pub fn random_zipf(len: usize, exponent: f64) -> Vec<i32> {
    // https://en.wikipedia.org/wiki/Zipf's_law

    if len == 0 {
        return Vec::new();
    }

    let dist = match ZipfDistribution::new(len, exponent) {
        Ok(dist) => dist,
        Err(()) => panic!("invalid zipf exponent {exponent}"),
    };
    let mut rng = new_rng();

    (0..len).map(|_| dist.sample(&mut rng) as i32).collect()
}

/// The first `sorted_percent` of the values are sorted, the rest is random.
pub fn random_sorted(len: usize, sorted_percent: f64) -> Vec<i32> {
    //     .:
    //   .:::. :
    // .::::::.::
    // [----][--]
    // sorted  unsorted

    let mut vals = random_vec(len);
    let sorted_len = ((len as f64) * (sorted_percent / 100.0)).round() as usize;
    vals[..sorted_len.min(len)].sort_unstable();

    vals
}

pub fn all_equal(len: usize) -> Vec<i32> {
    // ......
    // ::::::

    vec![66; len]
}

pub fn ascending(len: usize) -> Vec<i32> {
    //     .:
    //   .:::
    // .:::::

    (0..len as i32).collect()
}

pub fn descending(len: usize) -> Vec<i32> {
    // :.
    // :::.
    // :::::.

    (0..len as i32).rev().collect()
}

pub fn ascending_saw(len: usize, saw_count: usize) -> Vec<i32> {
    //   .:  .:
    // .:::.:::

    saws(len, saw_count, |_| true)
}

pub fn descending_saw(len: usize, saw_count: usize) -> Vec<i32> {
    // :.  :.
    // :::.:::.

    saws(len, saw_count, |_| false)
}

pub fn saw_mixed(len: usize, saw_count: usize) -> Vec<i32> {
    // :.  :.    .::.    .:
    // :::.:::..::::::..:::

    let directions = random_uniform(saw_count.max(1) + 1, 0..=1);
    saws(len, saw_count, |i| directions.get(i).map_or(true, |d| *d == 0))
}

/// Ascending and descending stretches picked at random, each with a length in `range`.
pub fn saw_mixed_range(len: usize, range: Range<usize>) -> Vec<i32> {
    //     :.
    // :.  :::.    .::.      .:
    // :::.:::::..::::::..:.:::

    let mut vals = random_vec(len);
    if len == 0 {
        return vals;
    }

    let max_chunks = len / range.start.max(1) + 1;
    let directions = random_uniform(max_chunks, 0..=1);
    let chunk_lens = random_uniform(max_chunks, (range.start as i32)..(range.end as i32));

    let mut start = 0;
    for (direction, chunk_len) in directions.into_iter().zip(chunk_lens) {
        if start >= len {
            break;
        }

        let end = (start + chunk_len.max(1) as usize).min(len);
        sort_chunk(&mut vals[start..end], direction == 0);
        start = end;
    }

    vals
}

pub fn pipe_organ(len: usize) -> Vec<i32> {
    //   .:.
    // .:::::.

    let mut vals = random_vec(len);

    let (first_half, second_half) = vals.split_at_mut(len / 2);
    first_half.sort_unstable();
    second_half.sort_unstable_by_key(|&e| Reverse(e));

    vals
}

/// Two ascending runs of `len_a` and `len_b` values, with the values of both runs interleaving.
/// The shape a merge sort sees when new values are appended to an already sorted collection.
pub fn two_sorted_runs(len_a: usize, len_b: usize) -> Vec<i32> {
    //    .:   .:
    // .:::: .:::
    // [ a  ][ b]

    let mut vals = random_vec(len_a + len_b);

    let (run_a, run_b) = vals.split_at_mut(len_a);
    run_a.sort_unstable();
    run_b.sort_unstable();

    vals
}

static USE_FIXED_SEED: AtomicBool = AtomicBool::new(true);

/// Makes every following call to a random pattern use a new seed. Useful for benchmarks, which
/// should not measure the same input over and over.
pub fn disable_fixed_seed() {
    USE_FIXED_SEED.store(false, Ordering::Release);
}

pub fn random_init_seed() -> u64 {
    if USE_FIXED_SEED.load(Ordering::Acquire) {
        static SEED: OnceCell<u64> = OnceCell::new();
        *SEED.get_or_init(|| {
            env::var("OVERRIDE_SEED")
                .ok()
                .and_then(|seed| seed.parse().ok())
                .unwrap_or_else(|| thread_rng().gen())
        })
    } else {
        thread_rng().gen()
    }
}

// --- Private ---

fn new_rng() -> StdRng {
    StdRng::seed_from_u64(random_init_seed())
}

fn random_vec(len: usize) -> Vec<i32> {
    let mut rng = new_rng();

    (0..len).map(|_| rng.gen::<i32>()).collect()
}

/// Random values cut into `saw_count` equal chunks, chunk `i` sorted ascending if
/// `ascending(i)` says so and descending otherwise.
fn saws(len: usize, saw_count: usize, mut ascending: impl FnMut(usize) -> bool) -> Vec<i32> {
    let mut vals = random_vec(len);
    if len == 0 {
        return vals;
    }

    let chunk_len = (len / saw_count.max(1)).max(1);
    for (i, chunk) in vals.chunks_mut(chunk_len).enumerate() {
        sort_chunk(chunk, ascending(i));
    }

    vals
}

fn sort_chunk(chunk: &mut [i32], ascending: bool) {
    if ascending {
        chunk.sort_unstable();
    } else {
        chunk.sort_unstable_by_key(|&e| Reverse(e));
    }
}
