use std::cell::RefCell;
use std::cmp::Ordering;
use std::env;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use timsort::{patterns, SortBuffer, INITIAL_TMP_STORAGE_LEN};

/// Something that sorts, so the engine and its baseline share one benchmark driver.
trait Sorter {
    fn name() -> &'static str;

    fn sort<T: Ord>(v: &mut [T]);

    fn sort_by<T, F>(v: &mut [T], compare: F)
    where
        F: FnMut(&T, &T) -> Ordering;
}

struct Engine;

impl Sorter for Engine {
    fn name() -> &'static str {
        "timsort"
    }

    fn sort<T: Ord>(v: &mut [T]) {
        timsort::sort(v);
    }

    fn sort_by<T, F>(v: &mut [T], compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        timsort::sort_by(v, compare);
    }
}

/// Reuses one scratch buffer per thread for `i32`, the case the reusable buffer exists for.
struct EngineReusedBuffer;

impl EngineReusedBuffer {
    fn sort_i32(v: &mut [i32]) {
        // Large enough for the first allocation of any length, so the sort never ignores it.
        thread_local! {
            static BUF: RefCell<SortBuffer<i32>> =
                RefCell::new(SortBuffer::with_capacity(INITIAL_TMP_STORAGE_LEN));
        }

        BUF.with(|buf| {
            let len = v.len();
            let mut buf = buf.borrow_mut();
            if let Err(err) = timsort::sort_range(v, 0, len, Some(&mut *buf)) {
                panic!("sort_range failed: {err}");
            }
        });
    }
}

struct Std;

impl Sorter for Std {
    fn name() -> &'static str {
        "rust_std_stable"
    }

    fn sort<T: Ord>(v: &mut [T]) {
        v.sort();
    }

    fn sort_by<T, F>(v: &mut [T], compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        v.sort_by(compare);
    }
}

fn bench_sort<T: Ord>(
    c: &mut Criterion,
    test_size: usize,
    transform_name: &str,
    transform: &fn(Vec<i32>) -> Vec<T>,
    pattern_name: &str,
    pattern_provider: &fn(usize) -> Vec<i32>,
    bench_name: &str,
    sort_func: impl Fn(&mut [T]),
) {
    let batch_size = if test_size > 30 {
        BatchSize::LargeInput
    } else {
        BatchSize::SmallInput
    };

    c.bench_function(
        &format!("{bench_name}-{transform_name}-{pattern_name}-{test_size}"),
        |b| {
            b.iter_batched(
                || transform(pattern_provider(test_size)),
                |mut test_data| sort_func(black_box(test_data.as_mut_slice())),
                batch_size,
            )
        },
    );
}

fn measure_comp_count<S: Sorter>(
    test_size: usize,
    transform_name: &str,
    transform: &fn(Vec<i32>) -> Vec<i32>,
    pattern_name: &str,
    pattern_provider: &fn(usize) -> Vec<i32>,
) {
    // Mean number of comparisons a sort and input combination needs.
    let run_count: u64 = if test_size <= 20 {
        100_000
    } else if test_size < 10_000 {
        3000
    } else if test_size < 100_000 {
        1000
    } else {
        100
    };

    let mut comp_count = 0u64;
    for _ in 0..run_count {
        let mut test_data = transform(pattern_provider(test_size));
        S::sort_by(black_box(test_data.as_mut_slice()), |a, b| {
            comp_count += 1;
            a.cmp(b)
        });
    }

    let mean = comp_count / run_count;
    println!(
        "{}-comp-{transform_name}-{pattern_name}-{test_size}: mean comparisons: {mean}",
        S::name()
    );
}

fn split_len(len: usize, part_a_percent: f64) -> (usize, usize) {
    let len_a = ((len as f64 / 100.0) * part_a_percent).round() as usize;
    let len_b = len - len_a;

    (len_a, len_b)
}

fn bench_patterns<T: Ord>(
    c: &mut Criterion,
    test_size: usize,
    transform_name: &str,
    transform: fn(Vec<i32>) -> Vec<T>,
) {
    if test_size > 100_000 && transform_name != "i32" {
        // These are just too expensive.
        return;
    }

    let mut pattern_providers: Vec<(&'static str, fn(usize) -> Vec<i32>)> = vec![
        ("random", patterns::random),
        ("random_dense", |len| {
            patterns::random_uniform(len, 0..=(((len as f64).log2().round()) as i32))
        }),
        ("random_binary", |len| patterns::random_uniform(len, 0..=1)),
        ("ascending", patterns::ascending),
        ("descending", patterns::descending),
        ("saws_long", |len| {
            patterns::saw_mixed(len, ((len as f64).log2().round()) as usize)
        }),
        ("saws_short", |len| {
            patterns::saw_mixed(len, (len as f64 / 22.0).round() as usize)
        }),
        ("random_s95", |len| patterns::random_sorted(len, 95.0)),
        ("two_runs_1p", |len| {
            let (len_a, len_b) = split_len(len, 1.0);
            patterns::two_sorted_runs(len_a, len_b)
        }),
    ];

    let mut extra_pattern_providers: Vec<(&'static str, fn(usize) -> Vec<i32>)> = vec![
        ("random_z1", |len| patterns::random_zipf(len, 1.0)),
        ("pipe_organ", patterns::pipe_organ),
        ("ascending_saw", |len| {
            patterns::ascending_saw(len, ((len as f64).log2().round()) as usize)
        }),
        ("descending_saw", |len| {
            patterns::descending_saw(len, ((len as f64).log2().round()) as usize)
        }),
        ("saws_range", |len| patterns::saw_mixed_range(len, 20..70)),
        ("two_runs_50p", |len| {
            let (len_a, len_b) = split_len(len, 50.0);
            patterns::two_sorted_runs(len_a, len_b)
        }),
    ];

    if env::var("EXTRA_PATTERNS").is_ok() {
        pattern_providers.append(&mut extra_pattern_providers);
    }

    for (pattern_name, pattern_provider) in pattern_providers.iter() {
        if test_size < 3 && *pattern_name != "random" {
            continue;
        }

        bench_sort(
            c,
            test_size,
            transform_name,
            &transform,
            pattern_name,
            pattern_provider,
            Engine::name(),
            Engine::sort,
        );

        bench_sort(
            c,
            test_size,
            transform_name,
            &transform,
            pattern_name,
            pattern_provider,
            Std::name(),
            Std::sort,
        );
    }
}

fn comp_count_patterns() {
    let transform: fn(Vec<i32>) -> Vec<i32> = |values| values;
    let pattern_providers: [(&'static str, fn(usize) -> Vec<i32>); 4] = [
        ("random", patterns::random),
        ("ascending", patterns::ascending),
        ("saws_long", |len| {
            patterns::saw_mixed(len, ((len as f64).log2().round()) as usize)
        }),
        ("two_runs_1p", |len| {
            let (len_a, len_b) = split_len(len, 1.0);
            patterns::two_sorted_runs(len_a, len_b)
        }),
    ];

    for test_size in [8, 20, 31, 32, 100, 1_000, 10_000, 100_000] {
        for (pattern_name, pattern_provider) in pattern_providers.iter() {
            measure_comp_count::<Engine>(
                test_size,
                "i32",
                &transform,
                pattern_name,
                pattern_provider,
            );
            measure_comp_count::<Std>(
                test_size,
                "i32",
                &transform,
                pattern_name,
                pattern_provider,
            );
        }
    }
}

fn ensure_true_random() {
    // Ensure that random vecs are actually different.
    let random_vec_a = patterns::random(5);
    let random_vec_b = patterns::random(5);

    assert_ne!(random_vec_a, random_vec_b);
}

fn criterion_benchmark(c: &mut Criterion) {
    patterns::disable_fixed_seed();
    ensure_true_random();

    if env::var("MEASURE_COMP").is_ok() {
        comp_count_patterns();
        return;
    }

    let test_sizes = [
        0, 1, 2, 3, 7, 8, 15, 16, 20, 31, 32, 36, 50, 101, 200, 500, 1_000, 2_048, 10_000, 100_000,
        1_000_000,
    ];

    for test_size in test_sizes {
        // Basic type often used to test sorting algorithms.
        bench_patterns(c, test_size, "i32", |values| values);

        // Common type for usize on 64-bit machines, sorting indices is very common.
        bench_patterns(c, test_size, "u64", |values| {
            values
                .iter()
                .map(|val| -> u64 {
                    // Extends the value into the 64 bit range, while preserving input order.
                    let x = ((*val as i64) + (i32::MAX as i64) + 1) as u64;
                    x.wrapping_mul(i32::MAX as u64)
                })
                .collect()
        });

        // Larger type that is not Copy and does heap access.
        bench_patterns(c, test_size, "string", |values| {
            values
                .iter()
                .map(|val| format!("{:010}", val.saturating_abs()))
                .collect()
        });

        // Very large stack value.
        bench_patterns(c, test_size, "1k", |values| {
            values.iter().map(|val| [*val; 256]).collect()
        });

        if test_size >= 32 {
            bench_sort(
                c,
                test_size,
                "i32",
                &((|values| values) as fn(Vec<i32>) -> Vec<i32>),
                "random",
                &(patterns::random as fn(usize) -> Vec<i32>),
                "timsort_reused_buffer",
                EngineReusedBuffer::sort_i32,
            );
        }
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
