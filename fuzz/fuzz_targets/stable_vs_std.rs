#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Few distinct keys tagged with their input position, so any instability shows up as a
    // mismatch with the std stable sort.
    let input: Vec<(u8, usize)> = data
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| (pair[0] % (pair[1] | 1), i))
        .collect();

    let mut expected = input.clone();
    expected.sort_by_key(|e| e.0);

    let mut v = input;
    timsort::sort_by_key(&mut v, |e| e.0);

    assert_eq!(v, expected);
});
