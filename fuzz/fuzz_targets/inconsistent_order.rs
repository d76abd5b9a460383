#![no_main]

use std::cmp::Ordering;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The first half of the input is sorted, the second half decides the answers of the
    // comparison function. The result may be an error, but never a lost or duplicated element.
    let (values, answers) = data.split_at(data.len() / 2);
    if answers.is_empty() {
        return;
    }

    let mut v = values.to_vec();
    let mut i = 0;
    let _ = timsort::try_sort_by(&mut v, |a, b| {
        i += 1;
        match answers[i % answers.len()] % 4 {
            0 => Ordering::Less,
            1 => Ordering::Equal,
            2 => Ordering::Greater,
            _ => a.cmp(b),
        }
    });

    let mut expected = values.to_vec();
    expected.sort_unstable();
    v.sort_unstable();
    assert_eq!(v, expected);
});
