//! Workload builders shared by the dynarray benchmarks.
//!
//! - [`filled`]: an array of `0..n` built by repeated push.
//! - [`interleaved_positions`]: a deterministic spread of insertion points.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use dynarray::DynArray;

/// An array holding `0..n`, grown one push at a time.
pub fn filled(n: u64) -> DynArray<u64> {
    (0..n).collect()
}

/// `count` insertion offsets that cycle through front, middle and back of
/// an array that starts at `start_len` and gains one element per insert.
pub fn interleaved_positions(start_len: usize, count: usize) -> Vec<usize> {
    (0..count)
        .map(|i| {
            let len = start_len + i;
            match i % 3 {
                0 => 0,
                1 => len / 2,
                _ => len,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_holds_the_range() {
        let array = filled(5);
        assert_eq!(array, [0, 1, 2, 3, 4]);
        assert_eq!(array.capacity(), 8);
    }

    #[test]
    fn positions_stay_in_bounds() {
        for (i, pos) in interleaved_positions(4, 30).into_iter().enumerate() {
            assert!(pos <= 4 + i);
        }
    }
}
