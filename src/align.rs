//! The alignment query shared by the algorithms.

/// Number of leading elements of `[ptr, ptr + count)` to skip before a batch
/// of `lanes` elements can be loaded with an aligned load.
///
/// A batch is aligned to `lanes * size_of::<T>()` bytes. The result is
/// `count` when `ptr` is not aligned to `size_of::<T>()`, since no aligned
/// address is reachable then, and never more than `count`.
#[inline]
pub fn alignment_offset<T>(ptr: *const T, count: usize, lanes: usize) -> usize {
    debug_assert!(lanes.is_power_of_two());
    let size = size_of::<T>();
    let address = ptr as usize;
    if size == 0 || address % size != 0 {
        return count;
    }
    let mask = lanes - 1;
    let offset = (lanes - ((address / size) & mask)) & mask;
    offset.min(count)
}

/// The aligned body `[begin, end)` of `[ptr, ptr + count)`: `begin` is the
/// alignment offset and `end - begin` is the largest multiple of `lanes` that
/// fits, so the tail `[end, count)` is shorter than one batch.
#[inline]
pub fn partition<T>(ptr: *const T, count: usize, lanes: usize) -> (usize, usize) {
    let begin = alignment_offset(ptr, count, lanes);
    let end = begin + (count - begin) / lanes * lanes;
    (begin, end)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at<T>(address: usize) -> *const T {
        address as *const T
    }

    #[test]
    fn aligned_pointer() {
        assert_eq!(alignment_offset(at::<f32>(64), 100, 4), 0);
        assert_eq!(alignment_offset(at::<f64>(64), 100, 4), 0);
    }

    #[test]
    fn unaligned_pointer() {
        assert_eq!(alignment_offset(at::<f32>(68), 100, 4), 3);
        assert_eq!(alignment_offset(at::<f32>(72), 100, 4), 2);
        assert_eq!(alignment_offset(at::<f32>(76), 100, 4), 1);
        assert_eq!(alignment_offset(at::<f64>(72), 100, 4), 3);
        assert_eq!(alignment_offset(at::<u8>(65), 100, 32), 31);
    }

    #[test]
    fn clamped_to_count() {
        assert_eq!(alignment_offset(at::<f32>(68), 2, 4), 2);
        assert_eq!(alignment_offset(at::<f32>(68), 0, 4), 0);
    }

    #[test]
    fn single_lane() {
        assert_eq!(alignment_offset(at::<f64>(72), 5, 1), 0);
        assert_eq!(partition(at::<f64>(72), 5, 1), (0, 5));
        // 16-byte elements that are only 8-byte aligned
        assert_eq!(alignment_offset(at::<[f64; 2]>(72), 5, 1), 5);
        assert_eq!(partition(at::<[f64; 2]>(80), 5, 1), (0, 5));
    }

    #[test]
    fn element_not_naturally_aligned() {
        assert_eq!(alignment_offset(at::<f32>(66), 100, 4), 100);
        assert_eq!(partition(at::<f32>(66), 100, 4), (100, 100));
    }

    #[test]
    fn tail_is_shorter_than_a_batch() {
        for address in (64..128).step_by(4) {
            for count in 0..40 {
                let (begin, end) = partition(at::<f32>(address), count, 4);
                assert!(begin <= end && end <= count);
                assert!(count - end < 4 || begin == count);
                assert_eq!((end - begin) % 4, 0);
                if begin < count {
                    assert_eq!((address + begin * 4) % 16, 0);
                }
            }
        }
    }
}
