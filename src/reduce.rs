//! Left fold with vectorized partial accumulation.
//!
//! The slice is cut into an unaligned head, an aligned body of whole batches
//! and a tail shorter than one batch. Head and tail are folded into `init` in
//! ascending order. The body is folded into a batch accumulator, whose lanes
//! are then folded into `init` in lane order, before the tail.
//!
//! The result equals the sequential fold only for operators that can be
//! reassociated and commuted freely. Floating point addition qualifies up to
//! rounding: the lanes sum interleaved subsequences of the body, so the error
//! is bounded by what a `LANES`-way pairwise reordering introduces.

use crate::align::partition;
use crate::arch::{self, assert_available, Arch, BatchOf, Element, Emulated, Selected, Simd};
use crate::batch::Batch;
use crate::ops::{BinaryOp, Combine, Plus};
use std::mem::MaybeUninit;

/// Sums `src` into `init`.
pub fn reduce<T, I>(src: &[T], init: I) -> I
where
    T: Element,
    Plus: Combine<I, T>,
{
    reduce_with(src, init, Plus)
}

/// Folds `src` into `init` with `binfun`, on the widest architecture the CPU
/// supports.
pub fn reduce_with<T, I, F>(src: &[T], init: I, binfun: F) -> I
where
    T: Element,
    F: Combine<I, T>,
{
    match arch::selected() {
        #[cfg(target_arch = "x86_64")]
        Selected::V3 => unsafe { reduce_v3(src, init, &binfun) },
        #[cfg(target_arch = "x86_64")]
        Selected::V2 => unsafe { reduce_v2(src, init, &binfun) },
        #[cfg(target_arch = "aarch64")]
        Selected::Neon => unsafe { reduce_neon(src, init, &binfun) },
        Selected::Emulated => unsafe { reduce_unchecked::<Emulated, T, I, F>(src, init, &binfun) },
    }
}

/// Folds `src` into `init` with `binfun` on the architecture `A`.
///
/// Panics if `A` is not available on the running CPU.
pub fn reduce_in<A, T, I, F>(src: &[T], init: I, binfun: F) -> I
where
    A: Arch,
    T: Simd<A>,
    F: BinaryOp<I, T, BatchOf<T, A>>,
{
    assert_available::<A>();
    unsafe { reduce_unchecked::<A, T, I, F>(src, init, &binfun) }
}

#[cfg(target_arch = "x86_64")]
#[detect::target_cpu(enable = "v3")]
unsafe fn reduce_v3<T: Element, I, F: Combine<I, T>>(src: &[T], init: I, binfun: &F) -> I {
    unsafe { reduce_unchecked::<arch::V3, T, I, F>(src, init, binfun) }
}

#[cfg(target_arch = "x86_64")]
#[detect::target_cpu(enable = "v2")]
unsafe fn reduce_v2<T: Element, I, F: Combine<I, T>>(src: &[T], init: I, binfun: &F) -> I {
    unsafe { reduce_unchecked::<arch::V2, T, I, F>(src, init, binfun) }
}

#[cfg(target_arch = "aarch64")]
#[detect::target_cpu(enable = "neon")]
unsafe fn reduce_neon<T: Element, I, F: Combine<I, T>>(src: &[T], init: I, binfun: &F) -> I {
    unsafe { reduce_unchecked::<arch::Neon, T, I, F>(src, init, binfun) }
}

/// # Safety
///
/// `A` must be available on the running CPU.
#[inline(always)]
unsafe fn reduce_unchecked<A, T, I, F>(src: &[T], mut init: I, binfun: &F) -> I
where
    A: Arch,
    T: Simd<A>,
    F: BinaryOp<I, T, BatchOf<T, A>>,
{
    let lanes = <BatchOf<T, A> as Batch>::LANES;
    debug_assert_eq!(align_of::<BatchOf<T, A>>(), lanes * size_of::<T>());
    let size = src.len();

    if size < lanes {
        for &x in src {
            init = binfun.call(init, x);
        }
        return init;
    }

    let (align_begin, align_end) = partition(src.as_ptr(), size, lanes);

    for &x in &src[..align_begin] {
        init = binfun.call(init, x);
    }

    if align_begin < align_end {
        let ptr = src.as_ptr();
        // SAFETY: `[align_begin, align_end)` is in bounds, starts at a
        // batch-aligned address and holds a whole number of batches.
        unsafe {
            let mut batch_init = BatchOf::<T, A>::load_aligned(ptr.add(align_begin));
            let mut i = align_begin + lanes;
            while i < align_end {
                let batch = BatchOf::<T, A>::load_aligned(ptr.add(i));
                batch_init = binfun.call_batch(batch_init, batch);
                i += lanes;
            }
            // a batch-sized, batch-aligned stack slot
            let mut spill = MaybeUninit::<BatchOf<T, A>>::uninit();
            batch_init.store_aligned(spill.as_mut_ptr().cast::<T>());
            let spill = spill.as_ptr().cast::<T>();
            for j in 0..lanes {
                init = binfun.call(init, spill.add(j).read());
            }
        }
    }

    for &x in &src[align_end..] {
        init = binfun.call(init, x);
    }

    init
}
