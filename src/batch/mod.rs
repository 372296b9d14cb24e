//! Fixed-width SIMD registers.
//!
//! A [`Batch`] holds `LANES` elements and supports loads, stores and the
//! element-wise arithmetic of its scalar. Native register types back `f32`
//! and `f64` where the architecture has them; every other element type uses
//! an array wrapper with the register's alignment.

use crate::arch::{assert_available, Arch, BatchOf, Simd};
use crate::error::LayoutError;
use std::fmt::Debug;

/// Implements `Simd<$arch>` for each listed element type with an emulated
/// batch of `$bytes` bytes.
macro_rules! simd {
    ($arch:ty => $wrapper:ident, $bytes:literal; $($t:ty),* $(,)?) => {
        $(
            impl $crate::arch::Simd<$arch> for $t {
                type Batch = $wrapper<[$t; $bytes / ::core::mem::size_of::<$t>()]>;
            }
        )*
    };
}

mod emulated;

#[cfg(target_arch = "x86_64")]
mod x86_64;

#[cfg(target_arch = "aarch64")]
mod aarch64;

pub use emulated::{Aligned16, Aligned32};

#[cfg(target_arch = "x86_64")]
pub use self::x86_64::{F32x4, F32x8, F64x2, F64x4};

#[cfg(target_arch = "aarch64")]
pub use self::aarch64::{F32x4, F64x2};

/// A SIMD register of `LANES` scalars.
///
/// # Safety
///
/// Implementors must have the layout of `[Self::Scalar; Self::LANES]` with an
/// alignment of `LANES * size_of::<Scalar>()` bytes, and `LANES` must be a
/// power of two. Constructing a value (`splat`, loads) requires the CPU level
/// of the architecture the batch belongs to; arithmetic on an existing value
/// relies on that.
pub unsafe trait Batch: Copy + Debug + Send + Sync + 'static {
    type Scalar: Copy;

    const LANES: usize;

    /// # Safety
    ///
    /// The architecture of this batch must be available.
    unsafe fn splat(x: Self::Scalar) -> Self;

    /// # Safety
    ///
    /// `ptr` must be valid for `LANES` reads and aligned to the batch.
    unsafe fn load_aligned(ptr: *const Self::Scalar) -> Self;

    /// # Safety
    ///
    /// `ptr` must be valid for `LANES` reads.
    unsafe fn load_unaligned(ptr: *const Self::Scalar) -> Self;

    /// # Safety
    ///
    /// `ptr` must be valid for `LANES` writes and aligned to the batch.
    unsafe fn store_aligned(self, ptr: *mut Self::Scalar);

    /// # Safety
    ///
    /// `ptr` must be valid for `LANES` writes.
    unsafe fn store_unaligned(self, ptr: *mut Self::Scalar);
}

#[inline(always)]
pub(crate) unsafe fn load<B: Batch, const ALIGNED: bool>(ptr: *const B::Scalar) -> B {
    unsafe {
        if ALIGNED {
            B::load_aligned(ptr)
        } else {
            B::load_unaligned(ptr)
        }
    }
}

#[inline(always)]
pub(crate) unsafe fn store<B: Batch, const ALIGNED: bool>(batch: B, ptr: *mut B::Scalar) {
    unsafe {
        if ALIGNED {
            batch.store_aligned(ptr)
        } else {
            batch.store_unaligned(ptr)
        }
    }
}

/// Splits `data` into its unaligned head, the aligned batches and the
/// unaligned tail, using the same partition as the algorithms.
///
/// Panics if the architecture is not available on the running CPU.
pub fn split<A: Arch, T: Simd<A>>(data: &[T]) -> (&[T], &[BatchOf<T, A>], &[T]) {
    assert_available::<A>();
    let lanes = <BatchOf<T, A> as Batch>::LANES;
    let (begin, end) = crate::align::partition(data.as_ptr(), data.len(), lanes);
    let (head, rest) = data.split_at(begin);
    let (body, tail) = rest.split_at(end - begin);
    if body.is_empty() {
        return (head, &[], tail);
    }
    // SAFETY: `body` starts at a batch-aligned address and holds a whole
    // number of batches, which have the layout of `[T; LANES]`.
    let body = unsafe {
        std::slice::from_raw_parts(body.as_ptr().cast::<BatchOf<T, A>>(), body.len() / lanes)
    };
    (head, body, tail)
}

/// Reinterprets an aligned slice as batches.
///
/// Panics if the architecture is not available on the running CPU.
pub fn cast<A: Arch, T: Simd<A>>(data: &[T]) -> Result<&[BatchOf<T, A>], LayoutError> {
    assert_available::<A>();
    let lanes = check::<A, T>(data)?;
    if data.is_empty() {
        return Ok(&[]);
    }
    // SAFETY: checked by `check`.
    Ok(unsafe { std::slice::from_raw_parts(data.as_ptr().cast(), data.len() / lanes) })
}

/// Reinterprets an aligned mutable slice as batches, so that it can be
/// updated one batch at a time.
///
/// Panics if the architecture is not available on the running CPU.
pub fn cast_mut<A: Arch, T: Simd<A>>(
    data: &mut [T],
) -> Result<&mut [BatchOf<T, A>], LayoutError> {
    assert_available::<A>();
    let lanes = check::<A, T>(data)?;
    if data.is_empty() {
        return Ok(&mut []);
    }
    // SAFETY: checked by `check`.
    Ok(unsafe { std::slice::from_raw_parts_mut(data.as_mut_ptr().cast(), data.len() / lanes) })
}

fn check<A: Arch, T: Simd<A>>(data: &[T]) -> Result<usize, LayoutError> {
    let lanes = <BatchOf<T, A> as Batch>::LANES;
    let align = align_of::<BatchOf<T, A>>();
    if !data.is_empty() && data.as_ptr() as usize % align != 0 {
        return Err(LayoutError::Misaligned { align });
    }
    if data.len() % lanes != 0 {
        return Err(LayoutError::Ragged {
            len: data.len(),
            lanes,
        });
    }
    Ok(lanes)
}
