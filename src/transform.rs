//! Element-wise maps with vectorized bodies.
//!
//! The aligned body is computed from the first input. Other slices share its
//! indices, so they are loaded or stored aligned only when their alignment
//! offset matches, and unaligned otherwise.

use crate::align::{alignment_offset, partition};
use crate::arch::{self, assert_available, Arch, BatchOf, Element, Emulated, Selected, Simd};
use crate::batch::{load, store, Batch};
use crate::ops::{BinaryOp, Combine, Map, UnaryOp};

/// `dst[i] = unop(src[i])`.
///
/// Panics if the slices differ in length.
pub fn transform<T, F>(src: &[T], dst: &mut [T], unop: F)
where
    T: Element,
    F: Map<T>,
{
    assert_eq!(src.len(), dst.len());
    match arch::selected() {
        #[cfg(target_arch = "x86_64")]
        Selected::V3 => unsafe { transform_v3(src, dst, &unop) },
        #[cfg(target_arch = "x86_64")]
        Selected::V2 => unsafe { transform_v2(src, dst, &unop) },
        #[cfg(target_arch = "aarch64")]
        Selected::Neon => unsafe { transform_neon(src, dst, &unop) },
        Selected::Emulated => unsafe { transform_unchecked::<Emulated, T, F>(src, dst, &unop) },
    }
}

/// [`transform`] on the architecture `A`.
///
/// Panics if the slices differ in length or `A` is not available.
pub fn transform_in<A, T, F>(src: &[T], dst: &mut [T], unop: F)
where
    A: Arch,
    T: Simd<A>,
    F: UnaryOp<T, BatchOf<T, A>>,
{
    assert_eq!(src.len(), dst.len());
    assert_available::<A>();
    unsafe { transform_unchecked::<A, T, F>(src, dst, &unop) }
}

/// `dst[i] = binop(lhs[i], rhs[i])`.
///
/// Panics if the slices differ in length.
pub fn transform_binary<T, F>(lhs: &[T], rhs: &[T], dst: &mut [T], binop: F)
where
    T: Element,
    F: Combine<T, T>,
{
    assert_eq!(lhs.len(), rhs.len());
    assert_eq!(lhs.len(), dst.len());
    match arch::selected() {
        #[cfg(target_arch = "x86_64")]
        Selected::V3 => unsafe { transform_binary_v3(lhs, rhs, dst, &binop) },
        #[cfg(target_arch = "x86_64")]
        Selected::V2 => unsafe { transform_binary_v2(lhs, rhs, dst, &binop) },
        #[cfg(target_arch = "aarch64")]
        Selected::Neon => unsafe { transform_binary_neon(lhs, rhs, dst, &binop) },
        Selected::Emulated => unsafe {
            transform_binary_unchecked::<Emulated, T, F>(lhs, rhs, dst, &binop)
        },
    }
}

/// [`transform_binary`] on the architecture `A`.
///
/// Panics if the slices differ in length or `A` is not available.
pub fn transform_binary_in<A, T, F>(lhs: &[T], rhs: &[T], dst: &mut [T], binop: F)
where
    A: Arch,
    T: Simd<A>,
    F: BinaryOp<T, T, BatchOf<T, A>>,
{
    assert_eq!(lhs.len(), rhs.len());
    assert_eq!(lhs.len(), dst.len());
    assert_available::<A>();
    unsafe { transform_binary_unchecked::<A, T, F>(lhs, rhs, dst, &binop) }
}

/// `data[i] = unop(data[i])`.
pub fn transform_inplace<T, F>(data: &mut [T], unop: F)
where
    T: Element,
    F: Map<T>,
{
    match arch::selected() {
        #[cfg(target_arch = "x86_64")]
        Selected::V3 => unsafe { transform_inplace_v3(data, &unop) },
        #[cfg(target_arch = "x86_64")]
        Selected::V2 => unsafe { transform_inplace_v2(data, &unop) },
        #[cfg(target_arch = "aarch64")]
        Selected::Neon => unsafe { transform_inplace_neon(data, &unop) },
        Selected::Emulated => unsafe { transform_inplace_unchecked::<Emulated, T, F>(data, &unop) },
    }
}

/// [`transform_inplace`] on the architecture `A`.
///
/// Panics if `A` is not available.
pub fn transform_inplace_in<A, T, F>(data: &mut [T], unop: F)
where
    A: Arch,
    T: Simd<A>,
    F: UnaryOp<T, BatchOf<T, A>>,
{
    assert_available::<A>();
    unsafe { transform_inplace_unchecked::<A, T, F>(data, &unop) }
}

macro_rules! trampolines {
    ($arch:ident, $cpu:tt, $suffix:ident) => {
        paste::paste! {
            #[detect::target_cpu(enable = $cpu)]
            unsafe fn [<transform_ $suffix>]<T: Element, F: Map<T>>(
                src: &[T],
                dst: &mut [T],
                unop: &F,
            ) {
                unsafe { transform_unchecked::<arch::$arch, T, F>(src, dst, unop) }
            }

            #[detect::target_cpu(enable = $cpu)]
            unsafe fn [<transform_binary_ $suffix>]<T: Element, F: Combine<T, T>>(
                lhs: &[T],
                rhs: &[T],
                dst: &mut [T],
                binop: &F,
            ) {
                unsafe { transform_binary_unchecked::<arch::$arch, T, F>(lhs, rhs, dst, binop) }
            }

            #[detect::target_cpu(enable = $cpu)]
            unsafe fn [<transform_inplace_ $suffix>]<T: Element, F: Map<T>>(
                data: &mut [T],
                unop: &F,
            ) {
                unsafe { transform_inplace_unchecked::<arch::$arch, T, F>(data, unop) }
            }
        }
    };
}

#[cfg(target_arch = "x86_64")]
trampolines!(V3, "v3", v3);
#[cfg(target_arch = "x86_64")]
trampolines!(V2, "v2", v2);
#[cfg(target_arch = "aarch64")]
trampolines!(Neon, "neon", neon);

/// # Safety
///
/// `A` must be available and `src.len() == dst.len()`.
#[inline(always)]
unsafe fn transform_unchecked<A, T, F>(src: &[T], dst: &mut [T], unop: &F)
where
    A: Arch,
    T: Simd<A>,
    F: UnaryOp<T, BatchOf<T, A>>,
{
    let lanes = <BatchOf<T, A> as Batch>::LANES;
    let size = src.len();
    let (in_begin, in_end) = partition(src.as_ptr(), size, lanes);
    let out_begin = alignment_offset(dst.as_ptr(), size, lanes);

    for i in 0..in_begin {
        dst[i] = unop.call(src[i]);
    }
    unsafe {
        if in_begin == out_begin {
            unary_body::<BatchOf<T, A>, F, true>(src, dst, in_begin, in_end, unop);
        } else {
            unary_body::<BatchOf<T, A>, F, false>(src, dst, in_begin, in_end, unop);
        }
    }
    for i in in_end..size {
        dst[i] = unop.call(src[i]);
    }
}

/// # Safety
///
/// `[begin, end)` must be a batch-aligned range of `src` holding whole
/// batches, and aligned in `dst` too if `STORE_ALIGNED`.
#[inline(always)]
unsafe fn unary_body<B, F, const STORE_ALIGNED: bool>(
    src: &[B::Scalar],
    dst: &mut [B::Scalar],
    begin: usize,
    end: usize,
    unop: &F,
) where
    B: Batch,
    F: UnaryOp<B::Scalar, B>,
{
    let src = src.as_ptr();
    let dst = dst.as_mut_ptr();
    let mut i = begin;
    while i < end {
        unsafe {
            let x = B::load_aligned(src.add(i));
            store::<B, STORE_ALIGNED>(unop.call_batch(x), dst.add(i));
        }
        i += B::LANES;
    }
}

/// # Safety
///
/// `A` must be available and the three slices must have equal lengths.
#[inline(always)]
unsafe fn transform_binary_unchecked<A, T, F>(lhs: &[T], rhs: &[T], dst: &mut [T], binop: &F)
where
    A: Arch,
    T: Simd<A>,
    F: BinaryOp<T, T, BatchOf<T, A>>,
{
    let lanes = <BatchOf<T, A> as Batch>::LANES;
    let size = lhs.len();
    let (lhs_begin, lhs_end) = partition(lhs.as_ptr(), size, lanes);
    let rhs_begin = alignment_offset(rhs.as_ptr(), size, lanes);
    let out_begin = alignment_offset(dst.as_ptr(), size, lanes);

    for i in 0..lhs_begin {
        dst[i] = binop.call(lhs[i], rhs[i]);
    }
    unsafe {
        match (lhs_begin == rhs_begin, lhs_begin == out_begin) {
            (true, true) => {
                binary_body::<BatchOf<T, A>, F, true, true>(lhs, rhs, dst, lhs_begin, lhs_end, binop)
            }
            (true, false) => {
                binary_body::<BatchOf<T, A>, F, true, false>(lhs, rhs, dst, lhs_begin, lhs_end, binop)
            }
            (false, true) => {
                binary_body::<BatchOf<T, A>, F, false, true>(lhs, rhs, dst, lhs_begin, lhs_end, binop)
            }
            (false, false) => {
                binary_body::<BatchOf<T, A>, F, false, false>(lhs, rhs, dst, lhs_begin, lhs_end, binop)
            }
        }
    }
    for i in lhs_end..size {
        dst[i] = binop.call(lhs[i], rhs[i]);
    }
}

/// # Safety
///
/// `[begin, end)` must be a batch-aligned range of `lhs` holding whole
/// batches, aligned in `rhs` if `RHS_ALIGNED` and in `dst` if
/// `STORE_ALIGNED`.
#[inline(always)]
unsafe fn binary_body<B, F, const RHS_ALIGNED: bool, const STORE_ALIGNED: bool>(
    lhs: &[B::Scalar],
    rhs: &[B::Scalar],
    dst: &mut [B::Scalar],
    begin: usize,
    end: usize,
    binop: &F,
) where
    B: Batch,
    F: BinaryOp<B::Scalar, B::Scalar, B>,
{
    let lhs = lhs.as_ptr();
    let rhs = rhs.as_ptr();
    let dst = dst.as_mut_ptr();
    let mut i = begin;
    while i < end {
        unsafe {
            let x = B::load_aligned(lhs.add(i));
            let y = load::<B, RHS_ALIGNED>(rhs.add(i));
            store::<B, STORE_ALIGNED>(binop.call_batch(x, y), dst.add(i));
        }
        i += B::LANES;
    }
}

/// # Safety
///
/// `A` must be available.
#[inline(always)]
unsafe fn transform_inplace_unchecked<A, T, F>(data: &mut [T], unop: &F)
where
    A: Arch,
    T: Simd<A>,
    F: UnaryOp<T, BatchOf<T, A>>,
{
    let lanes = <BatchOf<T, A> as Batch>::LANES;
    let size = data.len();
    let (begin, end) = partition(data.as_ptr(), size, lanes);

    for x in &mut data[..begin] {
        *x = unop.call(*x);
    }
    let ptr = data.as_mut_ptr();
    let mut i = begin;
    while i < end {
        unsafe {
            let x = BatchOf::<T, A>::load_aligned(ptr.add(i));
            unop.call_batch(x).store_aligned(ptr.add(i));
        }
        i += lanes;
    }
    for x in &mut data[end..] {
        *x = unop.call(*x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aligned::AlignedBuf;
    use crate::ops::{Minus, Negate, Plus};

    fn sequence(len: usize) -> AlignedBuf<f32> {
        AlignedBuf::from_slice(&(0..len).map(|x| x as f32 * 0.5).collect::<Vec<_>>())
    }

    #[test]
    fn unary_every_offset_pair() {
        let src = sequence(40);
        for src_shift in 0..4 {
            for dst_shift in 0..4 {
                let src = &src[src_shift..src_shift + 33];
                let mut out = AlignedBuf::<f32>::from_elem(0.0, 40);
                let dst = &mut out[dst_shift..dst_shift + 33];
                transform_in::<Emulated, _, _>(src, dst, Negate);
                let expected = src.iter().map(|x| -x).collect::<Vec<_>>();
                assert_eq!(dst, &expected[..], "src {src_shift}, dst {dst_shift}");
            }
        }
    }

    #[test]
    fn binary_every_offset_triple() {
        let lhs = sequence(40);
        let rhs = AlignedBuf::<f32>::from_elem(1.0, 40);
        for a in 0..4 {
            for b in 0..4 {
                for c in 0..4 {
                    let mut out = AlignedBuf::<f32>::from_elem(0.0, 40);
                    let (x, y) = (&lhs[a..a + 29], &rhs[b..b + 29]);
                    let dst = &mut out[c..c + 29];
                    transform_binary_in::<Emulated, _, _>(x, y, dst, Minus);
                    let expected = x.iter().zip(y).map(|(x, y)| x - y).collect::<Vec<_>>();
                    assert_eq!(dst, &expected[..], "lhs {a}, rhs {b}, dst {c}");
                }
            }
        }
    }

    #[test]
    fn inplace() {
        let mut data = AlignedBuf::<i32>::from_slice(&(0..23).collect::<Vec<_>>());
        transform_inplace_in::<Emulated, _, _>(&mut data[1..], Negate);
        assert_eq!(data[0], 0);
        assert!(data[1..].iter().enumerate().all(|(i, &x)| x == -(i as i32 + 1)));
        transform_inplace(&mut data[..], Negate);
        assert!(data.iter().enumerate().all(|(i, &x)| x == i as i32));
    }

    #[test]
    fn dispatched() {
        let lhs = sequence(77);
        let mut dst = vec![0.0f32; 77];
        transform_binary(&lhs, &lhs, &mut dst, Plus);
        assert!(lhs.iter().zip(&dst).all(|(x, y)| x * 2.0 == *y));
        let mut back = vec![0.0f32; 77];
        transform(&dst, &mut back, Negate);
        assert!(dst.iter().zip(&back).all(|(x, y)| -x == *y));
    }

    #[test]
    fn empty() {
        transform_in::<Emulated, f64, _>(&[], &mut [], Negate);
        transform_binary::<f64, _>(&[], &[], &mut [], Plus);
        transform_inplace::<f64, _>(&mut [], Negate);
    }

    #[test]
    #[should_panic]
    fn length_mismatch() {
        let mut dst = [0.0f64; 3];
        transform(&[1.0f64, 2.0], &mut dst, Negate);
    }
}
