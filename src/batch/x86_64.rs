use super::{Aligned16, Aligned32, Batch};
use crate::arch::{Simd, V2, V3};
use half::f16;
use num_complex::Complex;
use std::arch::x86_64::*;

macro_rules! native {
    (@op $name:ident, $op:ident, $prefix:ident, $intrinsic:ident) => {
        paste::paste! {
            impl ::core::ops::$op for $name {
                type Output = Self;

                #[inline(always)]
                fn [<$op:lower>](self, rhs: Self) -> Self {
                    Self(unsafe { [<$prefix $intrinsic>](self.0, rhs.0) })
                }
            }
        }
    };
    ($name:ident, $register:ty, $t:ty, $lanes:literal, $prefix:ident, $suffix:ident) => {
        #[derive(Debug, Clone, Copy)]
        #[repr(transparent)]
        pub struct $name($register);

        paste::paste! {
            unsafe impl Batch for $name {
                type Scalar = $t;

                const LANES: usize = $lanes;

                #[inline(always)]
                unsafe fn splat(x: $t) -> Self {
                    Self(unsafe { [<$prefix _set1_ $suffix>](x) })
                }

                #[inline(always)]
                unsafe fn load_aligned(ptr: *const $t) -> Self {
                    Self(unsafe { [<$prefix _load_ $suffix>](ptr) })
                }

                #[inline(always)]
                unsafe fn load_unaligned(ptr: *const $t) -> Self {
                    Self(unsafe { [<$prefix _loadu_ $suffix>](ptr) })
                }

                #[inline(always)]
                unsafe fn store_aligned(self, ptr: *mut $t) {
                    unsafe { [<$prefix _store_ $suffix>](ptr, self.0) }
                }

                #[inline(always)]
                unsafe fn store_unaligned(self, ptr: *mut $t) {
                    unsafe { [<$prefix _storeu_ $suffix>](ptr, self.0) }
                }
            }

            native!(@op $name, Add, $prefix, [<_add_ $suffix>]);
            native!(@op $name, Sub, $prefix, [<_sub_ $suffix>]);
            native!(@op $name, Mul, $prefix, [<_mul_ $suffix>]);
            native!(@op $name, Div, $prefix, [<_div_ $suffix>]);

            impl ::core::ops::Neg for $name {
                type Output = Self;

                #[inline(always)]
                fn neg(self) -> Self {
                    // flip the sign bits
                    Self(unsafe {
                        [<$prefix _xor_ $suffix>](self.0, [<$prefix _set1_ $suffix>](-0.0))
                    })
                }
            }
        }
    };
}

native!(F32x4, __m128, f32, 4, _mm, ps);
native!(F64x2, __m128d, f64, 2, _mm, pd);
native!(F32x8, __m256, f32, 8, _mm256, ps);
native!(F64x4, __m256d, f64, 4, _mm256, pd);

impl Simd<V2> for f32 {
    type Batch = F32x4;
}

impl Simd<V2> for f64 {
    type Batch = F64x2;
}

impl Simd<V3> for f32 {
    type Batch = F32x8;
}

impl Simd<V3> for f64 {
    type Batch = F64x4;
}

simd!(V2 => Aligned16, 16;
    f16, Complex<f32>, Complex<f64>,
    i8, i16, i32, i64, u8, u16, u32, u64,
);

simd!(V3 => Aligned32, 32;
    f16, Complex<f32>, Complex<f64>,
    i8, i16, i32, i64, u8, u16, u32, u64,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arch::Arch;

    fn lanes<B: Batch>(batch: B) -> Vec<B::Scalar> {
        let mut out = Aligned32([0u8; 32]);
        unsafe {
            batch.store_aligned(out.0.as_mut_ptr().cast());
            std::slice::from_raw_parts(out.0.as_ptr().cast::<B::Scalar>(), B::LANES).to_vec()
        }
    }

    #[test]
    fn layout() {
        assert_eq!(size_of::<F32x4>(), 16);
        assert_eq!(align_of::<F64x2>(), 16);
        assert_eq!(size_of::<F32x8>(), 32);
        assert_eq!(align_of::<F64x4>(), 32);
    }

    #[test]
    fn v2_arithmetic() {
        if !V2::available() {
            println!("test {} ... skipped (v2)", module_path!());
            return;
        }
        let data = [1.0f32, 2.0, 3.0, 4.0, 5.0];
        let a = unsafe { F32x4::load_unaligned(data.as_ptr()) };
        let b = unsafe { F32x4::load_unaligned(data.as_ptr().add(1)) };
        assert_eq!(lanes(a + b), [3.0, 5.0, 7.0, 9.0]);
        assert_eq!(lanes(b - a), [1.0; 4]);
        assert_eq!(lanes(a * b), [2.0, 6.0, 12.0, 20.0]);
        assert_eq!(lanes(-a), [-1.0, -2.0, -3.0, -4.0]);
        let c = unsafe { F64x2::splat(3.0) };
        let d = unsafe { F64x2::splat(4.0) };
        assert_eq!(lanes(c / d), [0.75; 2]);
    }

    #[test]
    fn v3_arithmetic() {
        if !V3::available() {
            println!("test {} ... skipped (v3)", module_path!());
            return;
        }
        let data = (0..9).map(|x| x as f64).collect::<Vec<_>>();
        let a = unsafe { F64x4::load_unaligned(data.as_ptr()) };
        let b = unsafe { F64x4::load_unaligned(data.as_ptr().add(4)) };
        assert_eq!(lanes(a + b), [4.0, 6.0, 8.0, 10.0]);
        assert_eq!(lanes(-(b - a)), [-4.0; 4]);
        let x = unsafe { F32x8::splat(1.5) };
        assert_eq!(lanes(x * x), [2.25; 8]);
        let mut out = [0.0f32; 9];
        unsafe { (x / x).store_unaligned(out.as_mut_ptr().add(1)) };
        assert_eq!(out, [0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);
    }
}
