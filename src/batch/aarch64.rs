use super::{Aligned16, Batch};
use crate::arch::{Neon, Simd};
use half::f16;
use num_complex::Complex;
use std::arch::aarch64::*;

// NEON loads and stores have no alignment requirement, the aligned forms
// share the unaligned instructions.
macro_rules! native {
    (@op $name:ident, $op:ident, $intrinsic:ident) => {
        paste::paste! {
            impl ::core::ops::$op for $name {
                type Output = Self;

                #[inline(always)]
                fn [<$op:lower>](self, rhs: Self) -> Self {
                    Self(unsafe { $intrinsic(self.0, rhs.0) })
                }
            }
        }
    };
    ($name:ident, $register:ty, $t:ty, $lanes:literal, $suffix:ident) => {
        #[derive(Debug, Clone, Copy)]
        #[repr(transparent)]
        pub struct $name($register);

        paste::paste! {
            unsafe impl Batch for $name {
                type Scalar = $t;

                const LANES: usize = $lanes;

                #[inline(always)]
                unsafe fn splat(x: $t) -> Self {
                    Self(unsafe { [<vdupq_n_ $suffix>](x) })
                }

                #[inline(always)]
                unsafe fn load_aligned(ptr: *const $t) -> Self {
                    Self(unsafe { [<vld1q_ $suffix>](ptr) })
                }

                #[inline(always)]
                unsafe fn load_unaligned(ptr: *const $t) -> Self {
                    Self(unsafe { [<vld1q_ $suffix>](ptr) })
                }

                #[inline(always)]
                unsafe fn store_aligned(self, ptr: *mut $t) {
                    unsafe { [<vst1q_ $suffix>](ptr, self.0) }
                }

                #[inline(always)]
                unsafe fn store_unaligned(self, ptr: *mut $t) {
                    unsafe { [<vst1q_ $suffix>](ptr, self.0) }
                }
            }

            native!(@op $name, Add, [<vaddq_ $suffix>]);
            native!(@op $name, Sub, [<vsubq_ $suffix>]);
            native!(@op $name, Mul, [<vmulq_ $suffix>]);
            native!(@op $name, Div, [<vdivq_ $suffix>]);

            impl ::core::ops::Neg for $name {
                type Output = Self;

                #[inline(always)]
                fn neg(self) -> Self {
                    Self(unsafe { [<vnegq_ $suffix>](self.0) })
                }
            }
        }
    };
}

native!(F32x4, float32x4_t, f32, 4, f32);
native!(F64x2, float64x2_t, f64, 2, f64);

impl Simd<Neon> for f32 {
    type Batch = F32x4;
}

impl Simd<Neon> for f64 {
    type Batch = F64x2;
}

simd!(Neon => Aligned16, 16;
    f16, Complex<f32>, Complex<f64>,
    i8, i16, i32, i64, u8, u16, u32, u64,
);
