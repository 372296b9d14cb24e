use super::Batch;
use crate::arch::Emulated;
use half::f16;
use num_complex::Complex;

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C, align(16))]
pub struct Aligned16<T>(pub T);

#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C, align(32))]
pub struct Aligned32<T>(pub T);

macro_rules! batch {
    ($wrapper:ident, $bytes:literal, $t:ty, [$($op:ident),*], [$($uop:ident),*]) => {
        unsafe impl Batch for $wrapper<[$t; $bytes / ::core::mem::size_of::<$t>()]> {
            type Scalar = $t;

            const LANES: usize = $bytes / ::core::mem::size_of::<$t>();

            #[inline(always)]
            unsafe fn splat(x: $t) -> Self {
                $wrapper([x; $bytes / ::core::mem::size_of::<$t>()])
            }

            #[inline(always)]
            unsafe fn load_aligned(ptr: *const $t) -> Self {
                unsafe { ptr.cast::<Self>().read() }
            }

            #[inline(always)]
            unsafe fn load_unaligned(ptr: *const $t) -> Self {
                unsafe { ptr.cast::<Self>().read_unaligned() }
            }

            #[inline(always)]
            unsafe fn store_aligned(self, ptr: *mut $t) {
                unsafe { ptr.cast::<Self>().write(self) }
            }

            #[inline(always)]
            unsafe fn store_unaligned(self, ptr: *mut $t) {
                unsafe { ptr.cast::<Self>().write_unaligned(self) }
            }
        }

        $(
            paste::paste! {
                impl ::core::ops::$op for $wrapper<[$t; $bytes / ::core::mem::size_of::<$t>()]> {
                    type Output = Self;

                    #[inline(always)]
                    fn [<$op:lower>](self, rhs: Self) -> Self {
                        $wrapper(::core::array::from_fn(|i| {
                            ::core::ops::$op::[<$op:lower>](self.0[i], rhs.0[i])
                        }))
                    }
                }
            }
        )*

        $(
            paste::paste! {
                impl ::core::ops::$uop for $wrapper<[$t; $bytes / ::core::mem::size_of::<$t>()]> {
                    type Output = Self;

                    #[inline(always)]
                    fn [<$uop:lower>](self) -> Self {
                        $wrapper(self.0.map(::core::ops::$uop::[<$uop:lower>]))
                    }
                }
            }
        )*
    };
}

macro_rules! batches {
    ($wrapper:ident, $bytes:literal) => {
        batch!($wrapper, $bytes, f32, [Add, Sub, Mul, Div], [Neg]);
        batch!($wrapper, $bytes, f64, [Add, Sub, Mul, Div], [Neg]);
        batch!($wrapper, $bytes, f16, [Add, Sub, Mul, Div], [Neg]);
        batch!($wrapper, $bytes, Complex<f32>, [Add, Sub, Mul, Div], [Neg]);
        batch!($wrapper, $bytes, Complex<f64>, [Add, Sub, Mul, Div], [Neg]);
        batch!($wrapper, $bytes, i8, [Add, Sub, Mul], [Neg]);
        batch!($wrapper, $bytes, i16, [Add, Sub, Mul], [Neg]);
        batch!($wrapper, $bytes, i32, [Add, Sub, Mul], [Neg]);
        batch!($wrapper, $bytes, i64, [Add, Sub, Mul], [Neg]);
        batch!($wrapper, $bytes, u8, [Add, Sub, Mul], []);
        batch!($wrapper, $bytes, u16, [Add, Sub, Mul], []);
        batch!($wrapper, $bytes, u32, [Add, Sub, Mul], []);
        batch!($wrapper, $bytes, u64, [Add, Sub, Mul], []);
    };
}

batches!(Aligned16, 16);
batches!(Aligned32, 32);

simd!(Emulated => Aligned16, 16;
    f32, f64, f16, Complex<f32>, Complex<f64>,
    i8, i16, i32, i64, u8, u16, u32, u64,
);
