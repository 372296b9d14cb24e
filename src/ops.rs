//! Operators accepted by the algorithms.
//!
//! An operator has a scalar form and a batch form. The batch form must be the
//! scalar form applied lane by lane, otherwise vectorized and sequential
//! results diverge.

use crate::arch::{BatchOf, Element, Emulated};
use std::ops::{Add, Div, Mul, Neg, Sub};

#[cfg(target_arch = "aarch64")]
use crate::arch::Neon;
#[cfg(target_arch = "x86_64")]
use crate::arch::{V2, V3};

/// `(I, T) -> I` on scalars and `(B, B) -> B` on batches.
pub trait BinaryOp<I, T, B> {
    fn call(&self, lhs: I, rhs: T) -> I;
    fn call_batch(&self, lhs: B, rhs: B) -> B;
}

/// `T -> T` on scalars and `B -> B` on batches.
pub trait UnaryOp<T, B> {
    fn call(&self, x: T) -> T;
    fn call_batch(&self, x: B) -> B;
}

impl<I, T, B, F: BinaryOp<I, T, B>> BinaryOp<I, T, B> for &F {
    #[inline(always)]
    fn call(&self, lhs: I, rhs: T) -> I {
        (**self).call(lhs, rhs)
    }

    #[inline(always)]
    fn call_batch(&self, lhs: B, rhs: B) -> B {
        (**self).call_batch(lhs, rhs)
    }
}

impl<T, B, F: UnaryOp<T, B>> UnaryOp<T, B> for &F {
    #[inline(always)]
    fn call(&self, x: T) -> T {
        (**self).call(x)
    }

    #[inline(always)]
    fn call_batch(&self, x: B) -> B {
        (**self).call_batch(x)
    }
}

macro_rules! arithmetic {
    ($($(#[$meta:meta])* $name:ident: $op:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
            pub struct $name;

            paste::paste! {
                impl<I, T, B> BinaryOp<I, T, B> for $name
                where
                    I: $op<T, Output = I>,
                    B: $op<Output = B>,
                {
                    #[inline(always)]
                    fn call(&self, lhs: I, rhs: T) -> I {
                        lhs.[<$op:lower>](rhs)
                    }

                    #[inline(always)]
                    fn call_batch(&self, lhs: B, rhs: B) -> B {
                        lhs.[<$op:lower>](rhs)
                    }
                }
            }
        )*
    };
}

arithmetic! {
    /// `lhs + rhs`, the default operator of `reduce`.
    Plus: Add,
    /// `lhs - rhs`
    Minus: Sub,
    /// `lhs * rhs`
    Multiplies: Mul,
    /// `lhs / rhs`
    Divides: Div,
}

/// `-x`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Negate;

impl<T, B> UnaryOp<T, B> for Negate
where
    T: Neg<Output = T>,
    B: Neg<Output = B>,
{
    #[inline(always)]
    fn call(&self, x: T) -> T {
        -x
    }

    #[inline(always)]
    fn call_batch(&self, x: B) -> B {
        -x
    }
}

/// A pair of closures acting as one operator, see [`lift`].
#[derive(Debug, Clone, Copy)]
pub struct Lift<F, G> {
    scalar: F,
    batch: G,
}

/// Pairs a scalar closure with its batch counterpart.
///
/// A closure has a single batch type, so the result only works with the
/// `*_in` entry points of one architecture.
///
/// ```
/// use algorithms::batch::Aligned16;
/// use algorithms::ops::lift;
/// use algorithms::{reduce_in, Emulated};
///
/// let data = [2.0f32; 9];
/// let product = reduce_in::<Emulated, _, _, _>(
///     &data,
///     1.0,
///     lift(
///         |a: f32, b: f32| a * b,
///         |a: Aligned16<[f32; 4]>, b: Aligned16<[f32; 4]>| a * b,
///     ),
/// );
/// assert_eq!(product, 512.0);
/// ```
pub fn lift<F, G>(scalar: F, batch: G) -> Lift<F, G> {
    Lift { scalar, batch }
}

impl<I, T, B, F, G> BinaryOp<I, T, B> for Lift<F, G>
where
    F: Fn(I, T) -> I,
    G: Fn(B, B) -> B,
{
    #[inline(always)]
    fn call(&self, lhs: I, rhs: T) -> I {
        (self.scalar)(lhs, rhs)
    }

    #[inline(always)]
    fn call_batch(&self, lhs: B, rhs: B) -> B {
        (self.batch)(lhs, rhs)
    }
}

impl<T, B, F, G> UnaryOp<T, B> for Lift<F, G>
where
    F: Fn(T) -> T,
    G: Fn(B) -> B,
{
    #[inline(always)]
    fn call(&self, x: T) -> T {
        (self.scalar)(x)
    }

    #[inline(always)]
    fn call_batch(&self, x: B) -> B {
        (self.batch)(x)
    }
}

/// Binary operators defined on the batches of every architecture, as needed
/// by the dispatching entry points.
#[cfg(target_arch = "x86_64")]
pub trait Combine<I, T: Element>:
    BinaryOp<I, T, BatchOf<T, Emulated>>
    + BinaryOp<I, T, BatchOf<T, V2>>
    + BinaryOp<I, T, BatchOf<T, V3>>
{
}

#[cfg(target_arch = "x86_64")]
impl<I, T: Element, F> Combine<I, T> for F where
    F: BinaryOp<I, T, BatchOf<T, Emulated>>
        + BinaryOp<I, T, BatchOf<T, V2>>
        + BinaryOp<I, T, BatchOf<T, V3>>
{
}

#[cfg(target_arch = "aarch64")]
pub trait Combine<I, T: Element>:
    BinaryOp<I, T, BatchOf<T, Emulated>> + BinaryOp<I, T, BatchOf<T, Neon>>
{
}

#[cfg(target_arch = "aarch64")]
impl<I, T: Element, F> Combine<I, T> for F where
    F: BinaryOp<I, T, BatchOf<T, Emulated>> + BinaryOp<I, T, BatchOf<T, Neon>>
{
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub trait Combine<I, T: Element>: BinaryOp<I, T, BatchOf<T, Emulated>> {}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
impl<I, T: Element, F> Combine<I, T> for F where F: BinaryOp<I, T, BatchOf<T, Emulated>> {}

/// Unary operators defined on the batches of every architecture.
#[cfg(target_arch = "x86_64")]
pub trait Map<T: Element>:
    UnaryOp<T, BatchOf<T, Emulated>> + UnaryOp<T, BatchOf<T, V2>> + UnaryOp<T, BatchOf<T, V3>>
{
}

#[cfg(target_arch = "x86_64")]
impl<T: Element, F> Map<T> for F where
    F: UnaryOp<T, BatchOf<T, Emulated>>
        + UnaryOp<T, BatchOf<T, V2>>
        + UnaryOp<T, BatchOf<T, V3>>
{
}

#[cfg(target_arch = "aarch64")]
pub trait Map<T: Element>: UnaryOp<T, BatchOf<T, Emulated>> + UnaryOp<T, BatchOf<T, Neon>> {}

#[cfg(target_arch = "aarch64")]
impl<T: Element, F> Map<T> for F where
    F: UnaryOp<T, BatchOf<T, Emulated>> + UnaryOp<T, BatchOf<T, Neon>>
{
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub trait Map<T: Element>: UnaryOp<T, BatchOf<T, Emulated>> {}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
impl<T: Element, F> Map<T> for F where F: UnaryOp<T, BatchOf<T, Emulated>> {}
