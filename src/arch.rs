//! Architecture markers and the element-to-batch mapping.
//!
//! An [`Arch`] names a register width and the CPU level needed to use it.
//! [`Simd<A>`] maps an element type to its batch type on that architecture,
//! so the lane count of `BatchOf<T, A>` is a compile-time constant.

use crate::batch::Batch;
use std::fmt::{Debug, Display};
use std::sync::Once;

pub trait Arch: Copy + Default + Debug + Send + Sync + 'static {
    /// Target CPU level, as understood by `detect`.
    const NAME: &'static str;
    /// Register width in bytes.
    const WIDTH: usize;

    /// Whether the running CPU can execute batches of this architecture.
    fn available() -> bool;
}

/// Portable batches made of plain arrays, available everywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Emulated;

impl Arch for Emulated {
    const NAME: &'static str = "emulated";
    const WIDTH: usize = 16;

    #[inline(always)]
    fn available() -> bool {
        true
    }
}

/// x86-64-v2, 128-bit SSE registers.
#[cfg(target_arch = "x86_64")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct V2;

#[cfg(target_arch = "x86_64")]
impl Arch for V2 {
    const NAME: &'static str = "v2";
    const WIDTH: usize = 16;

    #[inline(always)]
    fn available() -> bool {
        detect::v2::detect()
    }
}

/// x86-64-v3, 256-bit AVX registers.
#[cfg(target_arch = "x86_64")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct V3;

#[cfg(target_arch = "x86_64")]
impl Arch for V3 {
    const NAME: &'static str = "v3";
    const WIDTH: usize = 32;

    #[inline(always)]
    fn available() -> bool {
        detect::v3::detect()
    }
}

/// AArch64 Advanced SIMD, 128-bit registers.
#[cfg(target_arch = "aarch64")]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neon;

#[cfg(target_arch = "aarch64")]
impl Arch for Neon {
    const NAME: &'static str = "neon";
    const WIDTH: usize = 16;

    #[inline(always)]
    fn available() -> bool {
        detect::neon::detect()
    }
}

/// Element types that have a batch representation on `A`.
pub trait Simd<A: Arch>: Copy + 'static {
    type Batch: Batch<Scalar = Self>;
}

pub type BatchOf<T, A> = <T as Simd<A>>::Batch;

/// Element types usable with the dispatching entry points, i.e. with a batch
/// type on every architecture of the target.
#[cfg(target_arch = "x86_64")]
pub trait Element: Simd<Emulated> + Simd<V2> + Simd<V3> {}

#[cfg(target_arch = "x86_64")]
impl<T: Simd<Emulated> + Simd<V2> + Simd<V3>> Element for T {}

#[cfg(target_arch = "aarch64")]
pub trait Element: Simd<Emulated> + Simd<Neon> {}

#[cfg(target_arch = "aarch64")]
impl<T: Simd<Emulated> + Simd<Neon>> Element for T {}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
pub trait Element: Simd<Emulated> {}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
impl<T: Simd<Emulated>> Element for T {}

/// Architecture picked by the dispatching entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selected {
    Emulated,
    #[cfg(target_arch = "x86_64")]
    V2,
    #[cfg(target_arch = "x86_64")]
    V3,
    #[cfg(target_arch = "aarch64")]
    Neon,
}

impl Selected {
    pub fn name(self) -> &'static str {
        match self {
            Selected::Emulated => Emulated::NAME,
            #[cfg(target_arch = "x86_64")]
            Selected::V2 => V2::NAME,
            #[cfg(target_arch = "x86_64")]
            Selected::V3 => V3::NAME,
            #[cfg(target_arch = "aarch64")]
            Selected::Neon => Neon::NAME,
        }
    }
}

impl Display for Selected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The widest architecture the running CPU supports.
pub fn selected() -> Selected {
    #[cfg(target_arch = "x86_64")]
    let selected = if V3::available() {
        Selected::V3
    } else if V2::available() {
        Selected::V2
    } else {
        Selected::Emulated
    };
    #[cfg(target_arch = "aarch64")]
    let selected = if Neon::available() {
        Selected::Neon
    } else {
        Selected::Emulated
    };
    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    let selected = Selected::Emulated;
    static ONCE: Once = Once::new();
    ONCE.call_once(|| log::debug!("selected target cpu: {selected}"));
    selected
}

#[inline(always)]
pub(crate) fn assert_available<A: Arch>() {
    assert!(A::available(), "target cpu `{}` is not available", A::NAME);
}
