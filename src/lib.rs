//! SIMD-accelerated sequence algorithms.
//!
//! [`reduce`] and [`transform`] behave like a sequential fold and a
//! per-element map over a slice, but process the aligned middle of the slice
//! in hardware-width batches. The unaligned head and tail are handled with
//! scalar code, and slices shorter than one batch never touch vector code.
//!
//! ```
//! let data = (1..=100).map(|x| x as f64).collect::<Vec<_>>();
//! assert_eq!(algorithms::reduce(&data, 0.0), 5050.0);
//! ```
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::needless_range_loop)]

pub mod align;
pub mod aligned;
pub mod arch;
pub mod batch;
pub mod error;
pub mod ops;
pub mod reduce;
pub mod transform;

pub use aligned::AlignedBuf;
pub use arch::{Arch, BatchOf, Element, Emulated, Simd};
pub use batch::Batch;
pub use error::{AllocError, LayoutError};
pub use ops::{BinaryOp, Combine, Map, UnaryOp};
pub use reduce::{reduce, reduce_in, reduce_with};
pub use transform::{
    transform, transform_binary, transform_binary_in, transform_in, transform_inplace,
    transform_inplace_in,
};

#[cfg(target_arch = "aarch64")]
pub use arch::Neon;
#[cfg(target_arch = "x86_64")]
pub use arch::{V2, V3};

/// Probes the CPU levels up front and logs what was found.
///
/// Calling it is optional: detection is lazy, this only moves the probing
/// cost out of the first call of an algorithm.
pub fn init() {
    detect::init();
    log::info!("detected target cpus: {:?}", detect::detected());
    log::info!("dispatching to {}", arch::selected());
}
