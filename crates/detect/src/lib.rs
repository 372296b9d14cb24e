//! Runtime detection of target CPU levels.
//!
//! Every level gets a module (`v2`, `v3` on x86_64, `neon` on aarch64) whose
//! `detect()` probes the CPU once and caches the answer. Call [`init`] early
//! to move the probing cost out of the first dispatch.

detect_macros::main!();

pub use detect_macros::target_cpu;
