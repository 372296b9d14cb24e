use thiserror::Error;

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
    #[error("Length {len} is too large for an aligned buffer.")]
    CapacityOverflow { len: usize },
    #[error("Alignment {align} is not a power of two.")]
    InvalidAlignment { align: usize },
}

#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("The slice is not aligned to {align} bytes.")]
    Misaligned { align: usize },
    #[error("The slice length {len} is not a multiple of {lanes} lanes.")]
    Ragged { len: usize, lanes: usize },
}
