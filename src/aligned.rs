use crate::error::AllocError;
use std::alloc::Layout;
use std::fmt::Debug;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// A fixed-length heap buffer whose first element is aligned to `ALIGN`
/// bytes. The default of 64 bytes suits every batch type of this crate, so
/// algorithms over a whole buffer have an empty unaligned head.
pub struct AlignedBuf<T: Copy, const ALIGN: usize = 64> {
    ptr: NonNull<T>,
    len: usize,
}

unsafe impl<T: Copy + Send, const ALIGN: usize> Send for AlignedBuf<T, ALIGN> {}
unsafe impl<T: Copy + Sync, const ALIGN: usize> Sync for AlignedBuf<T, ALIGN> {}

impl<T: Copy, const ALIGN: usize> AlignedBuf<T, ALIGN> {
    fn layout(len: usize) -> Result<Layout, AllocError> {
        if !ALIGN.is_power_of_two() {
            return Err(AllocError::InvalidAlignment { align: ALIGN });
        }
        let size = size_of::<T>()
            .checked_mul(len)
            .ok_or(AllocError::CapacityOverflow { len })?;
        let align = ALIGN.max(align_of::<T>());
        Layout::from_size_align(size, align).map_err(|_| AllocError::CapacityOverflow { len })
    }

    /// A buffer of `len` copies of `value`.
    pub fn try_from_elem(value: T, len: usize) -> Result<Self, AllocError> {
        let layout = Self::layout(len)?;
        let ptr = if layout.size() != 0 {
            let raw = unsafe { std::alloc::alloc(layout) }.cast::<T>();
            match NonNull::new(raw) {
                Some(ptr) => ptr,
                None => std::alloc::handle_alloc_error(layout),
            }
        } else {
            // SAFETY: the alignment is never zero.
            unsafe { NonNull::new_unchecked(layout.align() as *mut T) }
        };
        for i in 0..len {
            unsafe { ptr.as_ptr().add(i).write(value) };
        }
        Ok(Self { ptr, len })
    }

    /// A buffer of `len` copies of `value`.
    ///
    /// Panics if the size overflows or `ALIGN` is not a power of two.
    pub fn from_elem(value: T, len: usize) -> Self {
        Self::try_from_elem(value, len).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn from_slice(data: &[T]) -> Self {
        let mut buf = match data.first() {
            Some(&first) => Self::from_elem(first, data.len()),
            None => Self::from_elem_empty(),
        };
        buf.copy_from_slice(data);
        buf
    }

    fn from_elem_empty() -> Self {
        let layout = Self::layout(0).unwrap_or_else(|e| panic!("{e}"));
        Self {
            // SAFETY: the alignment is never zero.
            ptr: unsafe { NonNull::new_unchecked(layout.align() as *mut T) },
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<T: Copy, const ALIGN: usize> Clone for AlignedBuf<T, ALIGN> {
    fn clone(&self) -> Self {
        Self::from_slice(self)
    }
}

impl<T: Copy + Debug, const ALIGN: usize> Debug for AlignedBuf<T, ALIGN> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Copy + PartialEq, const ALIGN: usize> PartialEq for AlignedBuf<T, ALIGN> {
    fn eq(&self, other: &Self) -> bool {
        self[..] == other[..]
    }
}

impl<T: Copy, const ALIGN: usize> Deref for AlignedBuf<T, ALIGN> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Copy, const ALIGN: usize> DerefMut for AlignedBuf<T, ALIGN> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Copy, const ALIGN: usize> AsRef<[T]> for AlignedBuf<T, ALIGN> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T: Copy, const ALIGN: usize> AsMut<[T]> for AlignedBuf<T, ALIGN> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Copy, const ALIGN: usize> Drop for AlignedBuf<T, ALIGN> {
    fn drop(&mut self) {
        if let Ok(layout) = Self::layout(self.len) {
            if layout.size() != 0 {
                unsafe { std::alloc::dealloc(self.ptr.as_ptr().cast(), layout) };
            }
        }
    }
}
