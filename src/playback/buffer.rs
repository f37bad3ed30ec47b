//! Fixed-size raw pixel store backing one display surface.

use super::{FrameGeometry, PixelFormat, PlaybackError};

/// What a display surface needs to read a [`FrameBuffer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferDescriptor {
    pub geometry: FrameGeometry,
    pub format: PixelFormat,
    /// Row length in bytes.
    pub stride: usize,
    /// Total bytes, `stride * height`.
    pub byte_len: usize,
}

/// Exclusively owned frame bytes. Allocated once, never resized.
#[derive(Debug)]
pub struct FrameBuffer {
    data: Box<[u8]>,
    descriptor: BufferDescriptor,
}

impl FrameBuffer {
    /// Allocate a zeroed buffer for one frame of `geometry` in `format`.
    ///
    /// Allocation failure is reported instead of aborting.
    pub fn allocate(geometry: FrameGeometry, format: PixelFormat) -> Result<Self, PlaybackError> {
        let byte_len = geometry.frame_size(format);
        let mut data = Vec::new();
        data.try_reserve_exact(byte_len)
            .map_err(|_| PlaybackError::Allocation { bytes: byte_len })?;
        data.resize(byte_len, 0);

        Ok(Self {
            data: data.into_boxed_slice(),
            descriptor: BufferDescriptor {
                geometry,
                format,
                stride: geometry.stride(format),
                byte_len,
            },
        })
    }

    #[inline]
    pub fn descriptor(&self) -> BufferDescriptor {
        self.descriptor
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}
