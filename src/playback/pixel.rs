//! Pixel format selection and frame geometry.

use crate::schema::ColorDepth;

/// In-memory encoding of one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// 16-bit 5-6-5, little-endian.
    Rgb565,
    /// 24-bit, 8 bits per channel.
    Rgb888,
    /// 32-bit with alpha (or padding) byte.
    Argb8888,
}

impl PixelFormat {
    /// Select the encoding for the configured color depth.
    pub fn from_depth(depth: ColorDepth) -> Self {
        match depth {
            ColorDepth::Bits16 => PixelFormat::Rgb565,
            ColorDepth::Bits24 => PixelFormat::Rgb888,
            ColorDepth::Bits32 => PixelFormat::Argb8888,
        }
    }

    /// Bytes per pixel.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgb565 => 2,
            PixelFormat::Rgb888 => 3,
            PixelFormat::Argb8888 => 4,
        }
    }
}

/// Frame size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    pub width: u32,
    pub height: u32,
}

impl FrameGeometry {
    /// Panel size of the reference device.
    pub const DEFAULT: FrameGeometry = FrameGeometry {
        width: 160,
        height: 275,
    };

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Row length in bytes.
    #[inline]
    pub fn stride(&self, format: PixelFormat) -> usize {
        (self.width as usize).saturating_mul(format.bytes_per_pixel())
    }

    /// Bytes in one raw frame file: `width * height * bytes_per_pixel`.
    ///
    /// Saturates instead of wrapping, so an impossible size fails to allocate.
    #[inline]
    pub fn frame_size(&self, format: PixelFormat) -> usize {
        self.stride(format).saturating_mul(self.height as usize)
    }
}

impl Default for FrameGeometry {
    fn default() -> Self {
        Self::DEFAULT
    }
}
