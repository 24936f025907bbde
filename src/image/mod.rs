//! Packed RGB image views and owned buffers.
//!
//! `RgbView` is a borrowed view into a byte buffer holding interleaved
//! 8-bit RGB pixels. The stride counts bytes between row starts, so a stride
//! larger than `3 * width` represents padded rows. Layout is validated once,
//! when the view is constructed; downstream code trusts it.

use crate::util::{DetectError, DetectResult};

pub mod bounds;
#[cfg(feature = "image-io")]
pub mod io;
pub(crate) mod resize;

/// Bytes per pixel in the packed RGB layout.
pub const CHANNELS: usize = 3;

/// Borrowed RGB8 image view with an explicit byte stride.
#[derive(Copy, Clone, Debug)]
pub struct RgbView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> RgbView<'a> {
    /// Creates a contiguous view with `stride == 3 * width`.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> DetectResult<Self> {
        let stride = width
            .checked_mul(CHANNELS)
            .ok_or(DetectError::InvalidDimensions { width, height })?;
        Self::new(data, width, height, stride)
    }

    /// Creates a view with an explicit stride in bytes.
    pub fn new(data: &'a [u8], width: usize, height: usize, stride: usize) -> DetectResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(DetectError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in bytes between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the `[r, g, b]` triple at `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; CHANNELS]> {
        let row = self.row(y)?;
        let px = row.get(x * CHANNELS..x * CHANNELS + CHANNELS)?;
        Some([px[0], px[1], px[2]])
    }

    /// Returns the packed bytes of row `y` (length `3 * width`).
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width * CHANNELS)?;
        self.data.get(start..end)
    }

    /// Copies the view into a contiguous owned image.
    pub fn to_owned_image(&self) -> RgbImage {
        let row_len = self.width * CHANNELS;
        let mut data = Vec::with_capacity(row_len * self.height);
        for y in 0..self.height {
            let start = y * self.stride;
            data.extend_from_slice(&self.data[start..start + row_len]);
        }
        RgbImage {
            data,
            width: self.width,
            height: self.height,
        }
    }
}

/// Owned contiguous RGB8 image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl RgbImage {
    /// Creates an image from a packed buffer of exactly `3 * width * height` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> DetectResult<Self> {
        let stride = width
            .checked_mul(CHANNELS)
            .ok_or(DetectError::InvalidDimensions { width, height })?;
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(DetectError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(DetectError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an image filled with a single colour.
    pub fn filled(width: usize, height: usize, rgb: [u8; CHANNELS]) -> DetectResult<Self> {
        let pixels = width
            .checked_mul(height)
            .filter(|&n| n > 0)
            .ok_or(DetectError::InvalidDimensions { width, height })?;
        let mut data = Vec::with_capacity(pixels * CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&rgb);
        }
        Self::new(data, width, height)
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the packed pixel data.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> RgbView<'_> {
        RgbView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width * CHANNELS,
        }
    }

    /// Returns a uniformly rescaled copy.
    ///
    /// Returns `None` for a non-positive or non-finite scale. A scale of
    /// exactly 1 yields an unchanged copy.
    pub fn rescale(&self, scale: f64) -> Option<RgbImage> {
        if !scale.is_finite() || scale <= 0.0 {
            return None;
        }
        if scale == 1.0 {
            return Some(self.clone());
        }
        let width = scaled_dim(self.width, scale);
        let height = scaled_dim(self.height, scale);
        Some(resize::resize_bilinear(self.view(), width, height))
    }
}

pub(crate) fn scaled_dim(dim: usize, scale: f64) -> usize {
    ((dim as f64 * scale).round() as usize).max(1)
}

fn required_len(width: usize, height: usize, stride: usize) -> DetectResult<usize> {
    if width == 0 || height == 0 {
        return Err(DetectError::InvalidDimensions { width, height });
    }
    let row_len = width
        .checked_mul(CHANNELS)
        .ok_or(DetectError::InvalidDimensions { width, height })?;
    if stride < row_len {
        return Err(DetectError::InvalidStride { row_len, stride });
    }
    let needed = (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_len))
        .ok_or(DetectError::InvalidDimensions { width, height })?;
    Ok(needed)
}
