//! Loading and saving images via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{RgbImage, RgbView};
use crate::util::{DetectError, DetectResult};
use std::path::Path;

/// Creates a borrowed view from an `image` RGB buffer.
pub fn view_from_rgb_image(img: &::image::RgbImage) -> DetectResult<RgbView<'_>> {
    RgbView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Converts any decoded image into an owned RGB8 image.
pub fn owned_from_dynamic_image(img: &::image::DynamicImage) -> DetectResult<RgbImage> {
    let rgb = img.to_rgb8();
    let width = rgb.width() as usize;
    let height = rgb.height() as usize;
    RgbImage::new(rgb.into_raw(), width, height)
}

/// Loads an image from disk and converts it to RGB8.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> DetectResult<RgbImage> {
    let img = ::image::open(path).map_err(|err| DetectError::ImageIo {
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}

/// Writes an RGB8 image to disk; the format follows the file extension.
pub fn save_rgb_image<P: AsRef<Path>>(img: &RgbImage, path: P) -> DetectResult<()> {
    let buffer =
        ::image::RgbImage::from_raw(img.width() as u32, img.height() as u32, img.data().to_vec())
            .ok_or(DetectError::InvalidDimensions {
                width: img.width(),
                height: img.height(),
            })?;
    buffer.save(path).map_err(|err| DetectError::ImageIo {
        reason: err.to_string(),
    })
}
