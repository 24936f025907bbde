//! Clamping input images to a maximum side length before scoring.

use crate::image::resize::resize_bilinear;
use crate::image::{scaled_dim, RgbImage, RgbView};

/// Image after bounding: either the untouched input or a shrunk copy.
#[derive(Debug)]
pub enum BoundedImage<'a> {
    /// The input already fits; no copy was made.
    Original(RgbView<'a>),
    /// The input was uniformly shrunk by `scale`.
    Resized { image: RgbImage, scale: f64 },
}

impl BoundedImage<'_> {
    /// Returns a view of the image the pipeline should score.
    pub fn view(&self) -> RgbView<'_> {
        match self {
            BoundedImage::Original(view) => *view,
            BoundedImage::Resized { image, .. } => image.view(),
        }
    }

    /// Returns the uniform factor applied to the input (1 when untouched).
    pub fn scale(&self) -> f64 {
        match self {
            BoundedImage::Original(_) => 1.0,
            BoundedImage::Resized { scale, .. } => *scale,
        }
    }
}

/// Computes `min(1, max_dim / width, max_dim / height)`.
pub fn bound_scale(width: usize, height: usize, max_dim: usize) -> f64 {
    let max_dim = max_dim.max(1) as f64;
    let mut sf = 1.0f64;
    if width as f64 > max_dim {
        sf = max_dim / width as f64;
    }
    if height as f64 > max_dim {
        sf = sf.min(max_dim / height as f64);
    }
    sf
}

/// Shrinks `image` so neither side exceeds `max_dim`.
///
/// Images that already fit are passed through borrowed. Otherwise both sides
/// are multiplied by the same factor, rounded, and clamped to `[1, max_dim]`.
pub fn bound_image(image: RgbView<'_>, max_dim: usize) -> BoundedImage<'_> {
    let scale = bound_scale(image.width(), image.height(), max_dim);
    if scale >= 1.0 {
        return BoundedImage::Original(image);
    }
    let max_dim = max_dim.max(1);
    let width = scaled_dim(image.width(), scale).min(max_dim);
    let height = scaled_dim(image.height(), scale).min(max_dim);
    BoundedImage::Resized {
        image: resize_bilinear(image, width, height),
        scale,
    }
}
