//! Bilinear resampling for packed RGB images.

use crate::image::{RgbImage, RgbView, CHANNELS};

/// Resizes `src` to `width x height` with bilinear interpolation.
///
/// Destination pixel centres map to source coordinates with
/// `src = (dst + 0.5) * (src_len / dst_len) - 0.5`, clamped to the valid
/// range, so both up- and downsampling keep the image centred. Each channel
/// is interpolated independently and rounded to the nearest integer.
pub(crate) fn resize_bilinear(src: RgbView<'_>, width: usize, height: usize) -> RgbImage {
    debug_assert!(width > 0 && height > 0);
    let src_w = src.width();
    let src_h = src.height();
    let sx = src_w as f32 / width as f32;
    let sy = src_h as f32 / height as f32;
    let max_x = (src_w - 1) as f32;
    let max_y = (src_h - 1) as f32;

    let columns: Vec<(usize, usize, f32)> = (0..width)
        .map(|x| {
            let fx = ((x as f32 + 0.5) * sx - 0.5).clamp(0.0, max_x);
            let x0 = fx.floor() as usize;
            let x1 = (x0 + 1).min(src_w - 1);
            (x0, x1, fx - x0 as f32)
        })
        .collect();

    let mut out = Vec::with_capacity(width * height * CHANNELS);
    for y in 0..height {
        let fy = ((y as f32 + 0.5) * sy - 0.5).clamp(0.0, max_y);
        let y0 = fy.floor() as usize;
        let y1 = (y0 + 1).min(src_h - 1);
        let wy = fy - y0 as f32;
        let row0 = src.row(y0).expect("row in bounds");
        let row1 = src.row(y1).expect("row in bounds");

        for &(x0, x1, wx) in &columns {
            for c in 0..CHANNELS {
                let a = row0[x0 * CHANNELS + c] as f32;
                let b = row0[x1 * CHANNELS + c] as f32;
                let d = row1[x0 * CHANNELS + c] as f32;
                let e = row1[x1 * CHANNELS + c] as f32;
                let top = a + (b - a) * wx;
                let bottom = d + (e - d) * wx;
                let value = top + (bottom - top) * wy;
                out.push(value.round().clamp(0.0, 255.0) as u8);
            }
        }
    }

    RgbImage::new(out, width, height).expect("resize output is contiguous")
}

#[cfg(test)]
mod tests {
    use super::resize_bilinear;
    use crate::image::RgbImage;

    #[test]
    fn constant_image_stays_constant() {
        let img = RgbImage::filled(7, 5, [10, 20, 30]).unwrap();
        let out = resize_bilinear(img.view(), 3, 11);
        assert_eq!(out.width(), 3);
        assert_eq!(out.height(), 11);
        assert!(out.data().chunks(3).all(|px| px == [10, 20, 30]));
    }

    #[test]
    fn identity_size_preserves_pixels() {
        let data: Vec<u8> = (0..4 * 3 * 3).map(|v| v as u8).collect();
        let img = RgbImage::new(data.clone(), 4, 3).unwrap();
        let out = resize_bilinear(img.view(), 4, 3);
        assert_eq!(out.data(), data.as_slice());
    }
}
