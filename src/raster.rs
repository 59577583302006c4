//! Raster sampling: a borrowed view over decoded RGBA pixels, the
//! luma-based foreground test, and selection-to-pixel-region clamping.
//!
//! The crate never decodes image files itself. Callers hand it a decoded
//! buffer (the demo binary uses the `image` crate for that) and a selection
//! rectangle in display coordinates.

use image::{GrayImage, RgbaImage};
use imageproc::contrast::otsu_level;
use kurbo::{Rect, Vec2};
use log::debug;

use crate::config::ThresholdMethod;
use crate::error::TraceError;

/// Borrowed, immutable view of row-major RGBA8 pixel data.
#[derive(Debug, Clone, Copy)]
pub struct RasterBuffer<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> RasterBuffer<'a> {
    /// Wrap a raw RGBA8 buffer. The length must be exactly
    /// `width * height * 4` bytes.
    pub fn new(data: &'a [u8], width: u32, height: u32) -> Result<Self, TraceError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(TraceError::BufferSize {
                len: data.len(),
                expected,
                width,
                height,
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// View over an already-decoded `image` buffer.
    pub fn from_image(img: &'a RgbaImage) -> Self {
        Self {
            data: img.as_raw(),
            width: img.width(),
            height: img.height(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Perceptual luma of the pixel at (x, y), or `None` out of bounds.
    /// Weights favor green, as the eye does; alpha is ignored.
    pub fn luma(&self, x: i64, y: i64) -> Option<f64> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let r = self.data[idx] as f64;
        let g = self.data[idx + 1] as f64;
        let b = self.data[idx + 2] as f64;
        Some(0.34 * r + 0.50 * g + 0.16 * b)
    }

    /// Whether the pixel at (x, y) counts as glyph foreground under the
    /// given threshold. Out-of-bounds pixels are background.
    pub fn is_foreground(&self, x: i64, y: i64, threshold: u8) -> bool {
        match self.luma(x, y) {
            Some(l) => l < f64::from(threshold),
            None => false,
        }
    }

    /// Copy the luma values of a pixel region into a grayscale image,
    /// for histogramming and binarization.
    pub fn luma_region(&self, region: PixelRect) -> GrayImage {
        let mut out = GrayImage::new(region.width, region.height);
        for ry in 0..region.height {
            for rx in 0..region.width {
                let l = self
                    .luma((region.x + rx) as i64, (region.y + ry) as i64)
                    .unwrap_or(255.0);
                // Truncate: for an integer threshold t, floor(l) < t
                // exactly when l < t, so binarizing the crop agrees
                // with `is_foreground` on every pixel.
                out.put_pixel(rx, ry, image::Luma([l.floor().min(255.0) as u8]));
            }
        }
        out
    }
}

/// An integer pixel region inside a raster buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Convert a display-space selection into a pixel region, clamped to
    /// the buffer. `display_to_pixel` carries the per-axis scale between
    /// the on-screen image size and its natural pixel size.
    ///
    /// Returns `None` when the clamped region is empty (selection entirely
    /// outside the image, or zero-area).
    pub fn from_selection(
        selection: Rect,
        display_to_pixel: Vec2,
        buffer_width: u32,
        buffer_height: u32,
    ) -> Option<Self> {
        let sel = selection.abs();
        let x0 = (sel.x0 * display_to_pixel.x).floor().max(0.0);
        let y0 = (sel.y0 * display_to_pixel.y).floor().max(0.0);
        let x1 = (sel.x1 * display_to_pixel.x).ceil().min(buffer_width as f64);
        let y1 = (sel.y1 * display_to_pixel.y).ceil().min(buffer_height as f64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }
}

/// Resolve a threshold method against the region's luma histogram.
///
/// The returned value is an exclusive cutoff: foreground is `luma < t`.
pub fn resolve_threshold(region: &GrayImage, method: ThresholdMethod) -> u8 {
    match method {
        ThresholdMethod::Fixed(t) => t,
        ThresholdMethod::Otsu => {
            // Otsu's level is inclusive on the dark side, so shift by
            // one for the exclusive test.
            let t = otsu_level(region).saturating_add(1);
            debug!("otsu threshold = {t}");
            t
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_THRESHOLD;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            data.extend_from_slice(&rgba);
        }
        data
    }

    #[test]
    fn buffer_length_is_validated() {
        let data = vec![0u8; 12];
        assert!(RasterBuffer::new(&data, 2, 2).is_err());
        assert!(RasterBuffer::new(&data, 1, 3).is_ok());
    }

    #[test]
    fn luma_weights_sum_to_pixel_brightness() {
        let data = solid(1, 1, [100, 100, 100, 255]);
        let buf = RasterBuffer::new(&data, 1, 1).unwrap();
        // 0.34 + 0.50 + 0.16 = 1.0, so gray maps to itself.
        assert!((buf.luma(0, 0).unwrap() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn out_of_bounds_is_background() {
        let data = solid(2, 2, [0, 0, 0, 255]);
        let buf = RasterBuffer::new(&data, 2, 2).unwrap();
        assert!(buf.is_foreground(0, 0, DEFAULT_THRESHOLD));
        assert!(!buf.is_foreground(-1, 0, DEFAULT_THRESHOLD));
        assert!(!buf.is_foreground(0, -1, DEFAULT_THRESHOLD));
        assert!(!buf.is_foreground(2, 0, DEFAULT_THRESHOLD));
        assert!(!buf.is_foreground(0, 2, DEFAULT_THRESHOLD));
    }

    #[test]
    fn alpha_is_ignored() {
        let data = solid(1, 1, [0, 0, 0, 0]);
        let buf = RasterBuffer::new(&data, 1, 1).unwrap();
        assert!(buf.is_foreground(0, 0, DEFAULT_THRESHOLD));
    }

    #[test]
    fn region_crop_agrees_with_sampler_near_threshold() {
        // Luma 0.34*129 + 0.50*127 + 0.16*128 = 127.84: foreground at
        // the default cutoff, and the crop must not round it up to 128.
        let data = solid(1, 1, [129, 127, 128, 255]);
        let buf = RasterBuffer::new(&data, 1, 1).unwrap();
        assert!(buf.is_foreground(0, 0, DEFAULT_THRESHOLD));
        let crop = buf.luma_region(PixelRect {
            x: 0,
            y: 0,
            width: 1,
            height: 1,
        });
        assert_eq!(crop.get_pixel(0, 0).0[0], 127);
    }

    #[test]
    fn selection_clamps_to_buffer() {
        let region = PixelRect::from_selection(
            Rect::new(-10.0, -10.0, 50.0, 50.0),
            Vec2::new(1.0, 1.0),
            20,
            30,
        )
        .unwrap();
        assert_eq!(
            region,
            PixelRect {
                x: 0,
                y: 0,
                width: 20,
                height: 30
            }
        );
    }

    #[test]
    fn selection_outside_buffer_is_empty() {
        let region = PixelRect::from_selection(
            Rect::new(100.0, 100.0, 200.0, 200.0),
            Vec2::new(1.0, 1.0),
            20,
            30,
        );
        assert!(region.is_none());
    }

    #[test]
    fn display_scale_applies_per_axis() {
        // Display shows the image at half size: 2 px per display px.
        let region = PixelRect::from_selection(
            Rect::new(5.0, 5.0, 10.0, 10.0),
            Vec2::new(2.0, 2.0),
            100,
            100,
        )
        .unwrap();
        assert_eq!(
            region,
            PixelRect {
                x: 10,
                y: 10,
                width: 10,
                height: 10
            }
        );
    }

    #[test]
    fn fixed_threshold_passes_through() {
        let img = GrayImage::new(4, 4);
        assert_eq!(resolve_threshold(&img, ThresholdMethod::Fixed(77)), 77);
    }

    #[test]
    fn otsu_separates_bimodal_region() {
        let mut img = GrayImage::new(4, 4);
        for y in 0..4 {
            for x in 0..4 {
                let v = if x < 2 { 10 } else { 240 };
                img.put_pixel(x, y, image::Luma([v]));
            }
        }
        let t = resolve_threshold(&img, ThresholdMethod::Otsu);
        assert!(t > 10 && t <= 240);
    }
}
