//! Preview rasterization: an outline filled black on white, as PNG bytes.
//!
//! Converts the outline's kurbo path to tiny-skia and encodes with the
//! `png` crate. Used by the demo binary and by hosts that want a quick
//! thumbnail of a traced glyph.

use kurbo::{Affine, BezPath, PathEl, Point, Size};

use crate::error::TraceError;
use crate::outline::Outline;
use crate::viewport::ViewportTransform;

/// Render `outline` into a `width` x `height` preview, fitted with
/// `margin` model units of padding. The empty outline renders blank.
pub fn render_preview(
    outline: &Outline,
    width: u32,
    height: u32,
    margin: f64,
) -> Result<Vec<u8>, TraceError> {
    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| TraceError::PreviewEncode("zero-size preview".into()))?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let bbox = outline.bounding_box();
    let fit = ViewportTransform::fit_to_view(
        bbox.size(),
        Size::new(f64::from(width), f64::from(height)),
        margin,
    );
    let transform = fit.to_affine() * Affine::translate(-bbox.origin().to_vec2());

    let mut paint = tiny_skia::Paint::default();
    paint.set_color(tiny_skia::Color::BLACK);
    paint.anti_alias = true;

    if let Some(sk_path) = to_skia_path(&outline.to_bez_path(), transform) {
        pixmap.fill_path(
            &sk_path,
            &paint,
            tiny_skia::FillRule::EvenOdd,
            tiny_skia::Transform::identity(),
            None,
        );
    }

    encode_png(&pixmap)
}

/// Convert a kurbo `BezPath` to a `tiny_skia::Path`, applying the
/// transform in f64 before narrowing to f32.
fn to_skia_path(path: &BezPath, transform: Affine) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    let tp = |p: Point| {
        let q = transform * p;
        (q.x as f32, q.y as f32)
    };
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                let (x, y) = tp(p);
                pb.move_to(x, y);
            }
            PathEl::LineTo(p) => {
                let (x, y) = tp(p);
                pb.line_to(x, y);
            }
            PathEl::QuadTo(c, p) => {
                let (cx, cy) = tp(c);
                let (px, py) = tp(p);
                pb.quad_to(cx, cy, px, py);
            }
            PathEl::CurveTo(c1, c2, p) => {
                let (c1x, c1y) = tp(c1);
                let (c2x, c2y) = tp(c2);
                let (px, py) = tp(p);
                pb.cubic_to(c1x, c1y, c2x, c2y, px, py);
            }
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Encode a pixmap to PNG bytes.
fn encode_png(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>, TraceError> {
    let mut buf = Vec::new();
    let mut encoder = png::Encoder::new(&mut buf, pixmap.width(), pixmap.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder
        .write_header()
        .map_err(|e| TraceError::PreviewEncode(e.to_string()))?;
    writer
        .write_image_data(pixmap.data())
        .map_err(|e| TraceError::PreviewEncode(e.to_string()))?;
    drop(writer);
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Outline {
        Outline::parse("M0 0L10 0L10 10L0 10Z").unwrap()
    }

    #[test]
    fn preview_has_requested_dimensions() {
        let bytes = render_preview(&square(), 50, 40, 2.0).unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!(img.width(), 50);
        assert_eq!(img.height(), 40);
    }

    #[test]
    fn filled_glyph_darkens_the_center() {
        let bytes = render_preview(&square(), 50, 50, 5.0).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().into_rgba8();
        let px = img.get_pixel(25, 25);
        assert!(px.0[0] < 128 && px.0[1] < 128 && px.0[2] < 128);
        // Corners stay background.
        let corner = img.get_pixel(1, 1);
        assert!(corner.0[0] > 128);
    }

    #[test]
    fn empty_outline_renders_blank() {
        let bytes = render_preview(&Outline::new(), 20, 20, 0.0).unwrap();
        let img = image::load_from_memory(&bytes).unwrap().into_rgba8();
        assert!(img.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn zero_size_preview_is_an_error() {
        assert!(render_preview(&square(), 0, 10, 0.0).is_err());
    }
}
