//! Viewport transform between model space (glyph pixels) and screen
//! space: `screen = model * scale + translate`.
//!
//! Pure view state. It is never persisted; a fresh transform is fitted
//! whenever a glyph is loaded into an editing session.

use kurbo::{Affine, Point, Size, Vec2};

/// Hard zoom-out limit.
pub const MIN_SCALE: f64 = 0.1;
/// Hard zoom-in limit.
pub const MAX_SCALE: f64 = 10.0;
/// Fitted content is never magnified beyond this, so small glyphs do not
/// blow up into a wall of pixels on load.
pub const MAX_FIT_SCALE: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub translate: Vec2,
    pub scale: f64,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self {
            translate: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

impl ViewportTransform {
    /// Scale-and-center for content of the given size, leaving `margin`
    /// model units of breathing room on every side. The chosen scale is
    /// capped at [`MAX_FIT_SCALE`] and kept inside the zoom limits.
    pub fn fit_to_view(content: Size, viewport: Size, margin: f64) -> Self {
        let padded_w = content.width + 2.0 * margin;
        let padded_h = content.height + 2.0 * margin;
        let mut scale = MAX_FIT_SCALE;
        if padded_w > 0.0 {
            scale = scale.min(viewport.width / padded_w);
        }
        if padded_h > 0.0 {
            scale = scale.min(viewport.height / padded_h);
        }
        let scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        let translate = Vec2::new(
            (viewport.width - content.width * scale) / 2.0,
            (viewport.height - content.height * scale) / 2.0,
        );
        Self { translate, scale }
    }

    /// Zoom by `factor`, keeping the model point under `screen` fixed on
    /// screen. The translate correction uses the clamped scale, so the
    /// anchor holds even when the zoom saturates.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        let new_scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        let ratio = new_scale / self.scale;
        self.translate = screen.to_vec2() - (screen.to_vec2() - self.translate) * ratio;
        self.scale = new_scale;
    }

    /// Translate the view by a screen-space delta.
    pub fn pan(&mut self, delta: Vec2) {
        self.translate += delta;
    }

    pub fn to_screen(&self, model: Point) -> Point {
        (model.to_vec2() * self.scale + self.translate).to_point()
    }

    pub fn to_model(&self, screen: Point) -> Point {
        ((screen.to_vec2() - self.translate) / self.scale).to_point()
    }

    /// The same mapping as an affine, for handing to a rasterizer.
    pub fn to_affine(&self) -> Affine {
        Affine::new([
            self.scale,
            0.0,
            0.0,
            self.scale,
            self.translate.x,
            self.translate.y,
        ])
    }
}
