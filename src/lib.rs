//! glyphtrace: scanned-glyph region → editable vector outline.
//!
//! Takes a decoded raster buffer and a selection rectangle, finds the
//! dark pixels, traces their boundary, and hands back a glyph record
//! whose outline can be refined point by point in an [`editor::EditSession`].
//!
//! # Example
//!
//! ```
//! use glyphtrace::{extract, RasterBuffer, TraceConfig};
//! use glyphtrace::kurbo::{Rect, Vec2};
//!
//! // 8x8 white canvas with a 4x4 black square at (2,2).
//! let mut data = vec![255u8; 8 * 8 * 4];
//! for y in 2..6 {
//!     for x in 2..6 {
//!         let i = (y * 8 + x) * 4;
//!         data[i] = 0;
//!         data[i + 1] = 0;
//!         data[i + 2] = 0;
//!     }
//! }
//! let buffer = RasterBuffer::new(&data, 8, 8)?;
//! let glyph = extract(
//!     &buffer,
//!     Rect::new(0.0, 0.0, 8.0, 8.0),
//!     Vec2::new(1.0, 1.0),
//!     &TraceConfig::default(),
//! )?
//! .expect("square traced");
//! assert_eq!(glyph.path_description, "M2 2L5 2L5 5L2 5Z");
//! # Ok::<(), glyphtrace::TraceError>(())
//! ```

#![forbid(unsafe_code)]

mod config;
mod glyph;
mod history;
mod outline;
mod raster;
mod simplify;
mod trace;
mod viewport;

pub mod editor;
pub mod error;
pub mod render;

// Re-export kurbo so downstream users get the same version used by the
// geometry in this crate's API.
pub use kurbo;

pub use config::{ThresholdMethod, TraceConfig, DEFAULT_THRESHOLD};
pub use error::TraceError;
pub use glyph::VectorGlyph;
pub use history::{EditHistory, HISTORY_DEPTH};
pub use outline::{Outline, MIN_POINTS};
pub use raster::{PixelRect, RasterBuffer};
pub use viewport::{ViewportTransform, MAX_FIT_SCALE, MAX_SCALE, MIN_SCALE};

use kurbo::{Rect, Vec2};
use log::debug;

/// Full pipeline: selection over a raster buffer → traced glyph record.
///
/// `selection` is in display coordinates; `display_to_pixel` carries the
/// per-axis scale from display space to the buffer's natural pixels.
///
/// Returns `Ok(None)` when there is nothing to vectorize: the selection
/// clamps to an empty region, contains no foreground, or its trace
/// collapses below three corners. Undersized selections and a diverging
/// boundary walk are reported as errors instead.
pub fn extract(
    buffer: &RasterBuffer<'_>,
    selection: Rect,
    display_to_pixel: Vec2,
    config: &TraceConfig,
) -> Result<Option<VectorGlyph>, TraceError> {
    let sel = selection.abs();
    if sel.width() < config.min_selection || sel.height() < config.min_selection {
        return Err(TraceError::SelectionTooSmall {
            width: sel.width(),
            height: sel.height(),
            min: config.min_selection,
        });
    }

    let Some(region) =
        PixelRect::from_selection(sel, display_to_pixel, buffer.width(), buffer.height())
    else {
        debug!("selection clamps to an empty region");
        return Ok(None);
    };

    let luma = buffer.luma_region(region);
    let threshold = raster::resolve_threshold(&luma, config.threshold);
    debug!(
        "region {}x{} at ({},{}), threshold {}",
        region.width, region.height, region.x, region.y, threshold
    );

    let bitmap = trace::Bitmap::binarize(&luma, threshold, config.invert);
    let ring = trace::trace_boundary(&bitmap)?;
    if ring.is_empty() {
        debug!("no foreground in selection");
        return Ok(None);
    }

    let corners = simplify::remove_collinear(&ring);
    let Some(outline) = Outline::from_ring(&corners) else {
        debug!("trace collapsed below {MIN_POINTS} corners");
        return Ok(None);
    };

    let glyph = VectorGlyph::build(outline.to_path_description(), region.width, region.height);
    debug!(
        "traced {} boundary pixels into {} corners ({})",
        ring.len() - 1,
        outline.len(),
        glyph.id
    );
    Ok(Some(glyph))
}
