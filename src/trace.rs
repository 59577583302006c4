//! Moore-neighbor boundary tracing over a binarized selection.
//!
//! The walk visits boundary pixels of the first connected foreground
//! component, clockwise in screen orientation (y grows downward). Exactly
//! one component is traced per invocation; holes and further components
//! are out of scope by contract.

use image::GrayImage;
use log::debug;

use crate::error::TraceError;

/// 8-connected neighborhood, clockwise, starting east.
const DIRS: [(i32, i32); 8] = [
    (1, 0),   // 0: E
    (1, 1),   // 1: SE
    (0, 1),   // 2: S
    (-1, 1),  // 3: SW
    (-1, 0),  // 4: W
    (-1, -1), // 5: NW
    (0, -1),  // 6: N
    (1, -1),  // 7: NE
];

/// Backtrack index relative to the new pixel after moving in direction `d`.
///
/// The last background neighbor checked sits at `(d + 7) % 8` of the old
/// pixel; re-based to the new pixel that offset is always axis-aligned.
const NEXT_BACKTRACK: [usize; 8] = [6, 6, 0, 0, 2, 2, 4, 4];

/// Flat boolean bitmap of a selection crop. Screen orientation: row 0 is
/// the top, y grows downward.
pub struct Bitmap {
    data: Vec<bool>,
    width: i32,
    height: i32,
}

impl Bitmap {
    /// Binarize a luma crop: foreground where `luma < threshold`,
    /// flipped when `invert` is set.
    pub fn binarize(region: &GrayImage, threshold: u8, invert: bool) -> Self {
        let (w, h) = region.dimensions();
        let mut data = vec![false; w as usize * h as usize];
        for (i, px) in region.pixels().enumerate() {
            data[i] = (px.0[0] < threshold) != invert;
        }
        Bitmap {
            data,
            width: w as i32,
            height: h as i32,
        }
    }

    /// Pixel at (x, y). Out-of-bounds is background.
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return false;
        }
        self.data[(y * self.width + x) as usize]
    }

    /// First foreground pixel in raster order (top-to-bottom rows,
    /// left-to-right within a row).
    pub fn first_foreground(&self) -> Option<(i32, i32)> {
        for y in 0..self.height {
            for x in 0..self.width {
                if self.data[(y * self.width + x) as usize] {
                    return Some((x, y));
                }
            }
        }
        None
    }

    #[cfg(test)]
    fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.len()) as i32;
        let mut data = Vec::with_capacity((width * height) as usize);
        for row in rows {
            for ch in row.chars() {
                data.push(ch == '#');
            }
        }
        Bitmap {
            data,
            width,
            height,
        }
    }
}

/// Trace the boundary of the first foreground component.
///
/// Returns the closed ring of boundary pixels in clockwise order, with the
/// start pixel repeated as the final element. An empty bitmap yields an
/// empty ring; a lone pixel yields a two-element ring.
pub fn trace_boundary(bitmap: &Bitmap) -> Result<Vec<(i32, i32)>, TraceError> {
    let max_steps = bitmap.width as usize * bitmap.height as usize * 2;
    walk(bitmap, max_steps)
}

fn walk(bitmap: &Bitmap, max_steps: usize) -> Result<Vec<(i32, i32)>, TraceError> {
    let Some(start) = bitmap.first_foreground() else {
        return Ok(Vec::new());
    };

    let mut ring = vec![start];
    let mut p = start;
    // Raster order guarantees the pixel west of the start is background.
    let mut b_idx = 4usize;
    let mut steps = 0usize;

    loop {
        // Clockwise sweep of p's neighborhood, starting just past the
        // backtrack. The first foreground neighbor is the next boundary
        // pixel; everything checked before it stays background, which
        // keeps the backtrack invariant alive.
        let mut found = None;
        for i in 1..=8 {
            let d = (b_idx + i) % 8;
            let (dx, dy) = DIRS[d];
            if bitmap.get(p.0 + dx, p.1 + dy) {
                found = Some(d);
                break;
            }
        }

        let Some(d) = found else {
            // Lone pixel. Close the ring on itself.
            ring.push(start);
            return Ok(ring);
        };

        let (dx, dy) = DIRS[d];
        p = (p.0 + dx, p.1 + dy);
        b_idx = NEXT_BACKTRACK[d];

        if p == start {
            ring.push(start);
            debug!("boundary closed after {} steps, {} pixels", steps, ring.len() - 1);
            return Ok(ring);
        }
        ring.push(p);

        steps += 1;
        if steps >= max_steps {
            return Err(TraceError::TraceDiverged { steps: max_steps });
        }
    }
}
