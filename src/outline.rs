//! The editable outline model: an ordered, implicitly closed point
//! sequence, its path-description text form, and structural edits.
//!
//! The text form is the only shape that leaves the crate:
//! `M0 0L10 0L10 10L0 10Z`. One move, straight lines, explicit close.
//! Parsing accepts exactly that grammar and reports anything else.

use std::fmt::Write;

use kurbo::{BezPath, Point, Rect};

use crate::error::TraceError;
use crate::simplify;

/// A non-empty outline carries at least this many points.
pub const MIN_POINTS: usize = 3;

/// Ordered point sequence, implicitly closed (the last point connects
/// back to the first). Either empty or at least [`MIN_POINTS`] long;
/// every mutation preserves that.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Outline {
    points: Vec<Point>,
}

impl Outline {
    /// The empty outline. Valid but unrenderable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from an explicit point list.
    pub fn from_points(points: Vec<Point>) -> Result<Self, TraceError> {
        if !points.is_empty() && points.len() < MIN_POINTS {
            return Err(TraceError::TooFewPoints {
                count: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Build from a traced pixel ring (closing duplicate included).
    ///
    /// Drops the duplicate, then re-checks the seam: the raster scan may
    /// have started mid-edge, and that split point is kept as an anchor
    /// by the collinear pass even when it is not a corner. Returns `None`
    /// when fewer than [`MIN_POINTS`] corners remain.
    pub(crate) fn from_ring(ring: &[(i32, i32)]) -> Option<Self> {
        let mut pts: Vec<(i32, i32)> = ring.to_vec();
        if pts.len() >= 2 && pts.first() == pts.last() {
            pts.pop();
        }
        if pts.len() >= MIN_POINTS {
            let last = pts[pts.len() - 1];
            if simplify::cross(last, pts[0], pts[1]) == 0 {
                pts.remove(0);
            }
        }
        if pts.len() < MIN_POINTS {
            return None;
        }
        let points = pts
            .into_iter()
            .map(|(x, y)| Point::new(f64::from(x), f64::from(y)))
            .collect();
        Some(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis-aligned bounds of the points. Zero rect when empty.
    pub fn bounding_box(&self) -> Rect {
        let Some(first) = self.points.first() else {
            return Rect::ZERO;
        };
        let mut bbox = Rect::new(first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            bbox.x0 = bbox.x0.min(p.x);
            bbox.y0 = bbox.y0.min(p.y);
            bbox.x1 = bbox.x1.max(p.x);
            bbox.y1 = bbox.y1.max(p.y);
        }
        bbox
    }

    /// Closed line-segment path for rendering.
    pub fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some(&first) = self.points.first() {
            path.move_to(first);
            for &p in &self.points[1..] {
                path.line_to(p);
            }
            path.close_path();
        }
        path
    }

    // ── Text form ────────────────────────────────────────────

    /// Serialize to the canonical path description. The empty outline
    /// serializes to the empty string.
    ///
    /// `f64` display formatting round-trips exactly, so
    /// `parse(o.to_path_description())` reproduces `o`.
    pub fn to_path_description(&self) -> String {
        let mut out = String::new();
        let Some(first) = self.points.first() else {
            return out;
        };
        let _ = write!(out, "M{} {}", first.x, first.y);
        for p in &self.points[1..] {
            let _ = write!(out, "L{} {}", p.x, p.y);
        }
        out.push('Z');
        out
    }

    /// Parse a path description: `M x y`, then `L x y` repeated, then an
    /// optional `Z`. Separators are whitespace and/or commas. Anything
    /// else is an error; nothing is skipped silently.
    pub fn parse(desc: &str) -> Result<Self, TraceError> {
        let mut scan = Scanner::new(desc);
        let mut points: Vec<Point> = Vec::new();
        let mut seen_move = false;
        let mut closed = false;

        while let Some(c) = scan.next_command() {
            if closed {
                return Err(TraceError::UnsupportedPathCommand(c));
            }
            match c {
                'M' => {
                    if seen_move {
                        return Err(TraceError::DuplicateMove);
                    }
                    seen_move = true;
                    points.push(scan.pair()?);
                }
                'L' => {
                    if !seen_move {
                        return Err(TraceError::PathMustStartWithMove);
                    }
                    points.push(scan.pair()?);
                }
                'Z' => {
                    if !seen_move {
                        return Err(TraceError::PathMustStartWithMove);
                    }
                    closed = true;
                }
                other => return Err(TraceError::UnsupportedPathCommand(other)),
            }
        }

        Self::from_points(points)
    }

    // ── Edits ────────────────────────────────────────────────

    /// Move one point to a new position.
    pub fn move_point(&mut self, index: usize, pos: Point) -> Result<(), TraceError> {
        let len = self.points.len();
        let Some(p) = self.points.get_mut(index) else {
            return Err(TraceError::PointIndexOutOfBounds { index, len });
        };
        *p = pos;
        Ok(())
    }

    /// Remove one point. Refused when that would leave a degenerate
    /// outline of 1 or 2 points; the model is unchanged on refusal.
    pub fn delete_point(&mut self, index: usize) -> Result<(), TraceError> {
        let len = self.points.len();
        if index >= len {
            return Err(TraceError::PointIndexOutOfBounds { index, len });
        }
        if len <= MIN_POINTS {
            return Err(TraceError::TooFewPoints { count: len - 1 });
        }
        self.points.remove(index);
        Ok(())
    }

    /// Swap in a whole new point sequence, holding the length invariant.
    pub fn replace_points(&mut self, points: Vec<Point>) -> Result<(), TraceError> {
        if !points.is_empty() && points.len() < MIN_POINTS {
            return Err(TraceError::TooFewPoints {
                count: points.len(),
            });
        }
        self.points = points;
        Ok(())
    }
}

// ── Scanner ──────────────────────────────────────────────

/// Character-level scanner for path descriptions.
struct Scanner<'a> {
    rest: &'a str,
}

impl<'a> Scanner<'a> {
    fn new(desc: &'a str) -> Self {
        Self { rest: desc }
    }

    fn skip_separators(&mut self) {
        self.rest = self
            .rest
            .trim_start_matches(|c: char| c.is_whitespace() || c == ',');
    }

    /// Next command character, or `None` at end of input.
    fn next_command(&mut self) -> Option<char> {
        self.skip_separators();
        let c = self.rest.chars().next()?;
        self.rest = &self.rest[c.len_utf8()..];
        Some(c)
    }

    /// Read one coordinate pair.
    fn pair(&mut self) -> Result<Point, TraceError> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Point::new(x, y))
    }

    /// Read one number token and parse it as `f64`.
    fn number(&mut self) -> Result<f64, TraceError> {
        self.skip_separators();
        let token_len = number_token_len(self.rest);
        if token_len == 0 {
            return match self.rest.chars().next() {
                // Something is there, just not a number.
                Some(c) => Err(TraceError::InvalidCoordinate(c.to_string())),
                None => Err(TraceError::UnexpectedEnd),
            };
        }
        let (token, rest) = self.rest.split_at(token_len);
        self.rest = rest;
        token
            .parse()
            .map_err(|_| TraceError::InvalidCoordinate(token.to_string()))
    }
}

/// Length in bytes of the leading number token: optional sign, digits and
/// dots, optional exponent. Zero when the input does not start a number.
fn number_token_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        i += 1;
    }
    let digits_start = i;
    while matches!(bytes.get(i), Some(b'0'..=b'9') | Some(b'.')) {
        i += 1;
    }
    if i == digits_start {
        return 0;
    }
    if matches!(bytes.get(i), Some(b'e') | Some(b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'-') | Some(b'+')) {
            j += 1;
        }
        let exp_start = j;
        while matches!(bytes.get(j), Some(b'0'..=b'9')) {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}
