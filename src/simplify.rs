//! Polyline simplification passes.
//!
//! Three independent passes, each used at a different stage:
//! 1. Exact collinear removal on the freshly traced integer ring
//! 2. Decimation (every other point) for the editor's simplify action
//! 3. Corner-rounding smoothing for the editor's smooth action

use kurbo::Point;

/// Sequences this short are left alone by decimation.
const DECIMATE_MIN: usize = 6;

/// Drop interior ring points that sit on a straight line through their
/// neighbors. The first and last elements are kept as anchors, so a
/// closed ring (first == last) stays closed.
///
/// The test is an exact integer cross product, so only perfectly straight
/// pixel runs collapse. Nothing moves.
pub fn remove_collinear(ring: &[(i32, i32)]) -> Vec<(i32, i32)> {
    if ring.len() <= 2 {
        return ring.to_vec();
    }
    let mut kept = vec![ring[0]];
    for i in 1..ring.len() - 1 {
        let a = kept[kept.len() - 1];
        let b = ring[i];
        let c = ring[i + 1];
        if cross(a, b, c) != 0 {
            kept.push(b);
        }
    }
    kept.push(ring[ring.len() - 1]);
    kept
}

/// Cross product of the edges a→b and b→c, exact in i64.
pub(crate) fn cross(a: (i32, i32), b: (i32, i32), c: (i32, i32)) -> i64 {
    let ab_x = (b.0 - a.0) as i64;
    let ab_y = (b.1 - a.1) as i64;
    let bc_x = (c.0 - b.0) as i64;
    let bc_y = (c.1 - b.1) as i64;
    ab_x * bc_y - ab_y * bc_x
}

/// Halve the point count by keeping even indices. Short sequences pass
/// through unchanged so a coarse outline cannot degrade further.
pub fn decimate(points: &[Point]) -> Vec<Point> {
    if points.len() <= DECIMATE_MIN {
        return points.to_vec();
    }
    points.iter().copied().step_by(2).collect()
}

/// Round corners by cutting each edge of the closed polyline at 1/4 and
/// 3/4, doubling the point count. Needs at least 3 points; anything
/// shorter passes through unchanged.
pub fn smooth(points: &[Point]) -> Vec<Point> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity(n * 2);
    for i in 0..n {
        let curr = points[i];
        let next = points[(i + 1) % n];
        out.push(curr.lerp(next, 0.25));
        out.push(curr.lerp(next, 0.75));
    }
    out
}
