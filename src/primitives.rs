use glam::DVec2;
use thiserror::Error;

/// An error returned by [`perpendicular_distance`] when the segment
/// endpoints coincide, leaving no line to measure against.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("degenerate segment: the endpoints coincide")]
pub struct DegenerateSegment;

/// Gives the orientation of the triangle formed by `a`, `b`, `c`,
/// computed with an exact predicate.
///
/// The magnitude is twice the signed triangle area:
/// `(b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)`.
///
/// - `orientation > 0`: `c` is left of the directed line `a -> b` (counterclockwise)
/// - `orientation < 0`: `c` is right of the directed line `a -> b` (clockwise)
/// - `orientation == 0`: collinear
#[inline]
pub fn orientation(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    use robust::Coord;
    robust::orient2d(
        Coord { x: a.x, y: a.y },
        Coord { x: b.x, y: b.y },
        Coord { x: c.x, y: c.y },
    )
}

/// Computes the perpendicular distance from `p` to the line through `a` and `b`.
///
/// # Errors
///
/// Returns a [`DegenerateSegment`] error if `a` and `b` coincide.
/// Callers that already know the segment has nonzero length can guard
/// before invoking instead of handling the error.
#[inline]
pub fn perpendicular_distance(a: DVec2, b: DVec2, p: DVec2) -> Result<f64, DegenerateSegment> {
    let ab = b - a;
    let length = ab.length();

    if length == 0.0 {
        return Err(DegenerateSegment);
    }

    Ok(ab.perp_dot(p - a).abs() / length)
}
