use glam::DVec2;

use crate::primitives::orientation;

/// Splits `candidates` by which side of the directed line `a -> b` each
/// point lies on, returning the indices strictly to the left and strictly
/// to the right.
///
/// Candidates exactly on the line are excluded from both sides: a point on
/// a supporting line can never be strictly outside it, so it can never
/// become a hull vertex unless it coincides with `a` or `b`.
///
/// The relative order of `candidates` is preserved in both outputs, which
/// keeps lowest-index tie-breaking stable further down the pipeline.
pub(crate) fn partition_by_side(
    a: DVec2,
    b: DVec2,
    candidates: &[usize],
    points: &[DVec2],
) -> (Vec<usize>, Vec<usize>) {
    let mut left = Vec::new();
    let mut right = Vec::new();

    for &index in candidates {
        let side = orientation(a, b, points[index]);

        if side > 0.0 {
            left.push(index);
        } else if side < 0.0 {
            right.push(index);
        }
    }

    (left, right)
}
