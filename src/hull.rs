use std::sync::atomic::{AtomicBool, Ordering};

use glam::DVec2;
use thiserror::Error;

use crate::assembler::BoundaryAssembler;
use crate::partition::partition_by_side;

/// An error returned during [`ConvexHull2d`] construction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConvexHullError {
    /// A point in the input has a non-finite (NaN or infinite) coordinate.
    /// The whole input is rejected.
    #[error("point at index {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// The position of the first offending point in the input slice.
        index: usize,
    },
    /// The cancellation flag was observed between refinement steps.
    /// No partial hull is returned.
    #[error("hull construction was cancelled")]
    Cancelled,
}

/// A vertex-acceptance event, emitted once per hull vertex in acceptance order.
///
/// `preceding` and `following` are the already-accepted neighbors the vertex
/// was inserted between, in boundary traversal order. Replaying the events of
/// a construction (inserting each vertex directly after its preceding
/// neighbor, starting from an empty sequence) reconstructs the final boundary
/// exactly, which is what a stepwise-playback consumer needs without
/// re-running the algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexAccepted {
    /// The newly accepted hull vertex.
    pub vertex: DVec2,
    /// The accepted neighbor immediately before the vertex at insertion time.
    pub preceding: DVec2,
    /// The accepted neighbor immediately after the vertex at insertion time.
    pub following: DVec2,
}

/// A 2D [convex hull] representing the smallest convex set containing
/// all input points in a given point set, computed with the quickhull
/// algorithm.
///
/// [convex hull]: https://en.wikipedia.org/wiki/Convex_hull
///
/// # Example
///
/// ```
/// use glam::DVec2;
/// use quickhull2d::ConvexHull2d;
///
/// let points = vec![
///     DVec2::new(0.0, 0.0),
///     DVec2::new(1.0, 0.0),
///     DVec2::new(0.0, 1.0),
///     DVec2::new(1.0, 1.0),
///     DVec2::new(0.5, 0.5),
/// ];
///
/// let hull = ConvexHull2d::try_from_points(&points).unwrap();
///
/// // The boundary is returned in counterclockwise order,
/// // starting at the leftmost vertex. The interior point is gone.
/// assert_eq!(
///     hull.points(),
///     &[
///         DVec2::new(0.0, 0.0),
///         DVec2::new(1.0, 0.0),
///         DVec2::new(1.0, 1.0),
///         DVec2::new(0.0, 1.0),
///     ],
/// );
/// ```
///
/// # Degenerate inputs
///
/// - Fewer than 3 points: the input is returned unchanged, in input order.
/// - All points coincident: the single distinct point.
/// - All points collinear: the two extreme points.
#[derive(Clone, Debug)]
pub struct ConvexHull2d {
    /// The vertices of the convex hull in counterclockwise order.
    points: Vec<DVec2>,
    /// The vertex-acceptance events in acceptance order.
    log: Vec<VertexAccepted>,
}

impl ConvexHull2d {
    /// Attempts to compute a [`ConvexHull2d`] for the given set of points.
    ///
    /// The input is never mutated; the result owns its vertices. Equivalent
    /// to [`HullBuilder::new().build(points)`](HullBuilder::build).
    ///
    /// # Errors
    ///
    /// Returns a [`ConvexHullError`] if any input coordinate is non-finite.
    #[inline]
    pub fn try_from_points(points: &[DVec2]) -> Result<Self, ConvexHullError> {
        HullBuilder::new().build(points)
    }

    /// Returns the vertices of the convex hull in counterclockwise order.
    ///
    /// This consumes the convex hull. If you want a reference to the points,
    /// consider using [`points_ref`](Self::points_ref) instead.
    #[inline]
    pub fn points(self) -> Vec<DVec2> {
        self.points
    }

    /// Returns a reference to the vertices of the convex hull in
    /// counterclockwise order.
    #[inline]
    pub fn points_ref(&self) -> &[DVec2] {
        &self.points
    }

    /// Returns the ordered log of vertex-acceptance events recorded during
    /// construction, one per hull vertex.
    #[inline]
    pub fn acceptance_log(&self) -> &[VertexAccepted] {
        &self.log
    }
}

/// A configurable driver for quickhull construction.
///
/// The plain entry point [`ConvexHull2d::try_from_points`] covers the common
/// case; the builder additionally supports cooperative cancellation and a
/// synchronous per-vertex observer for stepwise playback.
///
/// # Example
///
/// ```
/// use glam::DVec2;
/// use quickhull2d::HullBuilder;
///
/// let points = vec![
///     DVec2::new(0.0, 0.0),
///     DVec2::new(4.0, 0.0),
///     DVec2::new(4.0, 4.0),
///     DVec2::new(0.0, 4.0),
///     DVec2::new(2.0, 2.0),
/// ];
///
/// let mut accepted = Vec::new();
/// let hull = HullBuilder::new()
///     .on_vertex_accepted(&mut |event| accepted.push(event.vertex))
///     .build(&points)
///     .unwrap();
///
/// // One event per hull vertex, in acceptance order.
/// assert_eq!(accepted.len(), hull.points_ref().len());
/// ```
#[derive(Default)]
pub struct HullBuilder<'a> {
    cancel_flag: Option<&'a AtomicBool>,
    observer: Option<&'a mut dyn FnMut(VertexAccepted)>,
}

/// A pending refinement of the boundary arc `p1 -> p2`, holding the indices
/// of the candidate points strictly outside that arc.
struct Frame {
    p1: usize,
    p2: usize,
    set: Vec<usize>,
}

impl<'a> HullBuilder<'a> {
    /// Creates a new [`HullBuilder`] with no cancellation flag and no observer.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cooperative cancellation flag.
    ///
    /// The flag is polled once per refinement step. When it is observed set,
    /// construction stops and [`build`](Self::build) returns
    /// [`ConvexHullError::Cancelled`] instead of a partial hull.
    #[inline]
    pub fn cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    /// Sets an observer that is invoked synchronously, exactly once per
    /// accepted hull vertex, in acceptance order.
    ///
    /// See [`VertexAccepted`] for the replay guarantee.
    #[inline]
    pub fn on_vertex_accepted(mut self, observer: &'a mut dyn FnMut(VertexAccepted)) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Computes the convex hull of the given points.
    ///
    /// The input slice is only read, never reordered or truncated.
    ///
    /// # Errors
    ///
    /// Returns a [`ConvexHullError`] if any input coordinate is non-finite,
    /// or if the cancellation flag is observed mid-computation.
    pub fn build(mut self, points: &[DVec2]) -> Result<ConvexHull2d, ConvexHullError> {
        for (index, point) in points.iter().enumerate() {
            if !point.x.is_finite() || !point.y.is_finite() {
                return Err(ConvexHullError::NonFiniteCoordinate { index });
            }
        }

        let mut log = Vec::new();

        // Point sets of size 0, 1, or 2 pass through unchanged, in input order.
        if points.len() < 3 {
            match *points {
                [] => {}
                [p] => self.accept(&mut log, p, p, p),
                [p, q] => {
                    self.accept(&mut log, p, p, p);
                    self.accept(&mut log, q, p, p);
                }
                _ => unreachable!(),
            }
            return Ok(ConvexHull2d {
                points: points.to_vec(),
                log,
            });
        }

        // Seed with the extreme points: A is minimal by (x, y), B is maximal
        // by (x, y), remaining ties broken by lowest input index.
        let (seed_min, seed_max) = {
            let (mut min_index, mut max_index) = (0, 0);
            for (i, point) in points.iter().enumerate().skip(1) {
                if lexicographic_cmp(point, &points[min_index]) == std::cmp::Ordering::Less {
                    min_index = i;
                }
                if lexicographic_cmp(point, &points[max_index]) == std::cmp::Ordering::Greater {
                    max_index = i;
                }
            }
            (min_index, max_index)
        };

        // Coincident seeds mean every point shares the same coordinates.
        if points[seed_min] == points[seed_max] {
            let point = points[seed_min];
            self.accept(&mut log, point, point, point);
            return Ok(ConvexHull2d {
                points: vec![point],
                log,
            });
        }

        let mut assembler = BoundaryAssembler::with_capacity(points.len());
        assembler.seed_pair(seed_min, seed_max);
        self.accept(&mut log, points[seed_min], points[seed_min], points[seed_min]);
        self.accept(&mut log, points[seed_max], points[seed_min], points[seed_min]);

        // Split the remaining points into the two chains of the seed line.
        // For a counterclockwise boundary, the candidates outside a directed
        // arc lie strictly to its right, so the lower chain (arc A -> B)
        // takes the right side of A -> B and the upper chain (arc B -> A)
        // takes the left side.
        let candidates: Vec<usize> = (0..points.len())
            .filter(|&i| i != seed_min && i != seed_max)
            .collect();
        let (upper, lower) =
            partition_by_side(points[seed_min], points[seed_max], &candidates, points);

        // Refine each chain with an explicit work list instead of native
        // recursion, so adversarial inputs cannot exhaust the call stack.
        // LIFO processing with the far arc pushed first reproduces the
        // depth-first acceptance order of the recursive formulation.
        let mut work = Vec::new();
        work.push(Frame {
            p1: seed_max,
            p2: seed_min,
            set: upper,
        });
        work.push(Frame {
            p1: seed_min,
            p2: seed_max,
            set: lower,
        });

        while let Some(Frame { p1, p2, set }) = work.pop() {
            if let Some(flag) = self.cancel_flag {
                if flag.load(Ordering::Relaxed) {
                    return Err(ConvexHullError::Cancelled);
                }
            }

            if set.is_empty() {
                continue;
            }

            // Select the candidate farthest from the line p1 -> p2. The edge
            // length is a shared denominator of the perpendicular distance,
            // so comparing doubled triangle areas selects the same point.
            // Candidate sets are in ascending input-index order, so a strict
            // comparison breaks distance ties by lowest input index.
            let edge = points[p2] - points[p1];
            let mut farthest = set[0];
            let mut max_area = edge.perp_dot(points[farthest] - points[p1]).abs();
            for &i in &set[1..] {
                let area = edge.perp_dot(points[i] - points[p1]).abs();
                if area > max_area {
                    max_area = area;
                    farthest = i;
                }
            }

            assembler.insert_between(p1, farthest, p2);
            self.accept(&mut log, points[farthest], points[p1], points[p2]);

            // Candidates outside the arcs p1 -> farthest and farthest -> p2
            // survive; everything in or on the triangle is pruned for good.
            let rest: Vec<usize> = set.into_iter().filter(|&i| i != farthest).collect();
            let (_, outside_first) =
                partition_by_side(points[p1], points[farthest], &rest, points);
            let (_, outside_second) =
                partition_by_side(points[farthest], points[p2], &rest, points);

            work.push(Frame {
                p1: farthest,
                p2,
                set: outside_second,
            });
            work.push(Frame {
                p1,
                p2: farthest,
                set: outside_first,
            });
        }

        let hull_points = assembler
            .into_indices()
            .into_iter()
            .map(|i| points[i])
            .collect();

        Ok(ConvexHull2d {
            points: hull_points,
            log,
        })
    }

    /// Records a vertex acceptance in the log and notifies the observer.
    fn accept(
        &mut self,
        log: &mut Vec<VertexAccepted>,
        vertex: DVec2,
        preceding: DVec2,
        following: DVec2,
    ) {
        let event = VertexAccepted {
            vertex,
            preceding,
            following,
        };
        if let Some(observer) = self.observer.as_deref_mut() {
            observer(event);
        }
        log.push(event);
    }
}

/// Compares two 2D points first by `x`, then by `y`.
#[inline]
fn lexicographic_cmp(a: &DVec2, b: &DVec2) -> std::cmp::Ordering {
    a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}

#[cfg(test)]
mod tests {
    use glam::dvec2;

    use crate::primitives::orientation;

    use super::*;

    #[test]
    fn square_with_interior_point() {
        let points = vec![
            dvec2(0.0, 0.0),
            dvec2(4.0, 0.0),
            dvec2(4.0, 4.0),
            dvec2(0.0, 4.0),
            dvec2(2.0, 2.0),
        ];
        let expected = vec![
            dvec2(0.0, 0.0),
            dvec2(4.0, 0.0),
            dvec2(4.0, 4.0),
            dvec2(0.0, 4.0),
        ];
        let result = ConvexHull2d::try_from_points(&points).unwrap().points();
        assert_eq!(result, expected);
    }

    #[test]
    fn hull_correct() {
        let points = vec![
            dvec2(0.0, 10.0),
            dvec2(1.0, 1.0),
            dvec2(10.0, 0.0),
            dvec2(1.0, -1.0),
            dvec2(0.0, -10.0),
            dvec2(-1.0, -1.0),
            dvec2(-10.0, 0.0),
            dvec2(-1.0, 1.0),
            dvec2(0.0, 10.0),
        ];
        let expected = vec![
            dvec2(-10.0, 0.0),
            dvec2(0.0, -10.0),
            dvec2(10.0, 0.0),
            dvec2(0.0, 10.0),
        ];
        let result = ConvexHull2d::try_from_points(&points).unwrap().points();
        assert_eq!(result, expected);
    }

    #[test]
    fn ccw() {
        let points = vec![
            dvec2(1.0, 0.0),
            dvec2(2.0, 1.0),
            dvec2(1.75, 1.1),
            dvec2(1.0, 2.0),
            dvec2(0.0, 1.0),
            dvec2(1.0, 0.0),
        ];
        let expected = [
            dvec2(0.0, 1.0),
            dvec2(1.0, 0.0),
            dvec2(2.0, 1.0),
            dvec2(1.0, 2.0),
        ];
        let result = ConvexHull2d::try_from_points(&points).unwrap().points();
        assert_eq!(result, expected);
    }

    #[test]
    fn small_inputs_pass_through_unchanged() {
        let empty: Vec<DVec2> = Vec::new();
        assert!(ConvexHull2d::try_from_points(&empty)
            .unwrap()
            .points()
            .is_empty());

        let single = vec![dvec2(3.0, -2.0)];
        assert_eq!(
            ConvexHull2d::try_from_points(&single).unwrap().points(),
            single
        );

        // Input order is preserved, even when it is not sorted.
        let pair = vec![dvec2(5.0, 5.0), dvec2(0.0, 0.0)];
        assert_eq!(ConvexHull2d::try_from_points(&pair).unwrap().points(), pair);
    }

    #[test]
    fn collinear_input_reduces_to_extremes() {
        let points = vec![dvec2(0.0, 0.0), dvec2(1.0, 0.0), dvec2(2.0, 0.0)];
        let expected = vec![dvec2(0.0, 0.0), dvec2(2.0, 0.0)];
        let result = ConvexHull2d::try_from_points(&points).unwrap().points();
        assert_eq!(result, expected);
    }

    #[test]
    fn vertical_collinear_input() {
        let points = vec![dvec2(0.0, 0.0), dvec2(0.0, 5.0), dvec2(0.0, 2.0)];
        let expected = vec![dvec2(0.0, 0.0), dvec2(0.0, 5.0)];
        let result = ConvexHull2d::try_from_points(&points).unwrap().points();
        assert_eq!(result, expected);
    }

    #[test]
    fn coincident_points_reduce_to_one() {
        let points = vec![dvec2(1.0, 1.0); 4];
        let result = ConvexHull2d::try_from_points(&points).unwrap().points();
        assert_eq!(result, vec![dvec2(1.0, 1.0)]);
    }

    #[test]
    fn non_finite_coordinate_rejected() {
        let points = vec![
            dvec2(0.0, 0.0),
            dvec2(1.0, 0.0),
            dvec2(f64::NAN, 2.0),
            dvec2(0.0, 1.0),
        ];
        let result = ConvexHull2d::try_from_points(&points);
        assert_eq!(
            result.unwrap_err(),
            ConvexHullError::NonFiniteCoordinate { index: 2 }
        );

        let points = vec![dvec2(0.0, f64::INFINITY)];
        let result = ConvexHull2d::try_from_points(&points);
        assert_eq!(
            result.unwrap_err(),
            ConvexHullError::NonFiniteCoordinate { index: 0 }
        );
    }

    #[test]
    fn cancellation_reports_no_partial_hull() {
        let points = vec![
            dvec2(0.0, 0.0),
            dvec2(4.0, 0.0),
            dvec2(4.0, 4.0),
            dvec2(0.0, 4.0),
        ];
        let flag = AtomicBool::new(true);
        let result = HullBuilder::new().cancel_flag(&flag).build(&points);
        assert_eq!(result.unwrap_err(), ConvexHullError::Cancelled);
    }

    #[test]
    fn unset_cancellation_flag_is_harmless() {
        let points = vec![dvec2(0.0, 0.0), dvec2(4.0, 0.0), dvec2(2.0, 3.0)];
        let flag = AtomicBool::new(false);
        let result = HullBuilder::new().cancel_flag(&flag).build(&points);
        assert_eq!(result.unwrap().points().len(), 3);
    }

    #[test]
    fn farthest_point_ties_break_by_input_index() {
        // Both upper candidates are at distance 3 from the seed line;
        // the lower input index must be accepted first.
        let points = vec![
            dvec2(0.0, 0.0),
            dvec2(4.0, 0.0),
            dvec2(1.0, 3.0),
            dvec2(3.0, 3.0),
        ];
        let expected = vec![
            dvec2(0.0, 0.0),
            dvec2(4.0, 0.0),
            dvec2(3.0, 3.0),
            dvec2(1.0, 3.0),
        ];
        let hull = ConvexHull2d::try_from_points(&points).unwrap();
        assert_eq!(hull.points_ref(), expected);
        assert_eq!(hull.acceptance_log()[2].vertex, dvec2(1.0, 3.0));
    }

    #[test]
    fn observer_matches_acceptance_log() {
        let points = vec![
            dvec2(0.0, 0.0),
            dvec2(4.0, 0.0),
            dvec2(4.0, 4.0),
            dvec2(0.0, 4.0),
            dvec2(2.0, 2.0),
        ];

        let mut observed = Vec::new();
        let hull = HullBuilder::new()
            .on_vertex_accepted(&mut |event| observed.push(event))
            .build(&points)
            .unwrap();

        assert_eq!(observed, hull.acceptance_log());
    }

    #[test]
    fn replaying_acceptance_events_reconstructs_the_boundary() {
        let points = vec![
            dvec2(0.0, 10.0),
            dvec2(1.0, 1.0),
            dvec2(10.0, 0.0),
            dvec2(1.0, -1.0),
            dvec2(0.0, -10.0),
            dvec2(-1.0, -1.0),
            dvec2(-10.0, 0.0),
            dvec2(-1.0, 1.0),
            dvec2(3.0, 3.0),
            dvec2(-3.0, 4.0),
        ];
        let hull = ConvexHull2d::try_from_points(&points).unwrap();

        let mut replayed: Vec<DVec2> = Vec::new();
        for event in hull.acceptance_log() {
            if replayed.is_empty() {
                replayed.push(event.vertex);
            } else {
                let position = replayed
                    .iter()
                    .position(|&v| v == event.preceding)
                    .unwrap();
                replayed.insert(position + 1, event.vertex);
            }
        }

        assert_eq!(replayed, hull.points_ref());
    }

    #[test]
    fn input_slice_is_not_mutated() {
        let points = vec![
            dvec2(3.0, 1.0),
            dvec2(0.0, 0.0),
            dvec2(1.0, 4.0),
            dvec2(2.0, 2.0),
        ];
        let before = points.clone();
        let _hull = ConvexHull2d::try_from_points(&points).unwrap();
        assert_eq!(points, before);
    }

    #[test]
    fn idempotent_up_to_exact_equality() {
        let points = vec![
            dvec2(0.0, 10.0),
            dvec2(7.0, 3.0),
            dvec2(10.0, 0.0),
            dvec2(4.0, -6.0),
            dvec2(0.0, -10.0),
            dvec2(-5.0, -5.0),
            dvec2(-10.0, 0.0),
            dvec2(-2.0, 8.0),
            dvec2(1.0, 2.0),
        ];
        let once = ConvexHull2d::try_from_points(&points).unwrap().points();
        let twice = ConvexHull2d::try_from_points(&once).unwrap().points();
        assert_eq!(once, twice);
    }

    #[test]
    fn many_collinear_points_do_not_exhaust_the_stack() {
        let points: Vec<DVec2> = (0..100_000).map(|i| dvec2(i as f64, 0.0)).collect();
        let result = ConvexHull2d::try_from_points(&points).unwrap().points();
        assert_eq!(result, vec![dvec2(0.0, 0.0), dvec2(99_999.0, 0.0)]);
    }

    #[test]
    fn random_points_satisfy_hull_properties() {
        use rand::{rngs::StdRng, Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(7);
        let points: Vec<DVec2> = (0..500)
            .map(|_| {
                dvec2(
                    rng.random_range(-100.0..100.0),
                    rng.random_range(-100.0..100.0),
                )
            })
            .collect();

        let hull = ConvexHull2d::try_from_points(&points).unwrap();
        let vertices = hull.points_ref();
        assert!(vertices.len() >= 3);

        // Every hull vertex is drawn from the input set.
        for vertex in vertices {
            assert!(points.contains(vertex));
        }

        // Consistent counterclockwise winding with no reflex turns.
        let n = vertices.len();
        for i in 0..n {
            let turn = orientation(vertices[i], vertices[(i + 1) % n], vertices[(i + 2) % n]);
            assert!(turn > 0.0, "reflex or collinear turn at vertex {i}");
        }

        // Containment: no input point lies strictly outside any hull edge.
        for i in 0..n {
            let (a, b) = (vertices[i], vertices[(i + 1) % n]);
            for point in &points {
                assert!(
                    orientation(a, b, *point) >= 0.0,
                    "point {point:?} is outside edge ({a:?}, {b:?})"
                );
            }
        }
    }

    #[test]
    fn duplicate_hull_vertices_are_not_repeated() {
        let points = vec![
            dvec2(0.0, 0.0),
            dvec2(4.0, 0.0),
            dvec2(4.0, 4.0),
            dvec2(0.0, 4.0),
            dvec2(0.0, 4.0),
            dvec2(0.0, 0.0),
        ];
        let expected = vec![
            dvec2(0.0, 0.0),
            dvec2(4.0, 0.0),
            dvec2(4.0, 4.0),
            dvec2(0.0, 4.0),
        ];
        let result = ConvexHull2d::try_from_points(&points).unwrap().points();
        assert_eq!(result, expected);
    }
}
