//! # Quickhull 2D
//!
//! A Rust implementation of the Quickhull algorithm for computing the convex
//! hull of a 2D point set.
//!
//! The hull is built by seeding with the extreme points, partitioning the
//! remaining points by which side of the seed line they lie on, and
//! repeatedly promoting the point farthest from each boundary edge while
//! pruning everything inside the accepted triangles. Side-of-line decisions
//! use exact predicates, tie-breaking is pinned to input order for
//! reproducible output, and refinement runs on an explicit work list so deep
//! inputs cannot exhaust the call stack.
//!
//! Beyond the plain [`ConvexHull2d::try_from_points`] entry point,
//! [`HullBuilder`] supports cooperative cancellation and a synchronous
//! per-vertex acceptance hook for stepwise playback of the construction.
//!
//! ## Example
//!
//! ```
//! use glam::DVec2;
//! use quickhull2d::ConvexHull2d;
//!
//! let points = vec![
//!     DVec2::new(0.0, 0.0),
//!     DVec2::new(4.0, 0.0),
//!     DVec2::new(4.0, 4.0),
//!     DVec2::new(0.0, 4.0),
//!     DVec2::new(2.0, 2.0),
//! ];
//!
//! // Compute the convex hull.
//! let hull = ConvexHull2d::try_from_points(&points)?;
//!
//! // The vertices of the convex hull in counterclockwise order.
//! assert_eq!(hull.points().len(), 4);
//! # Ok::<(), quickhull2d::ConvexHullError>(())
//! ```
//!
//! ## References
//!
//! - C. Bradford Barber et al. 1996. [The Quickhull Algorithm for Convex Hulls](https://www.cise.ufl.edu/~ungor/courses/fall06/papers/QuickHull.pdf) (the original paper)

#![warn(missing_docs)]

mod assembler;
mod hull;
mod partition;
mod primitives;

pub use hull::{ConvexHull2d, ConvexHullError, HullBuilder, VertexAccepted};
pub use primitives::{orientation, perpendicular_distance, DegenerateSegment};
