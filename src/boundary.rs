//! Placement of new points on boundary edges and faces during refinement.
//!
//! Faces are given by their four corners in the counter-clockwise order of
//! the reference quadrilateral. Face edge `i` joins corners `i` and
//! `(i + 1) % 4`.

use crate::Error;
use crate::PointND;
use nalgebra::Vector3;

/// Neighbors of each face corner, in the order that makes the cross product
/// of the two tangents point outside.
const FACE_NEIGHBORS: [[usize; 2]; 4] = [[1, 3], [2, 0], [3, 1], [0, 2]];

/// Access to the refinement state of the edges of a face.
///
/// Refinement engines hand this to [`Boundary::center_on_face`] so that a
/// face center agrees with the points already inserted on its edges.
pub trait EdgeLookup<const D: usize> {
    /// Child vertex of face edge `edge`, if that edge has been refined.
    fn refined_midpoint(&self, edge: usize) -> Option<PointND<D>>;
}

impl<F, const D: usize> EdgeLookup<D> for F
where
    F: Fn(usize) -> Option<PointND<D>>,
{
    fn refined_midpoint(&self, edge: usize) -> Option<PointND<D>> {
        self(edge)
    }
}

/// Edge lookup for faces whose edges have not been refined yet.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRefinedEdges;

impl<const D: usize> EdgeLookup<D> for NoRefinedEdges {
    fn refined_midpoint(&self, _: usize) -> Option<PointND<D>> {
        None
    }
}

/// Geometric description of a boundary, queried for the position of new
/// vertices.
pub trait Boundary<const D: usize> {
    /// Point to insert in the middle of the given edge.
    fn midpoint_on_edge(&self, edge: &[PointND<D>; 2]) -> PointND<D>;

    /// `n` points along the given edge, in order from its first vertex to its
    /// second one.
    fn interior_points_on_edge(
        &self,
        edge: &[PointND<D>; 2],
        n: usize,
    ) -> Result<Vec<PointND<D>>, Error>;

    /// Point to insert in the middle of the given face.
    fn center_on_face(
        &self,
        face: &[PointND<D>],
        refined: &dyn EdgeLookup<D>,
    ) -> Result<PointND<D>, Error>;

    /// `n` points on the given face, laid out as a square grid row by row.
    fn interior_points_on_face(
        &self,
        face: &[PointND<D>],
        n: usize,
    ) -> Result<Vec<PointND<D>>, Error>;

    /// Normal vectors at each vertex of the given face, not normalized.
    fn normals_at_face_vertices(&self, face: &[PointND<D>]) -> Result<Vec<PointND<D>>, Error>;
}

/// Boundary made of straight edges and bilinear faces.
///
/// New points are interpolated linearly between existing vertices.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), gridin::Error> {
/// use gridin::Boundary as _;
/// use gridin::Point2D;
///
/// let edge = [Point2D::new(0.0, 0.0), Point2D::new(4.0, 0.0)];
/// let points = gridin::StraightBoundary.interior_points_on_edge(&edge, 3)?;
///
/// assert_eq!(points, [
///     Point2D::new(1.0, 0.0),
///     Point2D::new(2.0, 0.0),
///     Point2D::new(3.0, 0.0),
/// ]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct StraightBoundary;

fn check_face<const D: usize>(face: &[PointND<D>]) -> Result<(), Error> {
    let expected = 1 << (D - 1);
    if face.len() != expected {
        return Err(Error::BadFaceVertexCount {
            expected,
            found: face.len(),
        });
    }
    Ok(())
}

fn to_3d<const D: usize>(p: &PointND<D>) -> Vector3<f64> {
    Vector3::new(p[0], p[1], p[2])
}

fn from_3d<const D: usize>(v: Vector3<f64>) -> PointND<D> {
    PointND::<D>::from_column_slice(v.as_slice())
}

impl<const D: usize> Boundary<D> for StraightBoundary {
    fn midpoint_on_edge(&self, [v0, v1]: &[PointND<D>; 2]) -> PointND<D> {
        (v0 + v1) / 2.0
    }

    fn interior_points_on_edge(
        &self,
        [v0, v1]: &[PointND<D>; 2],
        n: usize,
    ) -> Result<Vec<PointND<D>>, Error> {
        if n == 0 {
            return Err(Error::InvalidPointCount { requested: n });
        }
        let dx = 1.0 / (n + 1) as f64;
        let points = (1..=n)
            .map(|k| {
                let x = k as f64 * dx;
                v0 * (1.0 - x) + v1 * x
            })
            .collect();
        Ok(points)
    }

    fn center_on_face(
        &self,
        face: &[PointND<D>],
        refined: &dyn EdgeLookup<D>,
    ) -> Result<PointND<D>, Error> {
        if D != 3 {
            return Err(Error::UnsupportedDimension { dimension: D });
        }
        check_face(face)?;
        let mut sum: PointND<D> = face.iter().sum();
        for (i, corner) in face.iter().enumerate() {
            let next = &face[(i + 1) % face.len()];
            sum += refined
                .refined_midpoint(i)
                .unwrap_or_else(|| (corner + next) / 2.0);
        }
        Ok(sum / 8.0)
    }

    fn interior_points_on_face(
        &self,
        face: &[PointND<D>],
        n: usize,
    ) -> Result<Vec<PointND<D>>, Error> {
        if D != 3 {
            return Err(Error::UnsupportedDimension { dimension: D });
        }
        check_face(face)?;
        let m = (n as f64).sqrt().round() as usize;
        if n == 0 || m * m != n {
            return Err(Error::InvalidPointCount { requested: n });
        }
        let ds = 1.0 / (m + 1) as f64;
        let mut points = Vec::with_capacity(n);
        for i in 1..=m {
            let y = i as f64 * ds;
            for j in 1..=m {
                let x = j as f64 * ds;
                points.push(
                    face[0] * ((1.0 - x) * (1.0 - y))
                        + face[1] * (x * (1.0 - y))
                        + face[2] * (x * y)
                        + face[3] * ((1.0 - x) * y),
                );
            }
        }
        Ok(points)
    }

    fn normals_at_face_vertices(&self, face: &[PointND<D>]) -> Result<Vec<PointND<D>>, Error> {
        match D {
            2 => {
                check_face(face)?;
                let tangent = face[1] - face[0];
                let mut normal = PointND::<D>::zeros();
                normal[0] = tangent[1];
                normal[1] = -tangent[0];
                Ok(vec![normal; 2])
            }
            3 => {
                check_face(face)?;
                let normals = FACE_NEIGHBORS
                    .iter()
                    .enumerate()
                    .map(|(corner, &[n0, n1])| {
                        let origin = to_3d(&face[corner]);
                        let t0 = to_3d(&face[n0]) - origin;
                        let t1 = to_3d(&face[n1]) - origin;
                        from_3d(t0.cross(&t1))
                    })
                    .collect();
                Ok(normals)
            }
            _ => Err(Error::UnsupportedDimension { dimension: D }),
        }
    }
}
