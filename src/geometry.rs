//! Points and signed measures of reference cells.

use mesh_io::CellData;
use nalgebra::Vector3;

pub type PointND<const D: usize> = nalgebra::SVector<f64, D>;
pub type Point2D = PointND<2>;
pub type Point3D = PointND<3>;

/// Splits flat coordinates into points.
pub(crate) fn points_from_coordinates<const D: usize>(coordinates: &[f64]) -> Vec<PointND<D>> {
    coordinates
        .chunks_exact(D)
        .map(PointND::<D>::from_column_slice)
        .collect()
}

fn to_3d<const D: usize>(p: &PointND<D>) -> Vector3<f64> {
    Vector3::new(p[0], p[1], p[2])
}

/// Signed length, area or volume of a cell, positive when its corners follow
/// the reference ordering.
///
/// Quadrilaterals use the shoelace formula. Hexahedra use the Jacobian
/// determinant of the trilinear map at the cell center; its sign is the test
/// used to decide whether a cell is positively oriented.
pub fn signed_measure<const D: usize>(corners: &[PointND<D>]) -> f64 {
    match (D, corners.len()) {
        (1, 2) => corners[1][0] - corners[0][0],
        (2, 4) => {
            let twice_area: f64 = (0..4)
                .map(|i| {
                    let (p, q) = (&corners[i], &corners[(i + 1) % 4]);
                    p[0] * q[1] - q[0] * p[1]
                })
                .sum();
            twice_area / 2.0
        }
        (3, 8) => {
            let v: Vec<Vector3<f64>> = corners.iter().map(to_3d).collect();
            let a = ((v[1] - v[0]) + (v[2] - v[3]) + (v[5] - v[4]) + (v[6] - v[7])) / 4.0;
            let b = ((v[3] - v[0]) + (v[2] - v[1]) + (v[7] - v[4]) + (v[6] - v[5])) / 4.0;
            let c = ((v[4] - v[0]) + (v[5] - v[1]) + (v[6] - v[2]) + (v[7] - v[3])) / 4.0;
            a.dot(&b.cross(&c))
        }
        _ => 0.0,
    }
}

/// Corners of `cell`, in cell order.
pub(crate) fn corners<const D: usize>(vertices: &[PointND<D>], cell: &CellData) -> Vec<PointND<D>> {
    cell.vertices.iter().map(|&v| vertices[v]).collect()
}

/// Arithmetic mean of the given points.
pub fn center<const D: usize>(points: &[PointND<D>]) -> PointND<D> {
    let sum: PointND<D> = points.iter().sum();
    sum / points.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_cube() -> Vec<Point3D> {
        vec![
            Point3D::new(0.0, 0.0, 0.0),
            Point3D::new(1.0, 0.0, 0.0),
            Point3D::new(1.0, 1.0, 0.0),
            Point3D::new(0.0, 1.0, 0.0),
            Point3D::new(0.0, 0.0, 1.0),
            Point3D::new(1.0, 0.0, 1.0),
            Point3D::new(1.0, 1.0, 1.0),
            Point3D::new(0.0, 1.0, 1.0),
        ]
    }

    #[test]
    fn test_measure_1d() {
        let line = [PointND::<1>::new(2.0), PointND::<1>::new(-1.0)];
        assert_eq!(signed_measure(&line), -3.0);
    }

    #[test]
    fn test_measure_2d() {
        let mut quad = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(2.0, 0.0),
            Point2D::new(2.0, 1.0),
            Point2D::new(0.0, 1.0),
        ];
        assert_relative_eq!(signed_measure(&quad), 2.0);
        quad.swap(1, 3);
        assert_relative_eq!(signed_measure(&quad), -2.0);
    }

    #[test]
    fn test_measure_3d() {
        let mut cube = unit_cube();
        assert_relative_eq!(signed_measure(&cube), 1.0);
        for p in &mut cube {
            *p *= 2.0;
        }
        assert_relative_eq!(signed_measure(&cube), 8.0);
        // mirror the cell by swapping its bottom and top faces
        cube.rotate_left(4);
        assert_relative_eq!(signed_measure(&cube), -8.0);
    }

    #[test]
    fn test_center() {
        let c = center(&unit_cube());
        assert_relative_eq!(c, Point3D::new(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_points_from_coordinates() {
        let points = points_from_coordinates::<2>(&[0.0, 1.0, 2.0, 3.0]);
        assert_eq!(points, vec![Point2D::new(0.0, 1.0), Point2D::new(2.0, 3.0)]);
    }
}
