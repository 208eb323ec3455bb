//! Orientation fix-up of freshly read cells.
//!
//! Cells are first turned inside out when their measure is negative. Then
//! every edge of the mesh is given a direction such that, inside each cell,
//! parallel edges point the same way. Finding these directions amounts to
//! solving XOR constraints between edges, done with a union-find structure
//! that tracks the parity of each edge relative to its root. Each cell is
//! finally rotated so that its reference edge directions match the mesh ones.

use crate::geometry;
use crate::reference;
use crate::Error;
use crate::PointND;
use mesh_io::CellData;
use std::collections::HashMap;
use std::mem;

/// Reordering of the vertices of freshly read cells.
///
/// Implementations may permute the vertices of each cell but must keep the
/// cell count and order.
pub trait Reorder<const D: usize> {
    /// Make every cell positively oriented and neighboring cells agree on the
    /// direction of their shared edges.
    fn reorder(&mut self, vertices: &[PointND<D>], cells: &mut [CellData]) -> Result<(), Error>;
}

/// Default cell reordering.
///
/// # Example
///
/// ```rust
/// # fn main() -> Result<(), gridin::Error> {
/// use gridin::Point2D;
/// use gridin::Reorder as _;
/// use gridin::mesh_io::{CellData, ElementType};
///
/// let vertices = vec![
///     Point2D::new(0.0, 0.0),
///     Point2D::new(1.0, 0.0),
///     Point2D::new(1.0, 1.0),
///     Point2D::new(0.0, 1.0),
/// ];
/// // clockwise
/// let mut cells = [CellData::new(ElementType::Quadrilateral, vec![0, 3, 2, 1], 0)];
///
/// gridin::GridReordering.reorder(&vertices[..], &mut cells)?;
///
/// let corners: Vec<_> = cells[0].vertices.iter().map(|&v| vertices[v]).collect();
/// assert!(gridin::signed_measure(&corners) > 0.0);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct GridReordering;

impl<const D: usize> Reorder<D> for GridReordering {
    fn reorder(&mut self, vertices: &[PointND<D>], cells: &mut [CellData]) -> Result<(), Error> {
        invert_negative_cells(vertices, cells)?;
        orient_edges(D, cells)
    }
}

/// Mirrors the cells that have a negative measure.
pub fn invert_negative_cells<const D: usize>(
    vertices: &[PointND<D>],
    cells: &mut [CellData],
) -> Result<(), Error> {
    let span = tracing::info_span!("invert negative cells");
    let _enter = span.enter();

    let inversion = reference::inversion(D);
    let mut inverted = 0;
    for (c, cell) in cells.iter_mut().enumerate() {
        if geometry::signed_measure(&geometry::corners(vertices, cell)) >= 0.0 {
            continue;
        }
        if inversion.len() != cell.vertices.len() {
            return Err(Error::InconsistentOrientation { cell: c });
        }
        cell.vertices = inversion.iter().map(|&i| cell.vertices[i]).collect();
        inverted += 1;
    }
    if inverted != 0 {
        tracing::warn!(inverted, "some cells had a negative measure");
    }

    for (c, cell) in cells.iter().enumerate() {
        // also catches flat and NaN cells
        let measure = geometry::signed_measure(&geometry::corners(vertices, cell));
        if !(measure > 0.0) {
            return Err(Error::InconsistentOrientation { cell: c });
        }
    }

    Ok(())
}

/// Union-find over edges, with the parity of each edge relative to its
/// parent.
#[derive(Debug, Default)]
struct ParityUnionFind {
    parent: Vec<usize>,
    parity: Vec<bool>,
    rank: Vec<u8>,
}

impl ParityUnionFind {
    fn push(&mut self) -> usize {
        let id = self.parent.len();
        self.parent.push(id);
        self.parity.push(false);
        self.rank.push(0);
        id
    }

    /// Returns the root of `x` and the parity of `x` relative to it.
    fn find(&mut self, x: usize) -> (usize, bool) {
        let mut path = Vec::new();
        let mut root = x;
        while self.parent[root] != root {
            path.push(root);
            root = self.parent[root];
        }
        let mut parity = false;
        for &node in path.iter().rev() {
            parity ^= self.parity[node];
            self.parity[node] = parity;
            self.parent[node] = root;
        }
        (root, x != root && self.parity[x])
    }

    /// Records that `a` and `b` have relative parity `parity`. Returns false
    /// if this contradicts what is already known.
    fn union(&mut self, a: usize, b: usize, parity: bool) -> bool {
        let (mut ra, pa) = self.find(a);
        let (mut rb, pb) = self.find(b);
        if ra == rb {
            return pa ^ pb == parity;
        }
        if self.rank[ra] < self.rank[rb] {
            mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.parity[rb] = pa ^ pb ^ parity;
        if self.rank[ra] == self.rank[rb] {
            self.rank[ra] += 1;
        }
        true
    }
}

fn edge_key(a: usize, b: usize) -> (usize, usize) {
    (usize::min(a, b), usize::max(a, b))
}

/// Rotates cells so that neighbors agree on the direction of shared edges.
///
/// Edge `(a, b)` of the mesh with `a < b` runs from `a` to `b` unless its
/// parity says otherwise.
fn orient_edges(dimension: usize, cells: &mut [CellData]) -> Result<(), Error> {
    if dimension < 2 {
        // lines share no edge
        return Ok(());
    }
    let span = tracing::info_span!("orient edges");
    let _enter = span.enter();

    let reference_edges = reference::edges(dimension);
    let mut edge_ids = HashMap::new();
    let mut edges = ParityUnionFind::default();
    for (c, cell) in cells.iter().enumerate() {
        let mut first_of_axis: [Option<(usize, bool)>; 3] = [None; 3];
        for &(from, to, axis) in reference_edges {
            let (a, b) = (cell.vertices[from], cell.vertices[to]);
            let id = *edge_ids
                .entry(edge_key(a, b))
                .or_insert_with(|| edges.push());
            let reversed = a > b;
            match first_of_axis[axis] {
                None => first_of_axis[axis] = Some((id, reversed)),
                Some((first, first_reversed)) => {
                    if !edges.union(first, id, first_reversed ^ reversed) {
                        return Err(Error::InconsistentOrientation { cell: c });
                    }
                }
            }
        }
    }
    let directions: Vec<bool> = (0..edge_ids.len()).map(|e| edges.find(e).1).collect();
    tracing::debug!(edge_count = directions.len(), "solved edge directions");

    let rotations = reference::rotations(dimension);
    let mut rotated = 0;
    for (c, cell) in cells.iter_mut().enumerate() {
        let matches = |vertices: &[usize]| {
            reference_edges.iter().all(|&(from, to, _)| {
                let (a, b) = (vertices[from], vertices[to]);
                match edge_ids.get(&edge_key(a, b)) {
                    Some(&e) => a != b && (a < b) != directions[e],
                    None => false,
                }
            })
        };
        let new_vertices = rotations
            .iter()
            .map(|p| p.iter().map(|&i| cell.vertices[i]).collect::<Vec<usize>>())
            .find(|candidate| matches(candidate.as_slice()))
            .ok_or(Error::InconsistentOrientation { cell: c })?;
        if new_vertices != cell.vertices {
            rotated += 1;
            cell.vertices = new_vertices;
        }
    }
    tracing::debug!(rotated, "rotated cells");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Point2D;
    use crate::Point3D;
    use mesh_io::ElementType;

    fn quad(vertices: [usize; 4]) -> CellData {
        CellData::new(ElementType::Quadrilateral, vertices.to_vec(), 0)
    }

    /// `nx × ny` unit squares.
    fn grid_points(nx: usize, ny: usize) -> Vec<Point2D> {
        (0..=ny)
            .flat_map(|j| (0..=nx).map(move |i| Point2D::new(i as f64, j as f64)))
            .collect()
    }

    fn assert_consistent(dimension: usize, cells: &[CellData]) {
        let mut directions = HashMap::new();
        for cell in cells {
            for &(from, to, _) in reference::edges(dimension) {
                let (a, b) = (cell.vertices[from], cell.vertices[to]);
                let previous = directions.insert(edge_key(a, b), a < b);
                assert!(previous.is_none() || previous == Some(a < b));
            }
        }
    }

    fn assert_positive<const D: usize>(vertices: &[PointND<D>], cells: &[CellData]) {
        for cell in cells {
            assert!(geometry::signed_measure(&geometry::corners(vertices, cell)) > 0.0);
        }
    }

    #[test]
    fn test_union_find_parity() {
        let mut uf = ParityUnionFind::default();
        let ids: Vec<usize> = (0..4).map(|_| uf.push()).collect();
        assert!(uf.union(ids[0], ids[1], true));
        assert!(uf.union(ids[1], ids[2], true));
        assert!(uf.union(ids[2], ids[0], false));
        assert!(!uf.union(ids[0], ids[2], true));
        assert_eq!(uf.find(ids[0]).1 ^ uf.find(ids[2]).1, false);
        assert_eq!(uf.find(ids[0]).1 ^ uf.find(ids[1]).1, true);
        assert_eq!(uf.find(ids[3]), (ids[3], false));
    }

    #[test]
    fn test_invert_clockwise_quad() {
        let vertices = grid_points(1, 1);
        let mut cells = vec![quad([0, 2, 3, 1])];
        invert_negative_cells(&vertices, &mut cells).unwrap();
        assert_eq!(cells[0].vertices, vec![0, 1, 3, 2]);
        assert_positive(&vertices, &cells);
    }

    #[test]
    fn test_flat_cell() {
        let vertices = grid_points(1, 1);
        let mut cells = vec![quad([0, 1, 3, 2]), quad([0, 1, 1, 0])];
        let err = GridReordering.reorder(&vertices[..], &mut cells).unwrap_err();
        assert!(matches!(err, Error::InconsistentOrientation { cell: 1 }));
    }

    #[test]
    fn test_scrambled_grid() {
        // 3 × 2 squares, numbered row by row
        let vertices = grid_points(3, 2);
        let v = |i: usize, j: usize| j * 4 + i;
        let mut cells: Vec<CellData> = (0..2)
            .flat_map(|j| (0..3).map(move |i| (i, j)))
            .map(|(i, j)| quad([v(i, j), v(i + 1, j), v(i + 1, j + 1), v(i, j + 1)]))
            .collect();
        // rotate or mirror some of them
        cells[1].vertices.rotate_left(1);
        cells[2].vertices.rotate_left(2);
        cells[3].vertices.reverse();
        cells[5].vertices.rotate_right(1);

        GridReordering.reorder(&vertices[..], &mut cells).unwrap();

        assert_positive(&vertices, &cells);
        assert_consistent(2, &cells);
        for (cell, expected) in cells.iter().zip([[0, 1, 5, 4], [1, 2, 6, 5]]) {
            let mut sorted = cell.vertices.clone();
            sorted.sort_unstable();
            let mut expected = expected.to_vec();
            expected.sort_unstable();
            assert_eq!(sorted, expected);
        }
    }

    #[test]
    fn test_two_hexahedra() {
        let mut vertices = Vec::new();
        for z in 0..2 {
            for (x, y) in [(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)] {
                vertices.push(Point3D::new(x as f64, y as f64, z as f64));
            }
        }
        let hex = |base: [usize; 4]| {
            let mut v = base.to_vec();
            v.extend(base.iter().map(|b| b + 6));
            CellData::new(ElementType::Hexahedron, v, 0)
        };
        let mut cells = vec![hex([0, 1, 4, 3]), hex([1, 2, 5, 4])];
        // upside down and turned
        cells[1].vertices = vec![7, 8, 11, 10, 1, 2, 5, 4];
        cells[1].vertices = reference::rotations(3)[5]
            .iter()
            .map(|&i| cells[1].vertices[i])
            .collect();

        GridReordering.reorder(&vertices[..], &mut cells).unwrap();

        assert_positive(&vertices, &cells);
        assert_consistent(3, &cells);
    }

    #[test]
    fn test_lines_are_only_inverted() {
        let vertices = vec![PointND::<1>::new(0.0), PointND::<1>::new(1.0), PointND::<1>::new(3.0)];
        let mut cells = vec![
            CellData::new(ElementType::Line, vec![1, 0], 0),
            CellData::new(ElementType::Line, vec![1, 2], 0),
        ];
        GridReordering.reorder(&vertices[..], &mut cells).unwrap();
        assert_eq!(cells[0].vertices, vec![0, 1]);
        assert_eq!(cells[1].vertices, vec![1, 2]);
    }
}
