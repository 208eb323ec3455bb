//! Vertex and edge numbering of the reference cells.
//!
//! Quadrilateral corners go counter-clockwise. Hexahedra have their bottom
//! face numbered like a quadrilateral and vertex `i + 4` right above vertex
//! `i`. Each edge is listed from its vertex with the lower coordinate along
//! its axis to the other one.

use itertools::Itertools as _;

/// `(from, to, axis)` for every edge of the reference line.
const LINE_EDGES: [(usize, usize, usize); 1] = [(0, 1, 0)];

const QUAD_EDGES: [(usize, usize, usize); 4] = [(0, 1, 0), (1, 2, 1), (3, 2, 0), (0, 3, 1)];

const HEX_EDGES: [(usize, usize, usize); 12] = [
    (0, 1, 0),
    (1, 2, 1),
    (3, 2, 0),
    (0, 3, 1),
    (4, 5, 0),
    (5, 6, 1),
    (7, 6, 0),
    (4, 7, 1),
    (0, 4, 2),
    (1, 5, 2),
    (2, 6, 2),
    (3, 7, 2),
];

/// Corner positions on the unit square, in quadrilateral order.
const SQUARE: [[usize; 2]; 4] = [[0, 0], [1, 0], [1, 1], [0, 1]];

pub(crate) fn edges(dimension: usize) -> &'static [(usize, usize, usize)] {
    match dimension {
        1 => &LINE_EDGES,
        2 => &QUAD_EDGES,
        3 => &HEX_EDGES,
        _ => &[],
    }
}

/// Vertex permutation mirroring a cell, which flips the sign of its measure.
pub(crate) fn inversion(dimension: usize) -> &'static [usize] {
    match dimension {
        1 => &[1, 0],
        2 => &[0, 3, 2, 1],
        3 => &[0, 3, 2, 1, 4, 7, 6, 5],
        _ => &[],
    }
}

fn coordinates(dimension: usize, vertex: usize) -> [usize; 3] {
    if dimension == 1 {
        return [vertex, 0, 0];
    }
    let [x, y] = SQUARE[vertex % 4];
    [x, y, vertex / 4]
}

fn vertex(dimension: usize, coordinates: [usize; 3]) -> usize {
    if dimension == 1 {
        return coordinates[0];
    }
    let [x, y, z] = coordinates;
    let bottom = SQUARE
        .iter()
        .position(|&corner| corner == [x, y])
        .unwrap_or(0);
    bottom + 4 * z
}

/// Vertex permutations of the reference cell that are rotations, i.e.
/// symmetries preserving the sign of the measure.
///
/// A permutation `p` relabels a cell so that its new vertex `i` is its old
/// vertex `p[i]`. The identity comes first.
pub(crate) fn rotations(dimension: usize) -> Vec<Vec<usize>> {
    let vertex_count = 1 << dimension;
    let mut rotations = Vec::new();
    for axes in (0..dimension).permutations(dimension) {
        let inversions = axes
            .iter()
            .tuple_combinations()
            .filter(|(a, b)| a > b)
            .count();
        for flips in 0..(1_usize << dimension) {
            if (inversions + flips.count_ones() as usize) % 2 == 1 {
                continue;
            }
            let permutation = (0..vertex_count)
                .map(|v| {
                    let from = coordinates(dimension, v);
                    let mut to = [0; 3];
                    for (k, &axis) in axes.iter().enumerate() {
                        to[k] = from[axis] ^ ((flips >> k) & 1);
                    }
                    vertex(dimension, to)
                })
                .collect();
            rotations.push(permutation);
        }
    }
    rotations
}
