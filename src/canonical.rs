use mesh_io::CellData;

/// Removes the vertices that no cell nor boundary record uses, and renumbers
/// the remaining ones densely, keeping their relative order.
///
/// # Panics
///
/// If a cell or a boundary record references a vertex index out of the bounds
/// of `vertices`.
pub fn delete_unused_vertices<P>(
    vertices: Vec<P>,
    mut cells: Vec<CellData>,
    mut boundary: Vec<CellData>,
) -> (Vec<P>, Vec<CellData>, Vec<CellData>) {
    let mut used = vec![false; vertices.len()];
    for cell in cells.iter().chain(&boundary) {
        for &v in &cell.vertices {
            used[v] = true;
        }
    }

    let mut new_index = vec![usize::MAX; vertices.len()];
    let mut next = 0;
    for (v, _) in used.iter().enumerate().filter(|(_, used)| **used) {
        new_index[v] = next;
        next += 1;
    }
    tracing::debug!(
        removed = vertices.len() - next,
        kept = next,
        "deleted unused vertices"
    );

    let vertices = vertices
        .into_iter()
        .zip(&used)
        .filter_map(|(vertex, used)| used.then_some(vertex))
        .collect();
    for cell in cells.iter_mut().chain(&mut boundary) {
        for v in &mut cell.vertices {
            *v = new_index[*v];
        }
    }

    (vertices, cells, boundary)
}
